use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{CheckoutRequest, Order, OrderId};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Validation and pricing happen inside the actor, in
/// `Order::from_create_params`.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, request), fields(restaurant = %request.restaurant))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<OrderId, OrderError> {
        debug!(?request, "place_order called");
        info!("Sending place_order to actor");
        self.inner.create(request).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::EntityError(source) => match source.downcast::<OrderError>() {
                Ok(err) => *err,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

//! [`ActorEntity`] implementation for [`Order`].
//!
//! Orders are immutable once placed: no custom actions, and `Get` returns a
//! clone of the stored order.

use crate::framework::ActorEntity;
use crate::model::{CheckoutRequest, Order, OrderId};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use std::convert::Infallible;
use tracing::info;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = CheckoutRequest;
    type Action = Infallible;
    type ActionResult = ();
    type Snapshot = Order;
    type Context = ();
    type Error = OrderError;

    /// Validates the checkout and prices the cart.
    fn from_create_params(
        id: OrderId,
        params: CheckoutRequest,
        _ctx: &(),
    ) -> Result<Self, OrderError> {
        Ok(Order::place(id, params)?)
    }

    fn snapshot(&self) -> Order {
        self.clone()
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), OrderError> {
        info!(
            order_id = %self.id,
            restaurant = %self.restaurant,
            items = self.items.len(),
            total_cents = self.total_cents,
            "Order placed"
        );
        Ok(())
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), OrderError> {
        match action {}
    }
}

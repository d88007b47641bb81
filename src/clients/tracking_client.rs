//! # Tracking Client
//!
//! High-level API over a `ResourceClient<Tracking<S>>`. A display surface
//! opens a session with [`TrackingClient::start_tracking`], follows it with
//! [`TrackingClient::watch`], and closes it with
//! [`TrackingClient::stop_tracking`] when the view goes away.

use crate::framework::{ActorClient, FrameworkError, ResourceClient, Scheduler, TokioScheduler};
use crate::model::{OrderId, ProgressSnapshot, TrackingCreate, TrackingId, TrackingSnapshot};
use crate::tracking_actor::{Tracking, TrackingAction, TrackingActionResult, TrackingError};
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Client for interacting with the Tracking actor.
#[derive(Clone)]
pub struct TrackingClient<S: Scheduler = TokioScheduler> {
    inner: ResourceClient<Tracking<S>>,
}

impl<S: Scheduler> TrackingClient<S> {
    pub fn new(inner: ResourceClient<Tracking<S>>) -> Self {
        Self { inner }
    }

    /// Opens a tracking session for `order_id` and starts its progression.
    #[instrument(skip(self))]
    pub async fn start_tracking(&self, order_id: OrderId) -> Result<TrackingId, TrackingError> {
        debug!("Sending request");
        self.inner
            .create(TrackingCreate { order_id })
            .await
            .map_err(Self::map_error)
    }

    /// Current state of a session.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, id: TrackingId) -> Result<TrackingSnapshot, TrackingError> {
        self.get(id)
            .await?
            .ok_or_else(|| TrackingError::NotFound(id.to_string()))
    }

    /// Receiver that is notified on every stage change of the session.
    ///
    /// The receiver's sender closes when the session is deleted.
    #[instrument(skip(self))]
    pub async fn watch(
        &self,
        id: TrackingId,
    ) -> Result<watch::Receiver<ProgressSnapshot>, TrackingError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TrackingAction::Watch).await {
            Ok(TrackingActionResult::Watching(receiver)) => Ok(receiver),
            Ok(_) => unreachable!("Watch action must return Watching result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Cancels pending transitions and returns the state the session froze at.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: TrackingId) -> Result<ProgressSnapshot, TrackingError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TrackingAction::Cancel).await {
            Ok(TrackingActionResult::Cancelled(snapshot)) => Ok(snapshot),
            Ok(_) => unreachable!("Cancel action must return Cancelled result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Tears the session down, cancelling whatever has not fired yet.
    #[instrument(skip(self))]
    pub async fn stop_tracking(&self, id: TrackingId) -> Result<(), TrackingError> {
        self.delete(id).await
    }
}

#[async_trait]
impl<S: Scheduler> ActorClient<Tracking<S>> for TrackingClient<S> {
    type Error = TrackingError;

    fn inner(&self) -> &ResourceClient<Tracking<S>> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => TrackingError::NotFound(id),
            FrameworkError::EntityError(source) => match source.downcast::<TrackingError>() {
                Ok(err) => *err,
                Err(other) => TrackingError::ActorCommunicationError(other.to_string()),
            },
            other => TrackingError::ActorCommunicationError(other.to_string()),
        }
    }
}

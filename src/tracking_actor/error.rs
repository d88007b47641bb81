//! Error types for the Tracking actor.

use crate::model::OrderId;
use crate::order_actor::OrderError;
use crate::progression::ProgressionError;
use thiserror::Error;

/// Errors that can occur during tracking operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// Tracking was requested for an order the order actor does not hold.
    #[error("Unknown order: {0}")]
    UnknownOrder(OrderId),

    /// The requested tracking session was not found.
    #[error("Tracking session not found: {0}")]
    NotFound(String),

    /// Looking the order up failed.
    #[error("Order lookup failed: {0}")]
    OrderLookup(#[from] OrderError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

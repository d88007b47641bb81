//! Error types for the Order actor.

use crate::model::CheckoutError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The checkout form or cart was rejected.
    #[error("Order validation error: {0}")]
    Validation(#[from] CheckoutError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

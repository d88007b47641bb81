//! Tracking sessions: one per mounted tracking view.

use crate::model::{OrderId, ProgressSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type-safe identifier for tracking sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingId(pub u32);

impl From<u32> for TrackingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tracking_{}", self.0)
    }
}

/// Payload for opening a tracking session on an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingCreate {
    pub order_id: OrderId,
}

/// Read-only view of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub id: TrackingId,
    pub order_id: OrderId,
    pub progress: ProgressSnapshot,
    /// True once the session was cancelled before its last stage fired.
    pub cancelled: bool,
}

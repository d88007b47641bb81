//! Custom actions for tracking sessions.

use crate::model::ProgressSnapshot;
use tokio::sync::watch;

/// Operations on a running tracking session beyond create/get/delete.
#[derive(Debug, Clone)]
pub enum TrackingAction {
    /// Subscribe to stage changes.
    Watch,
    /// Stop the progression where it is. Idempotent.
    Cancel,
}

/// Results from [`TrackingAction`]s - variants match 1:1.
#[derive(Debug)]
pub enum TrackingActionResult {
    Watching(watch::Receiver<ProgressSnapshot>),
    /// State the session froze at.
    Cancelled(ProgressSnapshot),
}

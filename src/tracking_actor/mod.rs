//! Tracking resource: one progression per tracking session.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::{Tracking, TrackingContext};
pub use error::*;

use crate::clients::TrackingClient;
use crate::framework::{ResourceActor, Scheduler};

/// Creates a new Tracking actor and its client.
pub fn new<S: Scheduler>(mailbox_capacity: usize) -> (ResourceActor<Tracking<S>>, TrackingClient<S>) {
    let (actor, generic_client) = ResourceActor::new(mailbox_capacity);
    (actor, TrackingClient::new(generic_client))
}

//! Order resource: checkout validation and pricing.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::Order;

/// Creates a new Order actor and its client.
pub fn new(mailbox_capacity: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(mailbox_capacity);
    (actor, OrderClient::new(generic_client))
}

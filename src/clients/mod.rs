//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod order_client;
pub mod tracking_client;

pub use order_client::*;
pub use tracking_client::*;

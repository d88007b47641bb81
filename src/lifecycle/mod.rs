//! Runtime orchestration and lifecycle management.
//!
//! - [`TrackingSystem`] - starts the order and tracking actors, wires the
//!   tracking actor to the order client, and shuts both down
//! - [`SystemConfig`] - mailbox sizes and the stage schedule, from defaults or the environment
//! - [`setup_tracing`] - installs the log subscriber

pub mod config;
pub mod tracing;
pub mod tracking_system;

pub use self::config::*;
pub use self::tracing::*;
pub use self::tracking_system::*;

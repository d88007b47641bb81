//! Generic actor framework and timer abstraction.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns entities
//! - [`ResourceClient`] - Typed client that talks to a `ResourceActor`
//! - [`ActorClient`] - Default `get`/`delete` for domain clients
//! - [`FrameworkError`] - Common error types
//! - [`Scheduler`] - Clock and one-shot timers ([`TokioScheduler`], [`ManualScheduler`])
//!
//! # Testing
//!
//! See [`mock`] for clients that answer from expectations instead of a running actor.

pub mod core;
pub mod mock;
pub mod scheduler;

// Re-export core types for convenience
pub use self::core::*;
pub use self::scheduler::{ManualScheduler, ManualTimer, Scheduler, TimerCallback, TokioScheduler};

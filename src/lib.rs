//! # Order Tracking
//!
//! Order-status progression for a food-delivery front end, run on resource
//! actors.
//!
//! An order placed at checkout advances through four stages (Order Placed, In
//! the Kitchen, Out for Delivery, Delivered) at fixed offsets after its
//! tracking view opens. The offsets come from a [`StageSchedule`](model::StageSchedule);
//! the timers come from an injected [`Scheduler`](framework::Scheduler), so
//! tests drive the whole sequence on virtual time.
//!
//! ## Architecture Notes
//!
//! ### 1. Flat timer fan-out
//! [`Progression::start`](progression::Progression::start) schedules every
//! stage at once, each at its absolute delay from start. Nothing is chained,
//! so a late timer never pushes the following stages back.
//!
//! ### 2. Teardown owns the timers
//! Pending timer handles live in a guard owned by the progression. Cancelling,
//! deleting the tracking session, or dropping the progression releases them.
//!
//! ### 3. Async context injection
//! Dependencies are injected when an actor starts running, not when it is
//! constructed. The tracking actor receives its scheduler, its schedule and an
//! [`OrderClient`](clients::OrderClient) through `run()`.
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields. See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`] - generic `ResourceActor<T>`, clients, mocks, schedulers
//! - [`model`] - stages, schedule table, orders, tracking snapshots
//! - [`progression`] - the stage progression itself
//! - [`order_actor`], [`tracking_actor`] - the two resources
//! - [`clients`] - typed clients over the actors
//! - [`view`] - render model for the tracker display
//! - [`lifecycle`] - wiring, configuration, shutdown, log setup
//!
//! ## Running the Demo
//!
//! ```bash
//! # Real-time delays, stage changes logged
//! RUST_LOG=info cargo run
//!
//! # Ten times faster
//! TRACKING_TIME_SCALE=10 RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod progression;
pub mod tracking_actor;
pub mod view;

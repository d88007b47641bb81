//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden; actor log lines carry an
//! `entity_type` field instead.
//!
//! ```bash
//! # Stage transitions and actor lifecycle
//! RUST_LOG=info cargo run
//!
//! # Request payloads and scheduled timers
//! RUST_LOG=debug cargo run
//!
//! # Only the progression
//! RUST_LOG=order_tracking::progression=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a tracked order reads:
//!
//! ```text
//! INFO Created entity_type="Order" id=order_1 size=1
//! INFO Progression started stage=Order Placed progress=10
//! INFO Tracking started tracking_id=tracking_1 order_id=order_1
//! INFO Stage reached stage=In the Kitchen progress=40 elapsed_ms=5000
//! INFO Stage reached stage=Out for Delivery progress=75 elapsed_ms=8000
//! INFO Stage reached stage=Delivered progress=100 elapsed_ms=10000
//! ```

/// Installs the global subscriber. Call once, at program start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

use crate::clients::{OrderClient, TrackingClient};
use crate::framework::{Scheduler, TokioScheduler};
use crate::lifecycle::SystemConfig;
use crate::tracking_actor::TrackingContext;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// Starts, wires and stops the order and tracking actors.
///
/// # Architecture
///
/// - **Order Actor**: places orders from checkout requests (`Context = ()`)
/// - **Tracking Actor**: one progression per session; its context carries the
///   scheduler, the stage schedule and an [`OrderClient`] for order lookups
///
/// # Example
///
/// ```ignore
/// let system = TrackingSystem::new(SystemConfig::default());
///
/// let order_id = system.order_client.place_order(request).await?;
/// let tracking_id = system.tracking_client.start_tracking(order_id).await?;
/// let mut updates = system.tracking_client.watch(tracking_id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct TrackingSystem<S: Scheduler = TokioScheduler> {
    pub order_client: OrderClient,
    pub tracking_client: TrackingClient<S>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TrackingSystem<TokioScheduler> {
    /// Starts the system on tokio timers. Must be called inside a tokio runtime.
    pub fn new(config: SystemConfig) -> Self {
        Self::with_scheduler(config, TokioScheduler::new())
    }
}

impl<S: Scheduler> TrackingSystem<S> {
    /// Starts the system on an explicit scheduler.
    pub fn with_scheduler(config: SystemConfig, scheduler: S) -> Self {
        // 1. Create actors (no dependencies yet)
        let (order_actor, order_client) = crate::order_actor::new(config.mailbox_capacity);
        let (tracking_actor, tracking_client) =
            crate::tracking_actor::new::<S>(config.mailbox_capacity);

        // 2. Start actors with injected context
        let order_handle = tokio::spawn(order_actor.run(()));
        let tracking_handle = tokio::spawn(tracking_actor.run(TrackingContext {
            scheduler,
            schedule: config.schedule,
            orders: order_client.clone(),
        }));

        Self {
            order_client,
            tracking_client,
            handles: vec![order_handle, tracking_handle],
        }
    }

    /// Gracefully shuts down both actors.
    ///
    /// The tracking actor holds an `OrderClient`, so the order actor only sees
    /// its channel close after the tracking actor has exited. Handles are
    /// awaited in spawn order; that wait covers both.
    ///
    /// Open tracking sessions are dropped with the tracking actor's store,
    /// which cancels their pending transitions.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down system...");

        drop(self.tracking_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

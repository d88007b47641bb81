//! [`ActorEntity`] implementation for tracking sessions.
//!
//! A [`Tracking`] session stands in for a mounted tracking view. Creating one
//! checks that the order exists and starts a [`Progression`]; deleting it is
//! the view unmounting, which cancels every transition still pending.

use crate::clients::OrderClient;
use crate::framework::{ActorClient, ActorEntity, Scheduler};
use crate::model::{OrderId, StageSchedule, TrackingCreate, TrackingId, TrackingSnapshot};
use crate::progression::{Phase, Progression};
use crate::tracking_actor::{TrackingAction, TrackingActionResult, TrackingError};
use async_trait::async_trait;
use tracing::{info, warn};

/// Dependencies injected into the tracking actor at `run()` time.
#[derive(Clone)]
pub struct TrackingContext<S: Scheduler> {
    pub scheduler: S,
    pub schedule: StageSchedule,
    pub orders: OrderClient,
}

/// One tracking session and the progression it owns.
#[derive(Debug)]
pub struct Tracking<S: Scheduler> {
    id: TrackingId,
    order_id: OrderId,
    progression: Progression<S>,
}

#[async_trait]
impl<S: Scheduler> ActorEntity for Tracking<S> {
    type Id = TrackingId;
    type Create = TrackingCreate;
    type Action = TrackingAction;
    type ActionResult = TrackingActionResult;
    type Snapshot = TrackingSnapshot;
    type Context = TrackingContext<S>;
    type Error = TrackingError;

    fn from_create_params(
        id: TrackingId,
        params: TrackingCreate,
        ctx: &TrackingContext<S>,
    ) -> Result<Self, TrackingError> {
        Ok(Self {
            id,
            order_id: params.order_id,
            progression: Progression::new(ctx.scheduler.clone(), ctx.schedule.clone()),
        })
    }

    fn snapshot(&self) -> TrackingSnapshot {
        TrackingSnapshot {
            id: self.id,
            order_id: self.order_id,
            progress: self.progression.snapshot(),
            cancelled: self.progression.phase() == Phase::Cancelled,
        }
    }

    /// Starts the progression once the order is known to exist.
    async fn on_create(&mut self, ctx: &TrackingContext<S>) -> Result<(), TrackingError> {
        if ctx.orders.get(self.order_id).await?.is_none() {
            warn!(tracking_id = %self.id, order_id = %self.order_id, "Order not found");
            return Err(TrackingError::UnknownOrder(self.order_id));
        }
        self.progression.start()?;
        info!(tracking_id = %self.id, order_id = %self.order_id, "Tracking started");
        Ok(())
    }

    async fn on_delete(&mut self, _ctx: &TrackingContext<S>) -> Result<(), TrackingError> {
        self.progression.cancel();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TrackingAction,
        _ctx: &TrackingContext<S>,
    ) -> Result<TrackingActionResult, TrackingError> {
        match action {
            TrackingAction::Watch => Ok(TrackingActionResult::Watching(
                self.progression.subscribe(),
            )),
            TrackingAction::Cancel => {
                self.progression.cancel();
                Ok(TrackingActionResult::Cancelled(self.progression.snapshot()))
            }
        }
    }
}

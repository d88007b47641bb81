//! # Order Status Progression
//!
//! Walks an order through a [`StageSchedule`] on a [`Scheduler`]'s clock.
//!
//! `start()` applies the first entry immediately and schedules every other
//! entry as its own one-shot timer at the entry's delay from start. Timers are
//! not chained: each fires at `t0 + delay` regardless of when the previous
//! one fired. `cancel()` removes whatever has not fired yet and leaves the
//! state at the last stage reached.
//!
//! State is published through a `tokio::sync::watch` channel. The scheduled
//! transitions are its only writer; [`Progression::subscribe`] hands out
//! readers for display surfaces.
//!
//! Dropping a `Progression` cancels its pending timers.

use crate::framework::Scheduler;
use crate::model::{ProgressSnapshot, StageSchedule};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgressionError {
    /// `start()` runs once per instance. Restarting would lower progress.
    #[error("progression already started")]
    AlreadyStarted,
}

/// Pending timer handles for one run, released on cancel or drop.
struct PendingTimers<S: Scheduler> {
    scheduler: S,
    handles: Vec<S::Handle>,
    // Cleared before the handles are cancelled; a callback already past its
    // timer on another worker thread checks it before writing.
    live: Arc<AtomicBool>,
}

impl<S: Scheduler> PendingTimers<S> {
    fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            handles: Vec::new(),
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    fn cancel_all(&mut self) -> usize {
        self.live.store(false, Ordering::Release);
        let count = self.handles.len();
        for handle in self.handles.drain(..) {
            self.scheduler.cancel(&handle);
        }
        count
    }
}

impl<S: Scheduler> Drop for PendingTimers<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Lifecycle of a [`Progression`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Cancelled,
}

pub struct Progression<S: Scheduler> {
    schedule: StageSchedule,
    state: Arc<watch::Sender<ProgressSnapshot>>,
    timers: PendingTimers<S>,
    phase: Phase,
}

impl<S: Scheduler> Progression<S> {
    /// Creates an idle progression showing the schedule's first entry.
    pub fn new(scheduler: S, schedule: StageSchedule) -> Self {
        let initial = ProgressSnapshot::from(schedule.initial());
        let (state, _) = watch::channel(initial);
        Self {
            schedule,
            state: Arc::new(state),
            timers: PendingTimers::new(scheduler),
            phase: Phase::Idle,
        }
    }

    /// Applies the first entry and schedules one timer per remaining entry.
    ///
    /// Fails with [`ProgressionError::AlreadyStarted`] on any call after the
    /// first, including after [`Progression::cancel`]; nothing changes then.
    pub fn start(&mut self) -> Result<(), ProgressionError> {
        if self.phase != Phase::Idle {
            return Err(ProgressionError::AlreadyStarted);
        }
        self.phase = Phase::Running;

        let started_at = self.timers.scheduler.elapsed();
        let live = Arc::new(AtomicBool::new(true));
        self.timers.live = Arc::clone(&live);

        let initial = ProgressSnapshot::from(self.schedule.initial());
        self.state.send_replace(initial);
        info!(stage = %initial.stage, progress = initial.progress, "Progression started");

        for entry in self.schedule.entries().iter().skip(1) {
            let snapshot = ProgressSnapshot::from(entry);
            let state = Arc::clone(&self.state);
            let live = Arc::clone(&live);
            let scheduler = self.timers.scheduler.clone();

            let handle = self.timers.scheduler.schedule_after(
                entry.delay,
                Box::new(move || {
                    if !live.load(Ordering::Acquire) {
                        return;
                    }
                    // Entries sharing a delay may wake in either order on a threaded runtime.
                    let advanced = state.send_if_modified(|current| {
                        if snapshot.stage > current.stage {
                            *current = snapshot;
                            true
                        } else {
                            false
                        }
                    });
                    if !advanced {
                        return;
                    }
                    let elapsed_ms = scheduler.elapsed().saturating_sub(started_at).as_millis() as u64;
                    info!(stage = %snapshot.stage, progress = snapshot.progress, elapsed_ms, "Stage reached");
                }),
            );
            self.timers.handles.push(handle);
        }
        debug!(scheduled = self.timers.handles.len(), "Transitions scheduled");
        Ok(())
    }

    /// Cancels every transition that has not fired yet. Safe to call repeatedly.
    ///
    /// Once the last entry has fired there is nothing left to cancel and the
    /// phase stays `Running`.
    pub fn cancel(&mut self) {
        let cancelled = self.timers.cancel_all();
        let finished = self.snapshot().stage == self.schedule.last().stage;
        if self.phase == Phase::Running && !finished {
            self.phase = Phase::Cancelled;
            let current = self.snapshot();
            info!(stage = %current.stage, progress = current.progress, cancelled, "Progression cancelled");
        }
    }

    /// Current stage and progress.
    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.state.borrow()
    }

    /// A reader that sees every transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn schedule(&self) -> &StageSchedule {
        &self.schedule
    }
}

impl<S: Scheduler> std::fmt::Debug for Progression<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progression")
            .field("phase", &self.phase)
            .field("snapshot", &self.snapshot())
            .field("pending", &self.timers.handles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{ManualScheduler, TokioScheduler};
    use crate::model::{OrderStage, ScheduleEntry};
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn started(scheduler: &ManualScheduler) -> Progression<ManualScheduler> {
        let mut progression = Progression::new(scheduler.clone(), StageSchedule::standard());
        progression.start().unwrap();
        progression
    }

    #[test]
    fn follows_the_standard_trace() {
        let scheduler = ManualScheduler::new();
        let progression = started(&scheduler);

        let trace = [
            (0, OrderStage::Placed, 10),
            (4_999, OrderStage::Placed, 10),
            (5_000, OrderStage::InKitchen, 40),
            (7_999, OrderStage::InKitchen, 40),
            (8_000, OrderStage::OutForDelivery, 75),
            (9_999, OrderStage::OutForDelivery, 75),
            (10_000, OrderStage::Delivered, 100),
        ];
        for (at, stage, progress) in trace {
            scheduler.advance_to(ms(at));
            assert_eq!(
                progression.snapshot(),
                ProgressSnapshot::new(stage, progress),
                "at {at}ms"
            );
        }
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn matches_the_table_at_every_delay_for_sorted_tables() {
        use OrderStage::*;

        let tables = vec![
            StageSchedule::standard(),
            StageSchedule::standard().scaled(1),
            StageSchedule::new(vec![
                ScheduleEntry::new(Placed, 0, ms(0)),
                ScheduleEntry::new(Delivered, 100, ms(3)),
            ])
            .unwrap(),
            StageSchedule::new(vec![
                ScheduleEntry::new(Placed, 5, ms(0)),
                ScheduleEntry::new(InKitchen, 5, ms(0)),
                ScheduleEntry::new(OutForDelivery, 60, ms(7)),
                ScheduleEntry::new(Delivered, 100, ms(7)),
            ])
            .unwrap(),
        ];

        for schedule in tables {
            let scheduler = ManualScheduler::new();
            let mut progression = Progression::new(scheduler.clone(), schedule.clone());
            progression.start().unwrap();

            let mut last_progress = 0;
            for entry in schedule.entries() {
                scheduler.advance_to(entry.delay);
                let snapshot = progression.snapshot();
                assert_eq!(snapshot, schedule.expected_at(entry.delay));
                assert!(snapshot.progress >= last_progress);
                last_progress = snapshot.progress;
            }
            assert_eq!(progression.snapshot(), ProgressSnapshot::from(schedule.last()));
        }
    }

    #[test]
    fn cancel_before_first_delay_freezes_at_placed() {
        let scheduler = ManualScheduler::new();
        let mut progression = started(&scheduler);
        assert_eq!(scheduler.pending(), 3);

        scheduler.advance(ms(1_000));
        progression.cancel();
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(ms(60_000));
        assert_eq!(progression.snapshot(), ProgressSnapshot::new(OrderStage::Placed, 10));
        assert_eq!(progression.phase(), Phase::Cancelled);
    }

    #[test]
    fn cancel_mid_way_keeps_last_fired_stage() {
        let scheduler = ManualScheduler::new();
        let mut progression = started(&scheduler);

        scheduler.advance_to(ms(8_500));
        progression.cancel();
        scheduler.advance_to(ms(20_000));

        assert_eq!(
            progression.snapshot(),
            ProgressSnapshot::new(OrderStage::OutForDelivery, 75)
        );
    }

    #[test]
    fn cancel_twice_is_a_no_op() {
        let scheduler = ManualScheduler::new();
        let mut progression = started(&scheduler);

        scheduler.advance_to(ms(5_000));
        progression.cancel();
        let after_first = progression.snapshot();
        progression.cancel();

        assert_eq!(progression.snapshot(), after_first);
        assert_eq!(progression.phase(), Phase::Cancelled);
    }

    #[test]
    fn cancel_after_delivery_is_a_no_op() {
        let scheduler = ManualScheduler::new();
        let mut progression = started(&scheduler);

        scheduler.advance_to(ms(10_000));
        progression.cancel();
        progression.cancel();

        assert_eq!(
            progression.snapshot(),
            ProgressSnapshot::new(OrderStage::Delivered, 100)
        );
        assert_eq!(progression.phase(), Phase::Running);
        assert_eq!(progression.start(), Err(ProgressionError::AlreadyStarted));
    }

    #[test]
    fn delivered_is_terminal() {
        let scheduler = ManualScheduler::new();
        let progression = started(&scheduler);

        scheduler.advance_to(ms(10_000));
        assert!(progression.snapshot().is_delivered());
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(ms(3_600_000));
        assert_eq!(
            progression.snapshot(),
            ProgressSnapshot::new(OrderStage::Delivered, 100)
        );
    }

    #[test]
    fn second_start_is_rejected_without_side_effects() {
        let scheduler = ManualScheduler::new();
        let mut progression = started(&scheduler);
        scheduler.advance_to(ms(6_000));

        assert_eq!(progression.start(), Err(ProgressionError::AlreadyStarted));
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(
            progression.snapshot(),
            ProgressSnapshot::new(OrderStage::InKitchen, 40)
        );

        progression.cancel();
        assert_eq!(progression.start(), Err(ProgressionError::AlreadyStarted));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn delays_count_from_start_not_from_previous_stage() {
        let scheduler = ManualScheduler::new();
        scheduler.advance(ms(2_000));
        let progression = started(&scheduler);

        // Jumping straight past every deadline fires them all, in table order.
        let mut watcher = progression.subscribe();
        scheduler.advance(ms(10_000));
        assert!(watcher.has_changed().unwrap());
        assert_eq!(
            *watcher.borrow_and_update(),
            ProgressSnapshot::new(OrderStage::Delivered, 100)
        );
        assert_eq!(scheduler.now(), ms(12_000));
    }

    #[test]
    fn dropping_the_progression_cancels_pending_timers() {
        let scheduler = ManualScheduler::new();
        let progression = started(&scheduler);
        let mut watcher = progression.subscribe();
        assert_eq!(scheduler.pending(), 3);

        drop(progression);
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(ms(60_000));
        assert!(watcher.has_changed().is_err());
        assert_eq!(
            *watcher.borrow_and_update(),
            ProgressSnapshot::new(OrderStage::Placed, 10)
        );
    }

    #[test]
    fn idle_progression_schedules_nothing() {
        let scheduler = ManualScheduler::new();
        let mut progression = Progression::new(scheduler.clone(), StageSchedule::standard());
        progression.cancel();

        assert_eq!(progression.phase(), Phase::Idle);
        assert_eq!(scheduler.pending(), 0);
        assert!(progression.start().is_ok());
        assert_eq!(scheduler.pending(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_fires_each_stage_at_its_absolute_delay() {
        let scheduler = TokioScheduler::new();
        let mut progression = Progression::new(scheduler.clone(), StageSchedule::standard());
        let mut watcher = progression.subscribe();
        progression.start().unwrap();
        watcher.borrow_and_update();

        let expected = [
            (5_000, OrderStage::InKitchen, 40),
            (8_000, OrderStage::OutForDelivery, 75),
            (10_000, OrderStage::Delivered, 100),
        ];
        for (at, stage, progress) in expected {
            watcher.changed().await.unwrap();
            assert_eq!(scheduler.elapsed(), ms(at));
            assert_eq!(
                *watcher.borrow_and_update(),
                ProgressSnapshot::new(stage, progress)
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_cancel_stops_further_transitions() {
        let scheduler = TokioScheduler::new();
        let mut progression = Progression::new(scheduler, StageSchedule::standard());
        let mut watcher = progression.subscribe();
        progression.start().unwrap();
        watcher.borrow_and_update();

        watcher.changed().await.unwrap();
        progression.cancel();

        tokio::time::sleep(ms(30_000)).await;
        assert!(!watcher.has_changed().unwrap());
        assert_eq!(
            progression.snapshot(),
            ProgressSnapshot::new(OrderStage::InKitchen, 40)
        );
    }
}

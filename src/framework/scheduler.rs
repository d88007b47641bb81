//! # Schedulers
//!
//! The progression never touches a timer directly. It asks a [`Scheduler`]
//! to run a callback after a delay and keeps the returned handle so it can
//! cancel the callback later.
//!
//! - [`TokioScheduler`] spawns one task per timer. Under
//!   `#[tokio::test(start_paused = true)]` those tasks run on tokio's virtual
//!   clock.
//! - [`ManualScheduler`] never fires on its own. Tests move its clock with
//!   [`ManualScheduler::advance`] and due callbacks run on the calling thread.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::trace;

/// A one-shot callback run when its timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Clock plus one-shot delayed callbacks.
pub trait Scheduler: Clone + Send + Sync + 'static {
    /// Handle returned by [`Scheduler::schedule_after`].
    type Handle: Send + Sync + 'static;

    /// Time elapsed since the scheduler was created.
    fn elapsed(&self) -> Duration;

    /// Runs `callback` once, `delay` from now.
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> Self::Handle;

    /// Prevents a pending callback from running. No-op once it has run or was cancelled.
    fn cancel(&self, handle: &Self::Handle);
}

// =============================================================================
// TOKIO
// =============================================================================

/// Timers backed by `tokio::time`. Must be used inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    epoch: Instant,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    type Handle = AbortHandle;

    fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> AbortHandle {
        // Deadline is fixed here, not when the task is first polled.
        let deadline = Instant::now() + delay;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback();
        })
        .abort_handle()
    }

    fn cancel(&self, handle: &AbortHandle) {
        handle.abort();
    }
}

// =============================================================================
// MANUAL (VIRTUAL TIME)
// =============================================================================

/// Handle to a timer registered with a [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManualTimer {
    deadline: Duration,
    seq: u64,
}

impl ManualTimer {
    /// Virtual time at which the timer fires.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<ManualTimer, TimerCallback>,
}

/// Deterministic virtual-time scheduler.
///
/// Timers fire in deadline order; timers sharing a deadline fire in the order
/// they were scheduled. Clones share one clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves the clock forward by `by`, firing every timer that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.advance_to(target);
    }

    /// Moves the clock to `target`, firing every timer due at or before it.
    /// Does nothing if `target` is in the past.
    pub fn advance_to(&self, target: Duration) {
        loop {
            // Callbacks run with the lock released so they may schedule or cancel.
            let due = {
                let mut state = self.lock();
                let next = state.pending.keys().next().copied();
                match next {
                    Some(timer) if timer.deadline <= target => {
                        state.now = state.now.max(timer.deadline);
                        state.pending.remove(&timer)
                    }
                    _ => {
                        state.now = state.now.max(target);
                        None
                    }
                }
            };
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn elapsed(&self) -> Duration {
        self.now()
    }

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> ManualTimer {
        let mut state = self.lock();
        let timer = ManualTimer {
            deadline: state.now + delay,
            seq: state.next_seq,
        };
        state.next_seq += 1;
        state.pending.insert(timer, callback);
        trace!(deadline_ms = timer.deadline.as_millis() as u64, "Timer scheduled");
        timer
    }

    fn cancel(&self, handle: &ManualTimer) {
        self.lock().pending.remove(handle);
    }
}

//! Order stages and the schedule table that drives them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One step of the fulfilment sequence. Declaration order is sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStage {
    #[serde(rename = "placed")]
    Placed,
    #[serde(rename = "kitchen")]
    InKitchen,
    #[serde(rename = "delivery")]
    OutForDelivery,
    #[serde(rename = "delivered")]
    Delivered,
}

impl OrderStage {
    /// Every stage, in sequence order.
    pub const ALL: [OrderStage; 4] = [
        OrderStage::Placed,
        OrderStage::InKitchen,
        OrderStage::OutForDelivery,
        OrderStage::Delivered,
    ];

    /// Position in the sequence.
    pub fn index(self) -> usize {
        match self {
            OrderStage::Placed => 0,
            OrderStage::InKitchen => 1,
            OrderStage::OutForDelivery => 2,
            OrderStage::Delivered => 3,
        }
    }

    /// Title shown under the stage's step in the tracker.
    pub fn title(self) -> &'static str {
        match self {
            OrderStage::Placed => "Order Placed",
            OrderStage::InKitchen => "In the Kitchen",
            OrderStage::OutForDelivery => "Out for Delivery",
            OrderStage::Delivered => "Delivered",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStage::Delivered
    }

    /// How this stage renders while the order sits at `current`.
    pub fn state_relative_to(self, current: OrderStage) -> StageState {
        match self.index().cmp(&current.index()) {
            std::cmp::Ordering::Less => StageState::Completed,
            std::cmp::Ordering::Equal => StageState::Active,
            std::cmp::Ordering::Greater => StageState::Pending,
        }
    }
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Rendering state of a stage relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Completed,
    Active,
    Pending,
}

/// Current stage and progress percentage of one progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub stage: OrderStage,
    pub progress: u8,
}

impl ProgressSnapshot {
    pub fn new(stage: OrderStage, progress: u8) -> Self {
        Self { stage, progress }
    }

    pub fn is_delivered(&self) -> bool {
        self.stage.is_terminal()
    }
}

impl From<&ScheduleEntry> for ProgressSnapshot {
    fn from(entry: &ScheduleEntry) -> Self {
        Self::new(entry.stage, entry.progress)
    }
}

/// One row of a [`StageSchedule`]. `delay` counts from progression start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub stage: OrderStage,
    pub progress: u8,
    pub delay: Duration,
}

impl ScheduleEntry {
    pub const fn new(stage: OrderStage, progress: u8, delay: Duration) -> Self {
        Self {
            stage,
            progress,
            delay,
        }
    }
}

/// Reasons a schedule table is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has no entries")]
    Empty,

    #[error("first entry must fire at 0ms, found {0:?}")]
    FirstDelayNotZero(Duration),

    #[error("progress {progress} for {stage} is above 100")]
    ProgressOutOfRange { stage: OrderStage, progress: u8 },

    #[error("{stage} does not come after {previous}")]
    StagesOutOfOrder {
        previous: OrderStage,
        stage: OrderStage,
    },

    #[error("{stage} fires before the entry preceding it")]
    DelaysOutOfOrder { stage: OrderStage },

    #[error("{stage} lowers progress")]
    ProgressDecreasing { stage: OrderStage },
}

const STANDARD: [ScheduleEntry; 4] = [
    ScheduleEntry::new(OrderStage::Placed, 10, Duration::from_millis(0)),
    ScheduleEntry::new(OrderStage::InKitchen, 40, Duration::from_millis(5_000)),
    ScheduleEntry::new(OrderStage::OutForDelivery, 75, Duration::from_millis(8_000)),
    ScheduleEntry::new(OrderStage::Delivered, 100, Duration::from_millis(10_000)),
];

/// Validated table mapping stages to progress and absolute delay.
///
/// Entries are in sequence order, delays and progress never decrease, and the
/// first entry fires at 0ms. A progression reads the table once at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSchedule {
    entries: Vec<ScheduleEntry>,
}

impl StageSchedule {
    /// The table used by the tracking page.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD.to_vec(),
        }
    }

    pub fn new(entries: Vec<ScheduleEntry>) -> Result<Self, ScheduleError> {
        let first = entries.first().ok_or(ScheduleError::Empty)?;
        if !first.delay.is_zero() {
            return Err(ScheduleError::FirstDelayNotZero(first.delay));
        }
        for entry in &entries {
            if entry.progress > 100 {
                return Err(ScheduleError::ProgressOutOfRange {
                    stage: entry.stage,
                    progress: entry.progress,
                });
            }
        }
        for pair in entries.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.stage <= previous.stage {
                return Err(ScheduleError::StagesOutOfOrder {
                    previous: previous.stage,
                    stage: next.stage,
                });
            }
            if next.delay < previous.delay {
                return Err(ScheduleError::DelaysOutOfOrder { stage: next.stage });
            }
            if next.progress < previous.progress {
                return Err(ScheduleError::ProgressDecreasing { stage: next.stage });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// The entry applied at start.
    pub fn initial(&self) -> &ScheduleEntry {
        // Construction rejects empty tables.
        &self.entries[0]
    }

    /// The last entry; the progression stops there.
    pub fn last(&self) -> &ScheduleEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Copy with every delay scaled to `percent`% of its value.
    ///
    /// Scaling keeps delays in the same order, so the result stays valid.
    pub fn scaled(&self, percent: u32) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| ScheduleEntry {
                delay: entry.delay * percent / 100,
                ..*entry
            })
            .collect();
        Self { entries }
    }

    /// Snapshot the table prescribes at `elapsed` after start.
    pub fn expected_at(&self, elapsed: Duration) -> ProgressSnapshot {
        let entry = self
            .entries
            .iter()
            .rev()
            .find(|entry| entry.delay <= elapsed)
            .unwrap_or_else(|| self.initial());
        ProgressSnapshot::from(entry)
    }
}

impl Default for StageSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

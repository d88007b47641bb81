//! Render model for the tracker display.
//!
//! [`TrackerView::render`] is a pure function of an order and a progress
//! snapshot. It decides what each step, connector and text line shows; it
//! does not draw anything.

use crate::model::{Order, OrderStage, ProgressSnapshot, StageState};
use serde::Serialize;

/// One step indicator on the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub stage: OrderStage,
    pub title: &'static str,
    pub state: StageState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerView {
    pub header: String,
    pub steps: Vec<StepView>,
    /// `connectors[i]` joins step `i` and step `i + 1`; filled once step `i` is completed.
    pub connectors: Vec<bool>,
    pub progress: u8,
    pub message: &'static str,
}

impl TrackerView {
    pub fn render(order: &Order, snapshot: ProgressSnapshot) -> Self {
        let steps: Vec<StepView> = OrderStage::ALL
            .iter()
            .map(|&stage| StepView {
                stage,
                title: stage.title(),
                state: stage.state_relative_to(snapshot.stage),
            })
            .collect();

        let connectors = steps
            .iter()
            .take(steps.len() - 1)
            .map(|step| step.state == StageState::Completed)
            .collect();

        let header = if snapshot.is_delivered() || order.estimated_delivery.is_empty() {
            format!("Order #{} - Your order journey is shown below.", order.id.0)
        } else {
            format!(
                "Order #{} - Estimated Delivery: {}",
                order.id.0, order.estimated_delivery
            )
        };
        let message = if snapshot.is_delivered() {
            "Your order has arrived. Enjoy!"
        } else {
            "Your order is on its way."
        };

        Self {
            header,
            steps,
            connectors,
            progress: snapshot.progress,
            message,
        }
    }

    /// The step currently marked active.
    pub fn active_step(&self) -> Option<&StepView> {
        self.steps
            .iter()
            .find(|step| step.state == StageState::Active)
    }
}

//! Demo: place the sample checkout order and follow it to delivery.

use order_tracking::framework::ActorClient;
use order_tracking::lifecycle::{setup_tracing, SystemConfig, TrackingSystem};
use order_tracking::model::{CartItem, CheckoutForm, CheckoutRequest, PaymentMethod};
use order_tracking::view::TrackerView;
use tracing::{error, info, Instrument};

fn sample_checkout() -> CheckoutRequest {
    CheckoutRequest {
        restaurant: "Pizza Palace".to_string(),
        items: vec![
            CartItem::new("Margherita Pizza", 1, 1499),
            CartItem::new("Garlic Breadsticks", 1, 650),
            CartItem::new("Caesar Salad", 2, 800),
        ],
        form: CheckoutForm {
            address: "123 Flavor St".to_string(),
            city: "Tastytown".to_string(),
            state: "CA".to_string(),
            zip: "90210".to_string(),
            payment_method: PaymentMethod::Card,
            promo_code: None,
        },
        estimated_delivery: "8:45 PM - 9:00 PM".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;
    info!(
        mailbox_capacity = config.mailbox_capacity,
        delivered_after_ms = config.schedule.last().delay.as_millis() as u64,
        "Starting order tracking demo"
    );

    let system = TrackingSystem::new(config);

    let span = tracing::info_span!("checkout");
    let order_id = async {
        info!("Placing sample order");
        system
            .order_client
            .place_order(sample_checkout())
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let order = system
        .order_client
        .get(order_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{order_id} vanished after checkout"))?;

    let span = tracing::info_span!("tracking", %order_id);
    let result: Result<(), String> = async {
        let tracking_id = system
            .tracking_client
            .start_tracking(order_id)
            .await
            .map_err(|e| e.to_string())?;
        let mut updates = system
            .tracking_client
            .watch(tracking_id)
            .await
            .map_err(|e| e.to_string())?;

        loop {
            let snapshot = *updates.borrow_and_update();
            let view = TrackerView::render(&order, snapshot);
            info!(progress = view.progress, status = view.message, "{}", view.header);
            if snapshot.is_delivered() {
                break;
            }
            updates.changed().await.map_err(|e| e.to_string())?;
        }

        system
            .tracking_client
            .stop_tracking(tracking_id)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await;

    if let Err(e) = &result {
        error!(error = %e, "Tracking failed");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed");
    result
}

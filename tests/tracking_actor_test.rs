//! Tracking actor tests with a mocked order actor.
//!
//! The tracking actor runs for real on a `ManualScheduler`; its `OrderClient`
//! is backed by a [`MockClient`], so order lookups are scripted per test.

use order_tracking::clients::{OrderClient, TrackingClient};
use order_tracking::framework::mock::MockClient;
use order_tracking::framework::{FrameworkError, ManualScheduler};
use order_tracking::model::{
    CartItem, CheckoutForm, CheckoutRequest, Order, OrderId, OrderStage, PaymentMethod,
    ProgressSnapshot, StageSchedule,
};
use order_tracking::order_actor::OrderError;
use order_tracking::tracking_actor::{self, TrackingContext, TrackingError};
use std::time::Duration;
use tokio::task::JoinHandle;

fn order(id: u32) -> Order {
    Order::place(
        OrderId(id),
        CheckoutRequest {
            restaurant: "Sushi Spot".to_string(),
            items: vec![CartItem::new("Dragon Roll", 2, 1350)],
            form: CheckoutForm {
                address: "42 Harbor Lane".to_string(),
                city: "Bayview".to_string(),
                state: "WA".to_string(),
                zip: "98101".to_string(),
                payment_method: PaymentMethod::Card,
                promo_code: None,
            },
            estimated_delivery: "7:30 PM - 7:45 PM".to_string(),
        },
    )
    .unwrap()
}

fn spawn_tracking(
    orders: &MockClient<Order>,
    clock: &ManualScheduler,
) -> (TrackingClient<ManualScheduler>, JoinHandle<()>) {
    let (actor, client) = tracking_actor::new::<ManualScheduler>(8);
    let handle = tokio::spawn(actor.run(TrackingContext {
        scheduler: clock.clone(),
        schedule: StageSchedule::standard(),
        orders: OrderClient::new(orders.client()),
    }));
    (client, handle)
}

#[tokio::test]
async fn test_start_tracking_looks_the_order_up_then_starts() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);

    let tracking_id = client.start_tracking(OrderId(1)).await.unwrap();

    assert_eq!(clock.pending(), 3);
    let snapshot = client.snapshot(tracking_id).await.unwrap();
    assert_eq!(snapshot.progress, ProgressSnapshot::new(OrderStage::Placed, 10));
    orders.verify();
}

#[tokio::test]
async fn test_unknown_order_leaves_no_timers_behind() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(2)).return_ok(None);
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);

    let result = client.start_tracking(OrderId(2)).await;

    assert_eq!(result, Err(TrackingError::UnknownOrder(OrderId(2))));
    assert_eq!(clock.pending(), 0);
    orders.verify();
}

#[tokio::test]
async fn test_order_lookup_failure_is_reported() {
    let mut orders = MockClient::<Order>::new();
    orders
        .expect_get(OrderId(3))
        .return_err(FrameworkError::ActorClosed);
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);

    let result = client.start_tracking(OrderId(3)).await;

    assert_eq!(
        result,
        Err(TrackingError::OrderLookup(OrderError::ActorCommunicationError(
            "Actor closed".to_string()
        )))
    );
    assert_eq!(clock.pending(), 0);
}

#[tokio::test]
async fn test_watchers_see_each_stage_in_order() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);
    let tracking_id = client.start_tracking(OrderId(1)).await.unwrap();
    let mut updates = client.watch(tracking_id).await.unwrap();

    let mut seen = vec![*updates.borrow_and_update()];
    for at in [4_999, 5_000, 7_999, 8_000, 10_000, 20_000] {
        clock.advance_to(Duration::from_millis(at));
        if updates.has_changed().unwrap() {
            seen.push(*updates.borrow_and_update());
        }
    }

    assert_eq!(
        seen,
        vec![
            ProgressSnapshot::new(OrderStage::Placed, 10),
            ProgressSnapshot::new(OrderStage::InKitchen, 40),
            ProgressSnapshot::new(OrderStage::OutForDelivery, 75),
            ProgressSnapshot::new(OrderStage::Delivered, 100),
        ]
    );
}

#[tokio::test]
async fn test_cancel_and_delete_release_timers() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);

    let cancelled = client.start_tracking(OrderId(1)).await.unwrap();
    let deleted = client.start_tracking(OrderId(1)).await.unwrap();
    assert_eq!(clock.pending(), 6);

    clock.advance_to(Duration::from_millis(5_000));
    assert_eq!(
        client.cancel(cancelled).await.unwrap(),
        ProgressSnapshot::new(OrderStage::InKitchen, 40)
    );
    assert_eq!(clock.pending(), 2);

    client.stop_tracking(deleted).await.unwrap();
    assert_eq!(clock.pending(), 0);

    clock.advance_to(Duration::from_millis(60_000));
    let snapshot = client.snapshot(cancelled).await.unwrap();
    assert!(snapshot.cancelled);
    assert_eq!(snapshot.progress, ProgressSnapshot::new(OrderStage::InKitchen, 40));
    assert_eq!(
        client.cancel(deleted).await,
        Err(TrackingError::NotFound(deleted.to_string()))
    );
    orders.verify();
}

#[tokio::test]
async fn test_cancel_after_delivery_leaves_the_session_uncancelled() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    let clock = ManualScheduler::new();
    let (client, _handle) = spawn_tracking(&orders, &clock);
    let tracking_id = client.start_tracking(OrderId(1)).await.unwrap();

    clock.advance_to(Duration::from_millis(10_000));
    let frozen = client.cancel(tracking_id).await.unwrap();

    assert_eq!(frozen, ProgressSnapshot::new(OrderStage::Delivered, 100));
    let snapshot = client.snapshot(tracking_id).await.unwrap();
    assert!(!snapshot.cancelled);
    assert!(snapshot.progress.is_delivered());
    orders.verify();
}

#[tokio::test]
async fn test_actor_exit_cancels_open_sessions() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_get(OrderId(1)).return_ok(Some(order(1)));
    let clock = ManualScheduler::new();
    let (client, handle) = spawn_tracking(&orders, &clock);
    client.start_tracking(OrderId(1)).await.unwrap();
    assert_eq!(clock.pending(), 3);

    drop(client);
    handle.await.unwrap();

    assert_eq!(clock.pending(), 0);
}

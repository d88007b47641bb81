//! # Mock Clients
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are
//! answered from a queue of expectations instead of a running actor. Use it to
//! test an actor whose context depends on another actor: the tracking actor
//! looks orders up through an `OrderClient`, and the tests feed that client
//! from a mock.
//!
//! ```rust,ignore
//! let mut orders = MockClient::<Order>::new();
//! orders.expect_get(OrderId(1)).return_ok(Some(sample_order()));
//!
//! let order_client = OrderClient::new(orders.client());
//! // ... run the tracking actor with `order_client` in its context ...
//! orders.verify();
//! ```
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | None (expectations) | Real store |
//! | **Error injection** | `return_err` | Requires specific state |
//! | **Use case** | Isolating a dependency | Testing the actor itself |
//!
//! The lower-level [`create_mock_client`] returns the raw request receiver so a
//! test can inspect payloads and answer by hand.

use crate::framework::core::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T::Snapshot>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation (wrong kind or wrong id) panics the background task, which the
/// caller observes as [`FrameworkError::ActorDropped`]; [`MockClient::verify`]
/// then reports the leftover expectations.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&expectations);

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create {
                            params: _,
                            respond_to,
                        },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action {
                            id,
                            action: _,
                            respond_to,
                        },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            id,
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Expects a `delete` for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> DeleteExpectationBuilder<T> {
        DeleteExpectationBuilder {
            id,
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Expects an action on `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            id,
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Queue<T>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    pub fn return_ok(self, value: Option<T::Snapshot>) {
        lock(&self.expectations).push_back(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: ActorEntity> {
    expectations: Queue<T>,
}

impl<T: ActorEntity> CreateExpectationBuilder<T> {
    pub fn return_ok(self, id: T::Id) {
        lock(&self.expectations).push_back(Expectation::Create { response: Ok(id) });
    }

    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back(Expectation::Create {
            response: Err(error),
        });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Queue<T>,
}

impl<T: ActorEntity> DeleteExpectationBuilder<T> {
    pub fn return_ok(self) {
        lock(&self.expectations).push_back(Expectation::Delete {
            id: self.id,
            response: Ok(()),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back(Expectation::Delete {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for action expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    expectations: Queue<T>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    pub fn return_ok(self, result: T::ActionResult) {
        lock(&self.expectations).push_back(Expectation::Action {
            id: self.id,
            response: Ok(result),
        });
    }

    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back(Expectation::Action {
            id: self.id,
            response: Err(error),
        });
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests with [`expect_create`],
/// [`expect_get`] or [`expect_action`], asserts on the payload, and answers
/// through the returned responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    oneshot::Sender<Result<Option<T::Snapshot>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

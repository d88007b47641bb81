//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all resource types must implement.
//! - [`ResourceActor`]: The generic actor that owns entities and processes requests.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`ActorClient`]: Default `get`/`delete` for resource-specific client wrappers.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound).

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks)
// =============================================================================

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Architecture Note
/// Orders and tracking sessions share one actor loop. Associated types keep the
/// payloads apart: a tracking session requires a `TrackingCreate`, and the
/// compiler rejects an order's `CheckoutRequest` sent to the tracking actor.
///
/// Entities are not required to be `Clone`. A tracking session owns live timer
/// handles, so readers receive a [`ActorEntity::Snapshot`] instead of the
/// entity itself.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context` is
/// injected at `run()` time ("late binding") and handed to every hook.
#[async_trait]
pub trait ActorEntity: Send + Sync + 'static {
    /// The unique identifier for this entity. Generated from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `Cancel`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Read-only view handed out by `Get`.
    type Snapshot: Clone + Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// Per-actor error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from the generated ID and the payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        ctx: &Self::Context,
    ) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Current read-only view of the entity.
    fn snapshot(&self) -> Self::Snapshot;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    /// A failure here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("No ids left to assign")]
    IdsExhausted,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent from a [`ResourceClient`] to its [`ResourceActor`].
///
/// - **Create**: builds an entity from [`ActorEntity::Create`] and runs `on_create`.
/// - **Get**: returns the entity's [`ActorEntity::Snapshot`], if present.
/// - **Delete**: runs `on_delete`, then drops the entity.
/// - **Action**: executes a custom [`ActorEntity::Action`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T::Snapshot>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the store and the
/// receiver end of the channel, and processes requests one at a time, so the
/// store needs no `Mutex`.
///
/// When the loop ends (every client dropped) the store is dropped with it.
/// Entities that hold resources release them in their own `Drop`.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full,
    /// client calls wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "order_tracking::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split('<')
            .next()
            .and_then(|path| path.split("::").last())
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let Some(following) = self.next_id.checked_add(1) else {
                        warn!(entity_type, "Id space exhausted");
                        let _ = respond_to.send(Err(FrameworkError::IdsExhausted));
                        continue;
                    };
                    let id = T::Id::from(self.next_id);
                    self.next_id = following;

                    match T::from_create_params(id.clone(), params, &context) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let snapshot = self.store.get(&id).map(T::snapshot);
                    debug!(entity_type, %id, found = snapshot.is_some(), "Get");
                    let _ = respond_to.send(Ok(snapshot));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone`.
impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T::Snapshot>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. THE CLIENT WRAPPER TRAIT
// =============================================================================

/// Trait for resource-specific clients to inherit `get` and `delete`.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity snapshot by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T::Snapshot>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

// =============================================================================
// 6. EXAMPLE USAGE (Test)
// =============================================================================

//! The authoritative in-memory view of remote users and roles.
//!
//! [`EntityStore`] is the only component that talks to the backend. Each
//! collection is held as an immutable snapshot (`Arc<Vec<E>>`) that is
//! replaced wholesale on refresh, so readers never see a partial list.
//!
//! # Outcomes
//!
//! Outcomes reach the [`ResultNotifier`] before the call returns. A failed
//! call notifies failure with an operation-specific message and leaves the
//! collection untouched. A successful mutation notifies success and then
//! refreshes the affected collection. Successful refreshes are silent.
//!
//! # Ordering
//!
//! Refreshes are sequenced by ticket. A refresh takes the next ticket before
//! it calls the backend and only publishes if no later ticket has published
//! first, so a slow, older response cannot clobber a newer snapshot.
//!
//! The store does not serialize mutations. Two concurrent updates of the same
//! entity race at the backend; keeping a single submit in flight per entity is
//! the caller's job (edit sessions do this by closing before they submit).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::Backend;
use crate::error::StoreError;
use crate::models::{Entity, EntityId, Role, RoleDraft, User, UserDraft};
use crate::notifier::ResultNotifier;

/// A published collection snapshot.
struct Published<E> {
    generation: u64,
    items: Arc<Vec<E>>,
}

/// One entity collection plus its refresh sequencing state.
pub struct Collection<E> {
    published: RwLock<Published<E>>,
    issued: AtomicU64,
}

impl<E> Collection<E> {
    fn new() -> Self {
        Self {
            published: RwLock::new(Published {
                generation: 0,
                items: Arc::new(Vec::new()),
            }),
            issued: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<E>> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    /// Ticket of the snapshot currently published; 0 before the first refresh.
    pub fn generation(&self) -> u64 {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the snapshot unless a later ticket already published.
    fn publish(&self, ticket: u64, items: Vec<E>) -> bool {
        let mut published = self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if ticket <= published.generation {
            return false;
        }
        published.generation = ticket;
        published.items = Arc::new(items);
        true
    }
}

/// Per-type collections, reachable only through [`Stored::select`].
#[doc(hidden)]
pub struct Collections {
    users: Collection<User>,
    roles: Collection<Role>,
}

/// An entity type the store keeps a collection for.
pub trait Stored: Entity {
    #[doc(hidden)]
    fn select(collections: &Collections) -> &Collection<Self>;
}

impl Stored for User {
    fn select(collections: &Collections) -> &Collection<Self> {
        &collections.users
    }
}

impl Stored for Role {
    fn select(collections: &Collections) -> &Collection<Self> {
        &collections.roles
    }
}

pub struct EntityStore<B> {
    backend: B,
    notifier: Arc<dyn ResultNotifier>,
    collections: Collections,
}

impl<B: Backend> EntityStore<B> {
    /// Create an empty store. Nothing is fetched until the first refresh.
    pub fn new(backend: B, notifier: Arc<dyn ResultNotifier>) -> Self {
        Self {
            backend,
            notifier,
            collections: Collections {
                users: Collection::new(),
                roles: Collection::new(),
            },
        }
    }

    pub fn snapshot<E: Stored>(&self) -> Arc<Vec<E>> {
        E::select(&self.collections).snapshot()
    }

    pub fn generation<E: Stored>(&self) -> u64 {
        E::select(&self.collections).generation()
    }

    /// Fetch the full collection and publish it.
    ///
    /// Returns the snapshot current after the call, which is a newer one if
    /// this response turned out to be stale. On failure the previous snapshot
    /// is retained.
    pub async fn refresh<E: Stored>(&self) -> Result<Arc<Vec<E>>, StoreError> {
        let kind = E::KIND;
        let collection = E::select(&self.collections);
        let ticket = collection.issue();

        match self.backend.list::<E>().await {
            Ok(items) => {
                let count = items.len();
                if collection.publish(ticket, items) {
                    tracing::debug!("Published {} {} entities (generation {})", count, kind, ticket);
                } else {
                    tracing::debug!("Discarding stale {} refresh (ticket {})", kind, ticket);
                }
                Ok(collection.snapshot())
            }
            Err(source) => {
                tracing::warn!("Fetching {} collection failed: {}", kind, source);
                self.notifier.notify_failure(&kind.fetch_failed_message());
                Err(StoreError::Fetch { kind, source })
            }
        }
    }

    pub async fn create<E: Stored>(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let kind = E::KIND;
        match self.backend.create::<E>(draft).await {
            Ok(created) => {
                tracing::info!("Created {} {}", kind, created.id());
                self.notifier.notify_success(&kind.created_message());
                self.refresh_after_mutation::<E>().await;
                Ok(created)
            }
            Err(source) => {
                tracing::warn!("Creating {} failed: {}", kind, source);
                self.notifier.notify_failure(&kind.save_failed_message());
                Err(StoreError::Save { kind, source })
            }
        }
    }

    pub async fn update<E: Stored>(&self, id: &EntityId, draft: &E::Draft) -> Result<E, StoreError> {
        let kind = E::KIND;
        if id.is_blank() {
            self.notifier.notify_failure(&kind.save_failed_message());
            return Err(StoreError::MissingId { kind });
        }

        match self.backend.update::<E>(id, draft).await {
            Ok(updated) => {
                tracing::info!("Updated {} {}", kind, id);
                self.notifier.notify_success(&kind.updated_message());
                self.refresh_after_mutation::<E>().await;
                Ok(updated)
            }
            Err(source) => {
                tracing::warn!("Updating {} {} failed: {}", kind, id, source);
                self.notifier.notify_failure(&kind.save_failed_message());
                Err(StoreError::Save { kind, source })
            }
        }
    }

    pub async fn delete<E: Stored>(&self, id: &EntityId) -> Result<(), StoreError> {
        let kind = E::KIND;
        if id.is_blank() {
            self.notifier.notify_failure(&kind.delete_failed_message());
            return Err(StoreError::MissingId { kind });
        }

        match self.backend.delete::<E>(id).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", kind, id);
                self.notifier.notify_success(&kind.deleted_message());
                self.refresh_after_mutation::<E>().await;
                Ok(())
            }
            Err(source) => {
                tracing::warn!("Deleting {} {} failed: {}", kind, id, source);
                self.notifier.notify_failure(&kind.delete_failed_message());
                Err(StoreError::Delete { kind, source })
            }
        }
    }

    /// The mutation already succeeded; a failed refresh has notified on its own.
    async fn refresh_after_mutation<E: Stored>(&self) {
        if let Err(e) = self.refresh::<E>().await {
            tracing::debug!("Refresh after {} mutation failed: {}", E::KIND, e);
        }
    }

    // ============================================================
    // User Operations
    // ============================================================

    pub fn users(&self) -> Arc<Vec<User>> {
        self.snapshot::<User>()
    }

    pub async fn refresh_users(&self) -> Result<Arc<Vec<User>>, StoreError> {
        self.refresh::<User>().await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<User, StoreError> {
        self.create::<User>(draft).await
    }

    pub async fn update_user(&self, id: &EntityId, draft: &UserDraft) -> Result<User, StoreError> {
        self.update::<User>(id, draft).await
    }

    pub async fn delete_user(&self, id: &EntityId) -> Result<(), StoreError> {
        self.delete::<User>(id).await
    }

    // ============================================================
    // Role Operations
    // ============================================================

    pub fn roles(&self) -> Arc<Vec<Role>> {
        self.snapshot::<Role>()
    }

    pub async fn refresh_roles(&self) -> Result<Arc<Vec<Role>>, StoreError> {
        self.refresh::<Role>().await
    }

    pub async fn create_role(&self, draft: &RoleDraft) -> Result<Role, StoreError> {
        self.create::<Role>(draft).await
    }

    pub async fn update_role(&self, id: &EntityId, draft: &RoleDraft) -> Result<Role, StoreError> {
        self.update::<Role>(id, draft).await
    }

    pub async fn delete_role(&self, id: &EntityId) -> Result<(), StoreError> {
        self.delete::<Role>(id).await
    }

    /// Initial load: fetch both collections concurrently.
    pub async fn refresh_all(&self) -> Result<(), StoreError> {
        let (users, roles) = tokio::join!(self.refresh_users(), self.refresh_roles());
        users?;
        roles?;
        Ok(())
    }
}

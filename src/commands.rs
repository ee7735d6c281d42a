//! One-shot workflows behind the `rbacctl` subcommands.
//!
//! Each command drives an [`EditSession`] or the store directly and reports
//! whether the operation went through. Store failures have already reached
//! the notifier by the time these return, so they come back as `Ok(false)`
//! rather than as errors.

use thiserror::Error;

use crate::client::Backend;
use crate::error::SessionError;
use crate::models::{Draft, Entity, EntityId, EntityKind};
use crate::session::EditSession;
use crate::store::{EntityStore, Stored};

/// Draft field type of an entity, e.g. `UserField` for `User`.
pub type FieldOf<E> = <<E as Entity>::Draft as Draft>::Field;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No {kind} with id {id}")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Fetch the collection for display. `None` if the fetch failed.
pub async fn list<E: Stored, B: Backend>(store: &EntityStore<B>) -> Option<std::sync::Arc<Vec<E>>> {
    store.refresh::<E>().await.ok()
}

/// Run a create session with the given field values.
pub async fn add<E: Stored, B: Backend>(
    store: &EntityStore<B>,
    fields: Vec<(FieldOf<E>, String)>,
) -> Result<bool, CommandError> {
    let mut session = EditSession::<E>::new();
    session.open_for_create()?;
    for (field, value) in fields {
        session.update_draft_field(field, value)?;
    }
    finish(session.submit(store).await)
}

/// Run an edit session against the current backend copy of `id`.
///
/// Fields not given keep their current values.
pub async fn edit<E: Stored, B: Backend>(
    store: &EntityStore<B>,
    id: &EntityId,
    fields: Vec<(FieldOf<E>, String)>,
) -> Result<bool, CommandError> {
    let current = match store.refresh::<E>().await {
        Ok(current) => current,
        Err(e) => {
            tracing::debug!("Cannot edit {}: {}", e.kind(), e);
            return Ok(false);
        }
    };
    let Some(target) = current.iter().find(|e| e.id() == id).cloned() else {
        return Err(CommandError::NotFound {
            kind: E::KIND,
            id: id.clone(),
        });
    };

    let mut session = EditSession::<E>::new();
    session.open_for_edit(target)?;
    for (field, value) in fields {
        session.update_draft_field(field, value)?;
    }
    finish(session.submit(store).await)
}

pub async fn delete<E: Stored, B: Backend>(store: &EntityStore<B>, id: &EntityId) -> bool {
    store.delete::<E>(id).await.is_ok()
}

fn finish<E>(result: Result<E, SessionError>) -> Result<bool, CommandError> {
    match result {
        Ok(_) => Ok(true),
        Err(SessionError::Store(e)) => {
            tracing::debug!("{} command failed: {}", e.kind(), e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

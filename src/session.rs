//! Add/edit workflow for a single entity type.
//!
//! An [`EditSession`] owns the draft of one in-flight edit and nothing else.
//! It never touches the store until [`EditSession::submit`], and cancelling
//! discards the draft without a backend call.
//!
//! ```text
//! Closed ──open_for_create──▶ OpenCreate ──cancel / submit──▶ Closed
//! Closed ──open_for_edit────▶ OpenEdit   ──cancel / submit──▶ Closed
//! ```
//!
//! Submit closes the session whatever the backend says. Failures reach the
//! user through the store's notifier, not through session state.

use std::future::Future;

use crate::client::Backend;
use crate::error::SessionError;
use crate::models::{Draft, Entity};
use crate::store::{EntityStore, Stored};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<E: Entity> {
    Closed,
    /// Creating a new entity; the backend assigns its id.
    OpenCreate { draft: E::Draft },
    /// Editing `target`. The target keeps its original values until a
    /// refresh brings back the saved ones.
    OpenEdit { target: E, draft: E::Draft },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Closed,
    Create,
    Edit,
}

#[derive(Debug, Clone)]
pub struct EditSession<E: Entity> {
    state: SessionState<E>,
}

impl<E: Entity> Default for EditSession<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EditSession<E> {
    pub fn new() -> Self {
        Self {
            state: SessionState::Closed,
        }
    }

    pub fn state(&self) -> &SessionState<E> {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        match self.state {
            SessionState::Closed => SessionMode::Closed,
            SessionState::OpenCreate { .. } => SessionMode::Create,
            SessionState::OpenEdit { .. } => SessionMode::Edit,
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode() != SessionMode::Closed
    }

    /// The entity being edited; `None` when creating or closed.
    pub fn target(&self) -> Option<&E> {
        match &self.state {
            SessionState::OpenEdit { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&E::Draft> {
        match &self.state {
            SessionState::Closed => None,
            SessionState::OpenCreate { draft } | SessionState::OpenEdit { draft, .. } => {
                Some(draft)
            }
        }
    }

    /// Dialog title, e.g. "Add User" or "Edit Role".
    pub fn title(&self) -> Option<String> {
        let name = E::KIND.display_name();
        match self.mode() {
            SessionMode::Closed => None,
            SessionMode::Create => Some(format!("Add {}", name)),
            SessionMode::Edit => Some(format!("Edit {}", name)),
        }
    }

    pub fn open_for_create(&mut self) -> Result<(), SessionError> {
        self.ensure_closed()?;
        self.state = SessionState::OpenCreate {
            draft: E::Draft::default(),
        };
        Ok(())
    }

    /// Open on a copy of `entity`, seeding the draft from its fields.
    pub fn open_for_edit(&mut self, entity: E) -> Result<(), SessionError> {
        self.ensure_closed()?;
        let draft = entity.to_draft();
        self.state = SessionState::OpenEdit {
            target: entity,
            draft,
        };
        Ok(())
    }

    pub fn update_draft_field(
        &mut self,
        field: <E::Draft as Draft>::Field,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Closed => Err(SessionError::NotOpen(E::KIND)),
            SessionState::OpenCreate { draft } | SessionState::OpenEdit { draft, .. } => {
                draft.set(field, value.into());
                Ok(())
            }
        }
    }

    /// Like [`update_draft_field`](Self::update_draft_field) with the field
    /// given by name (`"name"`, `"role"`, `"permissions"`).
    pub fn update_draft_field_named(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen(E::KIND));
        }
        let field = field.parse::<<E::Draft as Draft>::Field>()?;
        self.update_draft_field(field, value)
    }

    /// Close without saving. The draft is discarded.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen(E::KIND));
        }
        self.state = SessionState::Closed;
        Ok(())
    }

    fn ensure_closed(&self) -> Result<(), SessionError> {
        if self.is_open() {
            Err(SessionError::AlreadyOpen(E::KIND))
        } else {
            Ok(())
        }
    }
}

impl<E: Stored> EditSession<E> {
    /// Save the draft: create when there is no target, update otherwise.
    ///
    /// The session is Closed as soon as this is called, before the backend
    /// answers, and the returned future does not borrow the session. It can
    /// be reopened while the save is still in flight, and dropping the future
    /// does not reopen it.
    pub fn submit<'a, B: Backend + 'a>(
        &mut self,
        store: &'a EntityStore<B>,
    ) -> impl Future<Output = Result<E, SessionError>> + Send + 'a {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        async move {
            match state {
                SessionState::Closed => Err(SessionError::NotOpen(E::KIND)),
                SessionState::OpenCreate { draft } => {
                    store.create::<E>(&draft).await.map_err(SessionError::from)
                }
                SessionState::OpenEdit { target, draft } => store
                    .update::<E>(target.id(), &draft)
                    .await
                    .map_err(SessionError::from),
            }
        }
    }
}

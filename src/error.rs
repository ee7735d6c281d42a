//! Error types for each layer of the console.
//!
//! Backend failures surface as [`ClientError`]. The store wraps them in a
//! [`StoreError`] naming the operation that failed, after it has already
//! reported the failure to the notifier. Edit sessions add their own
//! caller errors in [`SessionError`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::EntityKind;

/// Errors talking to the backend. All of them count as operation failure;
/// the variants only exist for logging.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// A store operation that failed. The previous collection snapshot is intact.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to fetch {kind} collection: {source}")]
    Fetch {
        kind: EntityKind,
        source: ClientError,
    },

    #[error("failed to save {kind}: {source}")]
    Save {
        kind: EntityKind,
        source: ClientError,
    },

    #[error("failed to delete {kind}: {source}")]
    Delete {
        kind: EntityKind,
        source: ClientError,
    },

    #[error("{kind} identifier is required")]
    MissingId { kind: EntityKind },
}

impl StoreError {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Fetch { kind, .. }
            | Self::Save { kind, .. }
            | Self::Delete { kind, .. }
            | Self::MissingId { kind } => *kind,
        }
    }
}

/// A draft field name that the entity does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} has no field named `{name}`")]
pub struct UnknownField {
    pub kind: EntityKind,
    pub name: String,
}

impl UnknownField {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Invalid use of an edit session, or the store failure behind a submit.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no {0} edit session is open")]
    NotOpen(EntityKind),

    #[error("a {0} edit session is already open")]
    AlreadyOpen(EntityKind),

    #[error(transparent)]
    UnknownField(#[from] UnknownField),

    #[error(transparent)]
    Store(#[from] StoreError),
}

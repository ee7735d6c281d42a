//! Domain models for the console.
//!
//! # Core Concepts
//!
//! - [`User`]: an account with a free-text role label. The label is not a
//!   reference into the role collection and nothing checks that it matches one.
//! - [`Role`]: a named role with a free-text permissions field. Permissions are
//!   opaque text; the console edits them but never interprets or enforces them.
//!
//! Every entity has a [`Draft`] counterpart holding just its editable fields.
//! Drafts are what edit sessions mutate and what goes over the wire on
//! create and update.

mod id;
mod role;
mod user;

pub use id::*;
pub use role::*;
pub use user::*;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::UnknownField;

/// The two entity collections the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Role,
}

impl EntityKind {
    /// Collection segment of the REST path (`/users`, `/roles`).
    pub fn collection_path(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Role => "roles",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
        }
    }

    /// Capitalized name for dialog titles and messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Role => "Role",
        }
    }

    pub fn fetch_failed_message(&self) -> String {
        format!("Failed to fetch {}.", self.collection_path())
    }

    pub fn created_message(&self) -> String {
        format!("{} added successfully!", self.display_name())
    }

    pub fn updated_message(&self) -> String {
        format!("{} updated successfully!", self.display_name())
    }

    pub fn save_failed_message(&self) -> String {
        format!("Failed to save {}.", self.as_str())
    }

    pub fn deleted_message(&self) -> String {
        format!("{} deleted successfully!", self.display_name())
    }

    pub fn delete_failed_message(&self) -> String {
        format!("Failed to delete {}.", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record held in one of the console's collections.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The editable fields of this entity.
    type Draft: Draft;

    const KIND: EntityKind;

    fn id(&self) -> &EntityId;

    /// Copy of the editable fields, used to seed an edit session.
    fn to_draft(&self) -> Self::Draft;
}

/// Unsaved field values for an entity. `Default` is the empty create draft.
pub trait Draft:
    Clone + Default + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static
{
    type Field: Copy + fmt::Debug + PartialEq + FromStr<Err = UnknownField> + Send + Sync;

    fn set(&mut self, field: Self::Field, value: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_specific_to_kind_and_operation() {
        assert_eq!(EntityKind::User.fetch_failed_message(), "Failed to fetch users.");
        assert_eq!(EntityKind::Role.created_message(), "Role added successfully!");
        assert_eq!(EntityKind::User.updated_message(), "User updated successfully!");
        assert_eq!(EntityKind::Role.save_failed_message(), "Failed to save role.");
        assert_eq!(EntityKind::User.delete_failed_message(), "Failed to delete user.");
        assert_ne!(
            EntityKind::User.save_failed_message(),
            EntityKind::User.delete_failed_message()
        );
    }

    #[test]
    fn collection_paths_match_rest_routes() {
        assert_eq!(EntityKind::User.collection_path(), "users");
        assert_eq!(EntityKind::Role.collection_path(), "roles");
    }
}

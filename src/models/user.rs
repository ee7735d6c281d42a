use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Draft, Entity, EntityId, EntityKind};
use crate::error::UnknownField;

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// Free-text role label, not checked against the role collection.
    pub role: String,
}

/// Editable user fields. Also the request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub role: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Role,
}

impl FromStr for UserField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "role" => Ok(Self::Role),
            other => Err(UnknownField::new(EntityKind::User, other)),
        }
    }
}

impl Entity for User {
    type Draft = UserDraft;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

impl Draft for UserDraft {
    type Field = UserField;

    fn set(&mut self, field: UserField, value: String) {
        match field {
            UserField::Name => self.name = value,
            UserField::Role => self.role = value,
        }
    }
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Draft, Entity, EntityId, EntityKind};
use crate::error::UnknownField;

/// A named role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    /// Opaque permissions text (e.g. `read,write`). Never parsed.
    pub permissions: String,
}

/// Editable role fields. Also the request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    pub permissions: String,
}

impl RoleDraft {
    pub fn new(name: impl Into<String>, permissions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleField {
    Name,
    Permissions,
}

impl FromStr for RoleField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "permissions" => Ok(Self::Permissions),
            other => Err(UnknownField::new(EntityKind::Role, other)),
        }
    }
}

impl Entity for Role {
    type Draft = RoleDraft;

    const KIND: EntityKind = EntityKind::Role;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

impl Draft for RoleDraft {
    type Field = RoleField;

    fn set(&mut self, field: RoleField, value: String) {
        match field {
            RoleField::Name => self.name = value,
            RoleField::Permissions => self.permissions = value,
        }
    }
}

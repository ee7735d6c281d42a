//! In-memory storage for the development backend.
//!
//! Ids are sequential per collection, starting at 1, and never reused.
//! Listing returns rows in id order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::*;

struct Table<D> {
    next_id: u64,
    rows: BTreeMap<u64, D>,
}

impl<D: Clone> Table<D> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn all(&self) -> Vec<(u64, D)> {
        self.rows.iter().map(|(id, d)| (*id, d.clone())).collect()
    }

    fn get(&self, id: u64) -> Option<D> {
        self.rows.get(&id).cloned()
    }

    fn insert(&mut self, draft: D) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, draft);
        id
    }

    fn replace(&mut self, id: u64, draft: D) -> bool {
        match self.rows.get_mut(&id) {
            Some(row) => {
                *row = draft;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: u64) -> bool {
        self.rows.remove(&id).is_some()
    }
}

struct Tables {
    users: Table<UserDraft>,
    roles: Table<RoleDraft>,
}

#[derive(Clone)]
pub struct Database {
    tables: Arc<Mutex<Tables>>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                users: Table::new(),
                roles: Table::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn get_all_users(&self) -> Vec<User> {
        self.lock()
            .users
            .all()
            .into_iter()
            .map(|(id, d)| user_row(id, d))
            .collect()
    }

    pub fn get_user(&self, id: u64) -> Option<User> {
        self.lock().users.get(id).map(|d| user_row(id, d))
    }

    pub fn create_user(&self, input: UserDraft) -> User {
        let id = self.lock().users.insert(input.clone());
        user_row(id, input)
    }

    pub fn update_user(&self, id: u64, input: UserDraft) -> Option<User> {
        if self.lock().users.replace(id, input.clone()) {
            Some(user_row(id, input))
        } else {
            None
        }
    }

    pub fn delete_user(&self, id: u64) -> bool {
        self.lock().users.remove(id)
    }

    // ============================================================
    // Role operations
    // ============================================================

    pub fn get_all_roles(&self) -> Vec<Role> {
        self.lock()
            .roles
            .all()
            .into_iter()
            .map(|(id, d)| role_row(id, d))
            .collect()
    }

    pub fn get_role(&self, id: u64) -> Option<Role> {
        self.lock().roles.get(id).map(|d| role_row(id, d))
    }

    pub fn create_role(&self, input: RoleDraft) -> Role {
        let id = self.lock().roles.insert(input.clone());
        role_row(id, input)
    }

    pub fn update_role(&self, id: u64, input: RoleDraft) -> Option<Role> {
        if self.lock().roles.replace(id, input.clone()) {
            Some(role_row(id, input))
        } else {
            None
        }
    }

    pub fn delete_role(&self, id: u64) -> bool {
        self.lock().roles.remove(id)
    }
}

fn user_row(id: u64, draft: UserDraft) -> User {
    User {
        id: EntityId::from(id),
        name: draft.name,
        role: draft.role,
    }
}

fn role_row(id: u64, draft: RoleDraft) -> Role {
    Role {
        id: EntityId::from(id),
        name: draft.name,
        permissions: draft.permissions,
    }
}

//! Shared test helpers: a scripted in-memory backend.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rbac_console::client::Backend;
use rbac_console::error::ClientError;
use rbac_console::models::*;
use rbac_console::notifier::RecordingNotifier;
use rbac_console::store::EntityStore;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct State {
    rows: HashMap<EntityKind, Vec<Value>>,
    next_id: u64,
    failing: HashSet<(EntityKind, Call)>,
    held: HashMap<(EntityKind, Call), oneshot::Receiver<()>>,
    calls: Vec<String>,
}

/// Backend double that stores rows as JSON so it works for any entity type.
///
/// Rows are read (and writes applied) when the call starts; a held call then
/// waits for its gate before returning.
#[derive(Default)]
pub struct ScriptedBackend {
    state: Mutex<State>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: &[User]) -> Self {
        let backend = Self::new();
        for user in users {
            backend.seed(EntityKind::User, serde_json::to_value(user).unwrap());
        }
        backend
    }

    pub fn seed(&self, kind: EntityKind, row: Value) {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = row["id"].as_u64() {
            state.next_id = state.next_id.max(id);
        }
        state.rows.entry(kind).or_default().push(row);
    }

    pub fn seed_user(&self, id: u64, name: &str, role: &str) {
        self.seed(EntityKind::User, json!({ "id": id, "name": name, "role": role }));
    }

    pub fn seed_role(&self, id: u64, name: &str, permissions: &str) {
        self.seed(
            EntityKind::Role,
            json!({ "id": id, "name": name, "permissions": permissions }),
        );
    }

    /// Make every subsequent `call` on `kind` answer 500.
    pub fn fail(&self, kind: EntityKind, call: Call) {
        self.state.lock().unwrap().failing.insert((kind, call));
    }

    pub fn recover(&self, kind: EntityKind, call: Call) {
        self.state.lock().unwrap().failing.remove(&(kind, call));
    }

    /// Hold the next `call` on `kind` until the returned sender fires.
    pub fn hold_next(&self, kind: EntityKind, call: Call) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().held.insert((kind, call), rx);
        tx
    }

    /// Requests received so far, e.g. `"PUT /roles/2"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn begin(
        &self,
        kind: EntityKind,
        call: Call,
        request: String,
    ) -> (bool, Option<oneshot::Receiver<()>>) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request);
        let gate = state.held.remove(&(kind, call));
        (state.failing.contains(&(kind, call)), gate)
    }

    async fn finish<T>(gate: Option<oneshot::Receiver<()>>, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

fn server_error() -> ClientError {
    ClientError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "scripted failure".to_string(),
    }
}

fn not_found() -> ClientError {
    ClientError::Status {
        status: StatusCode::NOT_FOUND,
        body: "not found".to_string(),
    }
}

fn same_id(row: &Value, id: &EntityId) -> bool {
    serde_json::from_value::<EntityId>(row["id"].clone()).is_ok_and(|row_id| row_id == *id)
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        let kind = E::KIND;
        let (failing, gate) = self.begin(kind, Call::List, format!("GET /{}", kind.collection_path()));
        let result = if failing {
            Err(server_error())
        } else {
            let rows = self.state.lock().unwrap().rows.get(&kind).cloned().unwrap_or_default();
            serde_json::from_value(Value::Array(rows)).map_err(ClientError::from)
        };
        Self::finish(gate, result).await
    }

    async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, ClientError> {
        let kind = E::KIND;
        let (failing, gate) =
            self.begin(kind, Call::Create, format!("POST /{}", kind.collection_path()));
        let result = if failing {
            Err(server_error())
        } else {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let mut row = serde_json::to_value(draft).unwrap();
            row["id"] = json!(state.next_id);
            state.rows.entry(kind).or_default().push(row.clone());
            serde_json::from_value(row).map_err(ClientError::from)
        };
        Self::finish(gate, result).await
    }

    async fn update<E: Entity>(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ClientError> {
        let kind = E::KIND;
        let (failing, gate) = self.begin(
            kind,
            Call::Update,
            format!("PUT /{}/{}", kind.collection_path(), id),
        );
        let result = if failing {
            Err(server_error())
        } else {
            let mut state = self.state.lock().unwrap();
            let rows = state.rows.entry(kind).or_default();
            match rows.iter_mut().find(|r| same_id(r, id)) {
                Some(row) => {
                    let mut updated = serde_json::to_value(draft).unwrap();
                    updated["id"] = row["id"].clone();
                    *row = updated.clone();
                    serde_json::from_value(updated).map_err(ClientError::from)
                }
                None => Err(not_found()),
            }
        };
        Self::finish(gate, result).await
    }

    async fn delete<E: Entity>(&self, id: &EntityId) -> Result<(), ClientError> {
        let kind = E::KIND;
        let (failing, gate) = self.begin(
            kind,
            Call::Delete,
            format!("DELETE /{}/{}", kind.collection_path(), id),
        );
        let result = if failing {
            Err(server_error())
        } else {
            let mut state = self.state.lock().unwrap();
            let rows = state.rows.entry(kind).or_default();
            let before = rows.len();
            rows.retain(|r| !same_id(r, id));
            if rows.len() < before {
                Ok(())
            } else {
                Err(not_found())
            }
        };
        Self::finish(gate, result).await
    }
}

pub struct Fixture {
    pub backend: Arc<ScriptedBackend>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: EntityStore<Arc<ScriptedBackend>>,
}

pub fn fixture(backend: ScriptedBackend) -> Fixture {
    let backend = Arc::new(backend);
    let notifier = Arc::new(RecordingNotifier::new());
    let store = EntityStore::new(backend.clone(), notifier.clone());
    Fixture {
        backend,
        notifier,
        store,
    }
}

pub fn user(id: u64, name: &str, role: &str) -> User {
    User {
        id: id.into(),
        name: name.to_string(),
        role: role.to_string(),
    }
}

pub fn role(id: u64, name: &str, permissions: &str) -> Role {
    Role {
        id: id.into(),
        name: name.to_string(),
        permissions: permissions.to_string(),
    }
}

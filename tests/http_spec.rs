//! End-to-end: HttpBackend and EntityStore against the development backend
//! served on an ephemeral port.

use std::sync::Arc;

use rbac_console::api::create_router;
use rbac_console::client::HttpBackend;
use rbac_console::config::ConsoleConfig;
use rbac_console::db::Database;
use rbac_console::error::{ClientError, StoreError};
use rbac_console::models::*;
use rbac_console::notifier::RecordingNotifier;
use rbac_console::session::EditSession;
use rbac_console::store::EntityStore;

async fn serve(db: Database) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, create_router(db))
            .await
            .expect("Server failed");
    });
    format!("http://{}", addr)
}

async fn setup() -> (EntityStore<HttpBackend>, Arc<RecordingNotifier>, Database) {
    let db = Database::new();
    let url = serve(db.clone()).await;
    let backend = HttpBackend::new(&ConsoleConfig::default().with_base_url(url))
        .expect("Failed to build client");
    let notifier = Arc::new(RecordingNotifier::new());
    let store = EntityStore::new(backend, notifier.clone());
    (store, notifier, db)
}

#[tokio::test]
async fn create_then_refresh_returns_backend_assigned_ids() {
    let (store, notifier, db) = setup().await;
    db.create_user(UserDraft::new("Alice", "admin"));
    store.refresh_users().await.expect("refresh failed");

    let bob = store
        .create_user(&UserDraft::new("Bob", "viewer"))
        .await
        .expect("create failed");

    assert_eq!(bob.id, EntityId::from(2));
    let names: Vec<_> = store.users().iter().map(|u| u.name.clone()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(notifier.successes(), vec!["User added successfully!"]);
}

#[tokio::test]
async fn edit_session_round_trip_updates_role() {
    let (store, _notifier, db) = setup().await;
    db.create_role(RoleDraft::new("R1", "read"));
    let roles = store.refresh_roles().await.expect("refresh failed");

    let mut session = EditSession::<Role>::new();
    session.open_for_edit(roles[0].clone()).unwrap();
    session
        .update_draft_field(RoleField::Permissions, "read,write")
        .unwrap();
    session.submit(&store).await.expect("submit failed");

    assert_eq!(store.roles()[0].permissions, "read,write");
    assert_eq!(db.get_role(1).unwrap().permissions, "read,write");
}

#[tokio::test]
async fn deleting_missing_entity_is_reported_as_failure() {
    let (store, notifier, db) = setup().await;
    db.create_user(UserDraft::new("Alice", "admin"));
    store.refresh_users().await.expect("refresh failed");

    let err = store
        .delete_user(&EntityId::from(42))
        .await
        .expect_err("delete should fail");

    match err {
        StoreError::Delete {
            source: ClientError::Status { status, .. },
            ..
        } => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(store.users().len(), 1);
    assert_eq!(notifier.failures(), vec!["Failed to delete user."]);
}

#[tokio::test]
async fn unreachable_backend_is_a_fetch_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let url = format!("http://{}", listener.local_addr().expect("No local address"));
    drop(listener);

    let backend = HttpBackend::new(&ConsoleConfig::default().with_base_url(url))
        .expect("Failed to build client");
    let notifier = Arc::new(RecordingNotifier::new());
    let store = EntityStore::new(backend, notifier.clone());

    let err = store.refresh_roles().await.expect_err("refresh should fail");

    assert!(matches!(
        err,
        StoreError::Fetch {
            source: ClientError::Http(_),
            ..
        }
    ));
    assert_eq!(notifier.failures(), vec!["Failed to fetch roles."]);
}

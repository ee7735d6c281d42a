//! Development backend serving the user/role REST contract.
//!
//! A local stand-in for the real service, backed by [`Database`]. The console
//! core only depends on the contract, never on this module.

mod handlers;

use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        // Users
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/{id}", put(handlers::update_user).delete(handlers::delete_user))
        // Roles
        .route("/roles", get(handlers::list_roles).post(handlers::create_role))
        .route("/roles/{id}", put(handlers::update_role).delete(handlers::delete_role))
        // Health
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}

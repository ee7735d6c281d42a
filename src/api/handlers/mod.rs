use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::db::Database;
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Users
// ============================================================

pub async fn list_users(State(db): State<Database>) -> Json<Vec<User>> {
    Json(db.get_all_users())
}

pub async fn create_user(
    State(db): State<Database>,
    Json(input): Json<UserDraft>,
) -> (StatusCode, Json<User>) {
    let user = db.create_user(input);
    tracing::info!("Created user {}", user.id);
    (StatusCode::CREATED, Json(user))
}

pub async fn update_user(
    State(db): State<Database>,
    Path(id): Path<u64>,
    Json(input): Json<UserDraft>,
) -> Result<Json<User>, (StatusCode, String)> {
    db.update_user(id, input)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))
}

pub async fn delete_user(
    State(db): State<Database>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_user(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "User not found".to_string()))
    }
}

// ============================================================
// Roles
// ============================================================

pub async fn list_roles(State(db): State<Database>) -> Json<Vec<Role>> {
    Json(db.get_all_roles())
}

pub async fn create_role(
    State(db): State<Database>,
    Json(input): Json<RoleDraft>,
) -> (StatusCode, Json<Role>) {
    let role = db.create_role(input);
    tracing::info!("Created role {}", role.id);
    (StatusCode::CREATED, Json(role))
}

pub async fn update_role(
    State(db): State<Database>,
    Path(id): Path<u64>,
    Json(input): Json<RoleDraft>,
) -> Result<Json<Role>, (StatusCode, String)> {
    db.update_role(id, input)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Role not found".to_string()))
}

pub async fn delete_role(
    State(db): State<Database>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_role(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Role not found".to_string()))
    }
}

//! Administrative console core for users and roles held by a REST service.
//!
//! - [`store::EntityStore`] keeps the authoritative snapshots and is the only
//!   component that calls the backend.
//! - [`session::EditSession`] drives the add/edit dialog for one entity type.
//! - [`notifier::ResultNotifier`] receives a success or failure message for
//!   every store operation.
//!
//! The role and permissions fields are plain text. Nothing here enforces
//! access control.

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notifier;
pub mod session;
pub mod store;

//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod duels;
pub mod health;
pub mod problems;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/duels", duels::routes())
        .nest("/users", users::routes())
        .nest("/problems", problems::routes())
}

//! User handlers: Codeforces handle linking

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handler::get_me))
        .route("/link", post(handler::link_handle))
        .route("/verify", post(handler::verify_handle))
}

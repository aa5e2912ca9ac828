//! Duel handlers

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

/// Duel routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/challenge", post(handler::create_challenge))
        .route("/accept", post(handler::accept_challenge))
        .route("/reject", post(handler::reject_challenge))
        .route("/check", post(handler::check_round))
        .route("/forfeit", post(handler::forfeit_duel))
        .route("/status", get(handler::get_status))
}

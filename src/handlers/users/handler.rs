//! User handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::problems::ProblemResponse,
    middleware::ActingUser,
    services::LinkService,
    state::AppState,
    utils::sanitize_string,
};

use super::{
    request::LinkHandleRequest,
    response::{
        LinkHandleResponse, PendingVerificationResponse, UserResponse, VerifyHandleResponse,
    },
};

/// Linked handle and verification state of the caller
pub async fn get_me(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<UserResponse>> {
    let (handle, pending) = LinkService::handle_status(state.handles(), user).await;

    Ok(Json(UserResponse {
        user_id: user,
        handle,
        pending: pending.map(|p| PendingVerificationResponse {
            handle: p.handle,
            problem_id: p.problem.to_string(),
            requested_at: p.requested_at,
        }),
        in_duel: state.duels().is_user_in_duel(user),
    }))
}

/// Start linking a Codeforces handle
pub async fn link_handle(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<LinkHandleRequest>,
) -> AppResult<(StatusCode, Json<LinkHandleResponse>)> {
    payload.validate()?;

    let handle = sanitize_string(&payload.handle);
    let problem = LinkService::start_link(state.handles(), state.source(), user, &handle).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(LinkHandleResponse {
            handle,
            problem: ProblemResponse::new(&problem, &state.config().codeforces.problemset_url),
        }),
    ))
}

/// Complete a pending link
pub async fn verify_handle(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<VerifyHandleResponse>> {
    let handle = LinkService::verify(
        state.handles(),
        state.source(),
        user,
        state.config().codeforces.verify_submission_count,
    )
    .await?;

    Ok(Json(VerifyHandleResponse { handle }))
}

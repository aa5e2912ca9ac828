//! Duel handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{error::AppResult, middleware::ActingUser, state::AppState};

use super::{
    request::CreateChallengeRequest,
    response::{CheckResponse, DuelResponse, DuelStatusResponse, ForfeitResponse, RejectResponse},
};

/// Challenge another user
pub async fn create_challenge(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<CreateChallengeRequest>,
) -> AppResult<(StatusCode, Json<DuelResponse>)> {
    payload.validate()?;

    let duel = state
        .duels()
        .create_challenge(user, payload.opponent_id, payload.params())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DuelResponse::new(
            &duel,
            &state.config().codeforces.problemset_url,
        )),
    ))
}

/// Accept the challenge aimed at the caller
pub async fn accept_challenge(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<DuelResponse>> {
    let duel = state.duels().accept_challenge(user).await?;

    Ok(Json(DuelResponse::new(
        &duel,
        &state.config().codeforces.problemset_url,
    )))
}

/// Reject the challenge aimed at the caller
pub async fn reject_challenge(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<RejectResponse>> {
    let challenger_id = state.duels().reject_challenge(user).await?;
    Ok(Json(RejectResponse { challenger_id }))
}

/// Check the current round
pub async fn check_round(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<CheckResponse>> {
    let outcome = state.duels().check_round(user).await?;

    Ok(Json(CheckResponse::new(
        outcome,
        &state.config().codeforces.problemset_url,
    )))
}

/// Give up the running duel
pub async fn forfeit_duel(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<ForfeitResponse>> {
    let winner_id = state.duels().forfeit(user).await?;
    Ok(Json(ForfeitResponse { winner_id }))
}

/// Round, scores and time left
pub async fn get_status(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AppResult<Json<DuelStatusResponse>> {
    let snapshot = state.duels().status(user).await?;

    Ok(Json(DuelStatusResponse::new(
        snapshot,
        &state.config().codeforces.problemset_url,
    )))
}

//! Problem handler implementations

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::{error::AppResult, services::ProblemService, state::AppState};

use super::{request::SuggestQuery, response::ProblemResponse};

/// Suggest a random problem near a rating
pub async fn suggest_problem(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> AppResult<Json<ProblemResponse>> {
    query.validate()?;

    let problem = ProblemService::suggest(state.source(), query.rating).await?;

    Ok(Json(ProblemResponse::new(
        &problem,
        &state.config().codeforces.problemset_url,
    )))
}

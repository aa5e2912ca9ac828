//! User response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{handlers::problems::ProblemResponse, models::UserId};

/// Verification started; the user must submit a compile error on `problem`
#[derive(Debug, Serialize)]
pub struct LinkHandleResponse {
    pub handle: String,
    pub problem: ProblemResponse,
}

/// Handle linked
#[derive(Debug, Serialize)]
pub struct VerifyHandleResponse {
    pub handle: String,
}

/// Verification still waiting for a compile error
#[derive(Debug, Serialize)]
pub struct PendingVerificationResponse {
    pub handle: String,
    pub problem_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Current user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: UserId,
    pub handle: Option<String>,
    pub pending: Option<PendingVerificationResponse>,
    pub in_duel: bool,
}

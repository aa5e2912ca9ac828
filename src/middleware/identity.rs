//! Acting-user identification

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::{constants::USER_ID_HEADER, error::AppError, models::UserId};

/// The user issuing a request, taken from the `x-user-id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub UserId);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            debug!(path = %parts.uri.path(), "Missing user id header");
            return Err(AppError::Unauthorized);
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.parse::<UserId>().ok())
            .map(ActingUser)
            .ok_or_else(|| AppError::InvalidInput(format!("{} must be a numeric id", USER_ID_HEADER)))
    }
}

//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_HANDLE_LENGTH, MIN_HANDLE_LENGTH};

/// Link handle request
#[derive(Debug, Deserialize, Validate)]
pub struct LinkHandleRequest {
    #[validate(length(min = MIN_HANDLE_LENGTH, max = MAX_HANDLE_LENGTH))]
    pub handle: String,
}

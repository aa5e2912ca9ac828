//! Problem request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_PROBLEM_RATING;

/// Suggestion query
#[derive(Debug, Deserialize, Validate)]
pub struct SuggestQuery {
    #[validate(range(min = 0, max = MAX_PROBLEM_RATING))]
    pub rating: i32,
}

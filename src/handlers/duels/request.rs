//! Duel request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::MAX_PROBLEM_RATING,
    models::{DuelParams, UserId},
};

/// Challenge request
///
/// Upper bounds on the number of problems and the round length come from the duel
/// rules in the configuration and are checked by the service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    pub opponent_id: UserId,

    #[validate(range(min = 1))]
    pub problems: u32,

    #[validate(range(min = 0, max = MAX_PROBLEM_RATING))]
    pub rating_low: i32,

    #[validate(range(min = 0, max = MAX_PROBLEM_RATING))]
    pub rating_high: i32,

    /// Minutes per round
    #[validate(range(min = 1))]
    pub minutes_per_round: u32,
}

impl CreateChallengeRequest {
    pub fn params(&self) -> DuelParams {
        DuelParams {
            problems: self.problems,
            rating_low: self.rating_low,
            rating_high: self.rating_high,
            minutes_per_round: self.minutes_per_round,
        }
    }
}

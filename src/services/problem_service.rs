//! Problem suggestion

use rand::seq::IndexedRandom;

use crate::{
    constants::PROBLEM_RATING_TOLERANCE,
    error::{AppError, AppResult},
    models::Problem,
    source::ProblemSource,
};

/// Problem service for suggestions outside of duels
pub struct ProblemService;

impl ProblemService {
    /// A random problem rated within the tolerance of `rating`
    pub async fn suggest(source: &dyn ProblemSource, rating: i32) -> AppResult<Problem> {
        let problems = source.fetch_problems().await?;
        let near: Vec<&Problem> = problems
            .iter()
            .filter(|p| {
                p.rating
                    .is_some_and(|r| (r - rating).abs() <= PROBLEM_RATING_TOLERANCE)
            })
            .collect();

        near.choose(&mut rand::rng())
            .map(|p| (*p).clone())
            .ok_or_else(|| AppError::NotFound(format!("No problems found around rating {}", rating)))
    }
}

//! Problem, contest and submission feeds
//!
//! The duel engine only reads from the judge. Everything it needs goes through
//! [`ProblemSource`], so tests can swap the live Codeforces client for a fake.

pub mod codeforces;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Contest, Problem, Submission},
};

pub use codeforces::CodeforcesClient;

/// Read-only access to the judge's data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemSource: Send + Sync {
    /// Every problem in the problemset
    async fn fetch_problems(&self) -> AppResult<Vec<Problem>>;

    /// Every contest, including ones without a start time
    async fn fetch_contests(&self) -> AppResult<Vec<Contest>>;

    /// The `count` most recent submissions of `handle`, newest first
    async fn fetch_user_submissions(&self, handle: &str, count: u32)
    -> AppResult<Vec<Submission>>;
}

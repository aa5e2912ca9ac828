//! Problem response DTOs

use serde::Serialize;

use crate::models::Problem;

/// Problem with its public link
#[derive(Debug, Clone, Serialize)]
pub struct ProblemResponse {
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    pub rating: Option<i32>,
    pub url: String,
}

impl ProblemResponse {
    pub fn new(problem: &Problem, problemset_url: &str) -> Self {
        Self {
            contest_id: problem.contest_id,
            index: problem.index.clone(),
            name: problem.name.clone(),
            rating: problem.rating,
            url: problem.url(problemset_url),
        }
    }
}

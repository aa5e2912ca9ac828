//! Problem model

use serde::{Deserialize, Serialize};

/// Identity of a Codeforces problem: contest id plus problem index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemId {
    pub contest_id: i64,
    pub index: String,
}

impl ProblemId {
    pub fn new(contest_id: i64, index: impl Into<String>) -> Self {
        Self {
            contest_id,
            index: index.into(),
        }
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.contest_id, self.index)
    }
}

/// A problem from the Codeforces problemset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    /// Difficulty rating, absent for unrated problems
    pub rating: Option<i32>,
}

impl Problem {
    pub fn id(&self) -> ProblemId {
        ProblemId::new(self.contest_id, self.index.clone())
    }

    /// Points awarded for solving this problem first
    pub fn points(&self, default_points: u32) -> u32 {
        self.rating
            .and_then(|r| u32::try_from(r).ok())
            .unwrap_or(default_points)
    }

    /// Public problemset link
    pub fn url(&self, problemset_url: &str) -> String {
        format!("{}/{}/{}", problemset_url, self.contest_id, self.index)
    }
}

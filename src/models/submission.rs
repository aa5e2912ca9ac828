//! Submission model

use serde::{Deserialize, Serialize};

use crate::constants::verdicts;

use super::ProblemId;

/// A judged submission as reported by Codeforces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    /// Unix seconds
    pub creation_time_seconds: i64,
    pub problem: ProblemId,
    pub verdict: Verdict,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// Submission verdict enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    CompilationError,
    /// Still in queue or testing
    Pending,
    Rejected,
}

impl Verdict {
    /// Map a Codeforces verdict string; a missing verdict means judging is in progress
    pub fn from_codeforces(verdict: Option<&str>) -> Self {
        match verdict {
            Some(verdicts::ACCEPTED) => Self::Accepted,
            Some(verdicts::COMPILATION_ERROR) => Self::CompilationError,
            Some("TESTING") | None => Self::Pending,
            Some(_) => Self::Rejected,
        }
    }
}

//! Contest model

use serde::{Deserialize, Serialize};

/// A Codeforces contest; only its start time matters for problem selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub id: i64,
    /// Unix seconds, absent for contests without a scheduled start
    pub start_time_seconds: Option<i64>,
}

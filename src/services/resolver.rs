//! First-to-solve race resolution

use tracing::warn;

use crate::{
    models::{ProblemId, Submission, UserId},
    source::ProblemSource,
};

/// Earliest accepted solve of a participant in the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solve {
    pub user_id: UserId,
    /// Unix seconds
    pub solved_at: i64,
}

/// Earliest accepted submission for `problem` made at or after `since`
pub fn earliest_accepted(
    submissions: &[Submission],
    problem: &ProblemId,
    since: i64,
) -> Option<i64> {
    submissions
        .iter()
        .filter(|s| s.is_accepted() && &s.problem == problem && s.creation_time_seconds >= since)
        .map(|s| s.creation_time_seconds)
        .min()
}

/// Decide the round between the acting user and the other participant.
///
/// The acting user needs a strictly earlier timestamp; on a tie the other participant,
/// compared second, takes the round.
pub fn decide_winner(
    acting: UserId,
    acting_solved_at: Option<i64>,
    other: UserId,
    other_solved_at: Option<i64>,
) -> Option<Solve> {
    match (acting_solved_at, other_solved_at) {
        (None, None) => None,
        (Some(at), None) => Some(Solve {
            user_id: acting,
            solved_at: at,
        }),
        (None, Some(at)) => Some(Solve {
            user_id: other,
            solved_at: at,
        }),
        (Some(mine), Some(theirs)) if mine < theirs => Some(Solve {
            user_id: acting,
            solved_at: mine,
        }),
        (Some(_), Some(theirs)) => Some(Solve {
            user_id: other,
            solved_at: theirs,
        }),
    }
}

/// Look up a participant's first accepted solve.
///
/// A missing handle or a failed fetch counts as "not solved"; the caller can simply
/// check again later.
pub async fn first_accepted(
    source: &dyn ProblemSource,
    handle: Option<&str>,
    problem: &ProblemId,
    since: i64,
    count: u32,
) -> Option<i64> {
    let handle = handle?;
    match source.fetch_user_submissions(handle, count).await {
        Ok(submissions) => earliest_accepted(&submissions, problem, since),
        Err(e) => {
            warn!(handle = %handle, problem = %problem, error = %e, "Failed to fetch submissions");
            None
        }
    }
}

//! Codeforces handle linking
//!
//! A handle is proven by submitting something that fails to compile on a randomly
//! chosen easy problem.

use chrono::Utc;
use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::{
    constants::VERIFICATION_MAX_RATING,
    error::{AppError, AppResult},
    models::{Problem, UserId, Verdict},
    source::ProblemSource,
    storage::{HandleStore, PendingVerification},
    utils::validate_handle,
};

/// Handle linking service
pub struct LinkService;

impl LinkService {
    /// Start linking `handle` to `user`; returns the problem to submit a compile error on
    pub async fn start_link(
        store: &HandleStore,
        source: &dyn ProblemSource,
        user: UserId,
        handle: &str,
    ) -> AppResult<Problem> {
        let handle = handle.trim();
        validate_handle(handle).map_err(|e| AppError::InvalidInput(e.to_string()))?;

        if let Some(linked) = store.handle_for(user).await {
            return Err(AppError::Conflict(format!(
                "You are already linked to {}",
                linked
            )));
        }

        let problems = source.fetch_problems().await?;
        let easy: Vec<&Problem> = problems
            .iter()
            .filter(|p| p.rating.is_some_and(|r| r <= VERIFICATION_MAX_RATING))
            .collect();

        let problem = easy
            .choose(&mut rand::rng())
            .map(|p| (*p).clone())
            .ok_or_else(|| {
                AppError::SelectionFailed("No verification problem available".to_string())
            })?;

        store
            .add_pending(
                user,
                PendingVerification {
                    handle: handle.to_string(),
                    problem: problem.id(),
                    requested_at: Utc::now(),
                },
            )
            .await?;

        info!(user_id = %user, handle = %handle, problem = %problem.id(), "Verification requested");
        Ok(problem)
    }

    /// Finish linking once a compilation error on the chosen problem shows up
    pub async fn verify(
        store: &HandleStore,
        source: &dyn ProblemSource,
        user: UserId,
        submission_count: u32,
    ) -> AppResult<String> {
        let pending = store.pending_for(user).await.ok_or_else(|| {
            AppError::NotFound("No pending verification, link a handle first".to_string())
        })?;

        let submissions = source
            .fetch_user_submissions(&pending.handle, submission_count)
            .await
            .unwrap_or_else(|e| {
                warn!(handle = %pending.handle, error = %e, "Failed to fetch submissions");
                Vec::new()
            });

        let proven = submissions
            .iter()
            .any(|s| s.problem == pending.problem && s.verdict == Verdict::CompilationError);
        if !proven {
            return Err(AppError::Validation(format!(
                "No compilation error found on problem {}",
                pending.problem
            )));
        }

        let handle = store
            .complete_verification(user)
            .await?
            .ok_or_else(|| AppError::NotFound("Verification already completed".to_string()))?;

        info!(user_id = %user, handle = %handle, "Handle linked");
        Ok(handle)
    }

    /// Linked handle and any verification still in progress
    pub async fn handle_status(
        store: &HandleStore,
        user: UserId,
    ) -> (Option<String>, Option<PendingVerification>) {
        (store.handle_for(user).await, store.pending_for(user).await)
    }
}

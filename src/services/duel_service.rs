//! Duel lifecycle
//!
//! [`DuelService`] is the entry point for every duel operation. It owns the
//! [`DuelRegistry`] behind one mutex. The guard is a `std` mutex guard, which is not
//! `Send`, so it can never be held across an `.await`: every operation that talks to
//! Codeforces snapshots what it needs, drops the lock, fetches, and re-locks to apply.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::DuelConfig,
    error::{AppError, AppResult},
    models::{Duel, DuelParams, Problem, ProblemId, Score, UserId},
    services::{
        registry::DuelRegistry,
        resolver::{self, Solve},
        selector::{self, SelectionCriteria},
    },
    source::ProblemSource,
    storage::HandleStore,
    utils::Clock,
};

/// How a round check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundResolution {
    /// Someone solved it first and took the points
    Solved {
        winner: UserId,
        points: u32,
        solved_at: i64,
    },
    /// Time ran out with no solve
    Expired,
    /// The round was already decided
    AlreadySolved,
    /// Nobody has an accepted submission yet
    NoSolvesYet,
}

/// Result of a round check
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub duel_id: Uuid,
    pub resolution: RoundResolution,
    /// Round the check was made against (0-based)
    pub round: usize,
    pub scores: [Score; 2],
    pub advanced: bool,
    pub complete: bool,
    /// Problem of the round now in play, if the duel continues
    pub next_problem: Option<Problem>,
    /// Overall leader once the duel is over, `None` on a draw
    pub final_leader: Option<UserId>,
}

impl RoundOutcome {
    fn new(duel: &Duel, round: usize, resolution: RoundResolution, advanced: bool) -> Self {
        let complete = duel.is_complete();
        Self {
            duel_id: duel.id,
            resolution,
            round,
            scores: duel.scores(),
            advanced,
            complete,
            next_problem: if advanced && !complete {
                duel.current_problem().cloned()
            } else {
                None
            },
            final_leader: if complete { duel.leader() } else { None },
        }
    }

    /// Winner of the checked round, if it was decided by this check
    pub fn round_winner(&self) -> Option<UserId> {
        match self.resolution {
            RoundResolution::Solved { winner, .. } => Some(winner),
            _ => None,
        }
    }
}

/// Snapshot of a running duel
#[derive(Debug, Clone, Serialize)]
pub struct DuelSnapshot {
    pub duel_id: Uuid,
    pub round: usize,
    pub rounds: usize,
    pub scores: [Score; 2],
    pub problem: Option<Problem>,
    pub round_started_at: Option<DateTime<Utc>>,
    pub seconds_remaining: i64,
}

/// First half of a round check, decided under the registry lock
enum CheckStep {
    Done(RoundOutcome),
    /// Submissions must be fetched before the round can be decided
    Fetch(PendingCheck),
}

/// State needed to resolve a round once the registry lock is released
struct PendingCheck {
    duel_id: Uuid,
    round: usize,
    problem: ProblemId,
    points: u32,
    since: i64,
    opponent: UserId,
    scores: [Score; 2],
}

/// Entry point for every duel operation
pub struct DuelService {
    registry: Mutex<DuelRegistry>,
    source: Arc<dyn ProblemSource>,
    handles: Arc<HandleStore>,
    clock: Arc<dyn Clock>,
    rules: DuelConfig,
    submission_count: u32,
}

impl DuelService {
    pub fn new(
        source: Arc<dyn ProblemSource>,
        handles: Arc<HandleStore>,
        clock: Arc<dyn Clock>,
        rules: DuelConfig,
        submission_count: u32,
    ) -> Self {
        Self {
            registry: Mutex::new(DuelRegistry::new()),
            source,
            handles,
            clock,
            rules,
            submission_count,
        }
    }

    fn registry(&self) -> MutexGuard<'_, DuelRegistry> {
        // Registry operations never leave it half-updated, so a poisoned lock is still usable
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a challenge; the returned duel is pending until the opponent accepts
    pub async fn create_challenge(
        &self,
        challenger: UserId,
        opponent: UserId,
        params: DuelParams,
    ) -> AppResult<Duel> {
        if challenger == opponent {
            return Err(AppError::Validation("Cannot challenge yourself".to_string()));
        }
        params.validate(&self.rules)?;

        if self.handles.handle_for(challenger).await.is_none() {
            return Err(AppError::Validation(
                "You need to link your Codeforces account first".to_string(),
            ));
        }
        if self.handles.handle_for(opponent).await.is_none() {
            return Err(AppError::Validation(
                "Your opponent needs to link their Codeforces account first".to_string(),
            ));
        }

        let reservation = Reservation::acquire(&self.registry, challenger, opponent)?;

        debug!(challenger = %challenger, opponent = %opponent, "Generating problems");
        let problems = self.generate_problems(&params).await?;

        let duel = Duel::new(challenger, opponent, params, problems);
        reservation.commit(duel.clone());

        info!(
            duel_id = %duel.id,
            challenger = %challenger,
            opponent = %opponent,
            rounds = duel.round_count(),
            "Challenge issued"
        );
        Ok(duel)
    }

    async fn generate_problems(&self, params: &DuelParams) -> AppResult<Vec<Problem>> {
        let (problems, contests) = futures::future::join(
            self.source.fetch_problems(),
            self.source.fetch_contests(),
        )
        .await;

        let problems = problems.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch problems");
            Vec::new()
        });
        let contests = contests.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch contests");
            Vec::new()
        });

        let criteria = SelectionCriteria {
            rating_low: params.rating_low,
            rating_high: params.rating_high,
            count: params.problems as usize,
            recency_cutoff: self.rules.recency_cutoff.timestamp(),
        };

        selector::select_problems(&problems, &contests, &criteria, &mut rand::rng()).ok_or_else(
            || {
                AppError::SelectionFailed(
                    "Not enough problems found in the specified rating range".to_string(),
                )
            },
        )
    }

    /// Accept the challenge aimed at `user` and start round one
    pub async fn accept_challenge(&self, user: UserId) -> AppResult<Duel> {
        let mut registry = self.registry();
        let mut duel = registry
            .pop_pending_for(user)
            .ok_or_else(|| AppError::NotFound("No pending challenge found for you".to_string()))?;

        duel.accept(self.clock.now())?;
        registry.start_active(duel.clone());

        info!(duel_id = %duel.id, opponent = %user, "Duel started");
        Ok(duel)
    }

    /// Decline the challenge aimed at `user`; returns the challenger
    pub async fn reject_challenge(&self, user: UserId) -> AppResult<UserId> {
        let duel = self
            .registry()
            .pop_pending_for(user)
            .ok_or_else(|| AppError::NotFound("No pending challenge found for you".to_string()))?;

        info!(duel_id = %duel.id, opponent = %user, "Challenge rejected");
        Ok(duel.challenger_id)
    }

    /// Resolve the current round of `user`'s duel
    pub async fn check_round(&self, user: UserId) -> AppResult<RoundOutcome> {
        let check = match self.begin_check(user)? {
            CheckStep::Done(outcome) => return Ok(outcome),
            CheckStep::Fetch(check) => check,
        };

        let (my_handle, their_handle) = futures::future::join(
            self.handles.handle_for(user),
            self.handles.handle_for(check.opponent),
        )
        .await;

        let source = self.source.as_ref();
        let (mine, theirs) = futures::future::join(
            resolver::first_accepted(
                source,
                my_handle.as_deref(),
                &check.problem,
                check.since,
                self.submission_count,
            ),
            resolver::first_accepted(
                source,
                their_handle.as_deref(),
                &check.problem,
                check.since,
                self.submission_count,
            ),
        )
        .await;

        match resolver::decide_winner(user, mine, check.opponent, theirs) {
            Some(solve) => self.finish_round(&check, solve),
            None => Ok(RoundOutcome {
                duel_id: check.duel_id,
                resolution: RoundResolution::NoSolvesYet,
                round: check.round,
                scores: check.scores,
                advanced: false,
                complete: false,
                next_problem: None,
                final_leader: None,
            }),
        }
    }

    /// Handle everything that needs no network call
    fn begin_check(&self, user: UserId) -> AppResult<CheckStep> {
        let now = self.clock.now();
        let mut registry = self.registry();
        let duel = registry
            .active_for_mut(user)
            .filter(|d| d.is_active())
            .ok_or_else(not_in_duel)?;

        let round = duel.current_round();

        if duel.is_round_expired(now) && !duel.is_round_solved() {
            duel.advance_round(now);
            let outcome = RoundOutcome::new(duel, round, RoundResolution::Expired, true);
            info!(duel_id = %duel.id, round, "Round expired");
            if outcome.complete {
                let id = duel.id;
                registry.end_active(id);
                info!(duel_id = %id, "Duel complete");
            }
            return Ok(CheckStep::Done(outcome));
        }

        if duel.is_round_solved() {
            return Ok(CheckStep::Done(RoundOutcome::new(
                duel,
                round,
                RoundResolution::AlreadySolved,
                false,
            )));
        }

        let Some(problem) = duel.current_problem() else {
            return Err(not_in_duel());
        };
        let since = duel
            .round_started_at()
            .map(|t| t.timestamp())
            .unwrap_or_default();
        let Some(opponent) = duel.opponent_of(user) else {
            return Err(not_in_duel());
        };

        Ok(CheckStep::Fetch(PendingCheck {
            duel_id: duel.id,
            round,
            problem: problem.id(),
            points: problem.points(self.rules.default_points),
            since,
            opponent,
            scores: duel.scores(),
        }))
    }

    /// Apply a decided round, unless another check got there first
    fn finish_round(&self, check: &PendingCheck, solve: Solve) -> AppResult<RoundOutcome> {
        let now = self.clock.now();
        let mut registry = self.registry();
        let duel = registry.get_mut(check.duel_id).ok_or_else(not_in_duel)?;

        if duel.current_round() != check.round || duel.is_round_solved() {
            debug!(duel_id = %check.duel_id, round = check.round, "Round settled concurrently");
            return Ok(RoundOutcome::new(
                duel,
                check.round,
                RoundResolution::AlreadySolved,
                false,
            ));
        }

        duel.award_round(solve.user_id, check.points);
        duel.advance_round(now);

        let outcome = RoundOutcome::new(
            duel,
            check.round,
            RoundResolution::Solved {
                winner: solve.user_id,
                points: check.points,
                solved_at: solve.solved_at,
            },
            true,
        );
        info!(
            duel_id = %check.duel_id,
            round = check.round,
            winner = %solve.user_id,
            points = check.points,
            "Round solved"
        );

        if outcome.complete {
            registry.end_active(check.duel_id);
            info!(duel_id = %check.duel_id, "Duel complete");
        }
        Ok(outcome)
    }

    /// Give up the running duel; returns the opponent, who wins
    pub async fn forfeit(&self, user: UserId) -> AppResult<UserId> {
        let mut registry = self.registry();
        let duel = registry
            .active_for_mut(user)
            .filter(|d| d.is_active())
            .ok_or_else(not_in_duel)?;

        let winner = duel.forfeit(user).ok_or_else(not_in_duel)?;
        let id = duel.id;
        registry.end_active(id);

        info!(duel_id = %id, quitter = %user, winner = %winner, "Duel forfeited");
        Ok(winner)
    }

    /// Current round and scores of `user`'s duel
    pub async fn status(&self, user: UserId) -> AppResult<DuelSnapshot> {
        let now = self.clock.now();
        let registry = self.registry();
        let duel = registry
            .active_for(user)
            .filter(|d| d.is_active())
            .ok_or_else(not_in_duel)?;

        Ok(DuelSnapshot {
            duel_id: duel.id,
            round: duel.current_round(),
            rounds: duel.round_count(),
            scores: duel.scores(),
            problem: duel.current_problem().cloned(),
            round_started_at: duel.round_started_at(),
            seconds_remaining: duel.time_remaining(now).num_seconds(),
        })
    }

    /// Whether `user` is part of a pending or running duel
    pub fn is_user_in_duel(&self, user: UserId) -> bool {
        self.registry().is_in_any_duel(user)
    }

    /// Number of `(active, pending)` duels
    pub fn counts(&self) -> (usize, usize) {
        let registry = self.registry();
        (registry.active_count(), registry.pending_count())
    }
}

fn not_in_duel() -> AppError {
    AppError::NotFound("You are not in an active duel".to_string())
}

/// Both users held while their problem set is generated.
///
/// Dropping an uncommitted reservation frees them, including when the request is
/// cancelled mid-fetch. Once committed the users belong to the pending challenge and
/// the guard must not touch them again.
struct Reservation<'a> {
    registry: &'a Mutex<DuelRegistry>,
    challenger: UserId,
    opponent: UserId,
    committed: bool,
}

impl<'a> Reservation<'a> {
    fn acquire(
        registry: &'a Mutex<DuelRegistry>,
        challenger: UserId,
        opponent: UserId,
    ) -> AppResult<Self> {
        let reserved = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reserve(challenger, opponent);

        if !reserved {
            return Err(AppError::Conflict(
                "One of you is already in a duel".to_string(),
            ));
        }
        Ok(Self {
            registry,
            challenger,
            opponent,
            committed: false,
        })
    }

    /// Turn the reservation into a pending challenge under a single lock acquisition
    fn commit(mut self, duel: Duel) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_pending(duel);
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release(self.challenger, self.opponent);
    }
}

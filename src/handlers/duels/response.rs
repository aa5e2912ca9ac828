//! Duel response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    handlers::problems::ProblemResponse,
    models::{Duel, DuelStatus, Score, UserId},
    services::{DuelSnapshot, RoundOutcome, RoundResolution},
};

/// Duel response
#[derive(Debug, Serialize)]
pub struct DuelResponse {
    pub id: Uuid,
    pub challenger_id: UserId,
    pub opponent_id: UserId,
    pub status: DuelStatus,
    pub minutes_per_round: u32,
    pub current_round: usize,
    pub problems: Vec<ProblemResponse>,
    pub round_started_at: Option<DateTime<Utc>>,
}

impl DuelResponse {
    pub fn new(duel: &Duel, problemset_url: &str) -> Self {
        Self {
            id: duel.id,
            challenger_id: duel.challenger_id,
            opponent_id: duel.opponent_id,
            status: duel.status(),
            minutes_per_round: duel.params.minutes_per_round,
            current_round: duel.current_round(),
            problems: duel
                .problems()
                .iter()
                .map(|p| ProblemResponse::new(p, problemset_url))
                .collect(),
            round_started_at: duel.round_started_at(),
        }
    }
}

/// Rejected challenge
#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub challenger_id: UserId,
}

/// Forfeited duel
#[derive(Debug, Serialize)]
pub struct ForfeitResponse {
    pub winner_id: UserId,
}

/// Round check response
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub duel_id: Uuid,
    pub round: usize,
    #[serde(flatten)]
    pub resolution: RoundResolution,
    pub scores: [Score; 2],
    pub advanced: bool,
    pub complete: bool,
    pub next_problem: Option<ProblemResponse>,
    pub final_leader: Option<UserId>,
}

impl CheckResponse {
    pub fn new(outcome: RoundOutcome, problemset_url: &str) -> Self {
        Self {
            duel_id: outcome.duel_id,
            round: outcome.round,
            resolution: outcome.resolution,
            scores: outcome.scores,
            advanced: outcome.advanced,
            complete: outcome.complete,
            next_problem: outcome
                .next_problem
                .as_ref()
                .map(|p| ProblemResponse::new(p, problemset_url)),
            final_leader: outcome.final_leader,
        }
    }
}

/// Running duel status
#[derive(Debug, Serialize)]
pub struct DuelStatusResponse {
    pub duel_id: Uuid,
    pub round: usize,
    pub rounds: usize,
    pub scores: [Score; 2],
    pub problem: Option<ProblemResponse>,
    pub round_started_at: Option<DateTime<Utc>>,
    pub seconds_remaining: i64,
}

impl DuelStatusResponse {
    pub fn new(snapshot: DuelSnapshot, problemset_url: &str) -> Self {
        Self {
            duel_id: snapshot.duel_id,
            round: snapshot.round,
            rounds: snapshot.rounds,
            scores: snapshot.scores,
            problem: snapshot
                .problem
                .as_ref()
                .map(|p| ProblemResponse::new(p, problemset_url)),
            round_started_at: snapshot.round_started_at,
            seconds_remaining: snapshot.seconds_remaining,
        }
    }
}

//! Duel model
//!
//! A duel is a best-of-`n` race between two users. Each round hands both players the
//! same problem; whoever gets it accepted first takes the problem's rating in points.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::DuelConfig,
    constants::MAX_PROBLEM_RATING,
    error::{AppError, AppResult},
};

use super::{Problem, UserId};

/// Parameters chosen by the challenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelParams {
    /// Number of rounds
    pub problems: u32,
    pub rating_low: i32,
    pub rating_high: i32,
    pub minutes_per_round: u32,
}

impl DuelParams {
    /// Check the parameters against the configured duel rules
    pub fn validate(&self, rules: &DuelConfig) -> AppResult<()> {
        if !(rules.min_problems..=rules.max_problems).contains(&self.problems) {
            return Err(AppError::Validation(format!(
                "Number of problems must be between {} and {}",
                rules.min_problems, rules.max_problems
            )));
        }
        for rating in [self.rating_low, self.rating_high] {
            if !(0..=MAX_PROBLEM_RATING).contains(&rating) {
                return Err(AppError::Validation(format!(
                    "Ratings must be between 0 and {}",
                    MAX_PROBLEM_RATING
                )));
            }
        }
        if self.rating_low > self.rating_high {
            return Err(AppError::Validation(
                "Low rating must be less than or equal to high rating".to_string(),
            ));
        }
        if self.minutes_per_round == 0 || self.minutes_per_round > rules.max_minutes_per_round {
            return Err(AppError::Validation(format!(
                "Time per problem must be between 1 and {} minutes",
                rules.max_minutes_per_round
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelStatus {
    Pending,
    Active,
    Complete,
}

impl std::fmt::Display for DuelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// One participant's running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub user_id: UserId,
    pub points: u32,
}

/// A match between two users
#[derive(Debug, Clone)]
pub struct Duel {
    pub id: Uuid,
    pub challenger_id: UserId,
    pub opponent_id: UserId,
    pub params: DuelParams,
    problems: Vec<Problem>,
    status: DuelStatus,
    current_round: usize,
    round_solved: bool,
    challenger_points: u32,
    opponent_points: u32,
    match_started_at: Option<DateTime<Utc>>,
    round_started_at: Option<DateTime<Utc>>,
}

impl Duel {
    /// Create a pending duel over an already selected problem sequence
    pub fn new(
        challenger_id: UserId,
        opponent_id: UserId,
        params: DuelParams,
        problems: Vec<Problem>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            challenger_id,
            opponent_id,
            params,
            problems,
            status: DuelStatus::Pending,
            current_round: 0,
            round_solved: false,
            challenger_points: 0,
            opponent_points: 0,
            match_started_at: None,
            round_started_at: None,
        }
    }

    /// Start the first round
    pub fn accept(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != DuelStatus::Pending {
            return Err(AppError::Conflict(format!("Duel is already {}", self.status)));
        }
        self.status = DuelStatus::Active;
        self.match_started_at = Some(now);
        self.round_started_at = Some(now);
        self.round_solved = false;
        Ok(())
    }

    /// Move to the next round, completing the duel after the last one
    pub fn advance_round(&mut self, now: DateTime<Utc>) {
        if self.current_round >= self.problems.len() {
            return;
        }
        self.current_round += 1;
        self.round_started_at = Some(now);
        self.round_solved = false;
        if self.is_complete() {
            self.status = DuelStatus::Complete;
        }
    }

    /// End the duel early; returns the participant declared winner
    pub fn forfeit(&mut self, quitter: UserId) -> Option<UserId> {
        let winner = self.opponent_of(quitter)?;
        self.status = DuelStatus::Complete;
        Some(winner)
    }

    pub fn is_complete(&self) -> bool {
        self.current_round >= self.problems.len()
    }

    pub fn is_active(&self) -> bool {
        self.status == DuelStatus::Active
    }

    /// Whether the current round's time budget has run out
    pub fn is_round_expired(&self, now: DateTime<Utc>) -> bool {
        match self.round_started_at {
            Some(started) => now - started >= self.round_length(),
            None => false,
        }
    }

    /// Time left in the current round, zero once expired
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.round_started_at {
            Some(started) => (started + self.round_length() - now).max(Duration::zero()),
            None => self.round_length(),
        }
    }

    fn round_length(&self) -> Duration {
        Duration::minutes(i64::from(self.params.minutes_per_round))
    }

    /// Record the winner of the current round
    pub fn award_round(&mut self, winner: UserId, points: u32) {
        self.round_solved = true;
        if winner == self.challenger_id {
            self.challenger_points += points;
        } else if winner == self.opponent_id {
            self.opponent_points += points;
        }
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current_round)
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn round_count(&self) -> usize {
        self.problems.len()
    }

    pub fn is_round_solved(&self) -> bool {
        self.round_solved
    }

    pub fn status(&self) -> DuelStatus {
        self.status
    }

    pub fn round_started_at(&self) -> Option<DateTime<Utc>> {
        self.round_started_at
    }

    pub fn match_started_at(&self) -> Option<DateTime<Utc>> {
        self.match_started_at
    }

    pub fn participants(&self) -> [UserId; 2] {
        [self.challenger_id, self.opponent_id]
    }

    pub fn opponent_of(&self, user: UserId) -> Option<UserId> {
        if user == self.challenger_id {
            Some(self.opponent_id)
        } else if user == self.opponent_id {
            Some(self.challenger_id)
        } else {
            None
        }
    }

    /// Scores as `[challenger, opponent]`
    pub fn scores(&self) -> [Score; 2] {
        [
            Score {
                user_id: self.challenger_id,
                points: self.challenger_points,
            },
            Score {
                user_id: self.opponent_id,
                points: self.opponent_points,
            },
        ]
    }

    pub fn score_of(&self, user: UserId) -> Option<u32> {
        self.scores()
            .into_iter()
            .find(|s| s.user_id == user)
            .map(|s| s.points)
    }

    /// Participant with the higher score, `None` on a draw
    pub fn leader(&self) -> Option<UserId> {
        match self.challenger_points.cmp(&self.opponent_points) {
            std::cmp::Ordering::Greater => Some(self.challenger_id),
            std::cmp::Ordering::Less => Some(self.opponent_id),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const C: UserId = UserId(1);
    const O: UserId = UserId(2);

    fn problem(contest_id: i64, rating: i32) -> Problem {
        Problem {
            contest_id,
            index: "A".to_string(),
            name: format!("Problem {}", contest_id),
            rating: Some(rating),
        }
    }

    fn params(problems: u32) -> DuelParams {
        DuelParams {
            problems,
            rating_low: 1200,
            rating_high: 1600,
            minutes_per_round: 10,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn duel() -> Duel {
        Duel::new(
            C,
            O,
            params(3),
            vec![problem(1, 1200), problem(2, 1400), problem(3, 1600)],
        )
    }

    #[test]
    fn test_new_duel_is_pending() {
        let duel = duel();
        assert_eq!(duel.status(), DuelStatus::Pending);
        assert_eq!(duel.current_round(), 0);
        assert!(!duel.is_active());
        assert_eq!(duel.score_of(C), Some(0));
        assert_eq!(duel.score_of(O), Some(0));
        assert!(!duel.is_round_expired(start() + Duration::hours(5)));
    }

    #[test]
    fn test_accept_stamps_times() {
        let mut duel = duel();
        duel.accept(start()).unwrap();
        assert!(duel.is_active());
        assert_eq!(duel.match_started_at(), Some(start()));
        assert_eq!(duel.round_started_at(), Some(start()));
        assert!(duel.accept(start()).is_err());
    }

    #[test]
    fn test_round_expiry_boundary() {
        let mut duel = duel();
        duel.accept(start()).unwrap();
        assert!(!duel.is_round_expired(start() + Duration::seconds(599)));
        assert!(duel.is_round_expired(start() + Duration::minutes(10)));
        assert_eq!(
            duel.time_remaining(start() + Duration::minutes(4)),
            Duration::minutes(6)
        );
        assert_eq!(
            duel.time_remaining(start() + Duration::minutes(40)),
            Duration::zero()
        );
    }

    #[test]
    fn test_advance_through_all_rounds() {
        let mut duel = duel();
        duel.accept(start()).unwrap();

        duel.award_round(O, 1200);
        assert!(duel.is_round_solved());
        let later = start() + Duration::minutes(2);
        duel.advance_round(later);
        assert!(!duel.is_round_solved());
        assert_eq!(duel.round_started_at(), Some(later));
        assert_eq!(duel.current_problem().map(|p| p.contest_id), Some(2));

        duel.advance_round(later);
        duel.advance_round(later);
        assert!(duel.is_complete());
        assert_eq!(duel.status(), DuelStatus::Complete);
        assert!(duel.current_problem().is_none());

        // Advancing a finished duel is a no-op
        duel.advance_round(later);
        assert_eq!(duel.current_round(), 3);
        assert_eq!(duel.leader(), Some(O));
    }

    #[test]
    fn test_forfeit_declares_opponent() {
        let mut duel = duel();
        duel.accept(start()).unwrap();
        assert_eq!(duel.forfeit(C), Some(O));
        assert_eq!(duel.status(), DuelStatus::Complete);

        let mut other = self::duel();
        assert_eq!(other.forfeit(UserId(99)), None);
        assert_eq!(other.status(), DuelStatus::Pending);
    }

    #[test]
    fn test_params_validation() {
        let rules = DuelConfig::default();
        assert!(params(3).validate(&rules).is_ok());
        assert!(params(0).validate(&rules).is_err());
        assert!(params(11).validate(&rules).is_err());

        let mut inverted = params(3);
        inverted.rating_low = 1700;
        assert!(inverted.validate(&rules).is_err());

        let mut untimed = params(3);
        untimed.minutes_per_round = 0;
        assert!(untimed.validate(&rules).is_err());
    }

    #[test]
    fn test_ratings_must_be_in_codeforces_range() {
        let rules = DuelConfig::default();

        let mut huge = params(2);
        huge.rating_low = -2_000_000_000;
        huge.rating_high = 2_000_000_000;
        assert!(matches!(huge.validate(&rules), Err(AppError::Validation(_))));

        let mut negative = params(2);
        negative.rating_low = -1;
        assert!(negative.validate(&rules).is_err());

        let mut edges = params(2);
        edges.rating_low = 0;
        edges.rating_high = MAX_PROBLEM_RATING;
        assert!(edges.validate(&rules).is_ok());
    }
}

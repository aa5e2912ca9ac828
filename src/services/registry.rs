//! Bookkeeping of pending challenges and running duels
//!
//! The registry is plain data. [`DuelService`](super::DuelService) owns it behind a
//! single mutex, which is what makes the "is this user free?" check and the insert
//! that follows atomic.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{Duel, UserId};

#[derive(Debug, Default)]
pub struct DuelRegistry {
    /// Pending challenges keyed by the challenged user
    pending: HashMap<UserId, Duel>,
    /// Challenger -> challenged user, for pending challenges
    pending_challengers: HashMap<UserId, UserId>,
    active: HashMap<Uuid, Duel>,
    /// Both participants of an active duel point at the same duel id
    active_by_user: HashMap<UserId, Uuid>,
    /// Users whose challenge is still being generated
    reserved: HashSet<UserId>,
}

impl DuelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the user is reserved, has a pending challenge either way, or is mid-duel
    pub fn is_in_any_duel(&self, user: UserId) -> bool {
        self.reserved.contains(&user)
            || self.pending.contains_key(&user)
            || self.pending_challengers.contains_key(&user)
            || self.active_by_user.contains_key(&user)
    }

    /// Claim both users for a challenge under construction.
    ///
    /// Returns `false` without side effects if either one is already taken.
    pub fn reserve(&mut self, challenger: UserId, opponent: UserId) -> bool {
        if self.is_in_any_duel(challenger) || self.is_in_any_duel(opponent) {
            return false;
        }
        self.reserved.insert(challenger);
        self.reserved.insert(opponent);
        true
    }

    /// Drop a reservation made by [`reserve`](Self::reserve)
    pub fn release(&mut self, challenger: UserId, opponent: UserId) {
        self.reserved.remove(&challenger);
        self.reserved.remove(&opponent);
    }

    /// Store a pending challenge, replacing any earlier one aimed at the same user
    pub fn add_pending(&mut self, duel: Duel) {
        self.release(duel.challenger_id, duel.opponent_id);
        self.pending_challengers
            .insert(duel.challenger_id, duel.opponent_id);
        if let Some(replaced) = self.pending.insert(duel.opponent_id, duel) {
            self.pending_challengers.remove(&replaced.challenger_id);
        }
    }

    /// Take the challenge aimed at `user`; it can be accepted or rejected only once
    pub fn pop_pending_for(&mut self, user: UserId) -> Option<Duel> {
        let duel = self.pending.remove(&user)?;
        self.pending_challengers.remove(&duel.challenger_id);
        Some(duel)
    }

    /// Register an accepted duel under both participants
    pub fn start_active(&mut self, duel: Duel) -> Uuid {
        let id = duel.id;
        for user in duel.participants() {
            self.active_by_user.insert(user, id);
        }
        self.active.insert(id, duel);
        id
    }

    pub fn active_for(&self, user: UserId) -> Option<&Duel> {
        let id = self.active_by_user.get(&user)?;
        self.active.get(id)
    }

    pub fn active_for_mut(&mut self, user: UserId) -> Option<&mut Duel> {
        let id = self.active_by_user.get(&user)?;
        self.active.get_mut(id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Duel> {
        self.active.get_mut(&id)
    }

    /// Remove a duel and free both participants
    pub fn end_active(&mut self, id: Uuid) -> Option<Duel> {
        let duel = self.active.remove(&id)?;
        for user in duel.participants() {
            if self.active_by_user.get(&user) == Some(&id) {
                self.active_by_user.remove(&user);
            }
        }
        Some(duel)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DuelParams, Problem};

    fn duel(challenger: u64, opponent: u64) -> Duel {
        Duel::new(
            UserId(challenger),
            UserId(opponent),
            DuelParams {
                problems: 1,
                rating_low: 800,
                rating_high: 800,
                minutes_per_round: 5,
            },
            vec![Problem {
                contest_id: 1,
                index: "A".to_string(),
                name: "Theatre Square".to_string(),
                rating: Some(800),
            }],
        )
    }

    #[test]
    fn test_reservation_blocks_both_users() {
        let mut registry = DuelRegistry::new();
        assert!(registry.reserve(UserId(1), UserId(2)));
        assert!(registry.is_in_any_duel(UserId(1)));
        assert!(!registry.reserve(UserId(2), UserId(3)));
        assert!(!registry.is_in_any_duel(UserId(3)));

        registry.release(UserId(1), UserId(2));
        assert!(!registry.is_in_any_duel(UserId(1)));
        assert!(registry.reserve(UserId(2), UserId(3)));
    }

    #[test]
    fn test_pending_lifecycle() {
        let mut registry = DuelRegistry::new();
        assert!(registry.reserve(UserId(1), UserId(2)));
        registry.add_pending(duel(1, 2));

        assert!(registry.is_in_any_duel(UserId(1)));
        assert!(registry.is_in_any_duel(UserId(2)));
        assert_eq!(registry.pending_count(), 1);

        // The challenger has nothing to accept
        assert!(registry.pop_pending_for(UserId(1)).is_none());

        let popped = registry.pop_pending_for(UserId(2)).unwrap();
        assert_eq!(popped.challenger_id, UserId(1));
        assert!(registry.pop_pending_for(UserId(2)).is_none());
        assert!(!registry.is_in_any_duel(UserId(1)));
        assert!(!registry.is_in_any_duel(UserId(2)));
    }

    #[test]
    fn test_new_challenge_overwrites_previous_one() {
        let mut registry = DuelRegistry::new();
        registry.add_pending(duel(1, 2));
        registry.add_pending(duel(3, 2));

        assert_eq!(registry.pending_count(), 1);
        assert!(!registry.is_in_any_duel(UserId(1)));
        assert_eq!(
            registry.pop_pending_for(UserId(2)).map(|d| d.challenger_id),
            Some(UserId(3))
        );
    }

    #[test]
    fn test_active_duel_shared_by_both_participants() {
        let mut registry = DuelRegistry::new();
        let id = registry.start_active(duel(1, 2));

        assert_eq!(registry.active_for(UserId(1)).map(|d| d.id), Some(id));
        assert_eq!(registry.active_for(UserId(2)).map(|d| d.id), Some(id));
        assert_eq!(registry.active_count(), 1);

        registry
            .active_for_mut(UserId(1))
            .unwrap()
            .award_round(UserId(1), 800);
        assert_eq!(
            registry.active_for(UserId(2)).and_then(|d| d.score_of(UserId(1))),
            Some(800)
        );

        assert!(registry.end_active(id).is_some());
        assert!(registry.active_for(UserId(1)).is_none());
        assert!(registry.active_for(UserId(2)).is_none());
        assert!(!registry.is_in_any_duel(UserId(1)));
        assert!(registry.end_active(id).is_none());
    }
}

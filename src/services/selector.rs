//! Problem selection for a duel
//!
//! Picks `n` problems whose ratings climb evenly through the requested band, drawing
//! each one from a different recent contest while the pool allows it.

use std::collections::HashMap;

use rand::{Rng, seq::SliceRandom};

use crate::models::{Contest, Problem};

/// Constraints on the problem sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub rating_low: i32,
    pub rating_high: i32,
    pub count: usize,
    /// Unix seconds; contests starting earlier are ignored
    pub recency_cutoff: i64,
}

/// Evenly spaced target ratings across `[low, high]`
pub fn target_ratings(low: i32, high: i32, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![((i64::from(low) + i64::from(high)) / 2) as f64],
        _ => {
            let span = f64::from(high) - f64::from(low);
            let steps = (count - 1) as f64;
            (0..count)
                .map(|i| f64::from(low) + span * i as f64 / steps)
                .collect()
        }
    }
}

/// Select `criteria.count` problems, or `None` if the pool is too thin
pub fn select_problems<R: Rng + ?Sized>(
    problems: &[Problem],
    contests: &[Contest],
    criteria: &SelectionCriteria,
    rng: &mut R,
) -> Option<Vec<Problem>> {
    let n = criteria.count;

    let contest_start: HashMap<i64, i64> = contests
        .iter()
        .filter_map(|c| c.start_time_seconds.map(|start| (c.id, start)))
        .collect();

    let candidates: Vec<&Problem> = problems
        .iter()
        .filter(|p| {
            let Some(rating) = p.rating else {
                return false;
            };
            let Some(&start) = contest_start.get(&p.contest_id) else {
                return false;
            };
            (criteria.rating_low..=criteria.rating_high).contains(&rating)
                && start >= criteria.recency_cutoff
        })
        .collect();

    if candidates.len() < n {
        return None;
    }

    // Bucket by contest, keeping problemset order inside each bucket
    let mut buckets: HashMap<i64, Vec<&Problem>> = HashMap::new();
    let mut contest_ids: Vec<i64> = Vec::new();
    for problem in candidates {
        buckets
            .entry(problem.contest_id)
            .or_insert_with(|| {
                contest_ids.push(problem.contest_id);
                Vec::new()
            })
            .push(problem);
    }
    contest_ids.shuffle(rng);

    let targets = target_ratings(criteria.rating_low, criteria.rating_high, n);
    let mut selected: Vec<Problem> = Vec::with_capacity(n);
    let mut used_contests: Vec<i64> = Vec::new();

    for &target in &targets {
        let mut best: Option<(i64, usize, f64)> = None;

        for cid in contest_ids.iter().filter(|cid| !used_contests.contains(cid)) {
            for (pos, problem) in buckets[cid].iter().enumerate() {
                let diff = distance(problem, target);
                if best.is_none_or(|(_, _, best_diff)| diff < best_diff) {
                    best = Some((*cid, pos, diff));
                }
            }
        }

        if let Some((cid, pos, _)) = best {
            if let Some(bucket) = buckets.get_mut(&cid) {
                selected.push(bucket.remove(pos).clone());
            }
            used_contests.push(cid);
        }

        if selected.len() == n {
            break;
        }
    }

    if selected.len() < n {
        // Not enough distinct contests: reuse contests, closest to the next unmet target
        let next_target = targets[selected.len()];
        let mut remaining: Vec<&Problem> = contest_ids
            .iter()
            .flat_map(|cid| buckets[cid].iter().copied())
            .collect();
        remaining.sort_by(|a, b| distance(a, next_target).total_cmp(&distance(b, next_target)));

        selected.extend(
            remaining
                .into_iter()
                .take(n - selected.len())
                .cloned(),
        );
    }

    (selected.len() == n).then_some(selected)
}

fn distance(problem: &Problem, target: f64) -> f64 {
    (f64::from(problem.rating.unwrap_or_default()) - target).abs()
}

//! Quota-driven criterion assignment
//!
//! A batch of N books must hit each criterion's quota exactly (largest
//! remainder rounding), not merely in expectation. Slots are assigned by
//! exact allocation and then shuffled with a seeded RNG so the assignment is
//! deterministic per seed but uncorrelated with book ids.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use df_engine::Criterion;

use crate::error::{SimError, SimResult};

/// Per-criterion slot counts for a batch of `total` books.
///
/// Largest-remainder allocation: floor every share, then hand out the
/// leftover slots to the largest fractional remainders.
pub fn quota_counts(criteria: &[Criterion], total: u64) -> SimResult<Vec<u64>> {
    if criteria.is_empty() {
        return Err(SimError::EmptyCriteria);
    }
    let quota_sum: f64 = criteria.iter().map(|c| c.quota).sum();
    if quota_sum <= 0.0 || !quota_sum.is_finite() {
        return Err(SimError::BadQuotas(quota_sum));
    }

    let mut counts = Vec::with_capacity(criteria.len());
    let mut remainders = Vec::with_capacity(criteria.len());
    let mut assigned = 0u64;
    for criterion in criteria {
        let share = criterion.quota / quota_sum * total as f64;
        let floor = share.floor() as u64;
        counts.push(floor);
        remainders.push(share - floor as f64);
        assigned += floor;
    }

    let mut order: Vec<usize> = (0..criteria.len()).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .partial_cmp(&remainders[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for &idx in order.iter().cycle().take((total - assigned) as usize) {
        counts[idx] += 1;
    }
    Ok(counts)
}

/// Assign a criterion index to every slot of a batch, shuffled by `seed`.
pub fn assign_criteria(criteria: &[Criterion], total: u64, seed: u64) -> SimResult<Vec<usize>> {
    let counts = quota_counts(criteria, total)?;
    let mut slots = Vec::with_capacity(total as usize);
    for (idx, count) in counts.iter().enumerate() {
        slots.extend(std::iter::repeat_n(idx, *count as usize));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    slots.shuffle(&mut rng);
    Ok(slots)
}

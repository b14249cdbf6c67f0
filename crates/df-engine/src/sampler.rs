//! Weighted outcome sampling
//!
//! Every stochastic decision in the engine (reel-set selection, attribute
//! assignment, shower multipliers, landing-wild counts) goes through a
//! `WeightedTable`. Tables are validated at configuration time so an empty or
//! zero-weight table can never fail mid-loop.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A weighted table over arbitrary outcome values.
///
/// Entry order is preserved; selection probability is weight over total
/// weight. Sampling is deterministic under a fixed RNG stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
}

impl<T> WeightedTable<T> {
    /// Build a table, rejecting empty or all-zero-weight input.
    pub fn new(name: &str, entries: Vec<(T, u32)>) -> EngineResult<Self> {
        let table = Self { entries };
        table.validate(name)?;
        Ok(table)
    }

    /// Check the non-degeneracy invariant. Called by `GameConfig::validate`
    /// for tables that arrive via deserialization.
    pub fn validate(&self, name: &str) -> EngineResult<()> {
        if self.total_weight() == 0 {
            return Err(EngineError::EmptyTable(name.to_string()));
        }
        Ok(())
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    /// Draw one outcome with probability proportional to weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<&T> {
        let total = self.total_weight();
        if total == 0 {
            return Err(EngineError::EmptyTable("<unnamed>".to_string()));
        }
        let roll = rng.random_range(0..total);
        let mut acc = 0u64;
        for (value, weight) in &self.entries {
            acc += u64::from(*weight);
            if roll < acc {
                return Ok(value);
            }
        }
        // Unreachable with a positive total; keep the error path explicit.
        Err(EngineError::EmptyTable("<unnamed>".to_string()))
    }
}

impl<T: Copy> WeightedTable<T> {
    /// Sample by value for `Copy` outcomes.
    pub fn sample_copied<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<T> {
        self.sample(rng).map(|v| *v)
    }
}

/// Shorthand for the `(value, weight)` integer tables used throughout the
/// game configuration.
pub fn table_u32(name: &str, pairs: &[(u32, u32)]) -> EngineResult<WeightedTable<u32>> {
    WeightedTable::new(name, pairs.to_vec())
}

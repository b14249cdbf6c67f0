//! Free-spin run state machine
//!
//! Inactive -> Active -> Ended, driven by the engine. Retriggers extend an
//! active run additively; the win cap ends it early. The run never draws or
//! evaluates anything itself: it only accounts spins.

use serde::{Deserialize, Serialize};

use crate::criteria::FreeSpinVariant;

/// Lifecycle of one free-spin run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Inactive,
    Active,
    Ended,
}

/// One triggered free-spin run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinRun {
    pub state: RunState,
    pub variant: FreeSpinVariant,
    /// Spins played so far (1-based after the first `begin_spin`)
    pub current: u32,
    /// Total spins awarded, retriggers included
    pub total: u32,
}

impl FreeSpinRun {
    pub fn new(variant: FreeSpinVariant) -> Self {
        Self {
            state: RunState::Inactive,
            variant,
            current: 0,
            total: 0,
        }
    }

    /// Activate the run with the initial award.
    pub fn start(&mut self, spins: u32) {
        self.state = RunState::Active;
        self.current = 0;
        self.total = spins;
    }

    /// Begin the next spin, returning `(current, total)` for the update
    /// event, or `None` once the run is exhausted.
    pub fn begin_spin(&mut self) -> Option<(u32, u32)> {
        if self.state != RunState::Active || self.current >= self.total {
            return None;
        }
        self.current += 1;
        Some((self.current, self.total))
    }

    /// Add retrigger spins onto the remaining total.
    pub fn retrigger(&mut self, extra: u32) {
        if self.state == RunState::Active {
            self.total += extra;
        }
    }

    /// Close the run (exhausted or capped out).
    pub fn end(&mut self) {
        self.state = RunState::Ended;
    }

    pub fn is_active(&self) -> bool {
        self.state == RunState::Active
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_through_awarded_spins() {
        let mut run = FreeSpinRun::new(FreeSpinVariant::WildWildWest);
        run.start(3);
        assert_eq!(run.begin_spin(), Some((1, 3)));
        assert_eq!(run.begin_spin(), Some((2, 3)));
        assert_eq!(run.begin_spin(), Some((3, 3)));
        assert_eq!(run.begin_spin(), None);
    }

    #[test]
    fn retrigger_extends_additively() {
        let mut run = FreeSpinRun::new(FreeSpinVariant::DuskTilDawn);
        run.start(10);
        for _ in 0..4 {
            run.begin_spin();
        }
        run.retrigger(5);
        assert_eq!(run.total, 15);
        assert_eq!(run.remaining(), 11);
    }

    #[test]
    fn ended_run_rejects_spins_and_retriggers() {
        let mut run = FreeSpinRun::new(FreeSpinVariant::WildWildWest);
        run.start(2);
        run.begin_spin();
        run.end();
        assert_eq!(run.begin_spin(), None);
        run.retrigger(5);
        assert_eq!(run.total, 2);
    }

    #[test]
    fn inactive_run_cannot_spin() {
        let mut run = FreeSpinRun::new(FreeSpinVariant::WildWildWest);
        assert_eq!(run.begin_spin(), None);
        assert!(!run.is_active());
    }
}

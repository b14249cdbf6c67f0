//! Distribution criteria
//!
//! A `Criterion` is the externally supplied target a spin attempt must
//! satisfy to be accepted by the rejection loop: an exact win amount, a
//! forced free-game entry, a forced scatter draw, plus the weighted tables
//! the feature resolver must use for that attempt. The same criterion object
//! governs every retry of one logical spin and never mutates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GameType;
use crate::error::EngineResult;
use crate::sampler::{WeightedTable, table_u32};

/// Free-spin variant, selected once per triggered run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeSpinVariant {
    WildWildWest,
    DuskTilDawn,
}

impl FreeSpinVariant {
    /// Wire name used in `freegameMode` events.
    pub fn mode_str(&self) -> &'static str {
        match self {
            FreeSpinVariant::WildWildWest => "wild_wild_west",
            FreeSpinVariant::DuskTilDawn => "dusk_til_dawn",
        }
    }

    /// Reel set played for the whole run when the criterion carries no
    /// explicit free-game reel weights.
    pub fn default_reel_set(&self) -> &'static str {
        match self {
            FreeSpinVariant::WildWildWest => "FR0",
            FreeSpinVariant::DuskTilDawn => "FR1",
        }
    }
}

/// Target condition and feature tables for one logical spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion name, recorded on accepted books
    pub name: String,
    /// Share of a batch this criterion should fill (used by assignment)
    pub quota: f64,
    /// Exact final-win requirement (bet multiples); `None` = unconstrained
    pub win_target: Option<f64>,
    /// Attempt must have entered the free game
    pub force_freegame: bool,
    /// Attempt is hunting the win cap (reporting only; the win itself is
    /// constrained via `win_target`)
    pub force_wincap: bool,
    /// Forced scatter draw: weighted table of fs-scatter counts placed onto
    /// the base board before feature resolution
    pub scatter_force: Option<WeightedTable<u8>>,
    /// Base-game reel set weights
    pub base_reel_weights: WeightedTable<String>,
    /// Free-game reel set weights; `None` plays the variant's default set
    pub free_reel_weights: Option<WeightedTable<String>>,
    /// Free-spin variant for runs triggered under this criterion
    pub variant: FreeSpinVariant,
    /// Duel multiplier table (also the run multiplier table for expanding
    /// wilds and free-game wild attributes)
    pub duel_mults: WeightedTable<u32>,
    /// Outlaw shot-wild multiplier table
    pub outlaw_mults: WeightedTable<u32>,
    /// Outlaw wild-count table
    pub outlaw_counts: WeightedTable<u32>,
    /// New expanding wilds landed per free spin
    pub landing_wilds: WeightedTable<u32>,
}

impl Criterion {
    /// Reel weights for a mode; free mode may fall back to the variant set.
    pub fn reel_weights(&self, game_type: GameType) -> Option<&WeightedTable<String>> {
        match game_type {
            GameType::Base => Some(&self.base_reel_weights),
            GameType::Free => self.free_reel_weights.as_ref(),
        }
    }

    /// Validate every table up front so the resolver never fails mid-loop.
    pub fn validate(&self) -> EngineResult<()> {
        self.base_reel_weights.validate("base_reel_weights")?;
        if let Some(free) = &self.free_reel_weights {
            free.validate("free_reel_weights")?;
        }
        if let Some(scatter) = &self.scatter_force {
            scatter.validate("scatter_force")?;
        }
        self.duel_mults.validate("duel_mults")?;
        self.outlaw_mults.validate("outlaw_mults")?;
        self.outlaw_counts.validate("outlaw_counts")?;
        self.landing_wilds.validate("landing_wilds")?;
        Ok(())
    }
}

/// Bound on the rejection loop: attempt count plus optional wall-clock
/// timeout. Exceeding either yields `CriterionUnreachable`, never a hang.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBounds {
    pub max_attempts: u32,
    pub timeout: Option<Duration>,
}

impl Default for RetryBounds {
    fn default() -> Self {
        Self {
            max_attempts: 50_000,
            timeout: None,
        }
    }
}

impl RetryBounds {
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// Default attribute tables from the math sheet.

pub fn default_duel_mults() -> WeightedTable<u32> {
    // 2x..200x; construction from static pairs cannot fail
    table_u32(
        "duel_mults",
        &[
            (2, 200),
            (3, 150),
            (4, 100),
            (5, 80),
            (10, 50),
            (20, 30),
            (50, 20),
            (100, 10),
            (200, 5),
        ],
    )
    .expect("static table")
}

pub fn default_outlaw_mults() -> WeightedTable<u32> {
    table_u32(
        "outlaw_mults",
        &[
            (2, 300),
            (3, 200),
            (4, 150),
            (5, 100),
            (10, 50),
            (20, 30),
            (50, 15),
            (100, 8),
            (200, 3),
        ],
    )
    .expect("static table")
}

pub fn default_outlaw_counts() -> WeightedTable<u32> {
    table_u32(
        "outlaw_counts",
        &[(1, 200), (2, 150), (3, 100), (4, 50), (5, 20), (6, 10)],
    )
    .expect("static table")
}

/// No landing wilds unless a criterion opts in.
pub fn default_landing_wilds() -> WeightedTable<u32> {
    table_u32("landing_wilds", &[(0, 100)]).expect("static table")
}

/// Scale a table's weights by a factor (truncating, as the math sheet does).
fn scale(table: &WeightedTable<u32>, factor: f64) -> WeightedTable<u32> {
    let entries = table
        .entries()
        .iter()
        .map(|(v, w)| (*v, (f64::from(*w) * factor) as u32))
        .collect();
    WeightedTable::new("scaled", entries).unwrap_or_else(|_| table.clone())
}

fn base_br0() -> WeightedTable<String> {
    WeightedTable::new("base_reel_weights", vec![("BR0".to_string(), 1)]).expect("static table")
}

/// The base bet-mode criterion set of the math sheet, quotas included.
pub fn duel_at_dawn_criteria(wincap: f64) -> Vec<Criterion> {
    vec![
        wincap_criterion(wincap),
        freegame_www(),
        freegame_dtd(),
        zero_win(),
        basegame(),
    ]
}

/// Win-cap hunt: exact win at the cap, scatters forced high.
pub fn wincap_criterion(wincap: f64) -> Criterion {
    Criterion {
        name: "wincap".to_string(),
        quota: 0.001,
        win_target: Some(wincap),
        force_freegame: false,
        force_wincap: true,
        scatter_force: Some(
            WeightedTable::new("scatter_force", vec![(4u8, 1), (5, 2)]).expect("static table"),
        ),
        base_reel_weights: base_br0(),
        free_reel_weights: Some(
            WeightedTable::new(
                "free_reel_weights",
                vec![("FR0".to_string(), 1), ("FR1".to_string(), 1)],
            )
            .expect("static table"),
        ),
        variant: FreeSpinVariant::WildWildWest,
        duel_mults: default_duel_mults(),
        outlaw_mults: default_outlaw_mults(),
        outlaw_counts: default_outlaw_counts(),
        landing_wilds: default_landing_wilds(),
    }
}

/// Wild Wild West free game: 3 forced scatters, softened multiplier tables.
pub fn freegame_www() -> Criterion {
    Criterion {
        name: "freegame_www".to_string(),
        quota: 0.05,
        win_target: None,
        force_freegame: true,
        force_wincap: false,
        scatter_force: Some(
            WeightedTable::new("scatter_force", vec![(3u8, 100)]).expect("static table"),
        ),
        base_reel_weights: base_br0(),
        free_reel_weights: None,
        variant: FreeSpinVariant::WildWildWest,
        duel_mults: scale(&default_duel_mults(), 0.8),
        outlaw_mults: scale(&default_outlaw_mults(), 0.8),
        outlaw_counts: default_outlaw_counts(),
        landing_wilds: table_u32("landing_wilds", &[(0, 60), (1, 30), (2, 10)])
            .expect("static table"),
    }
}

/// Dusk 'Til Dawn free game: 4 forced scatters, boosted multiplier tables.
pub fn freegame_dtd() -> Criterion {
    Criterion {
        name: "freegame_dtd".to_string(),
        quota: 0.02,
        win_target: None,
        force_freegame: true,
        force_wincap: false,
        scatter_force: Some(
            WeightedTable::new("scatter_force", vec![(4u8, 100)]).expect("static table"),
        ),
        base_reel_weights: base_br0(),
        free_reel_weights: None,
        variant: FreeSpinVariant::DuskTilDawn,
        duel_mults: scale(&default_duel_mults(), 1.2),
        outlaw_mults: scale(&default_outlaw_mults(), 1.2),
        outlaw_counts: default_outlaw_counts(),
        landing_wilds: table_u32("landing_wilds", &[(0, 40), (1, 40), (2, 20)])
            .expect("static table"),
    }
}

/// Exact zero win, accepted only on a dead draw.
pub fn zero_win() -> Criterion {
    Criterion {
        name: "0".to_string(),
        quota: 0.4,
        win_target: Some(0.0),
        force_freegame: false,
        force_wincap: false,
        scatter_force: None,
        base_reel_weights: base_br0(),
        free_reel_weights: None,
        variant: FreeSpinVariant::WildWildWest,
        duel_mults: default_duel_mults(),
        outlaw_mults: default_outlaw_mults(),
        outlaw_counts: default_outlaw_counts(),
        landing_wilds: default_landing_wilds(),
    }
}

/// Unconstrained base game: the first attempt is always accepted.
pub fn basegame() -> Criterion {
    Criterion {
        name: "basegame".to_string(),
        quota: 0.529,
        win_target: None,
        force_freegame: false,
        force_wincap: false,
        scatter_force: None,
        base_reel_weights: base_br0(),
        free_reel_weights: None,
        variant: FreeSpinVariant::WildWildWest,
        duel_mults: default_duel_mults(),
        outlaw_mults: default_outlaw_mults(),
        outlaw_counts: default_outlaw_counts(),
        landing_wilds: default_landing_wilds(),
    }
}

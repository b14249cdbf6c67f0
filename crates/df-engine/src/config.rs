//! Game configuration
//!
//! An explicitly constructed, immutable value passed by reference into every
//! component. There is no process-wide singleton; tests build as many configs
//! as they like.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::reels::ReelSet;
use crate::symbols::PaySymbol;

/// Game mode: base spins or a free-spin run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Base,
    Free,
}

impl GameType {
    /// Wire name used in reveal events.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Base => "basegame",
            GameType::Free => "freegame",
        }
    }
}

/// Pay values for 3/4/5-of-a-kind, in bet multiples.
pub type PayValues = [f64; 3];

/// Line paytable: wild pays plus one row per paying symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    wild: PayValues,
    pays: BTreeMap<PaySymbol, PayValues>,
}

impl PayTable {
    pub fn new(wild: PayValues, pays: BTreeMap<PaySymbol, PayValues>) -> Self {
        Self { wild, pays }
    }

    /// Pay for `count` matched symbols of `symbol` (0 below 3-of-a-kind).
    pub fn pay(&self, symbol: PaySymbol, count: u8) -> f64 {
        if !(3..=5).contains(&count) {
            return 0.0;
        }
        self.pays
            .get(&symbol)
            .map(|p| p[(count - 3) as usize])
            .unwrap_or(0.0)
    }

    /// Pay for a line of pure wilds.
    pub fn wild_pay(&self, count: u8) -> f64 {
        if !(3..=5).contains(&count) {
            return 0.0;
        }
        self.wild[(count - 3) as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.pays.is_empty()
    }
}

/// A fixed payline: one row index per reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline number on the game sheet (1-based)
    pub index: u8,
    /// Row per reel, top row = 0
    pub positions: Vec<usize>,
}

impl Payline {
    pub fn new(index: u8, positions: Vec<usize>) -> Self {
        Self { index, positions }
    }
}

/// Immutable game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_id: String,
    pub rtp: f64,
    /// Win cap in bet multiples; accumulated wins are clamped here
    pub wincap: f64,
    pub num_reels: usize,
    /// Visible rows per reel (may vary per reel)
    pub num_rows: Vec<usize>,
    /// Draw one extra row above/below the window for display only
    pub include_padding: bool,
    pub paytable: PayTable,
    pub paylines: Vec<Payline>,
    /// Base-game scatter count → awarded free spins
    pub base_triggers: BTreeMap<u8, u32>,
    /// Free-game scatter count → retrigger bonus spins
    pub free_triggers: BTreeMap<u8, u32>,
    /// Scatter count at which remaining reels stop under anticipation
    pub anticipation_base: u8,
    pub anticipation_free: u8,
    /// Named reel sets (BR0, FR0, FR1, WCAP)
    pub reel_sets: HashMap<String, ReelSet>,
}

impl GameConfig {
    /// The Duel at Dawn math sheet: 5×5 grid, 19 lines, 97% RTP target,
    /// 5000× cap.
    pub fn duel_at_dawn(reel_sets: HashMap<String, ReelSet>) -> EngineResult<Self> {
        let mut pays = BTreeMap::new();
        pays.insert(PaySymbol::H1, [10.0, 20.0, 50.0]);
        pays.insert(PaySymbol::H2, [6.0, 12.0, 30.0]);
        pays.insert(PaySymbol::H3, [4.0, 8.0, 20.0]);
        pays.insert(PaySymbol::H4, [3.0, 6.0, 15.0]);
        pays.insert(PaySymbol::H5, [2.0, 4.0, 10.0]);
        pays.insert(PaySymbol::L1, [1.0, 2.0, 5.0]);
        pays.insert(PaySymbol::L2, [0.7, 1.5, 3.0]);
        pays.insert(PaySymbol::L3, [0.5, 1.0, 2.0]);
        pays.insert(PaySymbol::L4, [0.3, 0.7, 1.5]);
        let paytable = PayTable::new([10.0, 20.0, 50.0], pays);

        let config = Self {
            game_id: "duel_at_dawn".to_string(),
            rtp: 0.97,
            wincap: 5000.0,
            num_reels: 5,
            num_rows: vec![5; 5],
            include_padding: true,
            paytable,
            paylines: duel_at_dawn_paylines(),
            base_triggers: BTreeMap::from([(3, 10), (4, 10)]),
            free_triggers: BTreeMap::from([(3, 5), (4, 10)]),
            anticipation_base: 2,
            anticipation_free: 2,
            reel_sets,
        };
        config.validate()?;
        Ok(config)
    }

    /// Trigger map for a mode.
    pub fn triggers(&self, game_type: GameType) -> &BTreeMap<u8, u32> {
        match game_type {
            GameType::Base => &self.base_triggers,
            GameType::Free => &self.free_triggers,
        }
    }

    /// Anticipation threshold for a mode.
    pub fn anticipation(&self, game_type: GameType) -> u8 {
        match game_type {
            GameType::Base => self.anticipation_base,
            GameType::Free => self.anticipation_free,
        }
    }

    /// Awarded (or retrigger) spins for a scatter count, if it triggers.
    ///
    /// Counts above the largest configured key use the largest key's award.
    pub fn spins_for_scatters(&self, game_type: GameType, count: u8) -> Option<u32> {
        let triggers = self.triggers(game_type);
        if let Some(spins) = triggers.get(&count) {
            return Some(*spins);
        }
        let max_key = *triggers.keys().max()?;
        if count > max_key {
            triggers.get(&max_key).copied()
        } else {
            None
        }
    }

    pub fn reel_set(&self, name: &str) -> EngineResult<&ReelSet> {
        self.reel_sets
            .get(name)
            .ok_or_else(|| EngineError::UnknownReelSet(name.to_string()))
    }

    /// Validate structural invariants. Fatal before any spin runs.
    pub fn validate(&self) -> EngineResult<()> {
        if self.num_reels == 0 || self.num_rows.len() != self.num_reels {
            return Err(EngineError::InvalidConfig(format!(
                "num_rows has {} entries for {} reels",
                self.num_rows.len(),
                self.num_reels
            )));
        }
        if self.wincap <= 0.0 {
            return Err(EngineError::InvalidConfig("wincap must be positive".into()));
        }
        if self.paytable.is_empty() {
            return Err(EngineError::InvalidConfig("empty paytable".into()));
        }
        if self.base_triggers.is_empty() {
            return Err(EngineError::InvalidConfig(
                "no base-game free-spin triggers".into(),
            ));
        }
        for line in &self.paylines {
            if line.positions.len() != self.num_reels {
                return Err(EngineError::InvalidConfig(format!(
                    "payline {} spans {} reels, expected {}",
                    line.index,
                    line.positions.len(),
                    self.num_reels
                )));
            }
            for (reel, &row) in line.positions.iter().enumerate() {
                if row >= self.num_rows[reel] {
                    return Err(EngineError::InvalidConfig(format!(
                        "payline {} row {} out of range on reel {}",
                        line.index, row, reel
                    )));
                }
            }
        }
        for set in self.reel_sets.values() {
            if set.num_reels() != self.num_reels {
                return Err(EngineError::MalformedReelSet {
                    name: set.name.clone(),
                    reason: format!(
                        "{} reels, expected {}",
                        set.num_reels(),
                        self.num_reels
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The 19 fixed paylines of the 5×5 game sheet.
pub fn duel_at_dawn_paylines() -> Vec<Payline> {
    vec![
        // Horizontals
        Payline::new(1, vec![0, 0, 0, 0, 0]),
        Payline::new(2, vec![1, 1, 1, 1, 1]),
        Payline::new(3, vec![2, 2, 2, 2, 2]),
        Payline::new(4, vec![3, 3, 3, 3, 3]),
        Payline::new(5, vec![4, 4, 4, 4, 4]),
        // V shapes
        Payline::new(6, vec![0, 1, 2, 1, 0]),
        Payline::new(7, vec![2, 1, 0, 1, 2]),
        // Diagonals
        Payline::new(8, vec![0, 1, 2, 3, 4]),
        Payline::new(9, vec![4, 3, 2, 1, 0]),
        // Zigzags
        Payline::new(10, vec![0, 1, 2, 1, 0]),
        Payline::new(11, vec![2, 1, 0, 1, 2]),
        // W shapes
        Payline::new(12, vec![0, 1, 0, 1, 0]),
        Payline::new(13, vec![2, 1, 2, 1, 2]),
        // Diagonal W shapes
        Payline::new(14, vec![0, 1, 2, 3, 4]),
        Payline::new(15, vec![4, 3, 2, 1, 0]),
        // Diamond
        Payline::new(16, vec![2, 1, 0, 1, 2]),
        // Curved
        Payline::new(17, vec![0, 0, 0, 1, 1]),
        Payline::new(18, vec![1, 1, 1, 0, 0]),
        Payline::new(19, vec![0, 1, 2, 1, 0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKind;

    fn flat_set(name: &str) -> ReelSet {
        let column = vec![SymbolKind::Pay(PaySymbol::L1); 20];
        ReelSet::from_columns(name, vec![column; 5]).unwrap()
    }

    fn config() -> GameConfig {
        let mut sets = HashMap::new();
        sets.insert("BR0".to_string(), flat_set("BR0"));
        GameConfig::duel_at_dawn(sets).unwrap()
    }

    #[test]
    fn paytable_lookup() {
        let cfg = config();
        assert_eq!(cfg.paytable.pay(PaySymbol::H1, 5), 50.0);
        assert_eq!(cfg.paytable.pay(PaySymbol::L4, 3), 0.3);
        assert_eq!(cfg.paytable.pay(PaySymbol::H1, 2), 0.0);
        assert_eq!(cfg.paytable.wild_pay(4), 20.0);
    }

    #[test]
    fn scatter_awards_clamp_to_max_key() {
        let cfg = config();
        assert_eq!(cfg.spins_for_scatters(GameType::Base, 3), Some(10));
        assert_eq!(cfg.spins_for_scatters(GameType::Base, 5), Some(10));
        assert_eq!(cfg.spins_for_scatters(GameType::Base, 2), None);
        assert_eq!(cfg.spins_for_scatters(GameType::Free, 3), Some(5));
        assert_eq!(cfg.spins_for_scatters(GameType::Free, 4), Some(10));
    }

    #[test]
    fn nineteen_paylines_span_the_grid() {
        let cfg = config();
        assert_eq!(cfg.paylines.len(), 19);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mismatched_reel_set_fails_validation() {
        let mut sets = HashMap::new();
        let column = vec![SymbolKind::Pay(PaySymbol::L1); 10];
        sets.insert(
            "BR0".to_string(),
            ReelSet::from_columns("BR0", vec![column; 3]).unwrap(),
        );
        let err = GameConfig::duel_at_dawn(sets).unwrap_err();
        assert!(matches!(err, EngineError::MalformedReelSet { .. }));
    }
}

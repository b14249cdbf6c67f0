//! Board model and reel-draw adapter
//!
//! Exactly one board exists per spin iteration; it is replaced wholesale at
//! the start of each draw and mutated in place by feature resolution. Padding
//! rows (one above, one below the window) are display-only: they are carried
//! for reveal events and never scanned by features or line evaluation.

use df_book::RevealSymbol;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, GameType};
use crate::criteria::Criterion;
use crate::error::EngineResult;
use crate::symbols::{PaySymbol, Symbol, SymbolKind};

/// The drawn grid: one ordered column of symbols per reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Visible window, `reels[reel][row]`
    pub reels: Vec<Vec<Symbol>>,
    /// One padding symbol above each reel (when padding is enabled)
    pub padding_top: Vec<Symbol>,
    /// One padding symbol below each reel
    pub padding_bottom: Vec<Symbol>,
    pub include_padding: bool,
}

impl Board {
    pub fn num_reels(&self) -> usize {
        self.reels.len()
    }

    pub fn rows(&self, reel: usize) -> usize {
        self.reels[reel].len()
    }

    /// Count fs-scatters in the visible window.
    pub fn scatter_count(&self) -> u8 {
        self.reels
            .iter()
            .flatten()
            .filter(|s| s.is_fs_scatter())
            .count() as u8
    }

    /// Fs-scatter count per reel (visible window).
    pub fn scatters_per_reel(&self) -> Vec<u8> {
        self.reels
            .iter()
            .map(|col| col.iter().filter(|s| s.is_fs_scatter()).count() as u8)
            .collect()
    }

    /// Replace an entire reel with wilds at one multiplier.
    pub fn convert_reel_to_wilds(&mut self, reel: usize, multiplier: u32) {
        for cell in &mut self.reels[reel] {
            *cell = Symbol::Wild { multiplier };
        }
    }

    /// Row offset applied to event positions when padding rows are shown.
    pub fn row_offset(&self) -> usize {
        usize::from(self.include_padding)
    }

    /// Full display window per reel (padding included when enabled).
    pub fn reveal(&self) -> Vec<Vec<RevealSymbol>> {
        self.reels
            .iter()
            .enumerate()
            .map(|(reel, col)| {
                let mut out = Vec::with_capacity(col.len() + 2);
                if self.include_padding {
                    out.push(to_reveal(&self.padding_top[reel]));
                }
                out.extend(col.iter().map(to_reveal));
                if self.include_padding {
                    out.push(to_reveal(&self.padding_bottom[reel]));
                }
                out
            })
            .collect()
    }

    /// Reels that stop under anticipation: every reel after the point where
    /// the cumulative scatter count reaches the threshold.
    pub fn anticipation_reels(&self, threshold: u8) -> Vec<usize> {
        let per_reel = self.scatters_per_reel();
        let mut seen = 0u8;
        let mut reels = Vec::new();
        for (reel, count) in per_reel.iter().enumerate() {
            if seen >= threshold {
                reels.push(reel);
            }
            seen += count;
        }
        reels
    }
}

fn to_reveal(symbol: &Symbol) -> RevealSymbol {
    match symbol.wild_multiplier() {
        Some(mult) => RevealSymbol::wild(mult),
        None => RevealSymbol::plain(symbol.tag()),
    }
}

/// Materialize a strip kind into a symbol, assigning per-kind attributes
/// from the active criterion's tables. Attributes are assigned exactly once,
/// here.
pub fn materialize<R: Rng + ?Sized>(
    kind: SymbolKind,
    game_type: GameType,
    criterion: &Criterion,
    rng: &mut R,
) -> EngineResult<Symbol> {
    Ok(match kind {
        // Base-game wilds pay flat; free-game wilds draw a multiplier
        SymbolKind::Wild => match game_type {
            GameType::Base => Symbol::Wild { multiplier: 1 },
            GameType::Free => Symbol::Wild {
                multiplier: criterion.duel_mults.sample_copied(rng)?,
            },
        },
        SymbolKind::Duel => Symbol::Duel {
            duel_multiplier: criterion.duel_mults.sample_copied(rng)?,
        },
        SymbolKind::Outlaw => Symbol::Outlaw {
            num_wilds: criterion.outlaw_counts.sample_copied(rng)?,
            shot_table: criterion.outlaw_mults.clone(),
        },
        SymbolKind::FsScatter => Symbol::FsScatter,
        SymbolKind::Pay(p) => Symbol::Pay(p),
    })
}

/// Draw a fresh board for the given mode.
///
/// Selects the reel set through the criterion's per-mode weights (free mode
/// falls back to the variant's set), picks one stop per reel, and
/// materializes the window plus padding.
pub fn draw_board<R: Rng + ?Sized>(
    config: &GameConfig,
    criterion: &Criterion,
    game_type: GameType,
    rng: &mut R,
) -> EngineResult<Board> {
    let set_name: String = match criterion.reel_weights(game_type) {
        Some(weights) => weights.sample(rng)?.clone(),
        None => criterion.variant.default_reel_set().to_string(),
    };
    let reel_set = config.reel_set(&set_name)?;

    let mut reels = Vec::with_capacity(config.num_reels);
    let mut padding_top = Vec::with_capacity(config.num_reels);
    let mut padding_bottom = Vec::with_capacity(config.num_reels);

    for reel in 0..config.num_reels {
        let strip = &reel_set.strips[reel];
        let rows = config.num_rows[reel];
        let stop = rng.random_range(0..strip.len());

        if config.include_padding {
            let above = strip.kind_at(stop + strip.len() - 1);
            padding_top.push(materialize(above, game_type, criterion, rng)?);
        }
        let mut column = Vec::with_capacity(rows);
        for row in 0..rows {
            let kind = strip.kind_at(stop + row);
            column.push(materialize(kind, game_type, criterion, rng)?);
        }
        reels.push(column);
        if config.include_padding {
            let below = strip.kind_at(stop + rows);
            padding_bottom.push(materialize(below, game_type, criterion, rng)?);
        }
    }

    Ok(Board {
        reels,
        padding_top,
        padding_bottom,
        include_padding: config.include_padding,
    })
}

/// Force the visible window to exactly `count` fs-scatters.
///
/// Missing scatters land on uniformly chosen non-special cells; excess
/// scatters are demoted to low pays. Only used by criteria that force a
/// trigger draw.
pub fn force_scatter_count<R: Rng + ?Sized>(board: &mut Board, count: u8, rng: &mut R) {
    let mut current = board.scatter_count();

    while current > count {
        let positions: Vec<(usize, usize)> = cells_where(board, |s| s.is_fs_scatter());
        let Some(&(reel, row)) = pick(&positions, rng) else {
            break;
        };
        board.reels[reel][row] = Symbol::Pay(PaySymbol::L4);
        current -= 1;
    }

    while current < count {
        let positions: Vec<(usize, usize)> =
            cells_where(board, |s| matches!(s, Symbol::Pay(_)));
        let Some(&(reel, row)) = pick(&positions, rng) else {
            break;
        };
        board.reels[reel][row] = Symbol::FsScatter;
        current += 1;
    }
}

fn cells_where(board: &Board, pred: impl Fn(&Symbol) -> bool) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for (reel, col) in board.reels.iter().enumerate() {
        for (row, symbol) in col.iter().enumerate() {
            if pred(symbol) {
                out.push((reel, row));
            }
        }
    }
    out
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.random_range(0..items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria;
    use crate::reels::ReelSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn test_config() -> GameConfig {
        let csv = "H1,H2,H3,H4,H5\n\
                   L1,L2,L3,L4,H1\n\
                   H2,H3,H4,H5,L1\n\
                   L2,L3,L4,H1,H2\n\
                   H3,H4,H5,L1,L2\n\
                   FS,FS,FS,FS,FS\n\
                   W,VS,O,W,VS\n\
                   L3,L4,H1,H2,H3\n";
        let mut sets = HashMap::new();
        sets.insert(
            "BR0".to_string(),
            ReelSet::parse_csv("BR0", csv, 5).unwrap(),
        );
        sets.insert(
            "FR0".to_string(),
            ReelSet::parse_csv("FR0", csv, 5).unwrap(),
        );
        GameConfig::duel_at_dawn(sets).unwrap()
    }

    #[test]
    fn draw_produces_full_window_with_padding() {
        let config = test_config();
        let criterion = criteria::basegame();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let board = draw_board(&config, &criterion, GameType::Base, &mut rng).unwrap();
        assert_eq!(board.num_reels(), 5);
        for reel in 0..5 {
            assert_eq!(board.rows(reel), 5);
        }
        assert_eq!(board.padding_top.len(), 5);
        assert_eq!(board.padding_bottom.len(), 5);
        assert_eq!(board.reveal()[0].len(), 7);
        assert_eq!(board.row_offset(), 1);
    }

    #[test]
    fn padding_not_counted_as_scatter() {
        let config = test_config();
        let criterion = criteria::basegame();
        // A draw where the padding row could be FS must not leak into the
        // visible count: count only what the window holds.
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let board = draw_board(&config, &criterion, GameType::Base, &mut rng).unwrap();
        let visible: u8 = board
            .reels
            .iter()
            .flatten()
            .filter(|s| s.is_fs_scatter())
            .count() as u8;
        assert_eq!(board.scatter_count(), visible);
    }

    #[test]
    fn forced_scatter_count_is_exact() {
        let config = test_config();
        let criterion = criteria::basegame();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for target in [0u8, 3, 4, 5] {
            let mut board = draw_board(&config, &criterion, GameType::Base, &mut rng).unwrap();
            force_scatter_count(&mut board, target, &mut rng);
            assert_eq!(board.scatter_count(), target);
        }
    }

    #[test]
    fn anticipation_starts_after_threshold() {
        let config = test_config();
        let criterion = criteria::basegame();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut board = draw_board(&config, &criterion, GameType::Base, &mut rng).unwrap();
        // Two scatters on reels 0 and 1: reels 2..4 anticipate
        for (reel, col) in board.reels.iter_mut().enumerate() {
            for cell in col.iter_mut() {
                *cell = Symbol::Pay(PaySymbol::L1);
            }
            if reel < 2 {
                col[0] = Symbol::FsScatter;
            }
        }
        assert_eq!(board.anticipation_reels(2), vec![2, 3, 4]);
        // One scatter only: nothing anticipates
        board.reels[1][0] = Symbol::Pay(PaySymbol::L1);
        assert!(board.anticipation_reels(2).is_empty());
    }

    #[test]
    fn free_mode_uses_variant_reel_set() {
        let config = test_config();
        let criterion = criteria::freegame_www();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // FR0 exists but FR1 does not: DuskTilDawn would fail, WildWildWest draws
        let board = draw_board(&config, &criterion, GameType::Free, &mut rng).unwrap();
        assert_eq!(board.num_reels(), 5);

        let dtd = criteria::freegame_dtd();
        let err = draw_board(&config, &dtd, GameType::Free, &mut rng).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::UnknownReelSet(_)));
    }
}

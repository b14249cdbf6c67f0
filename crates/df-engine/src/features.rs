//! Feature resolution: duel reels, outlaw showers, expanding wilds
//!
//! The resolver runs over each drawn board in a fixed order: duel symbols
//! first, outlaw symbols second, expanding-wild persistence last. Later
//! stages must see already-converted reels to exclude them from further
//! randomness; reversing the order changes payout-relevant state.

use df_book::{Book, Event, ExpandingWildInfo, ShotWild};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::criteria::Criterion;
use crate::error::EngineResult;
use crate::symbols::Symbol;

/// A reel converted to a full wild column that persists across free-spin
/// draws, re-rolling only its multiplier each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandingWild {
    pub reel: usize,
    pub row: usize,
    pub mult: u32,
}

impl ExpandingWild {
    fn info(&self, row_offset: usize) -> ExpandingWildInfo {
        ExpandingWildInfo {
            reel: self.reel,
            row: self.row + row_offset,
            mult: self.mult,
        }
    }
}

/// Per-run feature state: which reels are converted, which are still
/// eligible for new wild assignment, and the live expanding wilds.
///
/// All of it lives for the whole free-spin run: a reel duel-converted in an
/// earlier spin stays excluded from later showers and wild assignment.
///
/// Invariant: a reel index appears in at most one of `duel_reels`,
/// `outlaw_reels`, or `available_reels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureState {
    pub duel_reels: Vec<usize>,
    pub outlaw_reels: Vec<usize>,
    pub expanding_wilds: Vec<ExpandingWild>,
    pub available_reels: Vec<usize>,
}

impl FeatureState {
    pub fn new(num_reels: usize) -> Self {
        Self {
            duel_reels: Vec::new(),
            outlaw_reels: Vec::new(),
            expanding_wilds: Vec::new(),
            available_reels: (0..num_reels).collect(),
        }
    }

    pub fn is_converted(&self, reel: usize) -> bool {
        self.duel_reels.contains(&reel) || self.outlaw_reels.contains(&reel)
    }

    fn claim(&mut self, reel: usize) {
        self.available_reels.retain(|&r| r != reel);
    }
}

/// Resolve every duel (VS) symbol on the board: convert its reel to wilds at
/// the symbol's pre-assigned multiplier. Emits one `vsDuel` event per
/// converted reel.
pub fn resolve_duels(board: &mut Board, state: &mut FeatureState, book: &mut Book) {
    for reel in 0..board.num_reels() {
        let Some(duel_multiplier) = board.reels[reel]
            .iter()
            .find_map(|s| match s {
                Symbol::Duel { duel_multiplier } => Some(*duel_multiplier),
                _ => None,
            })
        else {
            continue;
        };

        board.convert_reel_to_wilds(reel, duel_multiplier);
        if !state.duel_reels.contains(&reel) {
            state.duel_reels.push(reel);
            state.claim(reel);
        }
        book.record(Event::VsDuel {
            reel,
            multiplier: duel_multiplier,
        });
    }
}

/// Resolve every outlaw symbol: convert its reel to 1x wilds, then shower
/// the symbol's pre-assigned wild count onto cells not on any converted
/// reel. Runs after duel resolution so the shower sees post-duel state.
pub fn resolve_outlaws<R: Rng + ?Sized>(
    board: &mut Board,
    state: &mut FeatureState,
    book: &mut Book,
    rng: &mut R,
) -> EngineResult<()> {
    for reel in 0..board.num_reels() {
        let Some((num_wilds, shot_table)) = board.reels[reel]
            .iter()
            .find_map(|s| match s {
                Symbol::Outlaw {
                    num_wilds,
                    shot_table,
                } => Some((*num_wilds, shot_table.clone())),
                _ => None,
            })
        else {
            continue;
        };

        board.convert_reel_to_wilds(reel, 1);
        if !state.outlaw_reels.contains(&reel) {
            state.outlaw_reels.push(reel);
            state.claim(reel);
        }

        // Free cells: anywhere not on an already-converted reel
        let mut free_cells = Vec::new();
        for r in 0..board.num_reels() {
            if state.is_converted(r) {
                continue;
            }
            for row in 0..board.rows(r) {
                free_cells.push((r, row));
            }
        }

        // Documented degradation: place on all remaining cells if short
        let to_place = (num_wilds as usize).min(free_cells.len());
        if to_place < num_wilds as usize {
            book.record(Event::OutlawShortfall {
                requested: num_wilds,
                placed: to_place as u32,
            });
        }

        let offset = board.row_offset();
        let mut shot_wilds = Vec::with_capacity(to_place);
        for _ in 0..to_place {
            let idx = rng.random_range(0..free_cells.len());
            let (r, row) = free_cells.swap_remove(idx);
            let multiplier = shot_table.sample_copied(rng)?;
            board.reels[r][row] = Symbol::Wild { multiplier };
            shot_wilds.push(ShotWild {
                reel: r,
                row: row + offset,
                multiplier,
            });
        }

        book.record(Event::OutlawFeature {
            reel,
            num_wilds,
            shot_wilds,
        });
    }
    Ok(())
}

/// Assign up to `max_new` new expanding wilds onto reels still in the
/// eligible pool. Each chosen reel leaves the pool and becomes an expanding
/// wild record for the rest of the run. Free-spin runs only.
pub fn assign_new_wilds<R: Rng + ?Sized>(
    board: &mut Board,
    state: &mut FeatureState,
    criterion: &Criterion,
    max_new: u32,
    rng: &mut R,
) -> EngineResult<Vec<ExpandingWild>> {
    let mut new_wilds = Vec::new();
    for _ in 0..max_new {
        if state.available_reels.is_empty() {
            break;
        }
        let pick = rng.random_range(0..state.available_reels.len());
        let reel = state.available_reels.remove(pick);
        let row = rng.random_range(0..board.rows(reel));
        let mult = criterion.duel_mults.sample_copied(rng)?;

        board.reels[reel][row] = Symbol::Wild { multiplier: mult };
        new_wilds.push(ExpandingWild { reel, row, mult });
    }
    Ok(new_wilds)
}

/// Re-apply every recorded expanding wild to the freshly drawn board,
/// re-rolling only the multiplier from the run's table and overwriting the
/// whole column.
pub fn update_with_existing_wilds<R: Rng + ?Sized>(
    board: &mut Board,
    state: &mut FeatureState,
    criterion: &Criterion,
    rng: &mut R,
) -> EngineResult<()> {
    for wild in &mut state.expanding_wilds {
        let mult = criterion.duel_mults.sample_copied(rng)?;
        wild.mult = mult;
        board.convert_reel_to_wilds(wild.reel, mult);
    }
    Ok(())
}

/// Fold freshly assigned wilds into the run state and emit the book events,
/// existing-wild updates before new-wild announcements.
pub fn record_expanding_wilds(
    state: &mut FeatureState,
    new_wilds: Vec<ExpandingWild>,
    row_offset: usize,
    book: &mut Book,
) {
    if !state.expanding_wilds.is_empty() {
        let existing_wilds = state
            .expanding_wilds
            .iter()
            .map(|w| w.info(row_offset))
            .collect();
        book.record(Event::UpdateExpandingWilds { existing_wilds });
    }
    if !new_wilds.is_empty() {
        book.record(Event::NewExpandingWilds {
            new_wilds: new_wilds.iter().map(|w| w.info(row_offset)).collect(),
        });
        state.expanding_wilds.extend(new_wilds);
        state.expanding_wilds.sort_by_key(|w| w.reel);
    }
}

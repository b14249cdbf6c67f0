//! Event: the canonical record types appended to a book
//!
//! An event is NOT engine state. It is the SEMANTIC MEANING of a moment in
//! the spin: a board reveal, a duel reel converting, a shower of wilds, a
//! free-spin counter update. Field names and the tag vocabulary are the wire
//! format consumed by frontends and analytics, so they stay camelCase.

use serde::{Deserialize, Serialize};

/// A symbol as it appears in a reveal payload.
///
/// Only wild symbols carry a multiplier; every other kind serializes as a
/// bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSymbol {
    /// Kind tag ("W", "VS", "O", "FS", "H1".."H5", "L1".."L4")
    pub name: String,
    /// Attached multiplier (wilds only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
}

impl RevealSymbol {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiplier: None,
        }
    }

    pub fn wild(multiplier: u32) -> Self {
        Self {
            name: "W".into(),
            multiplier: Some(multiplier),
        }
    }
}

/// A wild placed by the outlaw shower.
///
/// Rows are padding-adjusted at emission time: with draw padding enabled the
/// visible window starts at row 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotWild {
    pub reel: usize,
    pub row: usize,
    pub multiplier: u32,
}

/// An expanding wild column, as reported in book events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandingWildInfo {
    pub reel: usize,
    pub row: usize,
    pub mult: u32,
}

/// Per-line win detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWinInfo {
    /// Payline number (1-based, per the game sheet)
    pub line: u8,
    /// Winning symbol tag
    pub symbol: String,
    /// Matched symbol count (3..=5)
    pub kind: u8,
    /// Win amount in bet multiples, after multipliers
    pub win: f64,
    /// Winning positions as (reel, row), padding-adjusted
    pub positions: Vec<(usize, usize)>,
    /// Combined wild multiplier applied to this line (1 when no wilds)
    pub multiplier: u32,
}

/// Canonical spin event, the universal language of the book format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// Board reveal: full drawn window (padding rows included when enabled)
    #[serde(rename_all = "camelCase")]
    Reveal {
        /// One column per reel, rows top to bottom
        board: Vec<Vec<RevealSymbol>>,
        /// "basegame" or "freegame"
        game_type: String,
        /// Reels that stop under anticipation
        anticipation: Vec<usize>,
        /// Padding rows present above/below the visible window
        padding: bool,
    },

    /// A duel (VS) symbol converted its reel to multiplier wilds
    #[serde(rename_all = "camelCase")]
    VsDuel { reel: usize, multiplier: u32 },

    /// An outlaw symbol converted its reel and showered wilds
    #[serde(rename_all = "camelCase")]
    OutlawFeature {
        reel: usize,
        num_wilds: u32,
        shot_wilds: Vec<ShotWild>,
    },

    /// The outlaw shower found fewer free cells than wilds to place.
    /// Documented degradation, not a failure.
    #[serde(rename_all = "camelCase")]
    OutlawShortfall { requested: u32, placed: u32 },

    /// Free-game variant declared for a triggered run
    #[serde(rename_all = "camelCase")]
    FreegameMode { mode: String },

    /// Expanding wilds created this free spin
    #[serde(rename_all = "camelCase")]
    NewExpandingWilds { new_wilds: Vec<ExpandingWildInfo> },

    /// Existing expanding wilds re-applied with re-rolled multipliers
    #[serde(rename_all = "camelCase")]
    UpdateExpandingWilds {
        existing_wilds: Vec<ExpandingWildInfo>,
    },

    /// A single payline win
    WinInfo(LineWinInfo),

    /// Win amount for the current board
    #[serde(rename_all = "camelCase")]
    SetWin { amount: f64 },

    /// Running total across the spin (base + free game so far)
    #[serde(rename_all = "camelCase")]
    SetTotalWin { amount: f64 },

    /// Free-spin run entered (or retriggered) by scatters
    #[serde(rename_all = "camelCase")]
    FreeSpinTrigger {
        scatter_count: u8,
        total_spins: u32,
        mode: String,
    },

    /// Free-spin counter update at the start of each iteration
    #[serde(rename_all = "camelCase")]
    UpdateFreeSpin { current: u32, total: u32 },

    /// Free-spin run ended, with its accumulated win
    #[serde(rename_all = "camelCase")]
    FreeSpinEnd { win: f64 },

    /// Accumulated win reached the configured cap; remaining spins abandoned
    #[serde(rename_all = "camelCase")]
    WinCap { amount: f64 },

    /// Final accepted win for the whole spin
    #[serde(rename_all = "camelCase")]
    FinalWin { amount: f64 },
}

impl Event {
    /// Stable tag name, as serialized
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Reveal { .. } => "reveal",
            Event::VsDuel { .. } => "vsDuel",
            Event::OutlawFeature { .. } => "outlawFeature",
            Event::OutlawShortfall { .. } => "outlawShortfall",
            Event::FreegameMode { .. } => "freegameMode",
            Event::NewExpandingWilds { .. } => "newExpandingWilds",
            Event::UpdateExpandingWilds { .. } => "updateExpandingWilds",
            Event::WinInfo(_) => "winInfo",
            Event::SetWin { .. } => "setWin",
            Event::SetTotalWin { .. } => "setTotalWin",
            Event::FreeSpinTrigger { .. } => "freeSpinTrigger",
            Event::UpdateFreeSpin { .. } => "updateFreeSpin",
            Event::FreeSpinEnd { .. } => "freeSpinEnd",
            Event::WinCap { .. } => "winCap",
            Event::FinalWin { .. } => "finalWin",
        }
    }
}

//! Symbol model
//!
//! Symbols are a tagged union: each kind carries exactly its own typed
//! attributes, assigned once at creation time. A symbol is immutable
//! afterwards; feature resolution replaces symbols wholesale (a duel symbol
//! becomes a wild, it is never edited in place).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::sampler::WeightedTable;

/// Paying symbol kinds (highs H1..H5, lows L1..L4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaySymbol {
    H1,
    H2,
    H3,
    H4,
    H5,
    L1,
    L2,
    L3,
    L4,
}

impl PaySymbol {
    pub const ALL: [PaySymbol; 9] = [
        PaySymbol::H1,
        PaySymbol::H2,
        PaySymbol::H3,
        PaySymbol::H4,
        PaySymbol::H5,
        PaySymbol::L1,
        PaySymbol::L2,
        PaySymbol::L3,
        PaySymbol::L4,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            PaySymbol::H1 => "H1",
            PaySymbol::H2 => "H2",
            PaySymbol::H3 => "H3",
            PaySymbol::H4 => "H4",
            PaySymbol::H5 => "H5",
            PaySymbol::L1 => "L1",
            PaySymbol::L2 => "L2",
            PaySymbol::L3 => "L3",
            PaySymbol::L4 => "L4",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.tag() == tag)
    }
}

/// A board symbol.
///
/// `Duel` and `Outlaw` carry their feature attributes pre-assigned at draw
/// time; the resolver consumes them when converting reels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    /// Wild, substitutes for any paying symbol
    Wild { multiplier: u32 },
    /// Duel (VS) symbol: converts its reel to wilds at `duel_multiplier`
    Duel { duel_multiplier: u32 },
    /// Outlaw symbol: converts its reel and showers `num_wilds` extra wilds,
    /// each drawing its multiplier from `shot_table`
    Outlaw {
        num_wilds: u32,
        shot_table: WeightedTable<u32>,
    },
    /// Free-spin scatter (trigger symbol)
    FsScatter,
    /// Regular paying symbol
    Pay(PaySymbol),
}

impl Symbol {
    pub fn is_wild(&self) -> bool {
        matches!(self, Symbol::Wild { .. })
    }

    pub fn is_fs_scatter(&self) -> bool {
        matches!(self, Symbol::FsScatter)
    }

    /// Wild multiplier, if this is a wild.
    pub fn wild_multiplier(&self) -> Option<u32> {
        match self {
            Symbol::Wild { multiplier } => Some(*multiplier),
            _ => None,
        }
    }

    /// Kind tag as used in reel strips and reveal events.
    pub fn tag(&self) -> &'static str {
        match self {
            Symbol::Wild { .. } => "W",
            Symbol::Duel { .. } => "VS",
            Symbol::Outlaw { .. } => "O",
            Symbol::FsScatter => "FS",
            Symbol::Pay(p) => p.tag(),
        }
    }
}

/// A symbol kind as stored on a reel strip, before attribute assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Wild,
    Duel,
    Outlaw,
    FsScatter,
    Pay(PaySymbol),
}

impl SymbolKind {
    /// Parse a strip cell tag. Unknown tags are a configuration error.
    pub fn from_tag(tag: &str) -> EngineResult<Self> {
        match tag {
            "W" => Ok(SymbolKind::Wild),
            "VS" => Ok(SymbolKind::Duel),
            "O" => Ok(SymbolKind::Outlaw),
            "FS" => Ok(SymbolKind::FsScatter),
            other => PaySymbol::from_tag(other)
                .map(SymbolKind::Pay)
                .ok_or_else(|| EngineError::UnknownSymbol(other.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SymbolKind::Wild => "W",
            SymbolKind::Duel => "VS",
            SymbolKind::Outlaw => "O",
            SymbolKind::FsScatter => "FS",
            SymbolKind::Pay(p) => p.tag(),
        }
    }
}

//! Reel strips and reel sets
//!
//! Reel sets arrive as CSV text: one row per strip position, one column per
//! reel, each cell a symbol kind tag. Strips are parsed once at configuration
//! time; a malformed strip is fatal before any spin runs.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::symbols::SymbolKind;

/// One reel's strip: an ordered, wrapping sequence of symbol kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStrip {
    pub reel_index: usize,
    symbols: Vec<SymbolKind>,
}

impl ReelStrip {
    pub fn new(reel_index: usize, symbols: Vec<SymbolKind>) -> Self {
        Self {
            reel_index,
            symbols,
        }
    }

    /// Kind at a position, wrapping around the strip end.
    pub fn kind_at(&self, position: usize) -> SymbolKind {
        self.symbols[position % self.symbols.len()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Count of one kind on the strip (used by reachability checks in tests).
    pub fn count_of(&self, kind: SymbolKind) -> usize {
        self.symbols.iter().filter(|k| **k == kind).count()
    }
}

/// A named set of strips, one per reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelSet {
    pub name: String,
    pub strips: Vec<ReelStrip>,
}

impl ReelSet {
    /// Parse CSV text into a reel set.
    ///
    /// Every row must have `num_reels` cells; rows are strip positions top to
    /// bottom. Blank lines are skipped.
    pub fn parse_csv(name: &str, csv: &str, num_reels: usize) -> EngineResult<Self> {
        let mut columns: Vec<Vec<SymbolKind>> = vec![Vec::new(); num_reels];

        for (line_no, line) in csv.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() != num_reels {
                return Err(EngineError::MalformedReelSet {
                    name: name.to_string(),
                    reason: format!(
                        "row {} has {} cells, expected {}",
                        line_no + 1,
                        cells.len(),
                        num_reels
                    ),
                });
            }
            for (reel, cell) in cells.iter().enumerate() {
                columns[reel].push(SymbolKind::from_tag(cell)?);
            }
        }

        let set = Self {
            name: name.to_string(),
            strips: columns
                .into_iter()
                .enumerate()
                .map(|(i, symbols)| ReelStrip::new(i, symbols))
                .collect(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Build a set from per-reel kind sequences (used by tests and presets).
    pub fn from_columns(name: &str, columns: Vec<Vec<SymbolKind>>) -> EngineResult<Self> {
        let set = Self {
            name: name.to_string(),
            strips: columns
                .into_iter()
                .enumerate()
                .map(|(i, symbols)| ReelStrip::new(i, symbols))
                .collect(),
        };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.strips.is_empty() {
            return Err(EngineError::MalformedReelSet {
                name: self.name.clone(),
                reason: "no reels".to_string(),
            });
        }
        for strip in &self.strips {
            if strip.is_empty() {
                return Err(EngineError::MalformedReelSet {
                    name: self.name.clone(),
                    reason: format!("reel {} strip is empty", strip.reel_index),
                });
            }
        }
        Ok(())
    }

    pub fn num_reels(&self) -> usize {
        self.strips.len()
    }

    /// Whether any strip carries the given kind.
    pub fn contains_kind(&self, kind: SymbolKind) -> bool {
        self.strips.iter().any(|s| s.count_of(kind) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::PaySymbol;

    #[test]
    fn parse_csv_columns_by_reel() {
        let csv = "H1,H2,H3,H4,H5\nL1,L2,L3,L4,W\nFS,VS,O,H1,H2\n";
        let set = ReelSet::parse_csv("BR0", csv, 5).unwrap();
        assert_eq!(set.num_reels(), 5);
        assert_eq!(set.strips[0].len(), 3);
        assert_eq!(set.strips[0].kind_at(0), SymbolKind::Pay(PaySymbol::H1));
        assert_eq!(set.strips[0].kind_at(2), SymbolKind::FsScatter);
        assert_eq!(set.strips[1].kind_at(2), SymbolKind::Duel);
        // Wraps past the end
        assert_eq!(set.strips[0].kind_at(3), SymbolKind::Pay(PaySymbol::H1));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let err = ReelSet::parse_csv("BR0", "H1,H2\n", 5).unwrap_err();
        assert!(matches!(err, EngineError::MalformedReelSet { .. }));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = ReelSet::parse_csv("BR0", "H1,H2,H3,H4,Q9\n", 5).unwrap_err();
        assert!(matches!(err, EngineError::UnknownSymbol(_)));
    }

    #[test]
    fn contains_kind_reports_reachability() {
        let csv = "H1,H2,H3,H4,H5\n";
        let set = ReelSet::parse_csv("BR0", csv, 5).unwrap();
        assert!(!set.contains_kind(SymbolKind::FsScatter));
        assert!(set.contains_kind(SymbolKind::Pay(PaySymbol::H3)));
    }
}

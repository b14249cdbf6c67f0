//! Payline evaluation
//!
//! A pure function over a finished board: no state, no RNG. Wilds substitute
//! for any paying symbol and also pay on their own line; each line scores the
//! better of the two readings. Wild multipliers on the counted positions sum
//! into the line multiplier.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::symbols::Symbol;

/// One winning payline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline number (1-based, per the game sheet)
    pub line: u8,
    /// Winning symbol tag ("W" for a pure wild line)
    pub symbol: String,
    /// Matched count (3..=5)
    pub count: u8,
    /// Combined wild multiplier (1 when no wilds)
    pub multiplier: u32,
    /// Win in bet multiples, multipliers applied
    pub win: f64,
    /// Winning cells as (reel, row) in window coordinates
    pub positions: Vec<(usize, usize)>,
}

/// Evaluation result for one board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub total_win: f64,
    pub wins: Vec<LineWin>,
}

impl LineResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}

/// Evaluate every configured payline against the visible window.
pub fn evaluate(board: &Board, config: &GameConfig, global_multiplier: u32) -> LineResult {
    let mut result = LineResult::default();

    for payline in &config.paylines {
        let cells: Vec<&Symbol> = payline
            .positions
            .iter()
            .enumerate()
            .map(|(reel, &row)| &board.reels[reel][row])
            .collect();

        let Some(win) = score_line(payline.index, &payline.positions, &cells, config) else {
            continue;
        };
        let mut win = win;
        win.win *= f64::from(global_multiplier.max(1));
        result.total_win += win.win;
        result.wins.push(win);
    }

    result
}

fn score_line(
    line: u8,
    rows: &[usize],
    cells: &[&Symbol],
    config: &GameConfig,
) -> Option<LineWin> {
    let wild_prefix = cells.iter().take_while(|s| s.is_wild()).count();

    // Reading 1: the leading wilds pay as their own symbol.
    let wild_candidate = candidate(line, rows, cells, "W", wild_prefix, |count| {
        config.paytable.wild_pay(count)
    });

    // Reading 2: wilds substitute for the first paying symbol after them.
    let pay_candidate = match cells.get(wild_prefix) {
        Some(Symbol::Pay(target)) => {
            let target = *target;
            let count = wild_prefix
                + cells[wild_prefix..]
                    .iter()
                    .take_while(|s| s.is_wild() || ***s == Symbol::Pay(target))
                    .count();
            candidate(line, rows, cells, target.tag(), count, |count| {
                config.paytable.pay(target, count)
            })
        }
        _ => None,
    };

    match (wild_candidate, pay_candidate) {
        (Some(a), Some(b)) => Some(if a.win >= b.win { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn candidate(
    line: u8,
    rows: &[usize],
    cells: &[&Symbol],
    symbol: &str,
    count: usize,
    pay: impl Fn(u8) -> f64,
) -> Option<LineWin> {
    let base = pay(count as u8);
    if base <= 0.0 {
        return None;
    }
    let multiplier: u32 = cells[..count]
        .iter()
        .filter_map(|s| s.wild_multiplier())
        .sum::<u32>()
        .max(1);
    Some(LineWin {
        line,
        symbol: symbol.to_string(),
        count: count as u8,
        multiplier,
        win: base * f64::from(multiplier),
        positions: (0..count).map(|reel| (reel, rows[reel])).collect(),
    })
}

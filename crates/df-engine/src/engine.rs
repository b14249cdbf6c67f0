//! Rejection-sampling engine
//!
//! One `GameEngine` per configuration. `run_one` plays complete spins on
//! derived RNG streams until an attempt satisfies the criterion, then returns
//! its book. Attempts are isolated: each gets a fresh RNG, fresh feature
//! state, and a fresh book, so a rejected attempt leaves nothing behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use df_book::{Book, Event, LineWinInfo};
use log::{debug, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{self, Board};
use crate::config::{GameConfig, GameType};
use crate::criteria::{Criterion, RetryBounds};
use crate::error::{EngineError, EngineResult};
use crate::features::{self, FeatureState};
use crate::freespins::FreeSpinRun;
use crate::lines::{self, LineResult};

/// Multiplicative stream constant (splitmix64 increment); keeps per-attempt
/// seeds decorrelated without coordinating stream ids.
const ATTEMPT_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// The spin engine for one game configuration.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    bounds: RetryBounds,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            bounds: RetryBounds::default(),
        }
    }

    pub fn with_bounds(config: GameConfig, bounds: RetryBounds) -> Self {
        Self { config, bounds }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bounds(&self) -> RetryBounds {
        self.bounds
    }

    /// Run the rejection loop for one logical spin.
    ///
    /// Deterministic in `(seed, criterion)`: attempt `n` plays on the RNG
    /// stream derived from `seed` and `n`, so identical inputs reproduce the
    /// identical book.
    pub fn run_one(&self, id: u64, seed: u64, criterion: &Criterion) -> EngineResult<Book> {
        static NEVER: AtomicBool = AtomicBool::new(false);
        self.run_one_with_cancel(id, seed, criterion, &NEVER)
    }

    /// `run_one` with a cooperative cancellation flag, checked between
    /// attempts. Batch runners share one flag across workers.
    pub fn run_one_with_cancel(
        &self,
        id: u64,
        seed: u64,
        criterion: &Criterion,
        cancel: &AtomicBool,
    ) -> EngineResult<Book> {
        criterion.validate()?;
        let started = Instant::now();

        for attempt in 0..self.bounds.max_attempts {
            if cancel.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
            if let Some(timeout) = self.bounds.timeout {
                if started.elapsed() >= timeout {
                    warn!(
                        "criterion {:?} timed out after {} attempts",
                        criterion.name, attempt
                    );
                    return Err(EngineError::CriterionUnreachable {
                        criterion: criterion.name.clone(),
                        attempts: attempt,
                    });
                }
            }

            let attempt_seed =
                seed.wrapping_add(u64::from(attempt).wrapping_mul(ATTEMPT_STREAM));
            let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed);

            let mut book = self.play_attempt(id, criterion, &mut rng)?;
            if self.accepts(criterion, &book) {
                book.accepted_attempt = attempt;
                debug!(
                    "book {} accepted for {:?} on attempt {} (win {})",
                    id, criterion.name, attempt, book.final_win
                );
                return Ok(book);
            }
            trace!(
                "book {} rejected for {:?}: attempt {} won {}",
                id, criterion.name, attempt, book.final_win
            );
        }

        warn!(
            "criterion {:?} unreachable within {} attempts",
            criterion.name, self.bounds.max_attempts
        );
        Err(EngineError::CriterionUnreachable {
            criterion: criterion.name.clone(),
            attempts: self.bounds.max_attempts,
        })
    }

    /// Does a finished attempt satisfy the criterion? Win targets are exact:
    /// the sampled distribution is discrete, so no tolerance is applied.
    fn accepts(&self, criterion: &Criterion, book: &Book) -> bool {
        if criterion.force_freegame && !book.triggered_freegame {
            return false;
        }
        if let Some(target) = criterion.win_target {
            if book.final_win != target {
                return false;
            }
        }
        true
    }

    /// Play one complete spin: base board, features, optional free-spin run.
    fn play_attempt(
        &self,
        id: u64,
        criterion: &Criterion,
        rng: &mut ChaCha8Rng,
    ) -> EngineResult<Book> {
        let mut book = Book::new(id, criterion.name.clone());
        let mut total_win = 0.0f64;

        let mut board = board::draw_board(&self.config, criterion, GameType::Base, rng)?;
        if let Some(force) = &criterion.scatter_force {
            let count = force.sample_copied(rng)?;
            board::force_scatter_count(&mut board, count, rng);
        }
        self.reveal(&board, GameType::Base, &mut book);

        let mut state = FeatureState::new(self.config.num_reels);
        features::resolve_duels(&mut board, &mut state, &mut book);
        features::resolve_outlaws(&mut board, &mut state, &mut book, rng)?;

        let result = lines::evaluate(&board, &self.config, 1);
        record_line_wins(&mut book, &board, &result);
        book.base_game_win = result.total_win;
        book.record(Event::SetWin {
            amount: result.total_win,
        });
        let capped = self.accumulate(&mut total_win, result.total_win, &mut book);

        let scatters = board.scatter_count();
        if !capped {
            if let Some(spins) = self.config.spins_for_scatters(GameType::Base, scatters) {
                book.triggered_freegame = true;
                book.record(Event::FreeSpinTrigger {
                    scatter_count: scatters,
                    total_spins: spins,
                    mode: criterion.variant.mode_str().to_string(),
                });
                book.record(Event::FreegameMode {
                    mode: criterion.variant.mode_str().to_string(),
                });
                self.play_free_run(criterion, spins, &mut total_win, &mut book, rng)?;
            }
        }

        book.final_win = total_win;
        book.record(Event::FinalWin { amount: total_win });
        Ok(book)
    }

    /// Play a triggered free-spin run to exhaustion or the win cap.
    fn play_free_run(
        &self,
        criterion: &Criterion,
        spins: u32,
        total_win: &mut f64,
        book: &mut Book,
        rng: &mut ChaCha8Rng,
    ) -> EngineResult<()> {
        let mut run = FreeSpinRun::new(criterion.variant);
        run.start(spins);
        let mut state = FeatureState::new(self.config.num_reels);
        let mut free_win = 0.0f64;

        while let Some((current, total)) = run.begin_spin() {
            book.record(Event::UpdateFreeSpin { current, total });

            let mut board =
                board::draw_board(&self.config, criterion, GameType::Free, rng)?;
            self.reveal(&board, GameType::Free, book);

            features::resolve_duels(&mut board, &mut state, book);
            features::resolve_outlaws(&mut board, &mut state, book, rng)?;
            let max_new = criterion.landing_wilds.sample_copied(rng)?;
            let new_wilds =
                features::assign_new_wilds(&mut board, &mut state, criterion, max_new, rng)?;
            features::update_with_existing_wilds(&mut board, &mut state, criterion, rng)?;
            features::record_expanding_wilds(&mut state, new_wilds, board.row_offset(), book);

            let result = lines::evaluate(&board, &self.config, 1);
            record_line_wins(book, &board, &result);
            free_win += result.total_win;
            book.record(Event::SetWin {
                amount: result.total_win,
            });
            if self.accumulate(total_win, result.total_win, book) {
                // Cap reached: the free game keeps only what fits under it
                free_win = self.config.wincap - book.base_game_win;
                run.end();
                break;
            }

            let scatters = board.scatter_count();
            if let Some(extra) = self.config.spins_for_scatters(GameType::Free, scatters) {
                run.retrigger(extra);
                book.record(Event::FreeSpinTrigger {
                    scatter_count: scatters,
                    total_spins: run.total,
                    mode: criterion.variant.mode_str().to_string(),
                });
            }
        }

        run.end();
        book.free_game_win = free_win;
        book.record(Event::FreeSpinEnd { win: free_win });
        Ok(())
    }

    /// Add a spin win into the running total, clamping at the cap. Returns
    /// true when the cap was hit (the spin sequence must stop).
    fn accumulate(&self, total_win: &mut f64, spin_win: f64, book: &mut Book) -> bool {
        *total_win += spin_win;
        if *total_win >= self.config.wincap {
            *total_win = self.config.wincap;
            book.wincap_hit = true;
            book.record(Event::SetTotalWin { amount: *total_win });
            book.record(Event::WinCap { amount: *total_win });
            true
        } else {
            book.record(Event::SetTotalWin { amount: *total_win });
            false
        }
    }

    fn reveal(&self, board: &Board, game_type: GameType, book: &mut Book) {
        let anticipation = board.anticipation_reels(self.config.anticipation(game_type));
        book.record(Event::Reveal {
            board: board.reveal(),
            game_type: game_type.as_str().to_string(),
            anticipation,
            padding: board.include_padding,
        });
    }
}

/// Record one winInfo event per winning line, rows padding-adjusted.
fn record_line_wins(book: &mut Book, board: &Board, result: &LineResult) {
    let offset = board.row_offset();
    for win in &result.wins {
        book.record(Event::WinInfo(LineWinInfo {
            line: win.line,
            symbol: win.symbol.clone(),
            kind: win.count,
            win: win.win,
            positions: win
                .positions
                .iter()
                .map(|&(reel, row)| (reel, row + offset))
                .collect(),
            multiplier: win.multiplier,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria;
    use crate::reels::ReelSet;
    use crate::symbols::{PaySymbol, SymbolKind};
    use std::collections::HashMap;

    /// One distinct pay symbol per reel: no line can ever connect.
    fn dead_sets() -> HashMap<String, ReelSet> {
        let symbols = [
            PaySymbol::L1,
            PaySymbol::L2,
            PaySymbol::L3,
            PaySymbol::L4,
            PaySymbol::H5,
        ];
        let columns: Vec<Vec<SymbolKind>> = symbols
            .iter()
            .map(|&s| vec![SymbolKind::Pay(s); 24])
            .collect();
        let mut sets = HashMap::new();
        for name in ["BR0", "FR0", "FR1"] {
            sets.insert(
                name.to_string(),
                ReelSet::from_columns(name, columns.clone()).unwrap(),
            );
        }
        sets
    }

    fn dead_engine() -> GameEngine {
        GameEngine::new(GameConfig::duel_at_dawn(dead_sets()).unwrap())
    }

    #[test]
    fn unconstrained_criterion_accepts_first_attempt() {
        let engine = dead_engine();
        let book = engine.run_one(1, 99, &criteria::basegame()).unwrap();
        assert_eq!(book.accepted_attempt, 0);
        assert_eq!(book.criterion, "basegame");
        assert_eq!(book.events[0].event.type_name(), "reveal");
        assert_eq!(
            book.events.last().unwrap().event.type_name(),
            "finalWin"
        );
    }

    #[test]
    fn identical_inputs_reproduce_identical_books() {
        let engine = dead_engine();
        let criterion = criteria::freegame_www();
        let a = engine.run_one(7, 1234, &criterion).unwrap();
        let b = engine.run_one(7, 1234, &criterion).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn zero_win_criterion_yields_exact_zero() {
        let engine = dead_engine();
        let book = engine.run_one(2, 42, &criteria::zero_win()).unwrap();
        assert_eq!(book.final_win, 0.0);
        assert!(!book.triggered_freegame);
        assert!(!book.wincap_hit);
    }

    #[test]
    fn forced_scatters_enter_the_free_game() {
        let engine = dead_engine();
        let book = engine.run_one(3, 5, &criteria::freegame_www()).unwrap();
        assert!(book.triggered_freegame);
        assert_eq!(book.events_of("freegameMode").count(), 1);
        assert_eq!(book.events_of("freeSpinEnd").count(), 1);
        let Event::FreegameMode { mode } =
            &book.events_of("freegameMode").next().unwrap().event
        else {
            unreachable!()
        };
        assert_eq!(mode, "wild_wild_west");
        // 3 scatters award 10 spins; at least the first plays before any cap
        let updates = book.events_of("updateFreeSpin").count();
        assert!((1..=10).contains(&updates) || book.wincap_hit);
    }

    #[test]
    fn force_freegame_without_scatters_is_unreachable() {
        let config = GameConfig::duel_at_dawn(dead_sets()).unwrap();
        let engine = GameEngine::with_bounds(config, RetryBounds::attempts(20));
        let mut criterion = criteria::freegame_www();
        criterion.scatter_force = None;
        let err = engine.run_one(4, 9, &criterion).unwrap_err();
        assert!(matches!(
            err,
            EngineError::CriterionUnreachable { attempts: 20, .. }
        ));
    }

    #[test]
    fn win_cap_clamps_and_stops() {
        let column = vec![SymbolKind::Pay(PaySymbol::H1); 24];
        let mut sets = HashMap::new();
        for name in ["BR0", "FR0", "FR1"] {
            sets.insert(
                name.to_string(),
                ReelSet::from_columns(name, vec![column.clone(); 5]).unwrap(),
            );
        }
        let mut config = GameConfig::duel_at_dawn(sets).unwrap();
        config.wincap = 0.5;
        let engine = GameEngine::new(config);

        let book = engine.run_one(5, 77, &criteria::basegame()).unwrap();
        assert!(book.wincap_hit);
        assert_eq!(book.final_win, 0.5);
        assert_eq!(book.events_of("winCap").count(), 1);
        assert!(!book.triggered_freegame);
    }

    #[test]
    fn cancellation_stops_the_loop() {
        let engine = dead_engine();
        let mut criterion = criteria::freegame_www();
        criterion.scatter_force = None;
        let cancel = AtomicBool::new(true);
        let err = engine
            .run_one_with_cancel(6, 3, &criterion, &cancel)
            .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
    }

    #[test]
    fn set_win_precedes_set_total_win() {
        let engine = dead_engine();
        let book = engine.run_one(8, 21, &criteria::freegame_www()).unwrap();
        let order: Vec<&str> = book
            .events
            .iter()
            .map(|e| e.event.type_name())
            .filter(|t| matches!(*t, "setWin" | "setTotalWin"))
            .collect();
        assert!(order.chunks(2).all(|c| c == ["setWin", "setTotalWin"]));
    }
}

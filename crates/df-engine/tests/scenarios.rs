//! End-to-end spin scenarios over hand-built reel sets.

use std::collections::HashMap;

use df_book::Event;
use df_engine::{
    criteria, EngineError, GameConfig, GameEngine, PaySymbol, ReelSet, RetryBounds, SymbolKind,
};

/// One distinct pay symbol per reel: no payline can ever connect.
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

fn h1_sets() -> HashMap<String, ReelSet> {
    let column = vec![SymbolKind::Pay(PaySymbol::H1); 24];
    let mut sets = HashMap::new();
    for name in ["BR0", "FR0", "FR1"] {
        sets.insert(
            name.to_string(),
            ReelSet::from_columns(name, vec![column.clone(); 5]).unwrap(),
        );
    }
    sets
}

#[test]
fn flat_board_pays_every_line_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = GameEngine::new(GameConfig::duel_at_dawn(h1_sets()).unwrap());
    let book = engine.run_one(1, 11, &criteria::basegame()).unwrap();
    // 19 lines of 5-of-a-kind H1 at 50 apiece, no scatters, no features
    assert_eq!(book.final_win, 950.0);
    assert_eq!(book.base_game_win, 950.0);
    assert_eq!(book.events_of("winInfo").count(), 19);
    assert!(!book.triggered_freegame);
}

#[test]
fn win_info_rows_are_padding_adjusted() {
    let engine = GameEngine::new(GameConfig::duel_at_dawn(h1_sets()).unwrap());
    let book = engine.run_one(2, 11, &criteria::basegame()).unwrap();
    for event in book.events_of("winInfo") {
        let Event::WinInfo(info) = &event.event else {
            unreachable!()
        };
        // Window row 0 reports as row 1 when padding rows are drawn
        assert!(info.positions.iter().all(|&(_, row)| (1..=5).contains(&row)));
    }
}

#[test]
fn book_json_is_wire_shaped() {
    let engine = GameEngine::new(GameConfig::duel_at_dawn(dead_sets()).unwrap());
    let book = engine.run_one(3, 4, &criteria::freegame_www()).unwrap();
    let json = serde_json::to_value(&book).unwrap();

    assert!(json.get("finalWin").is_some());
    assert_eq!(json["triggeredFreegame"], true);
    let events = json["events"].as_array().unwrap();
    assert_eq!(events[0]["type"], "reveal");
    assert_eq!(events[0]["gameType"], "basegame");
    assert_eq!(events[0]["index"], 0);
    assert!(events
        .iter()
        .any(|e| e["type"] == "freegameMode" && e["mode"] == "wild_wild_west"));
    assert_eq!(events.last().unwrap()["type"], "finalWin");
}

#[test]
fn dusk_til_dawn_plays_its_own_reel_set() {
    let mut sets = dead_sets();
    // FR1 missing: the DTD run must fail on its variant set, proving it is
    // not silently playing FR0
    sets.remove("FR1");
    let config = GameConfig::duel_at_dawn(sets).unwrap();
    let engine = GameEngine::with_bounds(config, RetryBounds::attempts(3));
    let err = engine.run_one(4, 8, &criteria::freegame_dtd()).unwrap_err();
    assert!(matches!(err, EngineError::UnknownReelSet(_)));

    let engine = GameEngine::new(GameConfig::duel_at_dawn(dead_sets()).unwrap());
    let book = engine.run_one(5, 8, &criteria::freegame_dtd()).unwrap();
    let Event::FreegameMode { mode } = &book.events_of("freegameMode").next().unwrap().event
    else {
        unreachable!()
    };
    assert_eq!(mode, "dusk_til_dawn");
}

#[test]
fn wincap_hunt_is_bounded_when_impossible() {
    let engine = GameEngine::with_bounds(
        GameConfig::duel_at_dawn(dead_sets()).unwrap(),
        RetryBounds::attempts(25),
    );
    let err = engine
        .run_one(6, 13, &criteria::wincap_criterion(5000.0))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::CriterionUnreachable { attempts: 25, .. }
    ));
}

#[test]
fn win_cap_ends_a_free_run_early() {
    // Dead base reels, flat-paying free reels: every free spin wins 950
    // (19 lines of 5-of-a-kind H1), so a 100x cap trips on the first one.
    let mut sets = dead_sets();
    let h1 = vec![SymbolKind::Pay(PaySymbol::H1); 24];
    for name in ["FR0", "FR1"] {
        sets.insert(
            name.to_string(),
            ReelSet::from_columns(name, vec![h1.clone(); 5]).unwrap(),
        );
    }
    let mut config = GameConfig::duel_at_dawn(sets).unwrap();
    config.wincap = 100.0;
    let engine = GameEngine::new(config);

    let book = engine.run_one(8, 19, &criteria::freegame_www()).unwrap();
    assert!(book.triggered_freegame);
    assert!(book.wincap_hit);
    assert_eq!(book.final_win, 100.0);
    assert_eq!(book.base_game_win, 0.0);
    assert_eq!(book.free_game_win, 100.0);
    // 3 forced scatters award 10 spins; the cap stops the run well short
    let played = book.events_of("updateFreeSpin").count();
    assert!(played < 10);
    assert_eq!(book.events_of("winCap").count(), 1);
    assert_eq!(book.events_of("freeSpinEnd").count(), 1);
}

#[test]
fn duel_before_outlaw_in_event_order() {
    // Strips that land a duel on reel 1 and an outlaw on reel 3 in the same
    // window: the duel event must precede the outlaw event.
    let mut columns: Vec<Vec<SymbolKind>> = (0..5)
        .map(|_| vec![SymbolKind::Pay(PaySymbol::L4); 24])
        .collect();
    columns[1] = vec![SymbolKind::Duel; 24];
    columns[3] = vec![SymbolKind::Outlaw; 24];
    let mut sets = HashMap::new();
    for name in ["BR0", "FR0", "FR1"] {
        sets.insert(
            name.to_string(),
            ReelSet::from_columns(name, columns.clone()).unwrap(),
        );
    }
    let engine = GameEngine::new(GameConfig::duel_at_dawn(sets).unwrap());
    let book = engine.run_one(7, 3, &criteria::basegame()).unwrap();

    let duel_at = book.events_of("vsDuel").next().unwrap().index;
    let outlaw_at = book.events_of("outlawFeature").next().unwrap().index;
    assert!(duel_at < outlaw_at);

    // The shower never lands on either converted reel
    let Event::OutlawFeature { shot_wilds, .. } =
        &book.events_of("outlawFeature").next().unwrap().event
    else {
        unreachable!()
    };
    assert!(shot_wilds.iter().all(|w| w.reel != 1 && w.reel != 3));
}

//! Integration tests for the line-oriented sessions
//!
//! Every session is driven from an in-memory script, exactly as a terminal
//! would feed it.

use darts_cli::session::{SessionEnd, run_league, run_match, run_tournament};
use darts_core::game::{MatchConfig, ScoreEngine};
use darts_core::league::{LeagueManager, LeagueStatus, PointsSystem};
use darts_core::services::Services;
use darts_core::tournament::{SlotStatus, TournamentFormat, TournamentManager, TournamentStatus};
use std::io::Cursor;

fn engine() -> ScoreEngine {
    ScoreEngine::new(Services::unshuffled())
}

fn script(lines: &[&str]) -> Cursor<String> {
    Cursor::new(lines.iter().map(|l| format!("{l}\n")).collect())
}

#[test]
fn test_three_player_match_to_the_end() {
    let engine = engine();
    let mut game = engine
        .create_match(&["Ann", "Bob", "Cy"], MatchConfig::x01(101))
        .unwrap();
    let mut input = script(&["60 41", "help", "50", "20", "show", "51", "rankings", "1"]);
    let mut out = Vec::new();

    let end = run_match(&engine, &mut game, &mut input, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(end, SessionEnd::Completed);
    assert!(out.contains("Ann checked out in position 1! Next: Bob"));
    assert!(out.contains("Bob: 51 left. Next: Cy"));
    assert!(out.contains("Game over!"));
    assert_eq!(game.player_by_name("Bob").unwrap().finish_rank, Some(2));
    assert_eq!(game.player_by_name("Cy").unwrap().finish_rank, Some(3));
}

#[test]
fn test_per_turn_scoring_rejects_three_values() {
    let engine = engine();
    let config = MatchConfig {
        scoring_unit: darts_core::game::ScoringUnit::PerTurn,
        ..MatchConfig::x01(301)
    };
    let mut game = engine.create_match(&["Ann", "Bob"], config).unwrap();
    let mut input = script(&["60 60 60", "180"]);
    let mut out = Vec::new();

    let end = run_match(&engine, &mut game, &mut input, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(end, SessionEnd::InputClosed);
    assert!(out.contains("Error: invalid turn"));
    assert_eq!(game.players[0].remaining_score, 121);
}

#[test]
fn test_bracket_played_to_a_winner() {
    let manager = TournamentManager::new(engine());
    let mut t = manager
        .create_tournament(
            "Open",
            TournamentFormat::SingleElimination,
            4,
            &["A", "B", "C", "D"],
            MatchConfig::x01(101),
        )
        .unwrap();
    manager.generate_bracket(&mut t).unwrap();

    // The first seat checks out in every match
    let mut input = script(&["60 41", "60 41", "60 41"]);
    let mut out = Vec::new();
    let end = run_tournament(&manager, &mut t, &mut input, &mut out).unwrap();

    assert_eq!(end, SessionEnd::Completed);
    assert_eq!(t.status, TournamentStatus::Completed);
    let winner = t.winner.clone().unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(&format!("{} wins Open!", winner.name)));
}

#[test]
fn test_abandoned_bracket_match_stops_the_run() {
    let manager = TournamentManager::new(engine());
    let mut t = manager
        .create_tournament(
            "Open",
            TournamentFormat::DoubleElimination,
            2,
            &["A", "B"],
            MatchConfig::default(),
        )
        .unwrap();
    manager.generate_bracket(&mut t).unwrap();

    let mut input = script(&["abandon"]);
    let mut out = Vec::new();
    let end = run_tournament(&manager, &mut t, &mut input, &mut out).unwrap();

    assert_eq!(end, SessionEnd::Abandoned);
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert!(t.slots.iter().any(|s| s.status == SlotStatus::InProgress));
}

#[test]
fn test_league_with_an_abandoned_fixture() {
    let manager = LeagueManager::new(engine());
    let mut league = manager
        .create_league(
            "Winter",
            &["Ann", "Bob", "Cy"],
            1,
            PointsSystem::default(),
            MatchConfig::x01(101),
        )
        .unwrap();
    manager.generate_fixtures(&mut league).unwrap();

    let mut input = script(&["60 41", "abandon", "60 41"]);
    let mut out = Vec::new();
    let end = run_league(&manager, &mut league, &mut input, &mut out).unwrap();

    assert_eq!(end, SessionEnd::Completed);
    assert_eq!(league.status, LeagueStatus::Completed);
    assert_eq!(league.fixtures.iter().filter(|f| f.is_draw).count(), 1);

    let table = manager.get_standings(&league);
    assert_eq!(table.iter().map(|r| r.points).sum::<u32>(), 3 + 3 + 2);
    assert!(table.iter().all(|r| r.played == 2));
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("Pts").count(), 3);
}

#[test]
fn test_league_input_closed_leaves_fixture_open() {
    let manager = LeagueManager::new(engine());
    let mut league = manager
        .create_league(
            "Winter",
            &["Ann", "Bob"],
            2,
            PointsSystem::default(),
            MatchConfig::x01(101),
        )
        .unwrap();
    manager.generate_fixtures(&mut league).unwrap();

    let mut input = script(&["60 41"]);
    let mut out = Vec::new();
    let end = run_league(&manager, &mut league, &mut input, &mut out).unwrap();

    assert_eq!(end, SessionEnd::InputClosed);
    assert_eq!(league.status, LeagueStatus::InProgress);
    assert_eq!(league.remaining_fixtures(), 1);
}

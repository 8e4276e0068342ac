//! Integration tests for full match flows
//!
//! These tests drive matches through the public engine API from creation
//! to completion, covering ranking, busts, undo and manual termination.

use darts_core::game::{
    MatchConfig, MatchError, ScoreEngine, ScoringUnit, TurnOutcome, WinRule, get_rankings,
};
use darts_core::services::{FixedClock, FixedPermutation, Services};
use std::sync::Arc;

fn engine() -> ScoreEngine {
    ScoreEngine::new(Services::unshuffled())
}

fn ranks(game: &darts_core::Match) -> Vec<(String, u32)> {
    get_rankings(game)
        .into_iter()
        .map(|r| (r.name, r.rank))
        .collect()
}

#[test]
fn test_three_player_finish_order() {
    let engine = engine();
    let mut game = engine
        .create_match(&["P1", "P2", "P3"], MatchConfig::x01(101))
        .unwrap();

    let outcome = engine.submit_turn(&mut game, &["60", "40", "1"]).unwrap();
    assert!(matches!(outcome, TurnOutcome::Finished { finish_rank: 1, .. }));
    engine.submit_turn(&mut game, &["20"]).unwrap();
    engine.submit_turn(&mut game, &["20"]).unwrap();

    // P2 finishes one rotation later, which leaves P3 alone
    let outcome = engine.submit_turn(&mut game, &["50", "31", "0"]).unwrap();
    assert!(outcome.match_ended());
    assert!(!game.active);
    assert!(game.completed_at.is_some());

    assert_eq!(
        ranks(&game),
        vec![("P1".to_string(), 1), ("P2".to_string(), 2), ("P3".to_string(), 3)]
    );
    assert_eq!(game.winner().unwrap().name, "P1");
    assert_eq!(game.players.iter().filter(|p| p.is_winner).count(), 1);
}

#[test]
fn test_same_rotation_finishers_share_rank() {
    let engine = engine();
    let mut game = engine
        .create_match(&["A", "B", "C", "D"], MatchConfig::x01(60))
        .unwrap();

    engine.submit_turn(&mut game, &["60"]).unwrap();
    let outcome = engine.submit_turn(&mut game, &["20", "20", "20"]).unwrap();
    assert!(matches!(outcome, TurnOutcome::Finished { finish_rank: 1, .. }));
    engine.submit_turn(&mut game, &["10"]).unwrap();
    engine.submit_turn(&mut game, &["10"]).unwrap();
    // Next rotation: C finishes, D is left over
    let outcome = engine.submit_turn(&mut game, &["50"]).unwrap();

    let TurnOutcome::MatchEnded { rankings } = outcome else {
        panic!("expected the match to end");
    };
    let by_name: Vec<(&str, u32)> = rankings.iter().map(|r| (r.name.as_str(), r.rank)).collect();
    assert_eq!(by_name, vec![("A", 1), ("B", 1), ("C", 3), ("D", 4)]);
    assert_eq!(game.winner().unwrap().name, "A");
}

#[test]
fn test_bust_keeps_score_and_history() {
    let engine = engine();
    let mut game = engine.create_match(&["A", "B"], MatchConfig::x01(50)).unwrap();

    let outcome = engine.submit_turn(&mut game, &["60"]).unwrap();
    assert!(matches!(outcome, TurnOutcome::Bust { remaining: 50, .. }));
    let a = &game.players[0];
    assert_eq!(a.remaining_score, 50);
    assert_eq!(a.turns.len(), 1);
    assert!(a.turns[0].busted);
    assert_eq!(a.stats.checkout_attempts, 1);
    assert_eq!(game.current_player().unwrap().name, "B");
}

#[test]
fn test_lenient_rule_finishes_below_zero() {
    let engine = engine();
    let mut game = engine.create_match(&["A", "B"], MatchConfig::lenient(50)).unwrap();
    engine.submit_turn(&mut game, &["60"]).unwrap();
    assert_eq!(game.players[0].remaining_score, 0);
    assert!(!game.active);
    assert_eq!(game.winner().unwrap().name, "A");
}

#[test]
fn test_minimum_checkout_busts_small_remainder() {
    let engine = engine();
    let config = MatchConfig {
        minimum_checkout: 2,
        ..MatchConfig::x01(41)
    };
    assert_eq!(config.win_rule, WinRule::ExactZero);
    let mut game = engine.create_match(&["A", "B"], config).unwrap();
    let outcome = engine.submit_turn(&mut game, &["40"]).unwrap();
    assert!(matches!(outcome, TurnOutcome::Bust { remaining: 41, .. }));
}

#[test]
fn test_per_turn_scoring() {
    let engine = engine();
    let config = MatchConfig {
        scoring_unit: ScoringUnit::PerTurn,
        ..MatchConfig::default()
    };
    let mut game = engine.create_match(&["A", "B"], config).unwrap();

    assert!(matches!(
        engine.submit_turn(&mut game, &["60", "60"]),
        Err(MatchError::InvalidTurnComposition(_))
    ));
    engine.submit_turn(&mut game, &["140"]).unwrap();
    let a = &game.players[0];
    assert_eq!(a.remaining_score, 361);
    assert_eq!(a.stats.darts_thrown, 3);
    assert_eq!(a.stats.max_dart_value, 0);
}

#[test]
fn test_undo_restores_previous_player() {
    let engine = engine();
    let mut game = engine.create_match(&["A", "B"], MatchConfig::default()).unwrap();
    engine.submit_turn(&mut game, &["60", "60", "60"]).unwrap();
    let before = game.clone();

    engine.submit_turn(&mut game, &["20", "1", "5"]).unwrap();
    let undone = engine.undo_last_turn(&mut game).unwrap();
    assert_eq!(undone.player_name, "B");
    assert_eq!(undone.new_remaining, 501);
    assert_eq!(game.players, before.players);
    assert_eq!(game.current_player_index, before.current_player_index);
    assert_eq!(game.turn_counter, before.turn_counter);
}

#[test]
fn test_undo_reopens_a_checkout() {
    let engine = engine();
    let mut game = engine
        .create_match(&["A", "B", "C"], MatchConfig::x01(60))
        .unwrap();
    engine.submit_turn(&mut game, &["60"]).unwrap();
    assert!(game.players[0].finished);

    engine.undo_last_turn(&mut game).unwrap();
    let a = &game.players[0];
    assert!(!a.finished);
    assert_eq!(a.finish_round_index, None);
    assert_eq!(a.remaining_score, 60);
    assert_eq!(game.current_player().unwrap().name, "A");
}

#[test]
fn test_end_game_ranks_by_remaining() {
    let engine = engine();
    let mut game = engine
        .create_match(&["A", "B", "C"], MatchConfig::default())
        .unwrap();
    engine.submit_turn(&mut game, &["20"]).unwrap();
    engine.submit_turn(&mut game, &["100"]).unwrap();
    engine.submit_turn(&mut game, &["60"]).unwrap();

    let rankings = engine.end_game(&mut game).unwrap();
    let order: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert!(!game.active);
    assert_eq!(game.winner().unwrap().name, "B");
    assert_eq!(
        engine.submit_turn(&mut game, &["20"]),
        Err(MatchError::MatchNotActive)
    );
    assert_eq!(engine.end_game(&mut game), Err(MatchError::MatchNotActive));
}

#[test]
fn test_abandon_leaves_nobody_ranked() {
    let engine = engine();
    let mut game = engine.create_match(&["A", "B"], MatchConfig::default()).unwrap();
    engine.abandon_game(&mut game).unwrap();
    assert!(!game.active);
    assert!(game.winner().is_none());
    assert!(game.players.iter().all(|p| p.finish_rank.is_none()));
    assert_eq!(engine.undo_last_turn(&mut game), Err(MatchError::MatchNotActive));
}

#[test]
fn test_seating_comes_from_random_source() {
    let services = Services::unshuffled()
        .with_random(Arc::new(FixedPermutation(vec![1, 2, 0])));
    let engine = ScoreEngine::new(services);
    let game = engine
        .create_match(&["A", "B", "C"], MatchConfig::default())
        .unwrap();
    let seats: Vec<&str> = game.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(seats, vec!["B", "C", "A"]);
}

#[test]
fn test_seeded_services_are_reproducible() {
    let seat = |seed| {
        let game = ScoreEngine::new(Services::deterministic(seed))
            .create_match(&["A", "B", "C", "D", "E"], MatchConfig::default())
            .unwrap();
        game.players.into_iter().map(|p| p.name).collect::<Vec<_>>()
    };
    assert_eq!(seat(7), seat(7));
}

#[test]
fn test_timestamps_come_from_clock() {
    let clock = FixedClock::default();
    let services = Services {
        clock: Arc::new(clock.clone()),
        ..Services::unshuffled()
    };
    let engine = ScoreEngine::new(services);
    let mut game = engine.create_match(&["A", "B"], MatchConfig::x01(40)).unwrap();
    engine.submit_turn(&mut game, &["40"]).unwrap();
    assert_eq!(game.created_at, clock.0);
    assert_eq!(game.completed_at, Some(clock.0));
    assert_eq!(game.players[0].turns[0].timestamp, clock.0);
}

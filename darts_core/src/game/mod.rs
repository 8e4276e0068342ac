//! Match scoring engine.
//!
//! This module provides the per-match countdown game:
//! - Turn validation (1-3 darts or one visit total, at most 180)
//! - Score application with bust and checkout detection
//! - Finish-order ranking for matches with more than two players
//! - Undo by replaying the remaining turn history
//!
//! ## Example
//!
//! ```
//! use darts_core::game::{MatchConfig, ScoreEngine};
//! use darts_core::services::Services;
//!
//! let engine = ScoreEngine::new(Services::unshuffled());
//! let mut game = engine.create_match(&["Ann", "Bob"], MatchConfig::x01(101)).unwrap();
//!
//! engine.submit_turn(&mut game, &["60", "40", "1"]).unwrap();
//! assert!(!game.active);
//! assert_eq!(game.winner().unwrap().name, "Ann");
//! ```

pub mod engine;
pub mod errors;
pub mod models;
pub mod ranking;

pub use engine::{ScoreEngine, ValidatedTurn, get_rankings, validate_turn};
pub use errors::{MatchError, MatchResult};
pub use models::{
    DEFAULT_STARTING_SCORE, MAX_DARTS_PER_TURN, MAX_TURN_TOTAL, Match, MatchConfig, PlayerEntry,
    PlayerRanking, PlayerStats, ScoringUnit, Turn, TurnOutcome, UndoOutcome, WinRule,
    placeholder_name, roster_names,
};
pub use ranking::{rank_estimate, resolve_all};

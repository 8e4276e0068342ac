//! # Darts Core
//!
//! A scoring and competition engine for countdown darts (501 and friends).
//!
//! Every aggregate (a [`Match`], a [`Tournament`], a [`League`]) is plain
//! serializable data that the caller owns and passes by `&mut` into the
//! engine or a manager. The core performs no I/O; ids, timestamps and random
//! orderings come from injected [`services`].
//!
//! ## Core Modules
//!
//! - [`game`]: Turn validation, bust and checkout rules, finish-order ranking, undo
//! - [`tournament`]: Single and double elimination brackets with byes
//! - [`league`]: Round-robin fixtures and league tables
//! - [`services`]: Id, clock and random-source collaborators
//!
//! ## Example
//!
//! ```
//! use darts_core::{MatchConfig, ScoreEngine, Services, TurnOutcome};
//!
//! let engine = ScoreEngine::new(Services::unshuffled());
//! let mut game = engine.create_match(&["Ann", "Bob"], MatchConfig::default()).unwrap();
//!
//! let outcome = engine.submit_turn(&mut game, &["60", "60", "60"]).unwrap();
//! assert!(matches!(outcome, TurnOutcome::Scored { remaining: 321, .. }));
//! assert_eq!(game.current_player().unwrap().name, "Bob");
//! ```

/// Per-match scoring engine and ranking.
pub mod game;
pub use game::{
    Match, MatchConfig, MatchError, MatchResult, PlayerRanking, ScoreEngine, ScoringUnit,
    TurnOutcome, WinRule,
};

/// Round-robin leagues.
pub mod league;
pub use league::{League, LeagueError, LeagueManager, LeagueResult, PointsSystem, StandingRow};

/// Injected collaborators.
pub mod services;
pub use services::Services;

/// Elimination tournaments.
pub mod tournament;
pub use tournament::{
    BracketView, Tournament, TournamentError, TournamentFormat, TournamentManager,
    TournamentResult,
};

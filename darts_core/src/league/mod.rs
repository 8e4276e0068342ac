//! Round-robin leagues.
//!
//! This module provides:
//! - Fixture scheduling by the circle method, single or home and away
//! - Fixture results, either reported directly or taken from a finished match
//! - League tables with head-to-head tie-breaking
//!
//! ## Example
//!
//! ```
//! use darts_core::game::{MatchConfig, ScoreEngine};
//! use darts_core::league::{FixtureOutcome, LeagueManager, PointsSystem};
//! use darts_core::services::Services;
//!
//! let manager = LeagueManager::new(ScoreEngine::new(Services::unshuffled()));
//! let mut league = manager
//!     .create_league(
//!         "Monday",
//!         &["Ann", "Bob", "Cat"],
//!         1,
//!         PointsSystem::default(),
//!         MatchConfig::default(),
//!     )
//!     .unwrap();
//! manager.generate_fixtures(&mut league).unwrap();
//!
//! let fixture = league.fixtures[0].clone();
//! let outcome = FixtureOutcome::Winner(fixture.player1.id.clone());
//! manager.record_match_result(&mut league, &fixture.id, outcome).unwrap();
//!
//! let table = manager.get_standings(&league);
//! assert_eq!(table[0].name, fixture.player1.name);
//! assert_eq!(table[0].points, 3);
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod schedule;
pub mod standings;

pub use errors::{LeagueError, LeagueResult};
pub use manager::LeagueManager;
pub use models::{
    Fixture, FixtureOutcome, FixtureStatus, League, LeagueParticipant, LeagueStatus, PointsSystem,
    ScheduledPairing, StandingRow,
};
pub use schedule::{generate_fixtures, group_by_round};
pub use standings::{compute_standings, tally};

//! Elimination tournaments.
//!
//! This module provides bracket competitions built on the match engine:
//! - Registration with seeding and seed shuffling
//! - Single and double elimination bracket generation
//! - Automatic byes for empty first-round positions
//! - Winner and loser routing, elimination tracking and final placements
//!
//! ## Example
//!
//! ```
//! use darts_core::game::{MatchConfig, ScoreEngine};
//! use darts_core::services::Services;
//! use darts_core::tournament::{TournamentFormat, TournamentManager, TournamentStatus};
//!
//! let manager = TournamentManager::new(ScoreEngine::new(Services::unshuffled()));
//! let mut tournament = manager
//!     .create_tournament(
//!         "Club Night",
//!         TournamentFormat::SingleElimination,
//!         2,
//!         &["Ann", "Bob"],
//!         MatchConfig::x01(101),
//!     )
//!     .unwrap();
//! manager.generate_bracket(&mut tournament).unwrap();
//!
//! let slot_id = tournament.slots[0].id.clone();
//! let ann = tournament.participants[0].id.clone();
//! manager.record_match_result(&mut tournament, &slot_id, &ann).unwrap();
//! assert_eq!(tournament.status, TournamentStatus::Completed);
//! ```

pub mod advance;
pub mod bracket;
pub mod errors;
pub mod manager;
pub mod models;

pub use bracket::{get_bracket_view, is_valid_slot_count};
pub use errors::{TournamentError, TournamentResult};
pub use manager::{MIN_PARTICIPANTS, TournamentManager};
pub use models::{
    BracketRound, BracketSide, BracketSlot, BracketView, Entrant, Participant, SlotStatus,
    Tournament, TournamentFormat, TournamentStatus,
};

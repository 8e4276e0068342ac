//! Tournament data models for elimination brackets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::MatchConfig;

/// An occupant of a bracket slot or fixture side: participant id plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entrant {
    pub id: String,
    pub name: String,
}

impl Entrant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Tournament format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// One loss and you're out
    SingleElimination,
    /// A winners-bracket loss drops you to the losers bracket
    DoubleElimination,
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::SingleElimination => write!(f, "single"),
            TournamentFormat::DoubleElimination => write!(f, "double"),
        }
    }
}

impl std::str::FromStr for TournamentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(TournamentFormat::SingleElimination),
            "double" => Ok(TournamentFormat::DoubleElimination),
            other => Err(format!("unknown format '{other}' (expected single or double)")),
        }
    }
}

/// Which part of the bracket a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
    GrandFinal,
}

/// Slot state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Waiting for one or both occupants
    Pending,
    /// Both occupants known, match not started
    Ready,
    /// Match spawned
    InProgress,
    /// Winner decided (or empty slot closed)
    Completed,
}

/// Tournament state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting and reordering participants
    Registration,
    /// Bracket generated, matches being played
    InProgress,
    /// Terminal slot decided
    Completed,
}

/// One match position in the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub id: String,
    pub bracket: BracketSide,
    /// Positive for winners/single-elimination rounds and the grand final,
    /// negative for losers rounds
    pub round: i32,
    pub match_number: u32,
    pub player1: Option<Entrant>,
    pub player2: Option<Entrant>,
    pub winner: Option<Entrant>,
    pub status: SlotStatus,
    pub winner_next_slot_id: Option<String>,
    /// Only set in double elimination
    pub loser_next_slot_id: Option<String>,
    /// Spawned match, by id only
    pub match_id: Option<String>,
}

impl BracketSlot {
    pub fn new(id: String, bracket: BracketSide, round: i32, match_number: u32) -> Self {
        Self {
            id,
            bracket,
            round,
            match_number,
            player1: None,
            player2: None,
            winner: None,
            status: SlotStatus::Pending,
            winner_next_slot_id: None,
            loser_next_slot_id: None,
            match_id: None,
        }
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Entrant> {
        self.player1.iter().chain(self.player2.iter())
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants().count()
    }

    pub fn has_occupant(&self, entrant_id: &str) -> bool {
        self.occupants().any(|e| e.id == entrant_id)
    }

    /// The other occupant, if any
    pub fn opponent_of(&self, entrant_id: &str) -> Option<&Entrant> {
        self.occupants().find(|e| e.id != entrant_id)
    }

    /// Put `entrant` into the first open position.
    ///
    /// Returns false when both positions are taken.
    pub(crate) fn seat(&mut self, entrant: Entrant) -> bool {
        if self.player1.is_none() {
            self.player1 = Some(entrant);
        } else if self.player2.is_none() {
            self.player2 = Some(entrant);
        } else {
            return false;
        }
        true
    }

    /// Recompute `Pending`/`Ready` from occupancy. Started and completed
    /// slots are left alone.
    pub(crate) fn refresh_status(&mut self) {
        if matches!(self.status, SlotStatus::Pending | SlotStatus::Ready) {
            self.status = if self.occupant_count() == 2 {
                SlotStatus::Ready
            } else {
                SlotStatus::Pending
            };
        }
    }
}

/// Tournament participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    /// 1-based bracket placement order
    pub seed_position: u32,
    pub eliminated: bool,
    pub eliminated_at_round: Option<i32>,
    /// Finishing position, set when the tournament completes
    pub final_placement: Option<u32>,
}

impl Participant {
    pub fn new(id: String, name: String, seed_position: u32) -> Self {
        Self {
            id,
            name,
            seed_position,
            eliminated: false,
            eliminated_at_round: None,
            final_placement: None,
        }
    }

    pub fn entrant(&self) -> Entrant {
        Entrant::new(self.id.clone(), self.name.clone())
    }
}

/// An elimination tournament and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub format: TournamentFormat,
    /// Power-of-two first-round capacity
    pub max_slots: usize,
    /// Configuration for every spawned match
    pub match_config: MatchConfig,
    pub participants: Vec<Participant>,
    pub slots: Vec<BracketSlot>,
    pub status: TournamentStatus,
    pub winner: Option<Entrant>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn slot(&self, slot_id: &str) -> Option<&BracketSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub(crate) fn slot_index(&self, slot_id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id == slot_id)
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Number of winners-bracket rounds, `log2(max_slots)`
    pub fn winners_rounds(&self) -> u32 {
        self.max_slots.trailing_zeros()
    }

    /// The slot whose winner wins the tournament
    pub fn terminal_slot(&self) -> Option<&BracketSlot> {
        match self.format {
            TournamentFormat::SingleElimination => self
                .slots
                .iter()
                .filter(|s| s.bracket == BracketSide::Winners)
                .max_by_key(|s| s.round),
            TournamentFormat::DoubleElimination => self
                .slots
                .iter()
                .find(|s| s.bracket == BracketSide::GrandFinal),
        }
    }

    /// Slots that can be started right now
    pub fn ready_slots(&self) -> impl Iterator<Item = &BracketSlot> {
        self.slots.iter().filter(|s| s.status == SlotStatus::Ready)
    }
}

/// Slots of one round of one bracket side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRound {
    pub bracket: BracketSide,
    pub round: i32,
    pub slots: Vec<BracketSlot>,
}

/// Read-only projection of a tournament grouped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketView {
    pub tournament_id: String,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    pub rounds: Vec<BracketRound>,
    pub winner: Option<Entrant>,
}

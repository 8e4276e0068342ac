//! League data models for round-robin competitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::MatchConfig;
use crate::tournament::Entrant;

/// Points awarded per fixture result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSystem {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointsSystem {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

/// League state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueStatus {
    Registration,
    InProgress,
    Completed,
}

/// Fixture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    InProgress,
    Completed,
}

/// League participant with running counters.
///
/// Counters are derived from completed fixtures and rebuilt by
/// [`tally`](super::standings::tally).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueParticipant {
    pub id: String,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
}

impl LeagueParticipant {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
            legs_won: 0,
            legs_lost: 0,
        }
    }

    pub fn leg_diff(&self) -> i64 {
        i64::from(self.legs_won) - i64::from(self.legs_lost)
    }

    pub fn entrant(&self) -> Entrant {
        Entrant::new(self.id.clone(), self.name.clone())
    }

    pub(crate) fn reset_counters(&mut self) {
        *self = Self::new(std::mem::take(&mut self.id), std::mem::take(&mut self.name));
    }
}

/// One scheduled pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    /// 1-based round number
    pub round: u32,
    /// Home side
    pub player1: Entrant,
    /// Away side
    pub player2: Entrant,
    /// None while pending and for draws
    pub winner: Option<Entrant>,
    pub is_draw: bool,
    pub status: FixtureStatus,
    /// Spawned match, by id only
    pub match_id: Option<String>,
}

impl Fixture {
    pub fn involves(&self, participant_id: &str) -> bool {
        self.player1.id == participant_id || self.player2.id == participant_id
    }

    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
    }
}

/// A round-robin league and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    /// 1 for a single round robin, 2 for home and away
    pub matches_per_pairing: u8,
    pub points: PointsSystem,
    pub match_config: MatchConfig,
    pub status: LeagueStatus,
    pub participants: Vec<LeagueParticipant>,
    pub fixtures: Vec<Fixture>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl League {
    pub fn participant(&self, participant_id: &str) -> Option<&LeagueParticipant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub fn fixture(&self, fixture_id: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == fixture_id)
    }

    pub(crate) fn fixture_index(&self, fixture_id: &str) -> Option<usize> {
        self.fixtures.iter().position(|f| f.id == fixture_id)
    }

    /// Number of rounds in the generated schedule
    pub fn round_count(&self) -> u32 {
        self.fixtures.iter().map(|f| f.round).max().unwrap_or(0)
    }

    pub fn fixtures_in_round(&self, round: u32) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().filter(move |f| f.round == round)
    }

    pub fn remaining_fixtures(&self) -> usize {
        self.fixtures.iter().filter(|f| !f.is_completed()).count()
    }
}

/// Output of the scheduler before ids are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPairing {
    pub round: u32,
    pub home: Entrant,
    pub away: Entrant,
}

/// Reported fixture result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureOutcome {
    /// Participant id of the winner
    Winner(String),
    Draw,
}

/// One line of the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: u32,
    pub participant_id: String,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub leg_diff: i64,
    pub legs_won: u32,
}

impl StandingRow {
    pub(crate) fn of(participant: &LeagueParticipant, rank: u32) -> Self {
        Self {
            rank,
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            played: participant.played,
            wins: participant.wins,
            draws: participant.draws,
            losses: participant.losses,
            points: participant.points,
            leg_diff: participant.leg_diff(),
            legs_won: participant.legs_won,
        }
    }
}

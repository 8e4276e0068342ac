//! League manager for round-robin competitions.

use log::{debug, info, warn};

use super::errors::{LeagueError, LeagueResult};
use super::models::{
    Fixture, FixtureOutcome, FixtureStatus, League, LeagueParticipant, LeagueStatus, PointsSystem,
    StandingRow,
};
use super::schedule::generate_fixtures;
use super::standings::{compute_standings, tally};
use crate::game::{
    Match, MatchConfig, MatchError, ScoreEngine, placeholder_name, roster_names,
};
use crate::tournament::Entrant;

/// Minimum number of participants needed to schedule fixtures
pub const MIN_PARTICIPANTS: usize = 2;

/// League manager
#[derive(Clone, Debug, Default)]
pub struct LeagueManager {
    engine: ScoreEngine,
}

fn ensure_registration(league: &League) -> LeagueResult<()> {
    if league.status != LeagueStatus::Registration {
        return Err(LeagueError::LeagueNotInRegistration);
    }
    Ok(())
}

fn validate_matches_per_pairing(matches_per_pairing: u8) -> LeagueResult<()> {
    if !(1..=2).contains(&matches_per_pairing) {
        return Err(LeagueError::InvalidMatchesPerPairing(matches_per_pairing));
    }
    Ok(())
}

impl LeagueManager {
    /// Create a new league manager
    pub fn new(engine: ScoreEngine) -> Self {
        Self { engine }
    }

    /// Engine used to spawn fixture matches
    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Create a new league in registration.
    ///
    /// Blank names become the first free `Player N`; repeated names are
    /// rejected.
    pub fn create_league<S: AsRef<str>>(
        &self,
        name: &str,
        roster: &[S],
        matches_per_pairing: u8,
        points: PointsSystem,
        match_config: MatchConfig,
    ) -> LeagueResult<League> {
        validate_matches_per_pairing(matches_per_pairing)?;
        match_config.validate().map_err(MatchError::InvalidConfig)?;

        let services = self.engine.services();
        let mut league = League {
            id: services.ids.new_id(),
            name: name.to_string(),
            matches_per_pairing,
            points,
            match_config,
            status: LeagueStatus::Registration,
            participants: Vec::with_capacity(roster.len()),
            fixtures: Vec::new(),
            created_at: services.clock.now(),
            completed_at: None,
        };
        for name in roster_names(roster) {
            self.add_participant(&mut league, &name)?;
        }

        info!(
            "Created league {} '{}' ({} participants, {} leg(s))",
            league.id,
            league.name,
            league.participants.len(),
            matches_per_pairing
        );
        Ok(league)
    }

    /// Register a participant before fixtures are generated
    pub fn add_participant(
        &self,
        league: &mut League,
        name: &str,
    ) -> LeagueResult<LeagueParticipant> {
        ensure_registration(league)?;
        let name = match name.trim() {
            "" => placeholder_name(league.participants.len() + 1, |candidate| {
                league.participants.iter().any(|p| p.name == candidate)
            }),
            trimmed => trimmed.to_string(),
        };
        if league.participants.iter().any(|p| p.name == name) {
            return Err(LeagueError::DuplicateParticipant(name));
        }

        let participant = LeagueParticipant::new(self.engine.services().ids.new_id(), name);
        league.participants.push(participant.clone());
        Ok(participant)
    }

    /// Withdraw a participant before fixtures are generated
    pub fn remove_participant(
        &self,
        league: &mut League,
        participant_id: &str,
    ) -> LeagueResult<LeagueParticipant> {
        ensure_registration(league)?;
        let idx = league
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or_else(|| LeagueError::ParticipantNotFound(participant_id.to_string()))?;
        Ok(league.participants.remove(idx))
    }

    /// Schedule every fixture and open the league.
    ///
    /// # Errors
    ///
    /// * `LeagueNotInRegistration` - Fixtures were already generated
    /// * `InsufficientParticipants` - Fewer than two participants
    /// * `InvalidMatchesPerPairing` - Stored leg count is not 1 or 2
    pub fn generate_fixtures<'a>(
        &self,
        league: &'a mut League,
    ) -> LeagueResult<&'a [Fixture]> {
        ensure_registration(league)?;
        validate_matches_per_pairing(league.matches_per_pairing)?;
        if league.participants.len() < MIN_PARTICIPANTS {
            return Err(LeagueError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: league.participants.len(),
            });
        }

        let entrants: Vec<Entrant> = league.participants.iter().map(|p| p.entrant()).collect();
        let ids = &self.engine.services().ids;
        league.fixtures = generate_fixtures(&entrants, league.matches_per_pairing)
            .into_iter()
            .map(|pairing| Fixture {
                id: ids.new_id(),
                round: pairing.round,
                player1: pairing.home,
                player2: pairing.away,
                winner: None,
                is_draw: false,
                status: FixtureStatus::Scheduled,
                match_id: None,
            })
            .collect();
        league.status = LeagueStatus::InProgress;

        info!(
            "League {}: generated {} fixtures over {} rounds",
            league.id,
            league.fixtures.len(),
            league.round_count()
        );
        Ok(&league.fixtures)
    }

    /// Spawn the match for a scheduled fixture.
    pub fn start_match(&self, league: &mut League, fixture_id: &str) -> LeagueResult<Match> {
        if league.status != LeagueStatus::InProgress {
            return Err(LeagueError::LeagueNotInProgress);
        }
        let idx = league
            .fixture_index(fixture_id)
            .ok_or_else(|| LeagueError::FixtureNotFound(fixture_id.to_string()))?;
        let fixture = &league.fixtures[idx];
        match fixture.status {
            FixtureStatus::InProgress => return Err(LeagueError::MatchAlreadyInProgress),
            FixtureStatus::Completed => return Err(LeagueError::MatchAlreadyCompleted),
            FixtureStatus::Scheduled => {}
        }

        let game = self.engine.create_match(
            &[fixture.player1.name.as_str(), fixture.player2.name.as_str()],
            league.match_config.clone(),
        )?;

        let fixture = &mut league.fixtures[idx];
        fixture.match_id = Some(game.id.clone());
        fixture.status = FixtureStatus::InProgress;
        debug!(
            "League {}: match {} started for fixture {}",
            league.id, game.id, fixture.id
        );
        Ok(game)
    }

    /// Record a fixture result and refresh the table.
    ///
    /// A fixture can be reported without a spawned match; either way it can
    /// only be reported once.
    pub fn record_match_result(
        &self,
        league: &mut League,
        fixture_id: &str,
        outcome: FixtureOutcome,
    ) -> LeagueResult<Fixture> {
        self.apply_result(league, fixture_id, outcome).inspect_err(|e| {
            warn!("League {}: result for fixture {} rejected: {}", league.id, fixture_id, e)
        })
    }

    fn apply_result(
        &self,
        league: &mut League,
        fixture_id: &str,
        outcome: FixtureOutcome,
    ) -> LeagueResult<Fixture> {
        if league.status != LeagueStatus::InProgress {
            return Err(LeagueError::LeagueNotInProgress);
        }
        let idx = league
            .fixture_index(fixture_id)
            .ok_or_else(|| LeagueError::FixtureNotFound(fixture_id.to_string()))?;
        let fixture = &league.fixtures[idx];
        if fixture.is_completed() {
            return Err(LeagueError::MatchAlreadyCompleted);
        }
        let winner = match &outcome {
            FixtureOutcome::Draw => None,
            FixtureOutcome::Winner(id) => Some(
                [&fixture.player1, &fixture.player2]
                    .into_iter()
                    .find(|e| &e.id == id)
                    .cloned()
                    .ok_or_else(|| LeagueError::WinnerNotInFixture(id.clone()))?,
            ),
        };

        let fixture = &mut league.fixtures[idx];
        fixture.is_draw = winner.is_none();
        fixture.winner = winner;
        fixture.status = FixtureStatus::Completed;
        let recorded = fixture.clone();
        debug!(
            "League {}: fixture {} {} vs {} -> {}",
            league.id,
            recorded.id,
            recorded.player1.name,
            recorded.player2.name,
            recorded.winner.as_ref().map(|w| w.name.as_str()).unwrap_or("draw")
        );

        tally(league);
        if league.remaining_fixtures() == 0 {
            league.status = LeagueStatus::Completed;
            league.completed_at = Some(self.engine.services().clock.now());
            info!("League {} completed", league.id);
        }
        Ok(recorded)
    }

    /// Record a fixture result from the finished match it spawned.
    ///
    /// A match ended without a winner (abandoned) counts as a draw.
    pub fn record_from_match(
        &self,
        league: &mut League,
        fixture_id: &str,
        game: &Match,
    ) -> LeagueResult<Fixture> {
        let fixture = league
            .fixture(fixture_id)
            .ok_or_else(|| LeagueError::FixtureNotFound(fixture_id.to_string()))?;
        if fixture.match_id.as_deref() != Some(game.id.as_str()) {
            return Err(LeagueError::MatchNotLinked);
        }
        if game.active {
            return Err(LeagueError::MatchNotDecided);
        }
        let outcome = match game.winner() {
            Some(winner) => {
                let id = [&fixture.player1, &fixture.player2]
                    .into_iter()
                    .find(|e| e.name == winner.name)
                    .map(|e| e.id.clone())
                    .ok_or_else(|| LeagueError::WinnerNotInFixture(winner.name.clone()))?;
                FixtureOutcome::Winner(id)
            }
            None => FixtureOutcome::Draw,
        };

        self.record_match_result(league, fixture_id, outcome)
    }

    /// Current league table
    pub fn get_standings(&self, league: &League) -> Vec<StandingRow> {
        compute_standings(league)
    }
}

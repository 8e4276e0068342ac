//! Tournament manager for creating and running elimination brackets.

use log::{info, warn};

use super::advance;
use super::bracket::{build_slots, get_bracket_view, is_valid_slot_count, place_participants};
use super::errors::{TournamentError, TournamentResult};
use super::models::{
    BracketSlot, BracketView, Participant, SlotStatus, Tournament, TournamentFormat,
    TournamentStatus,
};
use crate::game::{
    Match, MatchConfig, MatchError, ScoreEngine, placeholder_name, roster_names,
};
use crate::services::shuffle;

/// Minimum number of participants needed to generate a bracket
pub const MIN_PARTICIPANTS: usize = 2;

/// Tournament manager
///
/// Cheap to clone; every operation takes the tournament it acts on.
#[derive(Clone, Debug, Default)]
pub struct TournamentManager {
    engine: ScoreEngine,
}

fn renumber_seeds(participants: &mut [Participant]) {
    for (idx, p) in participants.iter_mut().enumerate() {
        p.seed_position = idx as u32 + 1;
    }
}

fn ensure_registration(tournament: &Tournament) -> TournamentResult<()> {
    if tournament.status != TournamentStatus::Registration {
        return Err(TournamentError::TournamentNotInRegistration);
    }
    Ok(())
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(engine: ScoreEngine) -> Self {
        Self { engine }
    }

    /// Engine used to spawn slot matches
    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Create a new tournament in registration.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `format` - Single or double elimination
    /// * `max_slots` - First-round capacity, a power of two of at least 2
    /// * `roster` - Initial participant names, seeded in order then shuffled
    /// * `match_config` - Configuration for every match the bracket spawns
    ///
    /// # Returns
    ///
    /// * `TournamentResult<Tournament>` - The new tournament
    pub fn create_tournament<S: AsRef<str>>(
        &self,
        name: &str,
        format: TournamentFormat,
        max_slots: usize,
        roster: &[S],
        match_config: MatchConfig,
    ) -> TournamentResult<Tournament> {
        if !is_valid_slot_count(max_slots) {
            return Err(TournamentError::InvalidSlotCount(max_slots));
        }
        match_config.validate().map_err(MatchError::InvalidConfig)?;
        if roster.len() > max_slots {
            return Err(TournamentError::TournamentFull { max_slots });
        }

        let services = self.engine.services();
        let mut participants: Vec<Participant> = Vec::with_capacity(roster.len());
        for (idx, name) in roster_names(roster).into_iter().enumerate() {
            if participants.iter().any(|p| p.name == name) {
                return Err(TournamentError::DuplicateParticipant(name));
            }
            participants.push(Participant::new(services.ids.new_id(), name, idx as u32 + 1));
        }
        let mut participants = shuffle(services.random.as_ref(), participants);
        renumber_seeds(&mut participants);

        let tournament = Tournament {
            id: services.ids.new_id(),
            name: name.to_string(),
            format,
            max_slots,
            match_config,
            participants,
            slots: Vec::new(),
            status: TournamentStatus::Registration,
            winner: None,
            created_at: services.clock.now(),
            completed_at: None,
        };

        info!(
            "Created {} elimination tournament {} '{}' ({}/{} entrants)",
            format,
            tournament.id,
            tournament.name,
            tournament.participants.len(),
            max_slots
        );
        Ok(tournament)
    }

    /// Register one more participant at the end of the seed order
    pub fn add_participant(
        &self,
        tournament: &mut Tournament,
        name: &str,
    ) -> TournamentResult<Participant> {
        ensure_registration(tournament)?;
        if tournament.participants.len() >= tournament.max_slots {
            return Err(TournamentError::TournamentFull {
                max_slots: tournament.max_slots,
            });
        }
        let seed_position = tournament.participants.len() as u32 + 1;
        let name = match name.trim() {
            "" => placeholder_name(seed_position as usize, |candidate| {
                tournament.participants.iter().any(|p| p.name == candidate)
            }),
            trimmed => trimmed.to_string(),
        };
        if tournament.participants.iter().any(|p| p.name == name) {
            return Err(TournamentError::DuplicateParticipant(name));
        }

        let id = self.engine.services().ids.new_id();
        let participant = Participant::new(id, name, seed_position);
        tournament.participants.push(participant.clone());
        Ok(participant)
    }

    /// Withdraw a participant before the bracket is generated
    pub fn remove_participant(
        &self,
        tournament: &mut Tournament,
        participant_id: &str,
    ) -> TournamentResult<Participant> {
        ensure_registration(tournament)?;
        let idx = tournament
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or_else(|| TournamentError::ParticipantNotFound(participant_id.to_string()))?;
        let removed = tournament.participants.remove(idx);
        renumber_seeds(&mut tournament.participants);
        Ok(removed)
    }

    /// Randomize the seed order
    pub fn shuffle_participants(&self, tournament: &mut Tournament) -> TournamentResult<()> {
        ensure_registration(tournament)?;
        let participants = std::mem::take(&mut tournament.participants);
        tournament.participants = shuffle(self.engine.services().random.as_ref(), participants);
        renumber_seeds(&mut tournament.participants);
        Ok(())
    }

    /// Build the bracket, seat participants in seed order and resolve byes.
    ///
    /// Moves the tournament from registration to in progress.
    pub fn generate_bracket(&self, tournament: &mut Tournament) -> TournamentResult<BracketView> {
        ensure_registration(tournament)?;
        if tournament.participants.len() < MIN_PARTICIPANTS {
            return Err(TournamentError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: tournament.participants.len(),
            });
        }

        let mut slots = build_slots(
            tournament.format,
            tournament.max_slots,
            self.engine.services().ids.as_ref(),
        );
        place_participants(&mut slots, &tournament.participants);
        tournament.slots = slots;
        tournament.status = TournamentStatus::InProgress;
        advance::resolve_byes(tournament);

        info!(
            "Generated bracket for tournament {}: {} slots, {} ready",
            tournament.id,
            tournament.slots.len(),
            tournament.ready_slots().count()
        );
        Ok(get_bracket_view(tournament))
    }

    /// Spawn the match for a ready slot.
    ///
    /// The slot keeps only the match id; the caller owns the match.
    pub fn start_match(
        &self,
        tournament: &mut Tournament,
        slot_id: &str,
    ) -> TournamentResult<Match> {
        if tournament.status != TournamentStatus::InProgress {
            return Err(TournamentError::TournamentNotInProgress);
        }
        let idx = tournament
            .slot_index(slot_id)
            .ok_or_else(|| TournamentError::SlotNotFound(slot_id.to_string()))?;
        let slot = &tournament.slots[idx];
        match slot.status {
            SlotStatus::Pending => return Err(TournamentError::SlotNotReady),
            SlotStatus::InProgress => return Err(TournamentError::MatchAlreadyInProgress),
            SlotStatus::Completed => return Err(TournamentError::MatchAlreadyCompleted),
            SlotStatus::Ready => {}
        }
        let (Some(p1), Some(p2)) = (&slot.player1, &slot.player2) else {
            return Err(TournamentError::SlotNotReady);
        };

        let game = self
            .engine
            .create_match(&[p1.name.as_str(), p2.name.as_str()], tournament.match_config.clone())?;

        let slot = &mut tournament.slots[idx];
        slot.match_id = Some(game.id.clone());
        slot.status = SlotStatus::InProgress;
        info!(
            "Tournament {}: match {} started for slot {}",
            tournament.id, game.id, slot.match_number
        );
        Ok(game)
    }

    /// Record a slot result by winner id and advance both players
    pub fn record_match_result(
        &self,
        tournament: &mut Tournament,
        slot_id: &str,
        winner_id: &str,
    ) -> TournamentResult<BracketSlot> {
        let now = self.engine.services().clock.now();
        advance::record_match_result(tournament, slot_id, winner_id, now).inspect_err(|e| {
            warn!("Tournament {}: result for slot {} rejected: {}", tournament.id, slot_id, e)
        })
    }

    /// Record a slot result from the finished match it spawned.
    ///
    /// # Errors
    ///
    /// * `MatchNotLinked` - `game` is not the match stored on the slot
    /// * `MatchNotDecided` - `game` is still running or has no winner
    pub fn record_from_match(
        &self,
        tournament: &mut Tournament,
        slot_id: &str,
        game: &Match,
    ) -> TournamentResult<BracketSlot> {
        let slot = tournament
            .slot(slot_id)
            .ok_or_else(|| TournamentError::SlotNotFound(slot_id.to_string()))?;
        if slot.match_id.as_deref() != Some(game.id.as_str()) {
            return Err(TournamentError::MatchNotLinked);
        }
        let winner_name = match game.winner() {
            Some(winner) if !game.active => winner.name.as_str(),
            _ => return Err(TournamentError::MatchNotDecided),
        };
        let winner_id = slot
            .occupants()
            .find(|e| e.name == winner_name)
            .map(|e| e.id.clone())
            .ok_or_else(|| TournamentError::WinnerNotInSlot(winner_name.to_string()))?;

        self.record_match_result(tournament, slot_id, &winner_id)
    }

    /// Finish the tournament if the terminal slot is decided
    pub fn check_completion(&self, tournament: &mut Tournament) -> bool {
        advance::check_completion(tournament, self.engine.services().clock.now())
    }

    /// Read-only bracket projection
    pub fn get_bracket_view(&self, tournament: &Tournament) -> BracketView {
        get_bracket_view(tournament)
    }
}

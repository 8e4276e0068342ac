//! Result propagation through a bracket.
//!
//! Everything here mutates a single [`Tournament`] and nothing else.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::cmp::Reverse;

use super::errors::{TournamentError, TournamentResult};
use super::models::{
    BracketSlot, Entrant, SlotStatus, Tournament, TournamentFormat, TournamentStatus,
};

/// Seat `entrant` in the slot with id `target`, if any.
fn propagate(tournament: &mut Tournament, target: Option<&str>, entrant: Entrant) {
    let Some(target) = target else {
        return;
    };
    if let Some(slot) = tournament.slots.iter_mut().find(|s| s.id == target) {
        debug!(
            "Tournament {}: {} advances to slot {}",
            tournament.id, entrant.name, slot.match_number
        );
        slot.seat(entrant);
    }
}

/// Whether some unfinished slot still sends a winner or loser into `slot_id`.
fn has_pending_feeder(tournament: &Tournament, slot_id: &str) -> bool {
    tournament.slots.iter().any(|s| {
        s.status != SlotStatus::Completed
            && (s.winner_next_slot_id.as_deref() == Some(slot_id)
                || s.loser_next_slot_id.as_deref() == Some(slot_id))
    })
}

/// Close every slot that can no longer receive a second occupant.
///
/// A lone occupant wins by bye and moves on, an empty slot closes with no
/// winner. Runs until nothing changes, since each closed slot can unblock
/// the slots it feeds.
pub fn resolve_byes(tournament: &mut Tournament) {
    loop {
        let next = tournament.slots.iter().position(|s| {
            matches!(s.status, SlotStatus::Pending | SlotStatus::Ready)
                && s.occupant_count() < 2
                && !has_pending_feeder(tournament, &s.id)
        });
        let Some(idx) = next else {
            break;
        };

        let slot = &mut tournament.slots[idx];
        let lone = slot.occupants().next().cloned();
        slot.winner = lone;
        slot.status = SlotStatus::Completed;
        let winner = slot.winner.clone();
        let target = slot.winner_next_slot_id.clone();
        match winner {
            Some(winner) => {
                debug!(
                    "Tournament {}: {} gets a bye in slot {}",
                    tournament.id, winner.name, tournament.slots[idx].match_number
                );
                propagate(tournament, target.as_deref(), winner);
            }
            None => debug!(
                "Tournament {}: slot {} closed empty",
                tournament.id, tournament.slots[idx].match_number
            ),
        }
    }

    refresh_readiness(tournament);
}

/// Recompute `Pending`/`Ready` for every slot that hasn't started.
pub fn refresh_readiness(tournament: &mut Tournament) {
    for slot in &mut tournament.slots {
        slot.refresh_status();
    }
}

/// Record the winner of a slot and move both players on.
///
/// # Arguments
///
/// * `tournament` - Tournament owning the slot
/// * `slot_id` - Slot that was played
/// * `winner_id` - Participant id of the winner; must occupy the slot
/// * `now` - Completion timestamp, used if this result ends the tournament
///
/// # Returns
///
/// * `TournamentResult<BracketSlot>` - The completed slot
///
/// # Errors
///
/// * `TournamentNotInProgress` - Bracket not generated or already decided
/// * `SlotNotFound` - Unknown slot id
/// * `SlotNotReady` - Slot still waiting for an occupant
/// * `MatchAlreadyCompleted` - Slot already has a result
/// * `WinnerNotInSlot` - `winner_id` is not one of the two occupants
pub fn record_match_result(
    tournament: &mut Tournament,
    slot_id: &str,
    winner_id: &str,
    now: DateTime<Utc>,
) -> TournamentResult<BracketSlot> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::TournamentNotInProgress);
    }
    let idx = tournament
        .slot_index(slot_id)
        .ok_or_else(|| TournamentError::SlotNotFound(slot_id.to_string()))?;
    let slot = &tournament.slots[idx];
    match slot.status {
        SlotStatus::Completed => return Err(TournamentError::MatchAlreadyCompleted),
        SlotStatus::Pending => return Err(TournamentError::SlotNotReady),
        SlotStatus::Ready | SlotStatus::InProgress => {}
    }
    let winner = slot
        .occupants()
        .find(|e| e.id == winner_id)
        .cloned()
        .ok_or_else(|| TournamentError::WinnerNotInSlot(winner_id.to_string()))?;
    let loser = slot.opponent_of(winner_id).cloned();
    let round = slot.round;
    let winner_target = slot.winner_next_slot_id.clone();
    let loser_target = slot.loser_next_slot_id.clone();

    let slot = &mut tournament.slots[idx];
    slot.winner = Some(winner.clone());
    slot.status = SlotStatus::Completed;

    // Winners-bracket losers (and the beaten grand finalist) in double
    // elimination stay alive.
    let drops_down = tournament.format == TournamentFormat::DoubleElimination && round > 0;
    if let Some(loser) = loser {
        if drops_down {
            propagate(tournament, loser_target.as_deref(), loser);
        } else if let Some(p) = tournament.participants.iter_mut().find(|p| p.id == loser.id) {
            p.eliminated = true;
            p.eliminated_at_round = Some(round);
            debug!("Tournament {}: {} eliminated in round {}", tournament.id, p.name, round);
        }
    }
    propagate(tournament, winner_target.as_deref(), winner);

    resolve_byes(tournament);
    check_completion(tournament, now);

    Ok(tournament.slots[idx].clone())
}

/// Finish the tournament if its terminal slot has a winner.
///
/// Assigns final placements: the winner first, then everyone not
/// eliminated, then the eliminated by how late they went out.
pub fn check_completion(tournament: &mut Tournament, now: DateTime<Utc>) -> bool {
    let Some(winner) = tournament
        .terminal_slot()
        .filter(|s| s.status == SlotStatus::Completed)
        .and_then(|s| s.winner.clone())
    else {
        return false;
    };

    if tournament.status != TournamentStatus::Completed {
        tournament.status = TournamentStatus::Completed;
        tournament.completed_at = Some(now);
        info!("Tournament {} won by {}", tournament.id, winner.name);
    }

    let mut others: Vec<usize> = (0..tournament.participants.len())
        .filter(|&i| tournament.participants[i].id != winner.id)
        .collect();
    others.sort_by_key(|&i| {
        let p = &tournament.participants[i];
        (
            p.eliminated,
            Reverse(p.eliminated_at_round.map(i32::unsigned_abs).unwrap_or(u32::MAX)),
            p.seed_position,
        )
    });

    for p in &mut tournament.participants {
        if p.id == winner.id {
            p.final_placement = Some(1);
        }
    }
    for (pos, idx) in others.into_iter().enumerate() {
        tournament.participants[idx].final_placement = Some(pos as u32 + 2);
    }
    tournament.winner = Some(winner);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MatchConfig;
    use crate::services::SequentialIds;
    use crate::tournament::bracket::{build_slots, place_participants};
    use crate::tournament::models::{BracketSide, Participant};

    fn tournament(format: TournamentFormat, max_slots: usize, names: &[&str]) -> Tournament {
        let participants: Vec<Participant> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Participant::new(n.to_lowercase(), n.to_string(), i as u32 + 1))
            .collect();
        let mut slots = build_slots(format, max_slots, &SequentialIds::new("slot"));
        place_participants(&mut slots, &participants);
        let mut t = Tournament {
            id: "t".into(),
            name: "Test".into(),
            format,
            max_slots,
            match_config: MatchConfig::default(),
            participants,
            slots,
            status: TournamentStatus::InProgress,
            winner: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            completed_at: None,
        };
        resolve_byes(&mut t);
        t
    }

    fn slot_with(t: &Tournament, a: &str, b: &str) -> String {
        t.slots
            .iter()
            .find(|s| s.status == SlotStatus::Ready && s.has_occupant(a) && s.has_occupant(b))
            .map(|s| s.id.clone())
            .unwrap()
    }

    #[test]
    fn test_byes_in_first_round() {
        let t = tournament(TournamentFormat::SingleElimination, 8, &["A", "B", "C", "D", "E"]);
        let first: Vec<SlotStatus> = t
            .slots
            .iter()
            .filter(|s| s.round == 1)
            .map(|s| s.status)
            .collect();
        assert_eq!(
            first,
            vec![SlotStatus::Ready, SlotStatus::Ready, SlotStatus::Completed, SlotStatus::Completed]
        );
        assert_eq!(t.slots[2].winner.as_ref().unwrap().id, "e");
        assert!(t.slots[3].winner.is_none());
        assert!(t.slots[3].match_id.is_none());
        // E's round-2 opponent would come from the empty slot, so E moves
        // straight on to the final.
        let final_slot = t.terminal_slot().unwrap();
        assert!(final_slot.has_occupant("e"));
    }

    #[test]
    fn test_single_elimination_full_run() {
        let mut t = tournament(TournamentFormat::SingleElimination, 4, &["A", "B", "C", "D"]);
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let ab = slot_with(&t, "a", "b");
        let cd = slot_with(&t, "c", "d");
        record_match_result(&mut t, &ab, "a", now).unwrap();
        record_match_result(&mut t, &cd, "d", now).unwrap();
        let fin = slot_with(&t, "a", "d");
        record_match_result(&mut t, &fin, "d", now).unwrap();

        assert_eq!(t.status, TournamentStatus::Completed);
        assert_eq!(t.winner.as_ref().unwrap().name, "D");
        let placement = |id: &str| t.participant(id).unwrap().final_placement.unwrap();
        assert_eq!(placement("d"), 1);
        assert_eq!(placement("a"), 2);
        assert!(placement("b") >= 3 && placement("c") >= 3);
        assert_eq!(t.participant("a").unwrap().eliminated_at_round, Some(2));
    }

    #[test]
    fn test_record_rejects_unknown_winner_without_mutation() {
        let mut t = tournament(TournamentFormat::SingleElimination, 4, &["A", "B", "C", "D"]);
        let before = t.clone();
        let ab = slot_with(&t, "a", "b");
        let err = record_match_result(&mut t, &ab, "c", DateTime::<Utc>::UNIX_EPOCH).unwrap_err();
        assert_eq!(err, TournamentError::WinnerNotInSlot("c".into()));
        assert_eq!(t, before);
    }

    #[test]
    fn test_record_twice_is_rejected() {
        let mut t = tournament(TournamentFormat::SingleElimination, 4, &["A", "B", "C", "D"]);
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let ab = slot_with(&t, "a", "b");
        record_match_result(&mut t, &ab, "a", now).unwrap();
        assert_eq!(
            record_match_result(&mut t, &ab, "a", now),
            Err(TournamentError::MatchAlreadyCompleted)
        );
    }

    #[test]
    fn test_pending_slot_is_not_ready() {
        let mut t = tournament(TournamentFormat::SingleElimination, 4, &["A", "B", "C", "D"]);
        let final_id = t.terminal_slot().unwrap().id.clone();
        assert_eq!(
            record_match_result(&mut t, &final_id, "a", DateTime::<Utc>::UNIX_EPOCH),
            Err(TournamentError::SlotNotReady)
        );
    }

    #[test]
    fn test_double_elimination_loser_drops_down() {
        let mut t = tournament(TournamentFormat::DoubleElimination, 4, &["A", "B", "C", "D"]);
        let ab = slot_with(&t, "a", "b");
        record_match_result(&mut t, &ab, "a", DateTime::<Utc>::UNIX_EPOCH).unwrap();
        assert!(!t.participant("b").unwrap().eliminated);
        let losers_first = t
            .slots
            .iter()
            .find(|s| s.bracket == BracketSide::Losers && s.round == -1)
            .unwrap();
        assert!(losers_first.has_occupant("b"));
    }

    #[test]
    fn test_double_elimination_full_run() {
        let mut t = tournament(TournamentFormat::DoubleElimination, 4, &["A", "B", "C", "D"]);
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let ab = slot_with(&t, "a", "b");
        record_match_result(&mut t, &ab, "a", now).unwrap();
        let cd = slot_with(&t, "c", "d");
        record_match_result(&mut t, &cd, "c", now).unwrap();
        // Losers round 1: B vs D, D goes out
        let bd = slot_with(&t, "b", "d");
        record_match_result(&mut t, &bd, "b", now).unwrap();
        assert!(t.participant("d").unwrap().eliminated);
        // Winners final: A beats C, C drops to the losers final
        let ac = slot_with(&t, "a", "c");
        record_match_result(&mut t, &ac, "a", now).unwrap();
        let bc = slot_with(&t, "b", "c");
        record_match_result(&mut t, &bc, "b", now).unwrap();
        // Grand final
        let gf = slot_with(&t, "a", "b");
        record_match_result(&mut t, &gf, "b", now).unwrap();

        assert_eq!(t.status, TournamentStatus::Completed);
        assert_eq!(t.winner.as_ref().unwrap().id, "b");
        let placement = |id: &str| t.participant(id).unwrap().final_placement.unwrap();
        assert_eq!(placement("b"), 1);
        assert_eq!(placement("a"), 2);
        assert_eq!(placement("c"), 3);
        assert_eq!(placement("d"), 4);
    }
}

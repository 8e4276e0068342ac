//! Bracket topology.
//!
//! Builds the slot graph for single and double elimination and places
//! participants into the first round. Result propagation lives in
//! [`advance`](super::advance).
//!
//! Double elimination layout for `R = log2(max_slots)` winners rounds:
//! - winners rounds `1..=R`, round `r` has `max_slots / 2^r` slots
//! - losers rounds `-1..=-2(R-1)`, losers round `k` has
//!   `max_slots / 2^(ceil(k/2) + 1)` slots
//! - one grand final at round `R + 1`

use super::models::{
    BracketRound, BracketSide, BracketSlot, BracketView, Participant, Tournament, TournamentFormat,
};
use crate::services::IdGenerator;

/// Whether `max_slots` is a usable bracket capacity.
pub fn is_valid_slot_count(max_slots: usize) -> bool {
    max_slots >= 2 && max_slots.is_power_of_two()
}

struct SlotBuilder<'a> {
    ids: &'a dyn IdGenerator,
    slots: Vec<BracketSlot>,
    next_match_number: u32,
}

impl SlotBuilder<'_> {
    fn round(&mut self, bracket: BracketSide, round: i32, count: usize) -> Vec<usize> {
        (0..count)
            .map(|_| {
                let slot =
                    BracketSlot::new(self.ids.new_id(), bracket, round, self.next_match_number);
                self.next_match_number += 1;
                self.slots.push(slot);
                self.slots.len() - 1
            })
            .collect()
    }

    fn link_winner(&mut self, from: usize, to: usize) {
        self.slots[from].winner_next_slot_id = Some(self.slots[to].id.clone());
    }

    fn link_loser(&mut self, from: usize, to: usize) {
        self.slots[from].loser_next_slot_id = Some(self.slots[to].id.clone());
    }
}

/// Build every slot of an empty bracket with its advancement links.
///
/// `max_slots` must satisfy [`is_valid_slot_count`].
pub fn build_slots(
    format: TournamentFormat,
    max_slots: usize,
    ids: &dyn IdGenerator,
) -> Vec<BracketSlot> {
    let rounds = max_slots.trailing_zeros() as usize;
    let mut builder = SlotBuilder {
        ids,
        slots: Vec::with_capacity(2 * max_slots),
        next_match_number: 1,
    };

    let winners: Vec<Vec<usize>> = (1..=rounds)
        .map(|r| builder.round(BracketSide::Winners, r as i32, max_slots >> r))
        .collect();
    for pair in winners.windows(2) {
        for (i, &from) in pair[0].iter().enumerate() {
            builder.link_winner(from, pair[1][i / 2]);
        }
    }

    if format == TournamentFormat::SingleElimination {
        return builder.slots;
    }

    let losers_rounds = 2 * (rounds - 1);
    let losers: Vec<Vec<usize>> = (1..=losers_rounds)
        .map(|k| {
            let count = max_slots >> (k.div_ceil(2) + 1);
            builder.round(BracketSide::Losers, -(k as i32), count)
        })
        .collect();
    for (k0, pair) in losers.windows(2).enumerate() {
        // Losers round k0+1: odd rounds feed the same index of the drop-in
        // round that follows, even rounds halve.
        let halves = (k0 + 1) % 2 == 0;
        for (i, &from) in pair[0].iter().enumerate() {
            let to = if halves { pair[1][i / 2] } else { pair[1][i] };
            builder.link_winner(from, to);
        }
    }

    let grand_final = builder.round(BracketSide::GrandFinal, rounds as i32 + 1, 1)[0];

    for (r0, round) in winners.iter().enumerate() {
        for (i, &from) in round.iter().enumerate() {
            let to = if losers.is_empty() {
                grand_final
            } else if r0 == 0 {
                losers[0][i / 2]
            } else {
                losers[2 * r0 - 1][i]
            };
            builder.link_loser(from, to);
        }
    }

    if let Some(&winners_final) = winners.last().and_then(|r| r.first()) {
        builder.link_winner(winners_final, grand_final);
    }
    if let Some(&losers_final) = losers.last().and_then(|r| r.first()) {
        builder.link_winner(losers_final, grand_final);
    }

    builder.slots
}

/// Place participants into first-round winners slots, two per slot, in
/// list order.
pub fn place_participants(slots: &mut [BracketSlot], participants: &[Participant]) {
    let mut first_round: Vec<&mut BracketSlot> = slots
        .iter_mut()
        .filter(|s| s.bracket == BracketSide::Winners && s.round == 1)
        .collect();
    for (k, participant) in participants.iter().enumerate() {
        if let Some(slot) = first_round.get_mut(k / 2) {
            slot.seat(participant.entrant());
        }
    }
}

/// Group a tournament's slots by bracket side and round in play order:
/// winners rounds ascending, losers rounds by depth, then the grand final.
pub fn get_bracket_view(tournament: &Tournament) -> BracketView {
    let mut rounds: Vec<BracketRound> = Vec::new();
    for slot in &tournament.slots {
        match rounds
            .iter_mut()
            .find(|r| r.bracket == slot.bracket && r.round == slot.round)
        {
            Some(round) => round.slots.push(slot.clone()),
            None => rounds.push(BracketRound {
                bracket: slot.bracket,
                round: slot.round,
                slots: vec![slot.clone()],
            }),
        }
    }
    rounds.sort_by_key(|r| (r.bracket, r.round.unsigned_abs()));
    for round in &mut rounds {
        round.slots.sort_by_key(|s| s.match_number);
    }

    BracketView {
        tournament_id: tournament.id.clone(),
        format: tournament.format,
        status: tournament.status,
        rounds,
        winner: tournament.winner.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SequentialIds;
    use std::collections::HashMap;

    fn count(slots: &[BracketSlot], side: BracketSide, round: i32) -> usize {
        slots
            .iter()
            .filter(|s| s.bracket == side && s.round == round)
            .count()
    }

    fn by_id(slots: &[BracketSlot]) -> HashMap<&str, &BracketSlot> {
        slots.iter().map(|s| (s.id.as_str(), s)).collect()
    }

    #[test]
    fn test_valid_slot_counts() {
        assert!(is_valid_slot_count(2));
        assert!(is_valid_slot_count(64));
        assert!(!is_valid_slot_count(0));
        assert!(!is_valid_slot_count(1));
        assert!(!is_valid_slot_count(6));
    }

    #[test]
    fn test_single_elimination_shape() {
        let slots = build_slots(TournamentFormat::SingleElimination, 8, &SequentialIds::default());
        assert_eq!(slots.len(), 7);
        assert_eq!(count(&slots, BracketSide::Winners, 1), 4);
        assert_eq!(count(&slots, BracketSide::Winners, 2), 2);
        assert_eq!(count(&slots, BracketSide::Winners, 3), 1);
        assert!(slots.iter().all(|s| s.loser_next_slot_id.is_none()));
    }

    #[test]
    fn test_single_elimination_paths_reach_final() {
        let slots = build_slots(TournamentFormat::SingleElimination, 16, &SequentialIds::default());
        let index = by_id(&slots);
        for start in slots.iter().filter(|s| s.round == 1) {
            let mut current = start;
            let mut hops = 0;
            while let Some(next) = current.winner_next_slot_id.as_deref() {
                current = index[next];
                hops += 1;
            }
            assert_eq!(current.round, 4);
            assert_eq!(hops, 3);
        }
    }

    #[test]
    fn test_single_elimination_feeds_are_pairs() {
        let slots = build_slots(TournamentFormat::SingleElimination, 8, &SequentialIds::default());
        let mut feeds: HashMap<&str, usize> = HashMap::new();
        for slot in &slots {
            if let Some(next) = slot.winner_next_slot_id.as_deref() {
                *feeds.entry(next).or_default() += 1;
            }
        }
        assert!(feeds.values().all(|&n| n == 2));
        assert_eq!(feeds.len(), 3);
    }

    #[test]
    fn test_double_elimination_shape() {
        let slots = build_slots(TournamentFormat::DoubleElimination, 8, &SequentialIds::default());
        assert_eq!(count(&slots, BracketSide::Losers, -1), 2);
        assert_eq!(count(&slots, BracketSide::Losers, -2), 2);
        assert_eq!(count(&slots, BracketSide::Losers, -3), 1);
        assert_eq!(count(&slots, BracketSide::Losers, -4), 1);
        assert_eq!(count(&slots, BracketSide::GrandFinal, 4), 1);
        // 7 winners + 6 losers + grand final
        assert_eq!(slots.len(), 14);
    }

    #[test]
    fn test_double_elimination_every_slot_receives_two() {
        let slots = build_slots(TournamentFormat::DoubleElimination, 8, &SequentialIds::default());
        let mut feeds: HashMap<&str, usize> = HashMap::new();
        for slot in &slots {
            for next in [&slot.winner_next_slot_id, &slot.loser_next_slot_id]
                .into_iter()
                .flatten()
            {
                *feeds.entry(next.as_str()).or_default() += 1;
            }
        }
        for slot in slots.iter().filter(|s| !(s.bracket == BracketSide::Winners && s.round == 1)) {
            assert_eq!(feeds.get(slot.id.as_str()), Some(&2), "slot {:?}", slot);
        }
    }

    #[test]
    fn test_double_elimination_two_slots_drops_to_final() {
        let slots = build_slots(TournamentFormat::DoubleElimination, 2, &SequentialIds::default());
        assert_eq!(slots.len(), 2);
        let grand_final = slots.iter().find(|s| s.bracket == BracketSide::GrandFinal).unwrap();
        assert_eq!(slots[0].winner_next_slot_id.as_deref(), Some(grand_final.id.as_str()));
        assert_eq!(slots[0].loser_next_slot_id.as_deref(), Some(grand_final.id.as_str()));
    }

    #[test]
    fn test_match_numbers_are_sequential() {
        let slots = build_slots(TournamentFormat::DoubleElimination, 4, &SequentialIds::default());
        let numbers: Vec<u32> = slots.iter().map(|s| s.match_number).collect();
        assert_eq!(numbers, (1..=slots.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_place_participants_two_per_slot() {
        let mut slots =
            build_slots(TournamentFormat::SingleElimination, 8, &SequentialIds::default());
        let participants: Vec<Participant> = (0..5)
            .map(|i| Participant::new(format!("p{i}"), format!("P{i}"), i + 1))
            .collect();
        place_participants(&mut slots, &participants);
        let first: Vec<usize> = slots
            .iter()
            .filter(|s| s.round == 1)
            .map(|s| s.occupant_count())
            .collect();
        assert_eq!(first, vec![2, 2, 1, 0]);
    }
}

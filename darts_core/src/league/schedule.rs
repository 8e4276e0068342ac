//! Round-robin scheduling by the circle method.

use std::collections::BTreeMap;

use super::models::ScheduledPairing;
use crate::tournament::Entrant;

/// Produce every pairing of a round robin.
///
/// With `n` entrants (plus one bye when `n` is odd) each leg has `n - 1`
/// rounds. Position 0 stays fixed while the others rotate right by one
/// place per round; in each round position `i` meets position `n - 1 - i`
/// and pairings against the bye are skipped. Every further leg repeats
/// the first with home and away swapped on odd legs and rounds offset by
/// the leg length.
///
/// # Arguments
///
/// * `participants` - Entrants in seeding order
/// * `matches_per_pairing` - Number of legs, normally 1 or 2
///
/// # Returns
///
/// * `Vec<ScheduledPairing>` - Pairings ordered by round, 1-based
pub fn generate_fixtures(
    participants: &[Entrant],
    matches_per_pairing: u8,
) -> Vec<ScheduledPairing> {
    let mut positions: Vec<Option<&Entrant>> = participants.iter().map(Some).collect();
    if positions.len() % 2 == 1 {
        positions.push(None);
    }
    let n = positions.len();
    if n < 2 {
        return Vec::new();
    }
    let rounds_per_leg = (n - 1) as u32;

    let mut first_leg = Vec::with_capacity(n / 2 * (n - 1));
    for round in 1..=rounds_per_leg {
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (positions[i], positions[n - 1 - i]) {
                first_leg.push(ScheduledPairing {
                    round,
                    home: home.clone(),
                    away: away.clone(),
                });
            }
        }
        positions[1..].rotate_right(1);
    }

    let legs = u32::from(matches_per_pairing);
    let mut all = Vec::with_capacity(first_leg.len() * legs as usize);
    for leg in 0..legs {
        let offset = leg * rounds_per_leg;
        all.extend(first_leg.iter().map(|p| {
            let (home, away) = if leg % 2 == 1 {
                (p.away.clone(), p.home.clone())
            } else {
                (p.home.clone(), p.away.clone())
            };
            ScheduledPairing {
                round: p.round + offset,
                home,
                away,
            }
        }));
    }
    all
}

/// Group pairings by round number
pub fn group_by_round(pairings: &[ScheduledPairing]) -> BTreeMap<u32, Vec<ScheduledPairing>> {
    let mut rounds: BTreeMap<u32, Vec<ScheduledPairing>> = BTreeMap::new();
    for pairing in pairings {
        rounds.entry(pairing.round).or_default().push(pairing.clone());
    }
    rounds
}

//! Finish-order ranking.
//!
//! Players who check out in the same rotation tie. Ranks follow competition
//! order: after two players tie at 1 the next finisher is 3rd, not 2nd.
//! Everybody who never checked out shares last place.

use super::models::{Match, PlayerEntry, PlayerRanking};

/// Rank every player in `game` by the rotation they finished in.
///
/// Pure and idempotent; it reads only `finish_round_index`.
pub fn resolve_all(game: &Match) -> Vec<PlayerRanking> {
    let mut finishers: Vec<&PlayerEntry> = game
        .players
        .iter()
        .filter(|p| p.finish_round_index.is_some())
        .collect();
    // Stable: tied finishers keep seat order.
    finishers.sort_by_key(|p| p.finish_round_index);

    let mut rankings = Vec::with_capacity(game.players.len());
    let mut current_rank = 0;
    let mut previous_round = None;
    for (position, player) in finishers.iter().enumerate() {
        if previous_round != player.finish_round_index {
            current_rank = position as u32 + 1;
            previous_round = player.finish_round_index;
        }
        rankings.push(PlayerRanking::of(player, current_rank));
    }

    let stragglers: Vec<&PlayerEntry> = game
        .players
        .iter()
        .filter(|p| p.finish_round_index.is_none())
        .collect();
    let last_place = (game.players.len() - stragglers.len()) as u32 + 1;
    rankings.extend(
        stragglers
            .into_iter()
            .map(|p| PlayerRanking::of(p, last_place)),
    );

    rankings
}

/// Provisional rank for a player who just checked out: one more than the
/// number of distinct earlier finishing rotations.
pub fn rank_estimate(game: &Match, finish_round: u32) -> u32 {
    let mut earlier: Vec<u32> = game
        .players
        .iter()
        .filter_map(|p| p.finish_round_index)
        .filter(|&round| round < finish_round)
        .collect();
    earlier.sort_unstable();
    earlier.dedup();
    earlier.len() as u32 + 1
}

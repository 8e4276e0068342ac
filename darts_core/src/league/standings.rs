//! League table calculation.

use std::cmp::Reverse;
use std::collections::HashMap;

use super::models::{Fixture, League, LeagueParticipant, PointsSystem, StandingRow};

fn apply_fixtures(
    participants: &mut [LeagueParticipant],
    fixtures: &[Fixture],
    points: &PointsSystem,
) {
    for p in participants.iter_mut() {
        p.reset_counters();
    }
    let index: HashMap<String, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    for fixture in fixtures.iter().filter(|f| f.is_completed()) {
        let home = index.get(&fixture.player1.id).copied();
        let away = index.get(&fixture.player2.id).copied();
        let (Some(home), Some(away)) = (home, away) else {
            continue;
        };
        participants[home].played += 1;
        participants[away].played += 1;

        match &fixture.winner {
            Some(winner) if !fixture.is_draw => {
                let (w, l) = if winner.id == fixture.player1.id {
                    (home, away)
                } else {
                    (away, home)
                };
                participants[w].wins += 1;
                participants[w].points += points.win;
                participants[w].legs_won += 1;
                participants[l].losses += 1;
                participants[l].points += points.loss;
                participants[l].legs_lost += 1;
            }
            _ => {
                for side in [home, away] {
                    participants[side].draws += 1;
                    participants[side].points += points.draw;
                }
            }
        }
    }
}

/// Rebuild every participant's counters from the completed fixtures
pub fn tally(league: &mut League) {
    apply_fixtures(&mut league.participants, &league.fixtures, &league.points);
}

/// Net wins of each participant against others on the same points.
fn head_to_head(
    participants: &[LeagueParticipant],
    fixtures: &[Fixture],
) -> HashMap<String, i64> {
    let points_of: HashMap<&str, u32> = participants
        .iter()
        .map(|p| (p.id.as_str(), p.points))
        .collect();
    let mut net: HashMap<String, i64> = HashMap::new();

    for fixture in fixtures.iter().filter(|f| f.is_completed() && !f.is_draw) {
        let Some(winner) = &fixture.winner else {
            continue;
        };
        let loser = if winner.id == fixture.player1.id {
            &fixture.player2
        } else {
            &fixture.player1
        };
        match (points_of.get(winner.id.as_str()), points_of.get(loser.id.as_str())) {
            (Some(a), Some(b)) if a == b => {
                *net.entry(winner.id.clone()).or_default() += 1;
                *net.entry(loser.id.clone()).or_default() -= 1;
            }
            _ => {}
        }
    }
    net
}

/// Compute the league table.
///
/// Ordered by points, then head-to-head among the participants level on
/// points, then leg difference, then legs won. Name and id settle whatever
/// is still level, so ranks are always 1..n without sharing.
pub fn compute_standings(league: &League) -> Vec<StandingRow> {
    let mut participants = league.participants.clone();
    apply_fixtures(&mut participants, &league.fixtures, &league.points);
    let h2h = head_to_head(&participants, &league.fixtures);

    participants.sort_by(|a, b| {
        let key = |p: &LeagueParticipant| {
            (
                Reverse(p.points),
                Reverse(h2h.get(&p.id).copied().unwrap_or(0)),
                Reverse(p.leg_diff()),
                Reverse(p.legs_won),
            )
        };
        key(a)
            .cmp(&key(b))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    participants
        .iter()
        .enumerate()
        .map(|(pos, p)| StandingRow::of(p, pos as u32 + 1))
        .collect()
}

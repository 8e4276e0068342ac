//! Per-match scoring state machine.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::errors::{MatchError, MatchResult};
use super::models::{
    MAX_DARTS_PER_TURN, MAX_TURN_TOTAL, Match, MatchConfig, PlayerEntry, PlayerRanking,
    ScoringUnit, Turn, TurnOutcome, UndoOutcome, WinRule, roster_names,
};
use super::ranking::{rank_estimate, resolve_all};
use crate::services::{Services, shuffle};

/// A turn whose values passed validation and can be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTurn {
    pub dart_values: Vec<u32>,
    pub total: u32,
}

impl ValidatedTurn {
    /// Parse a free-text line such as `"60 20 1"` or `"60,20,1"`.
    pub fn parse_line(unit: ScoringUnit, line: &str) -> MatchResult<Self> {
        let parts: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        validate_turn(unit, &parts)
    }
}

/// Check raw dart input for a turn.
///
/// # Arguments
///
/// * `unit` - Whether the input is per dart (1-3 values) or per visit (1 value)
/// * `darts` - Raw values as entered
///
/// # Returns
///
/// * `MatchResult<ValidatedTurn>` - Parsed values and their total
///
/// # Errors
///
/// * `InvalidDartValue` - A value is not an integer in `[0, 180]`
/// * `InvalidTurnComposition` - Wrong number of values or total above 180
pub fn validate_turn<S: AsRef<str>>(unit: ScoringUnit, darts: &[S]) -> MatchResult<ValidatedTurn> {
    let max_values = match unit {
        ScoringUnit::PerDart => MAX_DARTS_PER_TURN,
        ScoringUnit::PerTurn => 1,
    };
    if darts.is_empty() || darts.len() > max_values {
        return Err(MatchError::InvalidTurnComposition(format!(
            "expected 1 to {max_values} values, got {}",
            darts.len()
        )));
    }

    let mut dart_values = Vec::with_capacity(darts.len());
    for raw in darts {
        let raw = raw.as_ref().trim();
        let value: u32 = raw
            .parse()
            .map_err(|_| MatchError::InvalidDartValue(raw.to_string()))?;
        if value > MAX_TURN_TOTAL {
            return Err(MatchError::InvalidDartValue(format!(
                "{value} is above {MAX_TURN_TOTAL}"
            )));
        }
        dart_values.push(value);
    }

    let total: u32 = dart_values.iter().sum();
    if total > MAX_TURN_TOTAL {
        return Err(MatchError::InvalidTurnComposition(format!(
            "total {total} is above {MAX_TURN_TOTAL}"
        )));
    }

    Ok(ValidatedTurn { dart_values, total })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnKind {
    Normal,
    Bust,
    Checkout,
}

fn classify(config: &MatchConfig, hypothetical: i64) -> TurnKind {
    match (hypothetical, config.win_rule) {
        (0, _) => TurnKind::Checkout,
        (h, WinRule::ZeroOrBelow) if h < 0 => TurnKind::Checkout,
        (h, WinRule::ExactZero) if h < 0 => TurnKind::Bust,
        (h, WinRule::ExactZero) if h < i64::from(config.minimum_checkout) => TurnKind::Bust,
        _ => TurnKind::Normal,
    }
}

/// Score engine.
///
/// Holds the injected services; every operation takes the match it acts on
/// explicitly, so one engine can serve any number of matches.
#[derive(Clone, Debug, Default)]
pub struct ScoreEngine {
    services: Services,
}

impl ScoreEngine {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Create a new match with a randomly seated roster.
    ///
    /// Blank names become `Player N` (see [`roster_names`]).
    pub fn create_match<S: AsRef<str>>(
        &self,
        roster: &[S],
        config: MatchConfig,
    ) -> MatchResult<Match> {
        config.validate().map_err(MatchError::InvalidConfig)?;
        if roster.is_empty() {
            return Err(MatchError::EmptyRoster);
        }

        let players: Vec<PlayerEntry> = roster_names(roster)
            .into_iter()
            .map(|name| PlayerEntry::new(self.services.ids.new_id(), name, config.starting_score))
            .collect();
        let players = shuffle(self.services.random.as_ref(), players);

        let game = Match {
            id: self.services.ids.new_id(),
            config,
            active: true,
            created_at: self.services.clock.now(),
            completed_at: None,
            current_player_index: 0,
            turn_counter: 0,
            players,
        };

        info!(
            "Created match {} ({} players, {} {})",
            game.id,
            game.players.len(),
            game.config.starting_score,
            game.config.win_rule
        );
        Ok(game)
    }

    /// Validate and apply a turn for the current player.
    pub fn submit_turn<S: AsRef<str>>(
        &self,
        game: &mut Match,
        darts: &[S],
    ) -> MatchResult<TurnOutcome> {
        if !game.active {
            return Err(MatchError::MatchNotActive);
        }
        let turn = validate_turn(game.config.scoring_unit, darts)?;
        self.apply_turn(game, turn)
    }

    /// Apply an already validated turn for the current player.
    pub fn apply_turn(&self, game: &mut Match, turn: ValidatedTurn) -> MatchResult<TurnOutcome> {
        if !game.active {
            return Err(MatchError::MatchNotActive);
        }
        let idx = game.current_player_index;
        let before = match game.players.get(idx) {
            Some(player) if !player.finished => player.remaining_score,
            _ => return Err(MatchError::MatchNotActive),
        };

        let kind = classify(&game.config, i64::from(before) - i64::from(turn.total));
        let remaining_after = match kind {
            TurnKind::Normal => before - turn.total,
            TurnKind::Bust => before,
            TurnKind::Checkout => 0,
        };
        let sequence = game.turn_counter;
        let record = Turn {
            dart_values: turn.dart_values,
            total: turn.total,
            remaining_after,
            busted: kind == TurnKind::Bust,
            checkout_attempt: kind != TurnKind::Normal,
            sequence,
            timestamp: self.services.clock.now(),
        };

        let unit = game.config.scoring_unit;
        let player = &mut game.players[idx];
        player.stats.record(&record, unit);
        player.remaining_score = remaining_after;
        player.turns.push(record);
        let player_name = player.name.clone();
        game.turn_counter += 1;

        debug!(
            "Match {}: {} threw {} ({:?}), {} left",
            game.id, player_name, turn.total, kind, remaining_after
        );

        if kind == TurnKind::Checkout {
            let finish_round = sequence / game.players.len() as u32;
            let player = &mut game.players[idx];
            player.finished = true;
            player.finish_round_index = Some(finish_round);
            game.current_player_index = game.next_unfinished_after(idx);

            if game.unfinished_count() <= 1 {
                let rankings = self.complete(game);
                return Ok(TurnOutcome::MatchEnded { rankings });
            }

            return Ok(TurnOutcome::Finished {
                player_name,
                finish_rank: rank_estimate(game, finish_round),
                next_player_name: game.players[game.current_player_index].name.clone(),
            });
        }

        game.current_player_index = game.next_unfinished_after(idx);
        let next_player_name = game.players[game.current_player_index].name.clone();
        Ok(match kind {
            TurnKind::Bust => TurnOutcome::Bust {
                player_name,
                remaining: remaining_after,
                next_player_name,
            },
            _ => TurnOutcome::Scored {
                player_name,
                remaining: remaining_after,
                next_player_name,
            },
        })
    }

    /// Take back the most recent turn of the match.
    ///
    /// The thrower of that turn becomes the current player again and their
    /// score and aggregates are rebuilt from the remaining history.
    pub fn undo_last_turn(&self, game: &mut Match) -> MatchResult<UndoOutcome> {
        if !game.active {
            return Err(MatchError::MatchNotActive);
        }
        let (idx, sequence) = game
            .players
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.turns.last().map(|t| (idx, t.sequence)))
            .max_by_key(|&(_, sequence)| sequence)
            .ok_or(MatchError::NoTurnsToUndo)?;

        let unit = game.config.scoring_unit;
        let player = &mut game.players[idx];
        player.turns.pop();
        player.replay(unit);
        let outcome = UndoOutcome {
            player_name: player.name.clone(),
            new_remaining: player.remaining_score,
        };
        game.current_player_index = idx;
        game.turn_counter = sequence;

        debug!(
            "Match {}: undid turn {} of {}",
            game.id, sequence, outcome.player_name
        );
        Ok(outcome)
    }

    /// Terminate the match now and rank whoever is left.
    ///
    /// Unranked players are ordered finished first (by finishing rotation),
    /// then by remaining score, then by darts thrown.
    pub fn end_game(&self, game: &mut Match) -> MatchResult<Vec<PlayerRanking>> {
        if !game.active {
            return Err(MatchError::MatchNotActive);
        }

        let rankings = if game.players.iter().all(|p| p.finish_rank.is_none()) {
            let mut order: Vec<&PlayerEntry> = game.players.iter().collect();
            order.sort_by_key(|p| {
                (
                    !p.finished,
                    p.finish_round_index.unwrap_or(u32::MAX),
                    p.remaining_score,
                    p.stats.darts_thrown,
                )
            });
            order
                .into_iter()
                .enumerate()
                .map(|(pos, p)| PlayerRanking::of(p, pos as u32 + 1))
                .collect()
        } else {
            get_rankings(game)
        };

        apply_rankings(game, &rankings);
        game.active = false;
        game.completed_at = Some(self.services.clock.now());
        info!(
            "Match {} ended manually, winner {}",
            game.id,
            game.winner().map(|p| p.name.as_str()).unwrap_or("-")
        );
        Ok(rankings)
    }

    /// Discard the match without ranking anybody.
    pub fn abandon_game(&self, game: &mut Match) -> MatchResult<()> {
        if !game.active {
            return Err(MatchError::MatchNotActive);
        }
        game.active = false;
        game.completed_at = Some(self.services.clock.now());
        info!("Match {} abandoned", game.id);
        Ok(())
    }

    fn complete(&self, game: &mut Match) -> Vec<PlayerRanking> {
        let rankings = resolve_all(game);
        apply_rankings(game, &rankings);
        game.active = false;
        game.completed_at = Some(self.services.clock.now());
        info!(
            "Match {} completed after {} turns, winner {}",
            game.id,
            game.turn_counter,
            game.winner().map(|p| p.name.as_str()).unwrap_or("-")
        );
        rankings
    }
}

/// Write ranks onto the players and flag exactly one winner.
fn apply_rankings(game: &mut Match, rankings: &[PlayerRanking]) {
    let winner_id = rankings
        .iter()
        .find(|r| r.rank == 1)
        .map(|r| r.player_id.clone());
    for player in &mut game.players {
        player.finish_rank = rankings
            .iter()
            .find(|r| r.player_id == player.id)
            .map(|r| r.rank);
        player.is_winner = winner_id.as_deref() == Some(player.id.as_str());
    }
}

/// Current standings of a match.
///
/// Returns the stored ranks once every player has one, otherwise the
/// provisional finish-order ranking. Never mutates.
pub fn get_rankings(game: &Match) -> Vec<PlayerRanking> {
    if game.players.iter().all(|p| p.finish_rank.is_some()) {
        let mut ranked: Vec<&PlayerEntry> = game.players.iter().collect();
        ranked.sort_by_key(|p| p.finish_rank);
        ranked
            .into_iter()
            .map(|p| PlayerRanking::of(p, p.finish_rank.unwrap_or_default()))
            .collect()
    } else {
        resolve_all(game)
    }
}

//! Match data models.
//!
//! Everything here is plain data: the engine mutates these structs, the
//! caller persists or renders them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest score a single visit (three darts) can produce.
pub const MAX_TURN_TOTAL: u32 = 180;

/// Most dart values a turn can carry under [`ScoringUnit::PerDart`].
pub const MAX_DARTS_PER_TURN: usize = 3;

/// Default countdown start.
pub const DEFAULT_STARTING_SCORE: u32 = 501;

/// Resolve display names for a roster.
///
/// Names are trimmed. A blank entry becomes `Player N`, N being its 1-based
/// position, or the next free number when that name is already on the
/// roster. Explicit names are kept as given, repeats included.
pub fn roster_names<S: AsRef<str>>(roster: &[S]) -> Vec<String> {
    let explicit: Vec<&str> = roster.iter().map(|raw| raw.as_ref().trim()).collect();
    let mut names: Vec<String> = Vec::with_capacity(roster.len());
    for (idx, raw) in explicit.iter().enumerate() {
        let name = if raw.is_empty() {
            placeholder_name(idx + 1, |candidate| {
                explicit.iter().any(|e| *e == candidate) || names.iter().any(|n| n == candidate)
            })
        } else {
            raw.to_string()
        };
        names.push(name);
    }
    names
}

/// First `Player N` with N >= `position` for which `taken` is false.
pub fn placeholder_name(position: usize, taken: impl Fn(&str) -> bool) -> String {
    (position..)
        .map(|n| format!("Player {n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_default()
}

/// How a player wins the leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRule {
    /// Must land exactly on zero; overshooting is a bust.
    ExactZero,
    /// Reaching zero or going below both finish.
    ZeroOrBelow,
}

impl fmt::Display for WinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinRule::ExactZero => write!(f, "exact"),
            WinRule::ZeroOrBelow => write!(f, "zero-or-below"),
        }
    }
}

impl FromStr for WinRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "exact-zero" => Ok(WinRule::ExactZero),
            "zero-or-below" | "lenient" => Ok(WinRule::ZeroOrBelow),
            other => Err(format!(
                "unknown win rule '{other}' (expected exact or zero-or-below)"
            )),
        }
    }
}

/// What a single submitted turn contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringUnit {
    /// One to three individual dart values.
    PerDart,
    /// One aggregate value for the whole visit.
    PerTurn,
}

impl fmt::Display for ScoringUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringUnit::PerDart => write!(f, "dart"),
            ScoringUnit::PerTurn => write!(f, "turn"),
        }
    }
}

impl FromStr for ScoringUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dart" | "per-dart" => Ok(ScoringUnit::PerDart),
            "turn" | "per-turn" => Ok(ScoringUnit::PerTurn),
            other => Err(format!("unknown scoring unit '{other}' (expected dart or turn)")),
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Countdown start for every player (e.g. 501)
    pub starting_score: u32,

    /// Exact checkout or lenient finish
    pub win_rule: WinRule,

    /// Per-dart or per-visit input
    pub scoring_unit: ScoringUnit,

    /// Under [`WinRule::ExactZero`], a turn leaving a positive remainder
    /// below this value busts. Zero disables the check.
    pub minimum_checkout: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::x01(DEFAULT_STARTING_SCORE)
    }
}

impl MatchConfig {
    /// Standard exact-checkout game scored per dart
    pub fn x01(starting_score: u32) -> Self {
        Self {
            starting_score,
            win_rule: WinRule::ExactZero,
            scoring_unit: ScoringUnit::PerDart,
            minimum_checkout: 0,
        }
    }

    /// Casual game where overshooting zero still finishes
    pub fn lenient(starting_score: u32) -> Self {
        Self {
            win_rule: WinRule::ZeroOrBelow,
            ..Self::x01(starting_score)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_score == 0 {
            return Err("Starting score must be greater than 0".to_string());
        }

        if self.minimum_checkout >= self.starting_score {
            return Err(format!(
                "Minimum checkout ({}) must be below the starting score ({})",
                self.minimum_checkout, self.starting_score
            ));
        }

        Ok(())
    }
}

/// One scoring action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Individual dart values, or a single visit total under per-turn scoring
    pub dart_values: Vec<u32>,
    pub total: u32,
    /// Remaining score after the turn; equals the pre-turn score on a bust
    pub remaining_after: u32,
    pub busted: bool,
    /// The turn was thrown at a finish (reached or passed the checkout boundary)
    pub checkout_attempt: bool,
    /// Match turn counter value when this turn was accepted
    pub sequence: u32,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Whether this turn took the player out.
    pub fn is_checkout(&self) -> bool {
        !self.busted && self.remaining_after == 0
    }
}

/// Running per-player aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub darts_thrown: u32,
    pub turns_played: u32,
    pub total_scored: u32,
    pub max_turn_total: u32,
    pub max_dart_value: u32,
    pub checkout_attempts: u32,
    pub checkout_successes: u32,
}

impl PlayerStats {
    /// Fold one turn into the aggregates.
    ///
    /// Busted turns still count as played (and as darts thrown) but score
    /// nothing. Incremental updates and undo replays both go through here.
    pub fn record(&mut self, turn: &Turn, unit: ScoringUnit) {
        self.turns_played += 1;
        self.darts_thrown += match unit {
            ScoringUnit::PerDart => turn.dart_values.len() as u32,
            ScoringUnit::PerTurn => MAX_DARTS_PER_TURN as u32,
        };

        if turn.checkout_attempt {
            self.checkout_attempts += 1;
        }

        if turn.busted {
            return;
        }

        self.total_scored += turn.total;
        self.max_turn_total = self.max_turn_total.max(turn.total);
        if unit == ScoringUnit::PerDart {
            let best = turn.dart_values.iter().copied().max().unwrap_or(0);
            self.max_dart_value = self.max_dart_value.max(best);
        }
        if turn.is_checkout() {
            self.checkout_successes += 1;
        }
    }

    /// Average score per turn played
    pub fn average(&self) -> f64 {
        if self.turns_played == 0 {
            0.0
        } else {
            f64::from(self.total_scored) / f64::from(self.turns_played)
        }
    }

    /// Share of checkout attempts that finished
    pub fn checkout_rate(&self) -> f64 {
        if self.checkout_attempts == 0 {
            0.0
        } else {
            f64::from(self.checkout_successes) / f64::from(self.checkout_attempts)
        }
    }
}

/// One contestant's running state within a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
    pub starting_score: u32,
    pub remaining_score: u32,
    pub turns: Vec<Turn>,
    pub finished: bool,
    /// Full rotation in which the player checked out
    pub finish_round_index: Option<u32>,
    /// Final position, set once the match is resolved
    pub finish_rank: Option<u32>,
    pub is_winner: bool,
    pub stats: PlayerStats,
}

impl PlayerEntry {
    pub fn new(id: String, name: String, starting_score: u32) -> Self {
        Self {
            id,
            name,
            starting_score,
            remaining_score: starting_score,
            turns: Vec::new(),
            finished: false,
            finish_round_index: None,
            finish_rank: None,
            is_winner: false,
            stats: PlayerStats::default(),
        }
    }

    /// Rebuild score, finish flag and aggregates from the turn history.
    pub(crate) fn replay(&mut self, unit: ScoringUnit) {
        let mut remaining = self.starting_score;
        let mut stats = PlayerStats::default();
        for turn in &self.turns {
            if !turn.busted {
                remaining = remaining.saturating_sub(turn.total);
            }
            stats.record(turn, unit);
        }
        self.remaining_score = remaining;
        self.stats = stats;
        self.finished = self.turns.last().is_some_and(Turn::is_checkout);
        if !self.finished {
            self.finish_round_index = None;
        }
    }
}

/// A single scored contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub config: MatchConfig,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Seat of the player due to throw
    pub current_player_index: usize,
    /// Accepted turns so far, busts included
    pub turn_counter: u32,
    /// Players in seat order
    pub players: Vec<PlayerEntry>,
}

impl Match {
    pub fn current_player(&self) -> Option<&PlayerEntry> {
        self.players.get(self.current_player_index)
    }

    pub fn unfinished_count(&self) -> usize {
        self.players.iter().filter(|p| !p.finished).count()
    }

    /// The player flagged as winner, if the match has been resolved
    pub fn winner(&self) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.is_winner)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn player_by_name(&self, name: &str) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Next unfinished seat after `from`, wrapping around. Falls back to
    /// `from` when nobody else can throw.
    pub(crate) fn next_unfinished_after(&self, from: usize) -> usize {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&idx| !self.players[idx].finished)
            .unwrap_or(from)
    }
}

/// Final or provisional standing of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub player_id: String,
    pub name: String,
    pub rank: u32,
    pub remaining_score: u32,
    pub darts_thrown: u32,
    pub average: f64,
}

impl PlayerRanking {
    pub(crate) fn of(player: &PlayerEntry, rank: u32) -> Self {
        Self {
            player_id: player.id.clone(),
            name: player.name.clone(),
            rank,
            remaining_score: player.remaining_score,
            darts_thrown: player.stats.darts_thrown,
            average: player.stats.average(),
        }
    }
}

/// Result of a successful [`submit_turn`](super::engine::ScoreEngine::submit_turn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Normal scoring turn
    Scored {
        player_name: String,
        remaining: u32,
        next_player_name: String,
    },
    /// Score reverted
    Bust {
        player_name: String,
        remaining: u32,
        next_player_name: String,
    },
    /// Player checked out, match continues
    Finished {
        player_name: String,
        finish_rank: u32,
        next_player_name: String,
    },
    /// Last contested finish; the match is complete
    MatchEnded { rankings: Vec<PlayerRanking> },
}

impl TurnOutcome {
    pub fn match_ended(&self) -> bool {
        matches!(self, TurnOutcome::MatchEnded { .. })
    }
}

/// Result of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoOutcome {
    pub player_name: String,
    pub new_remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(values: &[u32], busted: bool, remaining_after: u32) -> Turn {
        Turn {
            dart_values: values.to_vec(),
            total: values.iter().sum(),
            remaining_after,
            busted,
            checkout_attempt: busted || remaining_after == 0,
            sequence: 0,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_roster_names() {
        assert_eq!(roster_names(&[" Ann ", "", "Bob"]), vec!["Ann", "Player 2", "Bob"]);
        assert_eq!(roster_names(&["Player 2", ""]), vec!["Player 2", "Player 3"]);
        assert_eq!(roster_names(&["", "Player 1"]), vec!["Player 2", "Player 1"]);
        assert_eq!(roster_names(&["", ""]), vec!["Player 1", "Player 2"]);
        // Explicit repeats are left for the caller to judge
        assert_eq!(roster_names(&["Ann", "Ann"]), vec!["Ann", "Ann"]);
    }

    #[test]
    fn test_rule_and_unit_round_trip_display() {
        for rule in [WinRule::ExactZero, WinRule::ZeroOrBelow] {
            assert_eq!(rule.to_string().parse::<WinRule>(), Ok(rule));
        }
        for unit in [ScoringUnit::PerDart, ScoringUnit::PerTurn] {
            assert_eq!(unit.to_string().parse::<ScoringUnit>(), Ok(unit));
        }
        assert!("double-out".parse::<WinRule>().is_err());
        assert_eq!("Lenient".parse::<WinRule>(), Ok(WinRule::ZeroOrBelow));
    }

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.starting_score, 501);
        assert_eq!(config.win_rule, WinRule::ExactZero);
        assert_eq!(config.scoring_unit, ScoringUnit::PerDart);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lenient_config() {
        let config = MatchConfig::lenient(301);
        assert_eq!(config.win_rule, WinRule::ZeroOrBelow);
        assert_eq!(config.starting_score, 301);
    }

    #[test]
    fn test_config_rejects_zero_start() {
        assert!(MatchConfig::x01(0).validate().is_err());
    }

    #[test]
    fn test_config_rejects_unreachable_checkout() {
        let config = MatchConfig {
            minimum_checkout: 101,
            ..MatchConfig::x01(101)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stats_record_normal_turn() {
        let mut stats = PlayerStats::default();
        stats.record(&turn(&[60, 20, 5], false, 416), ScoringUnit::PerDart);
        assert_eq!(stats.darts_thrown, 3);
        assert_eq!(stats.total_scored, 85);
        assert_eq!(stats.max_turn_total, 85);
        assert_eq!(stats.max_dart_value, 60);
        assert_eq!(stats.checkout_attempts, 0);
    }

    #[test]
    fn test_stats_bust_counts_darts_not_score() {
        let mut stats = PlayerStats::default();
        stats.record(&turn(&[60, 60], true, 40), ScoringUnit::PerDart);
        assert_eq!(stats.darts_thrown, 2);
        assert_eq!(stats.turns_played, 1);
        assert_eq!(stats.total_scored, 0);
        assert_eq!(stats.checkout_attempts, 1);
        assert_eq!(stats.checkout_successes, 0);
    }

    #[test]
    fn test_stats_per_turn_counts_three_darts() {
        let mut stats = PlayerStats::default();
        stats.record(&turn(&[100], false, 401), ScoringUnit::PerTurn);
        assert_eq!(stats.darts_thrown, 3);
        assert_eq!(stats.max_dart_value, 0);
        assert_eq!(stats.max_turn_total, 100);
    }

    #[test]
    fn test_average_and_checkout_rate() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.average(), 0.0);
        assert_eq!(stats.checkout_rate(), 0.0);
        stats.record(&turn(&[60, 60, 60], false, 141), ScoringUnit::PerDart);
        stats.record(&turn(&[60, 60, 60], true, 141), ScoringUnit::PerDart);
        stats.record(&turn(&[141], false, 0), ScoringUnit::PerDart);
        assert_eq!(stats.average(), 107.0);
        assert_eq!(stats.checkout_rate(), 0.5);
    }

    #[test]
    fn test_replay_restores_remaining() {
        let mut player = PlayerEntry::new("p".into(), "Ann".into(), 101);
        player.turns.push(turn(&[50], false, 51));
        player.turns.push(turn(&[60], true, 51));
        player.replay(ScoringUnit::PerDart);
        assert_eq!(player.remaining_score, 51);
        assert_eq!(player.stats.turns_played, 2);
        assert!(!player.finished);
    }

    #[test]
    fn test_next_unfinished_wraps() {
        let mut game = Match {
            id: "m".into(),
            config: MatchConfig::default(),
            active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            completed_at: None,
            current_player_index: 0,
            turn_counter: 0,
            players: ["a", "b", "c"]
                .iter()
                .map(|n| PlayerEntry::new(n.to_string(), n.to_string(), 501))
                .collect(),
        };
        game.players[0].finished = true;
        assert_eq!(game.next_unfinished_after(2), 1);
        assert_eq!(game.next_unfinished_after(1), 2);
    }
}

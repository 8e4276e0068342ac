//! CLI configuration management.
//!
//! Reads environment variables (optionally from a `.env` file loaded by the
//! binary) and merges command-line overrides on top.

use darts_core::{
    game::{DEFAULT_STARTING_SCORE, MatchConfig, ScoringUnit, WinRule},
    league::PointsSystem,
    services::{SeatRandomizer, Services},
};
use std::str::FromStr;
use std::sync::Arc;

/// Values given on the command line; each one beats its environment variable
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub players: Option<String>,
    pub starting_score: Option<u32>,
    pub win_rule: Option<WinRule>,
    pub scoring_unit: Option<ScoringUnit>,
    pub minimum_checkout: Option<u32>,
    pub seed: Option<u64>,
}

/// Complete CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Roster in entry order
    pub players: Vec<String>,
    /// Rules for every match played or spawned
    pub match_config: MatchConfig,
    /// League points per result
    pub points: PointsSystem,
    /// Seed for reproducible seating and seeding; random when absent
    pub seed: Option<u64>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values parsed from command-line flags
    ///
    /// # Returns
    ///
    /// * `Result<CliConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if no roster was given or a variable can't be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let roster = overrides
            .players
            .or_else(|| std::env::var("DARTS_PLAYERS").ok())
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "DARTS_PLAYERS".to_string(),
                hint: "Pass --players A,B,C or set DARTS_PLAYERS".to_string(),
            })?;

        let win_rule = match overrides.win_rule {
            Some(rule) => rule,
            None => parse_env_strict("DARTS_WIN_RULE", WinRule::ExactZero)?,
        };
        let scoring_unit = match overrides.scoring_unit {
            Some(unit) => unit,
            None => parse_env_strict("DARTS_SCORING_UNIT", ScoringUnit::PerDart)?,
        };

        let match_config = MatchConfig {
            starting_score: overrides
                .starting_score
                .unwrap_or_else(|| parse_env_or("DARTS_STARTING_SCORE", DEFAULT_STARTING_SCORE)),
            win_rule,
            scoring_unit,
            minimum_checkout: overrides
                .minimum_checkout
                .unwrap_or_else(|| parse_env_or("DARTS_MIN_CHECKOUT", 0)),
        };

        let defaults = PointsSystem::default();
        let points = PointsSystem {
            win: parse_env_or("LEAGUE_POINTS_WIN", defaults.win),
            draw: parse_env_or("LEAGUE_POINTS_DRAW", defaults.draw),
            loss: parse_env_or("LEAGUE_POINTS_LOSS", defaults.loss),
        };

        let seed = overrides
            .seed
            .or_else(|| std::env::var("DARTS_SEED").ok().and_then(|v| v.parse().ok()));

        Ok(CliConfig {
            players: parse_roster(&roster),
            match_config,
            points,
            seed,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::Invalid {
                var: "DARTS_PLAYERS".to_string(),
                reason: "Must name at least one player".to_string(),
            });
        }

        self.match_config
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "DARTS_STARTING_SCORE".to_string(),
                reason,
            })?;

        if self.points.win < self.points.draw || self.points.draw < self.points.loss {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_POINTS_WIN".to_string(),
                reason: format!(
                    "Expected win >= draw >= loss, got {}/{}/{}",
                    self.points.win, self.points.draw, self.points.loss
                ),
            });
        }

        Ok(())
    }

    /// Services for the engine; a configured seed fixes seating and draws
    pub fn services(&self) -> Services {
        match self.seed {
            Some(seed) => Services::default().with_random(Arc::new(SeatRandomizer::seeded(seed))),
            None => Services::default(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Split a comma-separated roster, dropping surrounding whitespace.
///
/// Empty entries are kept so the engine can name them `Player N`.
pub fn parse_roster(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|name| name.trim().to_string()).collect()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`parse_env_or`], but a set variable that doesn't parse is an error
fn parse_env_strict<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
            var: key.to_string(),
            reason,
        }),
        Err(_) => Ok(default),
    }
}

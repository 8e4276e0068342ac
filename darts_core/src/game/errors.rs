//! Match error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by score engine operations.
///
/// All of them are rejections: the match is left exactly as it was.
#[derive(Debug, Clone, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum MatchError {
    #[error("invalid dart value: {0}")]
    InvalidDartValue(String),

    #[error("invalid turn: {0}")]
    InvalidTurnComposition(String),

    #[error("match is not active")]
    MatchNotActive,

    #[error("no turns to undo")]
    NoTurnsToUndo,

    #[error("need at least one player")]
    EmptyRoster,

    #[error("invalid match configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for score engine operations
pub type MatchResult<T> = Result<T, MatchError>;

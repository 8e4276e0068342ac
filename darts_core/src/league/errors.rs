//! League error types.

use thiserror::Error;

use crate::game::MatchError;

/// League errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    #[error("League is not accepting registration changes")]
    LeagueNotInRegistration,

    #[error("League is not in progress")]
    LeagueNotInProgress,

    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("Invalid matches per pairing {0}: must be 1 or 2")]
    InvalidMatchesPerPairing(u8),

    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("Match already in progress")]
    MatchAlreadyInProgress,

    #[error("Match already completed")]
    MatchAlreadyCompleted,

    #[error("Winner {0} is not playing in this fixture")]
    WinnerNotInFixture(String),

    #[error("Match is not linked to this fixture")]
    MatchNotLinked,

    #[error("Match has no winner yet")]
    MatchNotDecided,

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result type for league operations
pub type LeagueResult<T> = Result<T, LeagueError>;

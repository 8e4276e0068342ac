//! Tournament error types.

use thiserror::Error;

use crate::game::MatchError;

/// Tournament errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Tournament is not accepting registration changes")]
    TournamentNotInRegistration,

    #[error("Tournament is not in progress")]
    TournamentNotInProgress,

    #[error("Slot is not ready")]
    SlotNotReady,

    #[error("Match already in progress")]
    MatchAlreadyInProgress,

    #[error("Match already completed")]
    MatchAlreadyCompleted,

    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("Invalid slot count {0}: must be a power of two of at least 2")]
    InvalidSlotCount(usize),

    #[error("Tournament is full ({max_slots} slots)")]
    TournamentFull { max_slots: usize },

    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    #[error("Winner {0} is not an occupant of this slot")]
    WinnerNotInSlot(String),

    #[error("Match is not linked to this slot")]
    MatchNotLinked,

    #[error("Match has no winner yet")]
    MatchNotDecided,

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Invalid member spec '{spec}': {reason}")]
    InvalidMemberSpec { spec: String, reason: String },

    #[error("Turn budget must be at least 1 (got {0})")]
    InvalidTurnBudget(u32),

    #[error("A council needs at least 2 members (got {0})")]
    TooFewMembers(usize),

    #[error("Follow-up content cannot be empty")]
    EmptyFollowUp,

    #[error("Debate {0} is read-only")]
    ReadOnly(String),

    #[error("Round {0} has not concluded yet; resume it before adding a follow-up")]
    RoundOpen(u32),

    #[error("Round {got} cannot follow round {last}")]
    RoundOutOfOrder { last: u32, got: u32 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

//! Persistence ports
//!
//! Aggregates (debates, councils) are created, read and replaced whole.
//! Turns, responses and rankings are append-only logs keyed by their
//! owning aggregate.

use async_trait::async_trait;
use colloquy_domain::{Council, CouncilId, Debate, DebateId, Ranking, Response, Turn};
use thiserror::Error;

/// Errors surfaced by repository adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    pub fn debate_not_found(id: &DebateId) -> Self {
        RepositoryError::NotFound {
            kind: "debate",
            id: id.to_string(),
        }
    }

    pub fn council_not_found(id: &CouncilId) -> Self {
        RepositoryError::NotFound {
            kind: "council",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

#[async_trait]
pub trait DebateRepository: Send + Sync {
    async fn create_debate(&self, debate: &Debate) -> Result<(), RepositoryError>;

    async fn get_debate(&self, id: &DebateId) -> Result<Debate, RepositoryError>;

    async fn update_debate(&self, debate: &Debate) -> Result<(), RepositoryError>;

    /// All debates, newest first
    async fn list_debates(&self) -> Result<Vec<Debate>, RepositoryError>;

    async fn add_turn(&self, turn: &Turn) -> Result<(), RepositoryError>;

    /// Turns of `id` ordered by turn number
    async fn list_turns(&self, id: &DebateId) -> Result<Vec<Turn>, RepositoryError>;
}

#[async_trait]
pub trait CouncilRepository: Send + Sync {
    async fn create_council(&self, council: &Council) -> Result<(), RepositoryError>;

    async fn get_council(&self, id: &CouncilId) -> Result<Council, RepositoryError>;

    async fn update_council(&self, council: &Council) -> Result<(), RepositoryError>;

    /// All councils, newest first
    async fn list_councils(&self) -> Result<Vec<Council>, RepositoryError>;

    /// Append one stage's responses as a batch
    async fn add_responses(&self, responses: &[Response]) -> Result<(), RepositoryError>;

    async fn list_responses(&self, id: &CouncilId) -> Result<Vec<Response>, RepositoryError>;

    /// Append one stage's rankings as a batch
    async fn add_rankings(&self, rankings: &[Ranking]) -> Result<(), RepositoryError>;

    async fn list_rankings(&self, id: &CouncilId) -> Result<Vec<Ranking>, RepositoryError>;
}

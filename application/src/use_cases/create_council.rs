//! Create Council use case
//!
//! Validates members and chairman, resolves the chairman's model, and
//! persists a pending council. Nothing is persisted when validation fails.

use crate::config::ModelCatalog;
use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::repository::{CouncilRepository, RepositoryError};
use crate::ports::templates::TemplateCatalog;
use crate::use_cases::participants::{ParticipantError, ParticipantResolver};
use colloquy_domain::{Council, DomainError, MemberSpec, Topic};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while creating a council
#[derive(Error, Debug)]
pub enum CreateCouncilError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Participant(#[from] ParticipantError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Input for the CreateCouncil use case
#[derive(Debug, Clone)]
pub struct CreateCouncilInput {
    pub topic: String,
    pub members: Vec<MemberSpec>,
    /// Explicit chairman; derived from the first member when absent
    pub chairman: Option<MemberSpec>,
}

impl CreateCouncilInput {
    pub fn new(topic: impl Into<String>, members: Vec<MemberSpec>) -> Self {
        Self {
            topic: topic.into(),
            members,
            chairman: None,
        }
    }

    pub fn with_chairman(mut self, chairman: MemberSpec) -> Self {
        self.chairman = Some(chairman);
        self
    }
}

/// Use case for creating a council
pub struct CreateCouncilUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: CouncilRepository + ?Sized,
{
    gateway: Arc<G>,
    templates: Arc<T>,
    repository: Arc<R>,
    models: ModelCatalog,
}

impl<G, T, R> CreateCouncilUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: CouncilRepository + ?Sized,
{
    pub fn new(gateway: Arc<G>, templates: Arc<T>, repository: Arc<R>, models: ModelCatalog) -> Self {
        Self {
            gateway,
            templates,
            repository,
            models,
        }
    }

    pub async fn execute(&self, input: CreateCouncilInput) -> Result<Council, CreateCouncilError> {
        let topic = Topic::parse(&input.topic)?;
        let Some(first) = input.members.first().filter(|_| input.members.len() >= 2) else {
            return Err(DomainError::TooFewMembers(input.members.len()).into());
        };

        let resolver = ParticipantResolver {
            gateway: self.gateway.as_ref(),
            templates: self.templates.as_ref(),
            models: &self.models,
        };
        let everyone = || input.members.iter().chain(input.chairman.as_ref());
        resolver.check_backends(everyone()).await?;
        resolver.check_personas(everyone())?;

        let members = resolver.resolve(&input.members);
        let chairman = resolver.resolve_chairman(input.chairman.as_ref(), first);
        let council = Council::new(topic, chairman, members)?;
        self.repository.create_council(&council).await?;

        info!(
            "Created council {} with {} members (chairman {})",
            council.id,
            council.members.len(),
            council.chairman.label()
        );
        Ok(council)
    }
}

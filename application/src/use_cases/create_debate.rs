//! Create Debate use case
//!
//! Validates the configuration and persists a pending debate. Nothing is
//! persisted when validation fails.

use crate::config::ModelCatalog;
use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::repository::{DebateRepository, RepositoryError};
use crate::ports::templates::TemplateCatalog;
use crate::use_cases::participants::{ParticipantError, ParticipantResolver};
use colloquy_domain::{Debate, DomainError, MemberSpec, Topic};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Style used when none is requested
pub const DEFAULT_STYLE: &str = "classic";

/// Turns per agent per round when none is requested
pub const DEFAULT_TURNS_PER_AGENT: u32 = 3;

/// Errors that can occur while creating a debate
#[derive(Error, Debug)]
pub enum CreateDebateError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Participant(#[from] ParticipantError),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Input for the CreateDebate use case
#[derive(Debug, Clone)]
pub struct CreateDebateInput {
    pub topic: String,
    pub agent_a: MemberSpec,
    pub agent_b: MemberSpec,
    pub style: String,
    pub turns_per_agent: u32,
    /// Read-only debates reject follow-ups
    pub read_only: bool,
}

impl CreateDebateInput {
    pub fn new(topic: impl Into<String>, agent_a: MemberSpec, agent_b: MemberSpec) -> Self {
        Self {
            topic: topic.into(),
            agent_a,
            agent_b,
            style: DEFAULT_STYLE.to_string(),
            turns_per_agent: DEFAULT_TURNS_PER_AGENT,
            read_only: false,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_turns_per_agent(mut self, turns: u32) -> Self {
        self.turns_per_agent = turns;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Use case for creating a debate
pub struct CreateDebateUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: DebateRepository + ?Sized,
{
    gateway: Arc<G>,
    templates: Arc<T>,
    repository: Arc<R>,
    models: ModelCatalog,
}

impl<G, T, R> CreateDebateUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: DebateRepository + ?Sized,
{
    pub fn new(gateway: Arc<G>, templates: Arc<T>, repository: Arc<R>, models: ModelCatalog) -> Self {
        Self {
            gateway,
            templates,
            repository,
            models,
        }
    }

    pub async fn execute(&self, input: CreateDebateInput) -> Result<Debate, CreateDebateError> {
        let topic = Topic::parse(&input.topic)?;
        if input.turns_per_agent == 0 {
            return Err(DomainError::InvalidTurnBudget(input.turns_per_agent).into());
        }

        let resolver = ParticipantResolver {
            gateway: self.gateway.as_ref(),
            templates: self.templates.as_ref(),
            models: &self.models,
        };
        let specs = [input.agent_a, input.agent_b];
        resolver.check_backends(&specs).await?;
        resolver.check_personas(&specs)?;
        if self.templates.style(&input.style).is_none() {
            return Err(CreateDebateError::UnknownStyle(input.style));
        }

        let agents = resolver.resolve(&specs);
        let count = agents.len();
        let mut agents = agents.into_iter();
        let (Some(agent_a), Some(agent_b)) = (agents.next(), agents.next()) else {
            return Err(DomainError::TooFewMembers(count).into());
        };

        let mut debate = Debate::new(topic, agent_a, agent_b, input.style, input.turns_per_agent)?;
        debate.read_only = input.read_only;
        self.repository.create_debate(&debate).await?;

        info!(
            "Created debate {} ({} vs {}, style {}, {} turns per agent)",
            debate.id,
            debate.agent_a.name,
            debate.agent_b.name,
            debate.style,
            debate.turns_per_agent
        );
        Ok(debate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MemoryRepository, ScriptedGateway, StaticTemplates};

    fn use_case(
        gateway: ScriptedGateway,
    ) -> (
        CreateDebateUseCase<ScriptedGateway, StaticTemplates, MemoryRepository>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::new());
        let uc = CreateDebateUseCase::new(
            Arc::new(gateway),
            Arc::new(StaticTemplates),
            Arc::clone(&repository),
            ModelCatalog::new(),
        );
        (uc, repository)
    }

    fn ok_gateway() -> ScriptedGateway {
        ScriptedGateway::new(|_, _| Ok(String::new()))
    }

    fn input() -> CreateDebateInput {
        CreateDebateInput::new(
            "Monorepo or polyrepo?",
            "claude".parse().unwrap(),
            "codex@skeptic".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_creates_pending_debate() {
        let (uc, repo) = use_case(ok_gateway());
        let debate = uc.execute(input().with_turns_per_agent(2)).await.unwrap();

        assert_eq!(debate.status, colloquy_domain::Status::Pending);
        assert_eq!(debate.agent_a.name, "claude");
        assert_eq!(debate.agent_b.persona, "skeptic");
        assert_eq!(debate.turns_per_agent, 2);
        assert_eq!(repo.debate_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected_without_persisting() {
        let (uc, repo) = use_case(ok_gateway().with_unknown("codex"));
        let err = uc.execute(input()).await.unwrap_err();
        assert!(matches!(
            err,
            CreateDebateError::Participant(ParticipantError::UnknownBackend(_))
        ));
        assert_eq!(repo.debate_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_backend_rejected() {
        let (uc, repo) = use_case(ok_gateway().with_unavailable("claude"));
        let err = uc.execute(input()).await.unwrap_err();
        assert!(matches!(
            err,
            CreateDebateError::Participant(ParticipantError::BackendUnavailable(_))
        ));
        assert_eq!(repo.debate_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_style_and_persona_rejected() {
        let (uc, _) = use_case(ok_gateway());
        let err = uc.execute(input().with_style("opera")).await.unwrap_err();
        assert!(matches!(err, CreateDebateError::UnknownStyle(s) if s == "opera"));

        let mut bad = input();
        bad.agent_a = "claude@pirate".parse().unwrap();
        let err = uc.execute(bad).await.unwrap_err();
        assert!(matches!(
            err,
            CreateDebateError::Participant(ParticipantError::UnknownPersona(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_turn_budget_and_topic() {
        let (uc, repo) = use_case(ok_gateway());
        let err = uc.execute(input().with_turns_per_agent(0)).await.unwrap_err();
        assert!(matches!(
            err,
            CreateDebateError::Invalid(DomainError::InvalidTurnBudget(0))
        ));

        let mut blank = input();
        blank.topic = "   ".into();
        let err = uc.execute(blank).await.unwrap_err();
        assert!(matches!(err, CreateDebateError::Invalid(DomainError::EmptyTopic)));
        assert_eq!(repo.debate_count(), 0);
    }

    #[tokio::test]
    async fn test_same_backend_twice_is_disambiguated() {
        let (uc, _) = use_case(ok_gateway());
        let debate = uc
            .execute(CreateDebateInput::new(
                "x",
                "claude".parse().unwrap(),
                "claude".parse().unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(debate.agent_b.name, "claude #2");
    }
}

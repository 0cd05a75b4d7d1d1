//! Application layer for colloquy
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BackendModels, BehaviorConfig, ModelCatalog};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation_gateway::{GatewayError, Generation, GenerationGateway, GenerationRequest},
    progress::{
        CouncilProgressNotifier, CouncilStage, DebateProgressNotifier, NoCouncilProgress,
        NoDebateProgress,
    },
    repository::{CouncilRepository, DebateRepository, RepositoryError},
    templates::TemplateCatalog,
};
pub use use_cases::create_council::{CreateCouncilError, CreateCouncilInput, CreateCouncilUseCase};
pub use use_cases::create_debate::{
    CreateDebateError, CreateDebateInput, CreateDebateUseCase, DEFAULT_STYLE,
    DEFAULT_TURNS_PER_AGENT,
};
pub use use_cases::detect_consensus::{ConsensusCheck, DetectConsensusUseCase};
pub use use_cases::participants::ParticipantError;
pub use use_cases::run_council::{RunCouncilError, RunCouncilOutput, RunCouncilUseCase};
pub use use_cases::run_debate::{RunDebateError, RunDebateOutput, RunDebateUseCase};

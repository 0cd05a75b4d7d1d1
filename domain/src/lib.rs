//! Domain layer for colloquy
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Two agents alternate turns in rounds. Each round ends with a vote-based
//! [`Conclusion`]; a round can stop early when the [`consensus`] heuristics
//! fire and the confirming call agrees.
//!
//! ## Council
//!
//! N members answer independently, rank each other's anonymized answers,
//! and a chairman synthesizes the result weighted by the [`AggregateRanking`].

pub mod agent;
pub mod config;
pub mod consensus;
pub mod core;
pub mod council;
pub mod debate;
pub mod prompt;

// Re-export commonly used types
pub use agent::{Agent, MemberSpec, disambiguate_names};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{AGREEMENT_PHRASES, has_agreement_signal, is_confirmation, trailing_agreement};
pub use core::{
    error::DomainError,
    id::{AgentId, CouncilId, DebateId, ResponseId, USER_AGENT_ID},
    status::Status,
    topic::Topic,
};
pub use council::{
    AggregateRanking, AnonymizedResponses, Council, CouncilSynthesis, FollowUp, Ranking,
    Response, aggregate_rankings, parse_ranking, ranking_reasoning, synthesis_unavailable,
};
pub use debate::{
    Conclusion, Debate, Side, Turn, TurnKind, Vote, condensed_transcript, first_speaker,
    parse_vote_response, render_transcript,
};
pub use prompt::{
    CouncilPromptTemplate, DebatePromptTemplate, FollowUpContext, Style, TemplateVars,
    render_template,
};

//! Council domain: N members answer, anonymously rank each other, and a
//! chairman synthesizes.

pub mod aggregate;
pub mod entities;
pub mod ranking;

pub use aggregate::{AggregateRanking, aggregate_rankings};
pub use entities::{
    Council, CouncilSynthesis, FollowUp, Ranking, Response, synthesis_unavailable,
};
pub use ranking::{
    AnonymizedResponse, AnonymizedResponses, FINAL_RANKING_HEADER, LABELS, matching_strategy,
    parse_ranking, ranking_reasoning, ranking_section,
};

//! Council aggregate and per-stage records

use crate::agent::Agent;
use crate::core::error::DomainError;
use crate::core::id::{AgentId, CouncilId, ResponseId};
use crate::core::status::Status;
use crate::core::topic::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An N-party council (Aggregate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Council {
    pub id: CouncilId,
    pub topic: Topic,
    pub chairman: Agent,
    pub members: Vec<Agent>,
    pub status: Status,
    /// One synthesis per finished round, ordered by round
    #[serde(default)]
    pub syntheses: Vec<CouncilSynthesis>,
    /// Follow-up questions that opened rounds after the first
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Council {
    pub fn new(topic: Topic, chairman: Agent, members: Vec<Agent>) -> Result<Self, DomainError> {
        if members.len() < 2 {
            return Err(DomainError::TooFewMembers(members.len()));
        }
        let now = Utc::now();
        Ok(Self {
            id: CouncilId::generate(),
            topic,
            chairman,
            members,
            status: Status::Pending,
            syntheses: Vec::new(),
            follow_ups: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn member(&self, id: &AgentId) -> Option<&Agent> {
        self.members.iter().find(|m| m.id == *id)
    }

    pub fn member_name<'a>(&'a self, id: &'a AgentId) -> &'a str {
        self.member(id).map(|m| m.name.as_str()).unwrap_or(id.as_str())
    }

    pub fn last_round(&self) -> u32 {
        let synthesized = self.syntheses.last().map(|s| s.round).unwrap_or(0);
        let asked = self.follow_ups.last().map(|f| f.round).unwrap_or(0);
        synthesized.max(asked)
    }

    /// The round the next pipeline run works on.
    ///
    /// Round 1 until the first synthesis exists; after that, only a pending
    /// follow-up opens a new round.
    pub fn pending_round(&self) -> Option<u32> {
        let synthesized = self.syntheses.last().map(|s| s.round).unwrap_or(0);
        let round = self.last_round().max(1);
        (round > synthesized).then_some(round)
    }

    pub fn follow_up_for(&self, round: u32) -> Option<&FollowUp> {
        self.follow_ups.iter().find(|f| f.round == round)
    }

    pub fn synthesis_for(&self, round: u32) -> Option<&CouncilSynthesis> {
        self.syntheses.iter().find(|s| s.round == round)
    }

    /// Record a follow-up question opening the next round.
    pub fn add_follow_up(&mut self, content: impl Into<String>) -> Result<u32, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyFollowUp);
        }
        let round = self.last_round() + 1;
        self.follow_ups.push(FollowUp {
            round,
            content: content.trim().to_string(),
            created_at: Utc::now(),
        });
        self.touch();
        Ok(round)
    }

    pub fn start(&mut self) {
        self.status = Status::InProgress;
        self.error = None;
        self.touch();
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = Status::Failed;
        self.error = Some(error.into());
        self.touch();
    }

    /// Append the round's synthesis and mark the council completed.
    pub fn complete(&mut self, synthesis: CouncilSynthesis) -> Result<(), DomainError> {
        let last = self.syntheses.last().map(|s| s.round).unwrap_or(0);
        if synthesis.round <= last {
            return Err(DomainError::RoundOutOfOrder {
                last,
                got: synthesis.round,
            });
        }
        self.syntheses.push(synthesis);
        self.status = Status::Completed;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A question that opened a later council round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub round: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One member's independent Stage-1 answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub council_id: CouncilId,
    pub member_id: AgentId,
    pub round: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Response {
    pub fn new(
        council_id: CouncilId,
        member_id: AgentId,
        round: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: ResponseId::generate(),
            council_id,
            member_id,
            round,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One member's Stage-2 ordering of the round's responses (best first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub council_id: CouncilId,
    pub reviewer_id: AgentId,
    pub round: u32,
    pub ordering: Vec<ResponseId>,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

impl Ranking {
    pub fn new(
        council_id: CouncilId,
        reviewer_id: AgentId,
        round: u32,
        ordering: Vec<ResponseId>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            council_id,
            reviewer_id,
            round,
            ordering,
            reasoning: reasoning.into(),
            created_at: Utc::now(),
        }
    }

    /// 1-based position of `response` in this ranking
    pub fn position_of(&self, response: &ResponseId) -> Option<usize> {
        self.ordering.iter().position(|id| id == response).map(|i| i + 1)
    }
}

/// The chairman's Stage-3 result for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilSynthesis {
    pub round: u32,
    pub chairman_id: AgentId,
    pub content: String,
    /// The chairman call failed and `content` is the fallback text
    #[serde(default)]
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl CouncilSynthesis {
    pub fn new(round: u32, chairman_id: AgentId, content: impl Into<String>) -> Self {
        Self {
            round,
            chairman_id,
            content: content.into(),
            fallback: false,
            created_at: Utc::now(),
        }
    }

    pub fn unavailable(round: u32, chairman_id: AgentId, reason: &str) -> Self {
        Self {
            fallback: true,
            ..Self::new(round, chairman_id, synthesis_unavailable(reason))
        }
    }
}

/// Fallback synthesis text used when the chairman cannot produce one.
pub fn synthesis_unavailable(reason: &str) -> String {
    format!(
        "Synthesis unavailable: the chairman could not produce a synthesis ({}). \
         Review the individual responses and the aggregate ranking instead.",
        reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn council() -> Council {
        let members = vec![
            Agent::new("claude", "claude", None, "neutral").with_id("m1"),
            Agent::new("codex", "codex", None, "skeptic").with_id("m2"),
        ];
        Council::new(
            Topic::parse("Adopt Rust?").unwrap(),
            Agent::new("claude", "claude", Some("opus".into()), "neutral").with_id("chair"),
            members,
        )
        .unwrap()
    }

    #[test]
    fn test_council_requires_two_members() {
        let result = Council::new(
            Topic::parse("x").unwrap(),
            Agent::new("c", "c", None, "p"),
            vec![Agent::new("m", "m", None, "p")],
        );
        assert_eq!(result.unwrap_err(), DomainError::TooFewMembers(1));
    }

    #[test]
    fn test_pending_round_progression() {
        let mut c = council();
        assert_eq!(c.pending_round(), Some(1));

        c.complete(CouncilSynthesis::new(1, AgentId::new("chair"), "done"))
            .unwrap();
        assert_eq!(c.status, Status::Completed);
        assert_eq!(c.pending_round(), None);

        let round = c.add_follow_up("And for embedded?").unwrap();
        assert_eq!(round, 2);
        assert_eq!(c.pending_round(), Some(2));
        assert_eq!(c.follow_up_for(2).unwrap().content, "And for embedded?");
    }

    #[test]
    fn test_synthesis_rounds_must_increase() {
        let mut c = council();
        c.complete(CouncilSynthesis::new(1, AgentId::new("chair"), "a"))
            .unwrap();
        assert!(c
            .complete(CouncilSynthesis::new(1, AgentId::new("chair"), "b"))
            .is_err());
    }

    #[test]
    fn test_unavailable_synthesis_marker() {
        let s = CouncilSynthesis::unavailable(1, AgentId::new("chair"), "timeout");
        assert!(s.fallback);
        assert!(s.content.starts_with("Synthesis unavailable"));
        assert!(s.content.contains("timeout"));
    }

    #[test]
    fn test_ranking_position() {
        let ranking = Ranking::new(
            CouncilId::new("c"),
            AgentId::new("m1"),
            1,
            vec![ResponseId::new("r2"), ResponseId::new("r1")],
            "",
        );
        assert_eq!(ranking.position_of(&ResponseId::new("r2")), Some(1));
        assert_eq!(ranking.position_of(&ResponseId::new("r1")), Some(2));
        assert_eq!(ranking.position_of(&ResponseId::new("r3")), None);
    }

    #[test]
    fn test_member_name_lookup() {
        let c = council();
        assert_eq!(c.member_name(&AgentId::new("m2")), "codex");
        let unknown = AgentId::new("ghost");
        assert_eq!(c.member_name(&unknown), "ghost");
    }
}

//! Debate aggregate, turns and per-round conclusions

use super::vote::Vote;
use crate::agent::Agent;
use crate::core::error::DomainError;
use crate::core::id::{AgentId, DebateId};
use crate::core::status::Status;
use crate::core::topic::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which of the two debaters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// A two-party debate (Aggregate)
///
/// Turns are stored separately (append-only) and are not part of the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debate {
    pub id: DebateId,
    pub topic: Topic,
    pub agent_a: Agent,
    pub agent_b: Agent,
    /// Style identifier resolved through the template catalog
    pub style: String,
    /// Number of turns each agent takes per round
    pub turns_per_agent: u32,
    pub status: Status,
    /// Read-only debates cannot receive follow-ups
    #[serde(default)]
    pub read_only: bool,
    /// One conclusion per finished round, ordered by round
    #[serde(default)]
    pub conclusions: Vec<Conclusion>,
    /// Error message of the failure that moved the debate to `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debate {
    pub fn new(
        topic: Topic,
        agent_a: Agent,
        agent_b: Agent,
        style: impl Into<String>,
        turns_per_agent: u32,
    ) -> Result<Self, DomainError> {
        if turns_per_agent == 0 {
            return Err(DomainError::InvalidTurnBudget(turns_per_agent));
        }
        let now = Utc::now();
        Ok(Self {
            id: DebateId::generate(),
            topic,
            agent_a,
            agent_b,
            style: style.into(),
            turns_per_agent,
            status: Status::Pending,
            read_only: false,
            conclusions: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Total agent turns in one round
    pub fn turns_per_round(&self) -> u32 {
        self.turns_per_agent * 2
    }

    pub fn agent(&self, side: Side) -> &Agent {
        match side {
            Side::A => &self.agent_a,
            Side::B => &self.agent_b,
        }
    }

    pub fn side_of(&self, agent_id: &AgentId) -> Option<Side> {
        if *agent_id == self.agent_a.id {
            Some(Side::A)
        } else if *agent_id == self.agent_b.id {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Display name for a turn author, `"User"` for follow-ups
    pub fn speaker_name<'a>(&'a self, agent_id: &'a AgentId) -> &'a str {
        match self.side_of(agent_id) {
            Some(side) => &self.agent(side).name,
            None if agent_id.is_user() => "User",
            None => agent_id.as_str(),
        }
    }

    pub fn last_concluded_round(&self) -> u32 {
        self.conclusions.last().map(|c| c.round).unwrap_or(0)
    }

    pub fn conclusion_for(&self, round: u32) -> Option<&Conclusion> {
        self.conclusions.iter().find(|c| c.round == round)
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

    /// Append a round conclusion and mark the debate completed.
    pub fn conclude(&mut self, conclusion: Conclusion) -> Result<(), DomainError> {
        let last = self.last_concluded_round();
        if conclusion.round <= last {
            return Err(DomainError::RoundOutOfOrder {
                last,
                got: conclusion.round,
            });
        }
        self.conclusions.push(conclusion);
        self.status = Status::Completed;
        self.touch();
        Ok(())
    }

    /// Build the `"user"` turn that opens the next round.
    ///
    /// The new round is one greater than the highest round seen in either the
    /// turn log or the conclusions. Rejected while a round has turns but no
    /// conclusion yet.
    pub fn follow_up_turn(
        &self,
        turns: &[Turn],
        content: impl Into<String>,
    ) -> Result<Turn, DomainError> {
        if self.read_only {
            return Err(DomainError::ReadOnly(self.id.to_string()));
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyFollowUp);
        }
        let open = latest_round(turns);
        let concluded = self.last_concluded_round();
        if open > concluded {
            return Err(DomainError::RoundOpen(open));
        }
        let round = concluded + 1;
        Ok(Turn::new(
            self.id.clone(),
            AgentId::user(),
            next_turn_number(turns),
            round,
            content.trim(),
        ))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One utterance in a debate (Entity, append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub debate_id: DebateId,
    /// Authoring agent, or `"user"` for follow-ups
    pub agent_id: AgentId,
    /// Debate-wide sequence number starting at 1
    pub number: u32,
    pub round: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        debate_id: DebateId,
        agent_id: AgentId,
        number: u32,
        round: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            debate_id,
            agent_id,
            number,
            round,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.agent_id.is_user()
    }
}

/// Next debate-wide turn number (1 for an empty log)
pub fn next_turn_number(turns: &[Turn]) -> u32 {
    turns.iter().map(|t| t.number).max().unwrap_or(0) + 1
}

/// Highest round present in the turn log (0 for an empty log)
pub fn latest_round(turns: &[Turn]) -> u32 {
    turns.iter().map(|t| t.round).max().unwrap_or(0)
}

/// Turns authored by an agent (not the user) in `round`, in log order
pub fn agent_turns_in_round(turns: &[Turn], round: u32) -> Vec<&Turn> {
    turns
        .iter()
        .filter(|t| t.round == round && !t.is_user())
        .collect()
}

/// Per-round outcome of a debate (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    pub round: u32,
    /// True iff both agents voted to agree
    pub agreed: bool,
    pub summary: String,
    /// Populated only when not agreed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_a_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_b_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_a_vote: Option<Vote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_b_vote: Option<Vote>,
    /// The round stopped because consensus was detected mid-round
    #[serde(default)]
    pub early_consensus: bool,
    pub created_at: DateTime<Utc>,
}

impl Conclusion {
    /// Build a conclusion from the two (possibly missing) votes.
    ///
    /// A missing vote counts as not agreeing.
    pub fn from_votes(
        round: u32,
        agent_a_vote: Option<Vote>,
        agent_b_vote: Option<Vote>,
        summary: impl Into<String>,
        early_consensus: bool,
    ) -> Self {
        let agreed = matches!(
            (&agent_a_vote, &agent_b_vote),
            (Some(a), Some(b)) if a.agrees && b.agrees
        );
        let (agent_a_position, agent_b_position) = if agreed {
            (None, None)
        } else {
            (
                agent_a_vote.as_ref().map(|v| v.reasoning.clone()),
                agent_b_vote.as_ref().map(|v| v.reasoning.clone()),
            )
        };
        Self {
            round,
            agreed,
            summary: summary.into(),
            agent_a_position,
            agent_b_position,
            agent_a_vote,
            agent_b_vote,
            early_consensus,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debate() -> Debate {
        Debate::new(
            Topic::parse("Tabs or spaces?").unwrap(),
            Agent::new("claude", "claude", None, "neutral").with_id("a"),
            Agent::new("codex", "codex", None, "skeptic").with_id("b"),
            "classic",
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_new_debate_is_pending() {
        let d = debate();
        assert_eq!(d.status, Status::Pending);
        assert_eq!(d.turns_per_round(), 4);
        assert!(d.conclusions.is_empty());
    }

    #[test]
    fn test_zero_turn_budget_rejected() {
        let result = Debate::new(
            Topic::parse("x").unwrap(),
            Agent::new("a", "a", None, "p"),
            Agent::new("b", "b", None, "p"),
            "classic",
            0,
        );
        assert_eq!(result.unwrap_err(), DomainError::InvalidTurnBudget(0));
    }

    #[test]
    fn test_speaker_names() {
        let d = debate();
        assert_eq!(d.speaker_name(&AgentId::new("a")), "claude");
        assert_eq!(d.speaker_name(&AgentId::new("b")), "codex");
        assert_eq!(d.speaker_name(&AgentId::user()), "User");
    }

    #[test]
    fn test_agreed_requires_both_votes() {
        let c = Conclusion::from_votes(
            1,
            Some(Vote::agree("fine")),
            Some(Vote::agree("fine too")),
            "summary",
            false,
        );
        assert!(c.agreed);
        assert!(c.agent_a_position.is_none());

        let c = Conclusion::from_votes(1, Some(Vote::agree("fine")), None, "summary", false);
        assert!(!c.agreed);

        let c = Conclusion::from_votes(
            1,
            Some(Vote::agree("fine")),
            Some(Vote::disagree("no")),
            "summary",
            false,
        );
        assert!(!c.agreed);
        assert_eq!(c.agent_a_position.as_deref(), Some("fine"));
        assert_eq!(c.agent_b_position.as_deref(), Some("no"));
    }

    #[test]
    fn test_conclusion_rounds_must_increase() {
        let mut d = debate();
        d.conclude(Conclusion::from_votes(1, None, None, "s", false))
            .unwrap();
        assert_eq!(d.status, Status::Completed);

        let err = d
            .conclude(Conclusion::from_votes(1, None, None, "s", false))
            .unwrap_err();
        assert_eq!(err, DomainError::RoundOutOfOrder { last: 1, got: 1 });
    }

    #[test]
    fn test_follow_up_opens_next_round() {
        let mut d = debate();
        let turns = vec![
            Turn::new(d.id.clone(), AgentId::new("a"), 1, 1, "one"),
            Turn::new(d.id.clone(), AgentId::new("b"), 2, 1, "two"),
        ];
        d.conclude(Conclusion::from_votes(1, None, None, "s", false))
            .unwrap();
        let turn = d.follow_up_turn(&turns, "  What about YAML?  ").unwrap();
        assert!(turn.is_user());
        assert_eq!(turn.number, 3);
        assert_eq!(turn.round, 2);
        assert_eq!(turn.content, "What about YAML?");
    }

    #[test]
    fn test_follow_up_rejected_while_round_open() {
        let mut d = debate();
        let mut turns = vec![Turn::new(d.id.clone(), AgentId::new("a"), 1, 1, "one")];
        assert_eq!(
            d.follow_up_turn(&turns, "next?").unwrap_err(),
            DomainError::RoundOpen(1)
        );

        d.conclude(Conclusion::from_votes(1, None, None, "s", false))
            .unwrap();
        let follow_up = d.follow_up_turn(&turns, "next?").unwrap();
        turns.push(follow_up);
        assert_eq!(
            d.follow_up_turn(&turns, "and another?").unwrap_err(),
            DomainError::RoundOpen(2)
        );
    }

    #[test]
    fn test_speaker_name_for_unknown_author() {
        let d = debate();
        let stranger = AgentId::new("ghost");
        assert_eq!(d.speaker_name(&stranger), "ghost");
    }

    #[test]
    fn test_follow_up_rejected_when_read_only_or_empty() {
        let mut d = debate();
        assert_eq!(
            d.follow_up_turn(&[], "   ").unwrap_err(),
            DomainError::EmptyFollowUp
        );
        d.read_only = true;
        assert!(matches!(
            d.follow_up_turn(&[], "more").unwrap_err(),
            DomainError::ReadOnly(_)
        ));
    }

    #[test]
    fn test_turn_log_helpers() {
        let id = DebateId::new("d");
        let turns = vec![
            Turn::new(id.clone(), AgentId::new("a"), 1, 1, "x"),
            Turn::new(id.clone(), AgentId::new("b"), 2, 1, "y"),
            Turn::new(id.clone(), AgentId::user(), 3, 2, "z"),
            Turn::new(id.clone(), AgentId::new("a"), 4, 2, "w"),
        ];
        assert_eq!(next_turn_number(&turns), 5);
        assert_eq!(latest_round(&turns), 2);
        assert_eq!(agent_turns_in_round(&turns, 2).len(), 1);
        assert_eq!(next_turn_number(&[]), 1);
    }
}

//! Consensus Detector
//!
//! Lexical pre-filter over the last two turns of the active round, then one
//! strict YES/NO confirming call to agent A's backend.

use crate::config::BehaviorConfig;
use crate::ports::generation_gateway::GenerationGateway;
use crate::use_cases::shared::generate;
use colloquy_domain::{
    Debate, DebatePromptTemplate, Side, Turn, condensed_transcript,
    debate::agent_turns_in_round, is_confirmation, trailing_agreement,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Turns included in the condensed transcript of the confirming call
const CONDENSED_TURNS: usize = 6;
/// Per-turn character budget in the condensed transcript
const CONDENSED_CHARS_PER_TURN: usize = 400;

/// Result of one consensus check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusCheck {
    /// Fewer than two agreeing turns; no call was made
    NoSignal,
    /// Both turns signalled agreement but the confirming call did not say yes
    Rejected,
    Confirmed,
}

impl ConsensusCheck {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConsensusCheck::Confirmed)
    }

    /// Whether a confirming call was made
    pub fn was_checked(&self) -> bool {
        !matches!(self, ConsensusCheck::NoSignal)
    }
}

/// Use case for detecting consensus in a debate round
pub struct DetectConsensusUseCase<G: GenerationGateway + ?Sized> {
    gateway: Arc<G>,
    behavior: BehaviorConfig,
    cancellation_token: CancellationToken,
}

impl<G: GenerationGateway + ?Sized> DetectConsensusUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            behavior: BehaviorConfig::default(),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Check `round` of `debate` given the full turn log.
    ///
    /// A gateway error counts as "not confirmed".
    pub async fn execute(&self, debate: &Debate, turns: &[Turn], round: u32) -> ConsensusCheck {
        let round_turns = agent_turns_in_round(turns, round);
        if trailing_agreement(&round_turns).is_none() {
            return ConsensusCheck::NoSignal;
        }

        debug!("Agreement signals in round {} of debate {}", round, debate.id);
        let condensed =
            condensed_transcript(debate, turns, CONDENSED_TURNS, CONDENSED_CHARS_PER_TURN);
        let prompt =
            DebatePromptTemplate::consensus_check_prompt(debate.topic.content(), &condensed);

        match generate(
            self.gateway.as_ref(),
            debate.agent(Side::A),
            prompt,
            &self.behavior,
            &self.cancellation_token,
        )
        .await
        {
            Ok(reply) if is_confirmation(&reply) => {
                info!("Consensus confirmed in round {} of debate {}", round, debate.id);
                ConsensusCheck::Confirmed
            }
            Ok(reply) => {
                debug!("Consensus not confirmed: {}", reply);
                ConsensusCheck::Rejected
            }
            Err(e) => {
                warn!("Consensus confirmation failed: {}", e);
                ConsensusCheck::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation_gateway::GatewayError;
    use crate::use_cases::test_support::ScriptedGateway;
    use colloquy_domain::{Agent, AgentId, Topic};

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

    fn turns(debate: &Debate, contents: &[&str]) -> Vec<Turn> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let author = if i % 2 == 0 { "a" } else { "b" };
                Turn::new(debate.id.clone(), AgentId::new(author), i as u32 + 1, 1, *c)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_signal_makes_no_call() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| Ok("YES".into())));
        let detector = DetectConsensusUseCase::new(Arc::clone(&gateway));
        let d = debate();
        let t = turns(&d, &["Tabs.", "Spaces.", "I agree on consistency.", "Still spaces."]);

        assert_eq!(detector.execute(&d, &t, 1).await, ConsensusCheck::NoSignal);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_both_signals_and_yes_confirms() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| Ok("Yes, they converged.".into())));
        let detector = DetectConsensusUseCase::new(Arc::clone(&gateway));
        let d = debate();
        let t = turns(&d, &["Tabs.", "Spaces.", "I agree, spaces.", "Agreed, we can conclude."]);

        assert_eq!(detector.execute(&d, &t, 1).await, ConsensusCheck::Confirmed);
        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].backend, "claude");
        assert!(calls[0].prompt.contains("YES or NO"));
    }

    #[tokio::test]
    async fn test_no_reply_rejects() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| Ok("NO. They are polite.".into())));
        let detector = DetectConsensusUseCase::new(gateway);
        let d = debate();
        let t = turns(&d, &["I agree", "You're right"]);
        assert_eq!(detector.execute(&d, &t, 1).await, ConsensusCheck::Rejected);
    }

    #[tokio::test]
    async fn test_gateway_error_rejects() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| {
            Err(GatewayError::RequestFailed("boom".into()))
        }));
        let detector = DetectConsensusUseCase::new(gateway);
        let d = debate();
        let t = turns(&d, &["I agree", "You're right"]);
        let check = detector.execute(&d, &t, 1).await;
        assert_eq!(check, ConsensusCheck::Rejected);
        assert!(check.was_checked());
    }
}

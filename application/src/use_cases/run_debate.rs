//! Run Debate use case (Debate Orchestrator)
//!
//! Executes the active round of a debate turn by turn, stops early on
//! confirmed consensus, and closes the round with the vote-based conclusion
//! protocol.
//!
//! ```text
//! pending ──run──▶ in_progress ──round ends──▶ completed
//!                      │                          │
//!                      └──turn fails──▶ failed    └──follow-up──▶ (next run)
//! ```
//!
//! The active round is derived from the turn log and the conclusions, so an
//! interrupted round resumes where it stopped with the same speaker order.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation_gateway::{GatewayError, GenerationGateway};
use crate::ports::progress::{DebateProgressNotifier, NoDebateProgress};
use crate::ports::repository::{DebateRepository, RepositoryError};
use crate::ports::templates::TemplateCatalog;
use crate::use_cases::detect_consensus::DetectConsensusUseCase;
use crate::use_cases::shared::generate;
use colloquy_domain::debate::{agent_turns_in_round, latest_round, next_turn_number, speaker_at};
use colloquy_domain::{
    Conclusion, Debate, DebateId, DebatePromptTemplate, DomainError, Side, Style, TemplateVars,
    Turn, TurnKind, Vote, first_speaker, parse_vote_response, render_transcript,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Turns in total before the consensus check may run
const MIN_TURNS_FOR_CONSENSUS: usize = 4;

/// Errors that can occur while running a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Debate {0} has no pending round; add a follow-up first")]
    NoPendingRound(DebateId),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error("Generation failed for {agent}: {source}")]
    Generation {
        agent: String,
        #[source]
        source: GatewayError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl RunDebateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RunDebateError::Generation {
                source: GatewayError::Cancelled,
                ..
            }
        )
    }
}

/// Result of one run: the updated debate and its full turn log
#[derive(Debug, Clone)]
pub struct RunDebateOutput {
    pub debate: Debate,
    pub turns: Vec<Turn>,
}

impl RunDebateOutput {
    /// The conclusion of the round this run closed
    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.debate.conclusions.last()
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: DebateRepository + ?Sized,
{
    gateway: Arc<G>,
    templates: Arc<T>,
    repository: Arc<R>,
    behavior: BehaviorConfig,
    cancellation_token: CancellationToken,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G, T, R> RunDebateUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
    R: DebateRepository + ?Sized,
{
    pub fn new(gateway: Arc<G>, templates: Arc<T>, repository: Arc<R>) -> Self {
        Self {
            gateway,
            templates,
            repository,
            behavior: BehaviorConfig::default(),
            cancellation_token: CancellationToken::new(),
            conversation_logger: Arc::new(NoConversationLogger),
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

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Append a `"user"` follow-up turn that opens the next round.
    ///
    /// The round itself runs on the next [`execute`](Self::execute).
    pub async fn follow_up(
        &self,
        id: &DebateId,
        content: &str,
    ) -> Result<Turn, RunDebateError> {
        let debate = self.repository.get_debate(id).await?;
        let turns = self.repository.list_turns(id).await?;
        let turn = debate.follow_up_turn(&turns, content)?;
        self.repository.add_turn(&turn).await?;

        info!(
            "Follow-up added to debate {} (round {}, turn {})",
            id, turn.round, turn.number
        );
        self.conversation_logger.log(ConversationEvent::new(
            "follow_up",
            serde_json::json!({
                "debate_id": id.as_str(),
                "round": turn.round,
                "number": turn.number,
                "content": turn.content,
            }),
        ));
        Ok(turn)
    }

    /// Execute the pending round with default (no-op) progress
    pub async fn execute(&self, id: &DebateId) -> Result<RunDebateOutput, RunDebateError> {
        self.execute_with_progress(id, &NoDebateProgress).await
    }

    /// Execute the pending round with progress callbacks
    pub async fn execute_with_progress(
        &self,
        id: &DebateId,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<RunDebateOutput, RunDebateError> {
        let mut debate = self.repository.get_debate(id).await?;
        let mut turns = self.repository.list_turns(id).await?;

        let round = pending_round(&debate, &turns)
            .ok_or_else(|| RunDebateError::NoPendingRound(id.clone()))?;
        let style = self
            .templates
            .style(&debate.style)
            .ok_or_else(|| RunDebateError::UnknownStyle(debate.style.clone()))?;

        debate.start();
        self.repository.update_debate(&debate).await?;

        let turns_per_round = debate.turns_per_round();
        let done = agent_turns_in_round(&turns, round).len() as u32;
        info!(
            "Debate {}: round {} ({} of {} turns done)",
            debate.id, round, done, turns_per_round
        );
        progress.on_round_start(&debate, round, first_speaker(&debate.id, round));

        let consensus = DetectConsensusUseCase::new(Arc::clone(&self.gateway))
            .with_behavior(self.behavior.clone())
            .with_cancellation(self.cancellation_token.clone());

        let mut early_consensus = false;
        for index in done..turns_per_round {
            let side = speaker_at(&debate.id, round, index);
            let kind = TurnKind::for_index(index, turns_per_round, style.has_questioner());
            let number = next_turn_number(&turns);

            progress.on_turn_start(&debate, debate.agent(side), number);
            let prompt = self.turn_prompt(&debate, &turns, &style, side, kind);

            let content = match generate(
                self.gateway.as_ref(),
                debate.agent(side),
                prompt,
                &self.behavior,
                &self.cancellation_token,
            )
            .await
            {
                Ok(content) => content,
                Err(e) => {
                    let agent = debate.agent(side).name.clone();
                    warn!("Debate {} failed at turn {} ({}): {}", debate.id, number, agent, e);
                    debate.fail(format!("{}: {}", agent, e));
                    self.repository.update_debate(&debate).await?;
                    return Err(RunDebateError::Generation { agent, source: e });
                }
            };

            let turn = Turn::new(
                debate.id.clone(),
                debate.agent(side).id.clone(),
                number,
                round,
                content,
            );
            self.repository.add_turn(&turn).await?;
            debug!(
                "Turn {} ({}) by {}",
                turn.number,
                kind.as_str(),
                debate.agent(side).name
            );
            self.log_turn(&debate, &turn, kind);
            progress.on_turn_complete(&debate, &turn);
            turns.push(turn);

            if turns.len() >= MIN_TURNS_FOR_CONSENSUS {
                let check = consensus.execute(&debate, &turns, round).await;
                if check.was_checked() {
                    progress.on_consensus_check(&debate, check.is_confirmed());
                }
                if check.is_confirmed() {
                    early_consensus = true;
                    break;
                }
            }
        }

        progress.on_conclusion_start(&debate, round);
        let conclusion = self.conclude(&debate, &turns, round, early_consensus).await;
        debate.conclude(conclusion.clone())?;
        self.repository.update_debate(&debate).await?;

        info!(
            "Debate {} round {} concluded (agreed: {}, early: {})",
            debate.id, round, conclusion.agreed, conclusion.early_consensus
        );
        self.log_conclusion(&debate, &conclusion);
        progress.on_conclusion(&debate, &conclusion);

        Ok(RunDebateOutput { debate, turns })
    }

    fn turn_prompt(
        &self,
        debate: &Debate,
        turns: &[Turn],
        style: &Style,
        side: Side,
        kind: TurnKind,
    ) -> String {
        let agent = debate.agent(side);
        let opponent = debate.agent(side.other());
        let persona = self.templates.persona(&agent.persona).unwrap_or_else(|| {
            warn!("Persona '{}' not found; using no persona text", agent.persona);
            String::new()
        });
        let transcript = render_transcript(debate, turns);
        let previous = turns.last().map(|t| t.content.as_str()).unwrap_or("");

        let vars = TemplateVars {
            topic: debate.topic.content(),
            agent: &agent.name,
            opponent: &opponent.name,
            previous,
            transcript: &transcript,
        };
        DebatePromptTemplate::turn_prompt(&persona, style, kind, &vars)
    }

    /// Votes (concurrently) and summary; failures fall back, never error.
    async fn conclude(
        &self,
        debate: &Debate,
        turns: &[Turn],
        round: u32,
        early_consensus: bool,
    ) -> Conclusion {
        let transcript = render_transcript(debate, turns);

        let (vote_a, vote_b) = tokio::join!(
            self.request_vote(debate, Side::A, &transcript),
            self.request_vote(debate, Side::B, &transcript),
        );
        let agreed = matches!((&vote_a, &vote_b), (Some(a), Some(b)) if a.agrees && b.agrees);

        let prompt =
            DebatePromptTemplate::summary_prompt(debate.topic.content(), &transcript, agreed);
        let summary = match generate(
            self.gateway.as_ref(),
            debate.agent(Side::A),
            prompt,
            &self.behavior,
            &self.cancellation_token,
        )
        .await
        {
            Ok(summary) if !summary.is_empty() => summary,
            Ok(_) => {
                warn!("Empty summary for debate {}; using fallback", debate.id);
                DebatePromptTemplate::fallback_summary(agreed)
            }
            Err(e) => {
                warn!("Summary failed for debate {}: {}; using fallback", debate.id, e);
                DebatePromptTemplate::fallback_summary(agreed)
            }
        };

        Conclusion::from_votes(round, vote_a, vote_b, summary, early_consensus)
    }

    async fn request_vote(&self, debate: &Debate, side: Side, transcript: &str) -> Option<Vote> {
        let agent = debate.agent(side);
        let opponent = debate.agent(side.other());
        let prompt = DebatePromptTemplate::vote_prompt(
            debate.topic.content(),
            &agent.name,
            &opponent.name,
            transcript,
        );

        match generate(
            self.gateway.as_ref(),
            agent,
            prompt,
            &self.behavior,
            &self.cancellation_token,
        )
        .await
        {
            Ok(reply) => {
                let vote = parse_vote_response(&reply);
                debug!("{} votes {}", agent.name, if vote.agrees { "AGREE" } else { "DISAGREE" });
                self.conversation_logger.log(ConversationEvent::new(
                    "vote",
                    serde_json::json!({
                        "debate_id": debate.id.as_str(),
                        "agent": agent.name,
                        "agrees": vote.agrees,
                        "reasoning": vote.reasoning,
                    }),
                ));
                Some(vote)
            }
            Err(e) => {
                warn!("Vote from {} failed: {}", agent.name, e);
                None
            }
        }
    }

    fn log_turn(&self, debate: &Debate, turn: &Turn, kind: TurnKind) {
        self.conversation_logger.log(ConversationEvent::new(
            "turn",
            serde_json::json!({
                "debate_id": debate.id.as_str(),
                "agent": debate.speaker_name(&turn.agent_id),
                "round": turn.round,
                "number": turn.number,
                "kind": kind.as_str(),
                "content": turn.content,
            }),
        ));
    }

    fn log_conclusion(&self, debate: &Debate, conclusion: &Conclusion) {
        self.conversation_logger.log(ConversationEvent::new(
            "conclusion",
            serde_json::json!({
                "debate_id": debate.id.as_str(),
                "round": conclusion.round,
                "agreed": conclusion.agreed,
                "early_consensus": conclusion.early_consensus,
                "summary": conclusion.summary,
            }),
        ));
    }
}

/// The round the next run works on, if any.
///
/// Turns beyond the last conclusion (agent turns of an interrupted round or a
/// follow-up) keep their round open; a debate without turns starts round 1.
fn pending_round(debate: &Debate, turns: &[Turn]) -> Option<u32> {
    let concluded = debate.last_concluded_round();
    let latest = latest_round(turns);
    if latest > concluded {
        Some(latest)
    } else if concluded == 0 {
        Some(1)
    } else {
        None
    }
}

//! Run Council use case (Council Orchestrator)
//!
//! Runs the three-stage pipeline for the council's pending round:
//!
//! 1. **Responses**: every member answers independently (concurrent).
//! 2. **Rankings**: every member ranks the anonymized answers (concurrent).
//! 3. **Synthesis**: the chairman reconciles the answers, weighted by the
//!    aggregate ranking.
//!
//! Failing members are dropped from a stage; only a stage with zero results
//! fails the council. A failing chairman yields fallback text instead.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation_gateway::{GatewayError, GenerationGateway};
use crate::ports::progress::{CouncilProgressNotifier, CouncilStage, NoCouncilProgress};
use crate::ports::repository::{CouncilRepository, RepositoryError};
use crate::ports::templates::TemplateCatalog;
use crate::use_cases::shared::generate;
use colloquy_domain::{
    Agent, AggregateRanking, AnonymizedResponses, Council, CouncilId, CouncilPromptTemplate,
    CouncilSynthesis, DomainError, FollowUpContext, Ranking, Response, aggregate_rankings,
    parse_ranking, ranking_reasoning,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running a council
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("Council {0} has no pending round; add a follow-up first")]
    NoPendingRound(CouncilId),

    #[error("Council {0} already has a pending round")]
    RoundPending(CouncilId),

    #[error("All members failed to respond in round {0}")]
    NoResponses(u32),

    #[error("All members failed to rank in round {0}")]
    NoRankings(u32),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct RunCouncilOutput {
    pub council: Council,
    pub round: u32,
    pub responses: Vec<Response>,
    pub rankings: Vec<Ranking>,
    pub aggregate: Vec<AggregateRanking>,
}

impl RunCouncilOutput {
    pub fn synthesis(&self) -> Option<&CouncilSynthesis> {
        self.council.synthesis_for(self.round)
    }
}

/// Use case for running a council
pub struct RunCouncilUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized + 'static,
    T: TemplateCatalog + ?Sized,
    R: CouncilRepository + ?Sized,
{
    gateway: Arc<G>,
    templates: Arc<T>,
    repository: Arc<R>,
    behavior: BehaviorConfig,
    cancellation_token: CancellationToken,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G, T, R> RunCouncilUseCase<G, T, R>
where
    G: GenerationGateway + ?Sized + 'static,
    T: TemplateCatalog + ?Sized,
    R: CouncilRepository + ?Sized,
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

    /// Record a follow-up question opening the next round.
    ///
    /// Rejected while a round is still pending.
    pub async fn follow_up(&self, id: &CouncilId, content: &str) -> Result<u32, RunCouncilError> {
        let mut council = self.repository.get_council(id).await?;
        if council.pending_round().is_some() {
            return Err(RunCouncilError::RoundPending(id.clone()));
        }
        let round = council.add_follow_up(content)?;
        self.repository.update_council(&council).await?;
        info!("Follow-up added to council {} (round {})", id, round);
        Ok(round)
    }

    /// Execute the pending round with default (no-op) progress
    pub async fn execute(&self, id: &CouncilId) -> Result<RunCouncilOutput, RunCouncilError> {
        self.execute_with_progress(id, &NoCouncilProgress).await
    }

    /// Execute the pending round with progress callbacks
    pub async fn execute_with_progress(
        &self,
        id: &CouncilId,
        progress: &dyn CouncilProgressNotifier,
    ) -> Result<RunCouncilOutput, RunCouncilError> {
        let mut council = self.repository.get_council(id).await?;
        let round = council
            .pending_round()
            .ok_or_else(|| RunCouncilError::NoPendingRound(id.clone()))?;

        council.start();
        self.repository.update_council(&council).await?;
        info!(
            "Council {}: round {} with {} members",
            council.id,
            round,
            council.members.len()
        );

        // Stage 1: Responses (reused when a previous attempt persisted them)
        let existing: Vec<Response> = self
            .repository
            .list_responses(id)
            .await?
            .into_iter()
            .filter(|r| r.round == round)
            .collect();
        let responses = if existing.is_empty() {
            let responses = self.stage_responses(&council, round, progress).await;
            if responses.is_empty() {
                return Err(self.fail(&mut council, RunCouncilError::NoResponses(round)).await);
            }
            self.repository.add_responses(&responses).await?;
            responses
        } else {
            debug!("Reusing {} stored responses for round {}", existing.len(), round);
            existing
        };

        // Stage 2: Rankings
        let anonymized = AnonymizedResponses::new(&responses);
        if anonymized.len() < responses.len() {
            warn!(
                "Only the first {} of {} responses are shown to reviewers",
                anonymized.len(),
                responses.len()
            );
        }
        let existing: Vec<Ranking> = self
            .repository
            .list_rankings(id)
            .await?
            .into_iter()
            .filter(|r| r.round == round)
            .collect();
        let rankings = if existing.is_empty() {
            let rankings = self
                .stage_rankings(&council, round, &anonymized, progress)
                .await;
            if rankings.is_empty() {
                return Err(self.fail(&mut council, RunCouncilError::NoRankings(round)).await);
            }
            self.repository.add_rankings(&rankings).await?;
            rankings
        } else {
            debug!("Reusing {} stored rankings for round {}", existing.len(), round);
            existing
        };

        let aggregate = aggregate_rankings(&responses, &rankings);

        // Stage 3: Synthesis
        let synthesis = self
            .stage_synthesis(&council, round, &responses, &aggregate, progress)
            .await;
        council.complete(synthesis.clone())?;
        self.repository.update_council(&council).await?;
        progress.on_synthesis(&synthesis);

        info!(
            "Council {} round {} completed ({} responses, {} rankings{})",
            council.id,
            round,
            responses.len(),
            rankings.len(),
            if synthesis.fallback { ", fallback synthesis" } else { "" }
        );

        Ok(RunCouncilOutput {
            council,
            round,
            responses,
            rankings,
            aggregate,
        })
    }

    async fn fail(&self, council: &mut Council, error: RunCouncilError) -> RunCouncilError {
        warn!("Council {} failed: {}", council.id, error);
        council.fail(error.to_string());
        if let Err(e) = self.repository.update_council(council).await {
            return e.into();
        }
        error
    }

    /// Spawn one task per member and return results in member order.
    async fn fan_out(
        &self,
        members: &[Agent],
        prompt_for: impl Fn(&Agent) -> String,
    ) -> Vec<(usize, Result<String, GatewayError>)> {
        let mut join_set = JoinSet::new();

        for (index, member) in members.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let member = member.clone();
            let prompt = prompt_for(&member);
            let behavior = self.behavior.clone();
            let token = self.cancellation_token.clone();

            join_set.spawn(async move {
                let result = generate(gateway.as_ref(), &member, prompt, &behavior, &token).await;
                (index, result)
            });
        }

        let mut results = Vec::with_capacity(members.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(e) => warn!("Task join error: {}", e),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results
    }

    async fn stage_responses(
        &self,
        council: &Council,
        round: u32,
        progress: &dyn CouncilProgressNotifier,
    ) -> Vec<Response> {
        info!("Stage 1: Responses");
        progress.on_stage_start(CouncilStage::Responses, council.members.len());

        let previous = council.syntheses.last();
        let follow_up = council.follow_up_for(round);
        let context = match (previous, follow_up) {
            (Some(synthesis), Some(question)) => Some(FollowUpContext {
                previous_synthesis: &synthesis.content,
                question: &question.content,
            }),
            _ => None,
        };

        let results = self
            .fan_out(&council.members, |member| {
                let persona = self.templates.persona(&member.persona).unwrap_or_default();
                CouncilPromptTemplate::perspective_prompt(&persona, council.topic.content(), context)
            })
            .await;

        let mut responses = Vec::new();
        for (index, result) in results {
            let member = &council.members[index];
            match result.and_then(non_empty) {
                Ok(content) => {
                    let response =
                        Response::new(council.id.clone(), member.id.clone(), round, content);
                    debug!("{} responded ({} chars)", member.name, response.content.len());
                    self.conversation_logger.log(ConversationEvent::new(
                        "council_response",
                        serde_json::json!({
                            "council_id": council.id.as_str(),
                            "round": round,
                            "member": member.name,
                            "content": response.content,
                        }),
                    ));
                    progress.on_response(member, &response);
                    responses.push(response);
                }
                Err(e) => {
                    warn!("Member {} failed to respond: {}", member.name, e);
                    progress.on_member_failed(CouncilStage::Responses, member, &e.to_string());
                }
            }
        }

        progress.on_stage_complete(CouncilStage::Responses);
        responses
    }

    async fn stage_rankings(
        &self,
        council: &Council,
        round: u32,
        anonymized: &AnonymizedResponses,
        progress: &dyn CouncilProgressNotifier,
    ) -> Vec<Ranking> {
        info!("Stage 2: Rankings");
        progress.on_stage_start(CouncilStage::Rankings, council.members.len());

        let block = anonymized.render();
        let question = council.follow_up_for(round).map(|f| f.content.as_str());
        let prompt =
            CouncilPromptTemplate::ranking_prompt(council.topic.content(), question, &block);

        let results = self.fan_out(&council.members, |_| prompt.clone()).await;

        let mut rankings = Vec::new();
        for (index, result) in results {
            let member = &council.members[index];
            match result.and_then(non_empty) {
                Ok(reply) => {
                    let ordering = parse_ranking(&reply, anonymized);
                    let ranking = Ranking::new(
                        council.id.clone(),
                        member.id.clone(),
                        round,
                        ordering,
                        ranking_reasoning(&reply),
                    );
                    debug!("{} ranked {} responses", member.name, ranking.ordering.len());
                    self.conversation_logger.log(ConversationEvent::new(
                        "ranking",
                        serde_json::json!({
                            "council_id": council.id.as_str(),
                            "round": round,
                            "reviewer": member.name,
                            "ordering": ranking
                                .ordering
                                .iter()
                                .map(|id| id.as_str())
                                .collect::<Vec<_>>(),
                            "raw": reply,
                        }),
                    ));
                    progress.on_ranking(member, &ranking);
                    rankings.push(ranking);
                }
                Err(e) => {
                    warn!("Member {} failed to rank: {}", member.name, e);
                    progress.on_member_failed(CouncilStage::Rankings, member, &e.to_string());
                }
            }
        }

        progress.on_stage_complete(CouncilStage::Rankings);
        rankings
    }

    async fn stage_synthesis(
        &self,
        council: &Council,
        round: u32,
        responses: &[Response],
        aggregate: &[AggregateRanking],
        progress: &dyn CouncilProgressNotifier,
    ) -> CouncilSynthesis {
        info!("Stage 3: Synthesis");
        progress.on_stage_start(CouncilStage::Synthesis, 1);

        let labelled: Vec<(String, String)> = responses
            .iter()
            .map(|r| (council.member_name(&r.member_id).to_string(), r.content.clone()))
            .collect();
        let ranked: Vec<(String, f64)> = aggregate
            .iter()
            .map(|a| (council.member_name(&a.member_id).to_string(), a.avg_rank))
            .collect();
        let question = council.follow_up_for(round).map(|f| f.content.as_str());
        let prompt = CouncilPromptTemplate::synthesis_prompt(
            council.topic.content(),
            question,
            &labelled,
            &ranked,
        );

        let synthesis = match generate(
            self.gateway.as_ref(),
            &council.chairman,
            prompt,
            &self.behavior,
            &self.cancellation_token,
        )
        .await
        .and_then(non_empty)
        {
            Ok(content) => CouncilSynthesis::new(round, council.chairman.id.clone(), content),
            Err(e) => {
                warn!("Chairman {} failed: {}; using fallback", council.chairman.name, e);
                CouncilSynthesis::unavailable(round, council.chairman.id.clone(), &e.to_string())
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "synthesis",
            serde_json::json!({
                "council_id": council.id.as_str(),
                "round": round,
                "chairman": council.chairman.name,
                "fallback": synthesis.fallback,
                "content": synthesis.content,
            }),
        ));
        progress.on_stage_complete(CouncilStage::Synthesis);
        synthesis
    }
}

fn non_empty(content: String) -> Result<String, GatewayError> {
    if content.is_empty() {
        Err(GatewayError::EmptyResponse)
    } else {
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MemoryRepository, ScriptedGateway, StaticTemplates};
    use colloquy_domain::{AgentId, Status, Topic};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    type UseCase = RunCouncilUseCase<ScriptedGateway, StaticTemplates, MemoryRepository>;

    const PERSPECTIVE: &str = "Provide your perspective";
    const RANKING: &str = "FINAL RANKING:\n1. Response X";
    const CHAIRMAN: &str = "You are the chairman";

    async fn setup(
        gateway: ScriptedGateway,
    ) -> (UseCase, Arc<ScriptedGateway>, Arc<MemoryRepository>, CouncilId) {
        let gateway = Arc::new(gateway);
        let repository = Arc::new(MemoryRepository::new());
        let council = Council::new(
            Topic::parse("Should we adopt Rust?").unwrap(),
            Agent::new("claude:opus (chairman)", "claude", Some("opus".into()), "neutral")
                .with_id("chair"),
            vec![
                Agent::new("claude", "claude", None, "neutral").with_id("m1"),
                Agent::new("codex", "codex", None, "skeptic").with_id("m2"),
                Agent::new("gemini", "gemini", None, "optimist").with_id("m3"),
            ],
        )
        .unwrap();
        let id = council.id.clone();
        repository.create_council(&council).await.unwrap();
        let uc = RunCouncilUseCase::new(
            Arc::clone(&gateway),
            Arc::new(StaticTemplates),
            Arc::clone(&repository),
        );
        (uc, gateway, repository, id)
    }

    /// Members answer with their backend name, every reviewer ranks B > A > C
    fn scripted(
        fail: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> ScriptedGateway {
        ScriptedGateway::new(move |backend, prompt| {
            if fail(backend, prompt) {
                return Err(GatewayError::RequestFailed(format!("{} down", backend)));
            }
            if prompt.contains(PERSPECTIVE) {
                Ok(format!("{} thinks yes", backend))
            } else if prompt.contains(RANKING) {
                Ok("B is sharpest.\n\nFINAL RANKING:\n1. Response B\n2. Response A\n3. Response C"
                    .into())
            } else if prompt.contains(CHAIRMAN) {
                Ok("Adopt Rust for new services.".into())
            } else {
                Ok("?".into())
            }
        })
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl Recording {
        fn count(&self, prefix: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.starts_with(prefix))
                .count()
        }
    }

    impl CouncilProgressNotifier for Recording {
        fn on_response(&self, member: &Agent, _response: &Response) {
            self.events.lock().unwrap().push(format!("response {}", member.name));
        }
        fn on_ranking(&self, member: &Agent, _ranking: &Ranking) {
            self.events.lock().unwrap().push(format!("ranking {}", member.name));
        }
        fn on_member_failed(&self, stage: CouncilStage, member: &Agent, _error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failed {} {}", stage, member.name));
        }
        fn on_synthesis(&self, _synthesis: &CouncilSynthesis) {
            self.events.lock().unwrap().push("synthesis".into());
        }
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let (uc, gateway, repo, id) = setup(scripted(|_, _| false)).await;
        let progress = Recording::default();

        let out = uc.execute_with_progress(&id, &progress).await.unwrap();

        assert_eq!(out.council.status, Status::Completed);
        let members: Vec<&str> = out.responses.iter().map(|r| r.member_id.as_str()).collect();
        assert_eq!(members, vec!["m1", "m2", "m3"]);
        assert_eq!(out.rankings.len(), 3);
        assert_eq!(out.rankings[0].ordering.len(), 3);

        // B (codex) is always first, A (claude) second, C (gemini) last
        assert_eq!(out.aggregate[0].member_id, AgentId::new("m2"));
        assert_eq!(out.aggregate[0].avg_rank, 1.0);
        assert_eq!(out.aggregate[2].member_id, AgentId::new("m3"));

        let synthesis = out.synthesis().unwrap();
        assert_eq!(synthesis.content, "Adopt Rust for new services.");
        assert!(!synthesis.fallback);
        assert_eq!(synthesis.chairman_id, AgentId::new("chair"));

        assert_eq!(progress.count("response"), 3);
        assert_eq!(progress.count("ranking"), 3);
        assert_eq!(progress.count("synthesis"), 1);
        assert_eq!(repo.list_responses(&id).await.unwrap().len(), 3);
        assert_eq!(repo.list_rankings(&id).await.unwrap().len(), 3);

        let chair_call = gateway
            .calls()
            .into_iter()
            .find(|c| c.prompt.contains(CHAIRMAN))
            .unwrap();
        assert_eq!(chair_call.model.as_deref(), Some("opus"));
        assert!(chair_call.prompt.contains("--- codex ---\ncodex thinks yes"));
        assert!(chair_call.prompt.contains("1. codex (1.00)"));
    }

    #[tokio::test]
    async fn test_ranking_prompt_is_anonymized() {
        let (uc, gateway, _, id) = setup(scripted(|_, _| false)).await;
        uc.execute(&id).await.unwrap();

        let ranking_prompt = gateway
            .calls()
            .into_iter()
            .find(|c| c.prompt.contains(RANKING))
            .unwrap()
            .prompt;
        assert!(ranking_prompt.contains("Response A:\nclaude thinks yes"));
        assert!(ranking_prompt.contains("Response C:\ngemini thinks yes"));
        assert!(!ranking_prompt.contains("--- claude ---"));
    }

    #[tokio::test]
    async fn test_failing_member_is_dropped() {
        let (uc, _, _, id) = setup(scripted(|backend, _| backend == "gemini")).await;
        let progress = Recording::default();

        let out = uc.execute_with_progress(&id, &progress).await.unwrap();

        assert_eq!(out.council.status, Status::Completed);
        assert_eq!(out.responses.len(), 2);
        assert_eq!(out.rankings.len(), 2);
        assert_eq!(progress.count("failed responses gemini"), 1);
        assert_eq!(progress.count("failed rankings gemini"), 1);
        // Only two labels exist, so "Response C" is ignored
        assert!(out.rankings.iter().all(|r| r.ordering.len() == 2));
    }

    #[tokio::test]
    async fn test_all_members_failing_fails_council() {
        let (uc, _, repo, id) = setup(scripted(|_, prompt| prompt.contains(PERSPECTIVE))).await;

        let err = uc.execute(&id).await.unwrap_err();
        assert!(matches!(err, RunCouncilError::NoResponses(1)));

        let council = repo.get_council(&id).await.unwrap();
        assert_eq!(council.status, Status::Failed);
        assert!(council.syntheses.is_empty());
        assert!(repo.list_responses(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_rankings_fails_council() {
        let (uc, _, repo, id) = setup(scripted(|_, prompt| prompt.contains(RANKING))).await;

        let err = uc.execute(&id).await.unwrap_err();
        assert!(matches!(err, RunCouncilError::NoRankings(1)));
        assert_eq!(repo.get_council(&id).await.unwrap().status, Status::Failed);
    }

    #[tokio::test]
    async fn test_chairman_failure_uses_fallback() {
        let (uc, _, repo, id) = setup(scripted(|_, prompt| prompt.contains(CHAIRMAN))).await;

        let out = uc.execute(&id).await.unwrap();

        assert_eq!(out.council.status, Status::Completed);
        assert_eq!(out.council.syntheses.len(), 1);
        let synthesis = &out.council.syntheses[0];
        assert!(synthesis.fallback);
        assert!(synthesis.content.starts_with("Synthesis unavailable"));
        assert_eq!(
            repo.get_council(&id).await.unwrap().syntheses[0].content,
            synthesis.content
        );
    }

    #[tokio::test]
    async fn test_unparseable_rankings_fall_back_to_submission_order() {
        let gateway = ScriptedGateway::new(|backend, prompt| {
            if prompt.contains(PERSPECTIVE) {
                Ok(format!("{} answer", backend))
            } else if prompt.contains(RANKING) {
                Ok("They are all equally good.".into())
            } else {
                Ok("Synthesis.".into())
            }
        });
        let (uc, _, _, id) = setup(gateway).await;

        let out = uc.execute(&id).await.unwrap();

        let submission: Vec<_> = out.responses.iter().map(|r| r.id.clone()).collect();
        assert!(out.rankings.iter().all(|r| r.ordering == submission));
        let members: Vec<&str> = out.aggregate.iter().map(|a| a.member_id.as_str()).collect();
        assert_eq!(members, vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_follow_up_round_carries_previous_synthesis() {
        let (uc, gateway, _, id) = setup(scripted(|_, _| false)).await;
        uc.execute(&id).await.unwrap();

        let round = uc.follow_up(&id, "What about embedded targets?").await.unwrap();
        assert_eq!(round, 2);
        assert!(matches!(
            uc.follow_up(&id, "And another?").await,
            Err(RunCouncilError::RoundPending(_))
        ));

        let out = uc.execute(&id).await.unwrap();
        assert_eq!(out.round, 2);
        assert_eq!(out.council.syntheses.len(), 2);
        assert!(out.responses.iter().all(|r| r.round == 2));

        let follow_up_prompts: Vec<String> = gateway
            .calls()
            .into_iter()
            .map(|c| c.prompt)
            .filter(|p| p.contains("Follow-up question: What about embedded targets?"))
            .collect();
        // 3 perspectives + 3 rankings + 1 synthesis
        assert_eq!(follow_up_prompts.len(), 7);
        assert!(follow_up_prompts[0].contains("Adopt Rust for new services."));
    }

    #[tokio::test]
    async fn test_completed_council_without_follow_up_has_no_round() {
        let (uc, _, _, id) = setup(scripted(|_, _| false)).await;
        uc.execute(&id).await.unwrap();
        assert!(matches!(
            uc.execute(&id).await,
            Err(RunCouncilError::NoPendingRound(_))
        ));
    }

    #[tokio::test]
    async fn test_rerun_after_ranking_failure_reuses_responses() {
        let rankings_down = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&rankings_down);
        let (uc, gateway, repo, id) = setup(scripted(move |_, prompt| {
            prompt.contains(RANKING) && flag.load(Ordering::SeqCst)
        }))
        .await;

        assert!(uc.execute(&id).await.is_err());
        rankings_down.store(false, Ordering::SeqCst);
        let out = uc.execute(&id).await.unwrap();

        assert_eq!(out.council.status, Status::Completed);
        assert_eq!(gateway.calls_matching(PERSPECTIVE), 3);
        assert_eq!(repo.list_responses(&id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cancellation_fails_stage_one() {
        let (uc, gateway, _, id) = setup(scripted(|_, _| false)).await;
        let token = CancellationToken::new();
        token.cancel();
        let uc = uc.with_cancellation(token);

        assert!(matches!(
            uc.execute(&id).await,
            Err(RunCouncilError::NoResponses(1))
        ));
        assert!(gateway.calls().is_empty());
    }
}

//! Scripted fakes shared by the use case tests.

use crate::ports::generation_gateway::{
    GatewayError, Generation, GenerationGateway, GenerationRequest,
};
use crate::ports::repository::{CouncilRepository, DebateRepository, RepositoryError};
use crate::ports::templates::TemplateCatalog;
use async_trait::async_trait;
use colloquy_domain::{
    Council, CouncilId, Debate, DebateId, Ranking, Response, Style, Turn,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

type Script = dyn Fn(&str, &str) -> Result<String, GatewayError> + Send + Sync;

/// A recorded gateway call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub backend: String,
    pub prompt: String,
    pub model: Option<String>,
}

/// Gateway answering every call through a `(backend, prompt)` closure
pub struct ScriptedGateway {
    script: Box<Script>,
    calls: Mutex<Vec<RecordedCall>>,
    unknown: HashSet<String>,
    unavailable: HashSet<String>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub fn new(
        script: impl Fn(&str, &str) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            unknown: HashSet::new(),
            unavailable: HashSet::new(),
            delay: None,
        }
    }

    pub fn with_unknown(mut self, backend: &str) -> Self {
        self.unknown.insert(backend.to_string());
        self
    }

    pub fn with_unavailable(mut self, backend: &str) -> Self {
        self.unavailable.insert(backend.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn execute(
        &self,
        backend: &str,
        request: GenerationRequest,
    ) -> Result<Generation, GatewayError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(RecordedCall {
            backend: backend.to_string(),
            prompt: request.prompt.clone(),
            model: request.model.clone(),
        });
        (self.script)(backend, &request.prompt).map(Generation::text)
    }

    fn knows_backend(&self, backend: &str) -> bool {
        !self.unknown.contains(backend)
    }

    async fn is_available(&self, backend: &str) -> bool {
        !self.unavailable.contains(backend)
    }
}

/// Minimal catalog: a few personas and two styles
pub struct StaticTemplates;

impl TemplateCatalog for StaticTemplates {
    fn persona(&self, id: &str) -> Option<String> {
        match id {
            "neutral" => Some("You are a balanced debater.".to_string()),
            "skeptic" => Some("You are a skeptic.".to_string()),
            "optimist" => Some("You are an optimist.".to_string()),
            _ => None,
        }
    }

    fn style(&self, id: &str) -> Option<Style> {
        match id {
            "classic" => Some(Style::new(
                "OPENING as {agent} vs {opponent} on {topic}",
                "RESPONSE as {agent} to: {previous}\n{transcript}",
                "CONCLUSION as {agent}\n{transcript}",
            )),
            "socratic" => Some(
                Style::new("OPENING {topic}", "RESPONSE {previous}", "CONCLUSION")
                    .with_questioner("QUESTIONER {previous}"),
            ),
            _ => None,
        }
    }

    fn persona_rotation(&self) -> Vec<String> {
        vec!["neutral".to_string(), "skeptic".to_string(), "optimist".to_string()]
    }
}

/// In-memory repository for both aggregates
#[derive(Default)]
pub struct MemoryRepository {
    debates: Mutex<HashMap<DebateId, Debate>>,
    turns: Mutex<Vec<Turn>>,
    councils: Mutex<HashMap<CouncilId, Council>>,
    responses: Mutex<Vec<Response>>,
    rankings: Mutex<Vec<Ranking>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debate_count(&self) -> usize {
        self.debates.lock().unwrap().len()
    }

    pub fn council_count(&self) -> usize {
        self.councils.lock().unwrap().len()
    }
}

#[async_trait]
impl DebateRepository for MemoryRepository {
    async fn create_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        self.debates
            .lock()
            .unwrap()
            .insert(debate.id.clone(), debate.clone());
        Ok(())
    }

    async fn get_debate(&self, id: &DebateId) -> Result<Debate, RepositoryError> {
        self.debates
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::debate_not_found(id))
    }

    async fn update_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        self.create_debate(debate).await
    }

    async fn list_debates(&self) -> Result<Vec<Debate>, RepositoryError> {
        Ok(self.debates.lock().unwrap().values().cloned().collect())
    }

    async fn add_turn(&self, turn: &Turn) -> Result<(), RepositoryError> {
        self.turns.lock().unwrap().push(turn.clone());
        Ok(())
    }

    async fn list_turns(&self, id: &DebateId) -> Result<Vec<Turn>, RepositoryError> {
        Ok(self
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.debate_id == *id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CouncilRepository for MemoryRepository {
    async fn create_council(&self, council: &Council) -> Result<(), RepositoryError> {
        self.councils
            .lock()
            .unwrap()
            .insert(council.id.clone(), council.clone());
        Ok(())
    }

    async fn get_council(&self, id: &CouncilId) -> Result<Council, RepositoryError> {
        self.councils
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::council_not_found(id))
    }

    async fn update_council(&self, council: &Council) -> Result<(), RepositoryError> {
        self.create_council(council).await
    }

    async fn list_councils(&self) -> Result<Vec<Council>, RepositoryError> {
        Ok(self.councils.lock().unwrap().values().cloned().collect())
    }

    async fn add_responses(&self, responses: &[Response]) -> Result<(), RepositoryError> {
        self.responses.lock().unwrap().extend_from_slice(responses);
        Ok(())
    }

    async fn list_responses(&self, id: &CouncilId) -> Result<Vec<Response>, RepositoryError> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.council_id == *id)
            .cloned()
            .collect())
    }

    async fn add_rankings(&self, rankings: &[Ranking]) -> Result<(), RepositoryError> {
        self.rankings.lock().unwrap().extend_from_slice(rankings);
        Ok(())
    }

    async fn list_rankings(&self, id: &CouncilId) -> Result<Vec<Ranking>, RepositoryError> {
        Ok(self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.council_id == *id)
            .cloned()
            .collect())
    }
}

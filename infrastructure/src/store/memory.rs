//! In-memory store

use async_trait::async_trait;
use colloquy_application::{CouncilRepository, DebateRepository, RepositoryError};
use colloquy_domain::{Council, CouncilId, Debate, DebateId, Ranking, Response, Turn};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store, used by `--ephemeral` runs
#[derive(Default)]
pub struct InMemoryStore {
    debates: RwLock<HashMap<DebateId, Debate>>,
    turns: RwLock<HashMap<DebateId, Vec<Turn>>>,
    councils: RwLock<HashMap<CouncilId, Council>>,
    responses: RwLock<HashMap<CouncilId, Vec<Response>>>,
    rankings: RwLock<HashMap<CouncilId, Vec<Ranking>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DebateRepository for InMemoryStore {
    async fn create_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        let mut debates = self.debates.write().await;
        if debates.contains_key(&debate.id) {
            return Err(RepositoryError::AlreadyExists {
                kind: "debate",
                id: debate.id.to_string(),
            });
        }
        debates.insert(debate.id.clone(), debate.clone());
        Ok(())
    }

    async fn get_debate(&self, id: &DebateId) -> Result<Debate, RepositoryError> {
        self.debates
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::debate_not_found(id))
    }

    async fn update_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        match self.debates.write().await.get_mut(&debate.id) {
            Some(slot) => {
                *slot = debate.clone();
                Ok(())
            }
            None => Err(RepositoryError::debate_not_found(&debate.id)),
        }
    }

    async fn list_debates(&self) -> Result<Vec<Debate>, RepositoryError> {
        let mut debates: Vec<Debate> = self.debates.read().await.values().cloned().collect();
        debates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(debates)
    }

    async fn add_turn(&self, turn: &Turn) -> Result<(), RepositoryError> {
        if !self.debates.read().await.contains_key(&turn.debate_id) {
            return Err(RepositoryError::debate_not_found(&turn.debate_id));
        }
        self.turns
            .write()
            .await
            .entry(turn.debate_id.clone())
            .or_default()
            .push(turn.clone());
        Ok(())
    }

    async fn list_turns(&self, id: &DebateId) -> Result<Vec<Turn>, RepositoryError> {
        let mut turns = self.turns.read().await.get(id).cloned().unwrap_or_default();
        turns.sort_by_key(|t| t.number);
        Ok(turns)
    }
}

#[async_trait]
impl CouncilRepository for InMemoryStore {
    async fn create_council(&self, council: &Council) -> Result<(), RepositoryError> {
        let mut councils = self.councils.write().await;
        if councils.contains_key(&council.id) {
            return Err(RepositoryError::AlreadyExists {
                kind: "council",
                id: council.id.to_string(),
            });
        }
        councils.insert(council.id.clone(), council.clone());
        Ok(())
    }

    async fn get_council(&self, id: &CouncilId) -> Result<Council, RepositoryError> {
        self.councils
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::council_not_found(id))
    }

    async fn update_council(&self, council: &Council) -> Result<(), RepositoryError> {
        match self.councils.write().await.get_mut(&council.id) {
            Some(slot) => {
                *slot = council.clone();
                Ok(())
            }
            None => Err(RepositoryError::council_not_found(&council.id)),
        }
    }

    async fn list_councils(&self) -> Result<Vec<Council>, RepositoryError> {
        let mut councils: Vec<Council> = self.councils.read().await.values().cloned().collect();
        councils.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(councils)
    }

    async fn add_responses(&self, responses: &[Response]) -> Result<(), RepositoryError> {
        let mut stored = self.responses.write().await;
        for response in responses {
            stored
                .entry(response.council_id.clone())
                .or_default()
                .push(response.clone());
        }
        Ok(())
    }

    async fn list_responses(&self, id: &CouncilId) -> Result<Vec<Response>, RepositoryError> {
        Ok(self.responses.read().await.get(id).cloned().unwrap_or_default())
    }

    async fn add_rankings(&self, rankings: &[Ranking]) -> Result<(), RepositoryError> {
        let mut stored = self.rankings.write().await;
        for ranking in rankings {
            stored
                .entry(ranking.council_id.clone())
                .or_default()
                .push(ranking.clone());
        }
        Ok(())
    }

    async fn list_rankings(&self, id: &CouncilId) -> Result<Vec<Ranking>, RepositoryError> {
        Ok(self.rankings.read().await.get(id).cloned().unwrap_or_default())
    }
}

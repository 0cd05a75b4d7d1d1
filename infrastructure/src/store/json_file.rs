//! JSON file store
//!
//! One directory per debate or council: the aggregate as pretty JSON,
//! child records as append-only JSONL.

use super::error::StoreError;
use async_trait::async_trait;
use colloquy_application::{CouncilRepository, DebateRepository, RepositoryError};
use colloquy_domain::{Council, CouncilId, Debate, DebateId, Ranking, Response, Turn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const DEBATES_DIR: &str = "debates";
const COUNCILS_DIR: &str = "councils";
const DEBATE_FILE: &str = "debate.json";
const COUNCIL_FILE: &str = "council.json";
const TURNS_FILE: &str = "turns.jsonl";
const RESPONSES_FILE: &str = "responses.jsonl";
const RANKINGS_FILE: &str = "rankings.jsonl";

/// File-backed store for debates and councils
///
/// ```text
/// <data_dir>/debates/<id>/debate.json
/// <data_dir>/debates/<id>/turns.jsonl
/// <data_dir>/councils/<id>/council.json
/// <data_dir>/councils/<id>/responses.jsonl
/// <data_dir>/councils/<id>/rankings.jsonl
/// ```
pub struct JsonFileStore {
    root: PathBuf,
    /// Serializes writes from this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn debate_dir(&self, id: &DebateId) -> PathBuf {
        self.root.join(DEBATES_DIR).join(id.as_str())
    }

    fn council_dir(&self, id: &CouncilId) -> PathBuf {
        self.root.join(COUNCILS_DIR).join(id.as_str())
    }

    async fn create<T: Serialize>(
        &self,
        dir: PathBuf,
        file: &str,
        value: &T,
        kind: &'static str,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let path = dir.join(file);
        if fs::try_exists(&path).await.map_err(StoreError::from)? {
            return Err(RepositoryError::AlreadyExists {
                kind,
                id: id.to_string(),
            });
        }
        fs::create_dir_all(&dir).await.map_err(StoreError::from)?;
        write_json(&path, value).await?;
        debug!("Created {} {} at {}", kind, id, path.display());
        Ok(())
    }

    async fn replace<T: Serialize>(
        &self,
        path: PathBuf,
        value: &T,
        not_found: RepositoryError,
    ) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        if !fs::try_exists(&path).await.map_err(StoreError::from)? {
            return Err(not_found);
        }
        write_json(&path, value).await?;
        Ok(())
    }

    async fn append<T: Serialize>(&self, path: PathBuf, records: &[T]) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut batch = String::new();
        for record in records {
            batch.push_str(&serde_json::to_string(record).map_err(StoreError::from)?);
            batch.push('\n');
        }

        let _guard = self.write_lock.lock().await;
        trim_torn_tail(&path).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(StoreError::from)?;
        file.write_all(batch.as_bytes())
            .await
            .map_err(StoreError::from)?;
        file.flush().await.map_err(StoreError::from)?;
        Ok(())
    }

    /// Every aggregate under `dir`, skipping entries that fail to load
    async fn list<T: DeserializeOwned>(&self, dir: &str, file: &str) -> Result<Vec<T>, RepositoryError> {
        let dir = self.root.join(dir);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::from(e).into()),
        };

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(StoreError::from)? {
            let path = entry.path().join(file);
            match read_json(&path).await {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(items)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Cut a trailing record left without its newline by an interrupted write,
/// so the next append starts on a fresh line.
async fn trim_torn_tail(path: &Path) -> Result<(), StoreError> {
    let mut file = match fs::OpenOptions::new().read(true).write(true).open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if file.metadata().await?.len() == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::End(-1)).await?;
    if file.read_u8().await? == b'\n' {
        return Ok(());
    }

    let bytes = fs::read(path).await?;
    let keep = bytes
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    warn!(
        "Dropping {} bytes of torn record at the end of {}",
        bytes.len() - keep,
        path.display()
    );
    file.set_len(keep as u64).await?;
    Ok(())
}

/// Records of a JSONL file; a truncated last line is dropped
async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut records = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) if i + 1 == lines.len() => {
                warn!("Ignoring truncated record in {}: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(records)
}

#[async_trait]
impl DebateRepository for JsonFileStore {
    async fn create_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        self.create(
            self.debate_dir(&debate.id),
            DEBATE_FILE,
            debate,
            "debate",
            debate.id.as_str(),
        )
        .await
    }

    async fn get_debate(&self, id: &DebateId) -> Result<Debate, RepositoryError> {
        read_json(&self.debate_dir(id).join(DEBATE_FILE))
            .await?
            .ok_or_else(|| RepositoryError::debate_not_found(id))
    }

    async fn update_debate(&self, debate: &Debate) -> Result<(), RepositoryError> {
        self.replace(
            self.debate_dir(&debate.id).join(DEBATE_FILE),
            debate,
            RepositoryError::debate_not_found(&debate.id),
        )
        .await
    }

    async fn list_debates(&self) -> Result<Vec<Debate>, RepositoryError> {
        let mut debates: Vec<Debate> = self.list(DEBATES_DIR, DEBATE_FILE).await?;
        debates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(debates)
    }

    async fn add_turn(&self, turn: &Turn) -> Result<(), RepositoryError> {
        let dir = self.debate_dir(&turn.debate_id);
        if !fs::try_exists(dir.join(DEBATE_FILE)).await.map_err(StoreError::from)? {
            return Err(RepositoryError::debate_not_found(&turn.debate_id));
        }
        self.append(dir.join(TURNS_FILE), std::slice::from_ref(turn)).await
    }

    async fn list_turns(&self, id: &DebateId) -> Result<Vec<Turn>, RepositoryError> {
        let mut turns: Vec<Turn> = read_jsonl(&self.debate_dir(id).join(TURNS_FILE)).await?;
        turns.sort_by_key(|t| t.number);
        Ok(turns)
    }
}

#[async_trait]
impl CouncilRepository for JsonFileStore {
    async fn create_council(&self, council: &Council) -> Result<(), RepositoryError> {
        self.create(
            self.council_dir(&council.id),
            COUNCIL_FILE,
            council,
            "council",
            council.id.as_str(),
        )
        .await
    }

    async fn get_council(&self, id: &CouncilId) -> Result<Council, RepositoryError> {
        read_json(&self.council_dir(id).join(COUNCIL_FILE))
            .await?
            .ok_or_else(|| RepositoryError::council_not_found(id))
    }

    async fn update_council(&self, council: &Council) -> Result<(), RepositoryError> {
        self.replace(
            self.council_dir(&council.id).join(COUNCIL_FILE),
            council,
            RepositoryError::council_not_found(&council.id),
        )
        .await
    }

    async fn list_councils(&self) -> Result<Vec<Council>, RepositoryError> {
        let mut councils: Vec<Council> = self.list(COUNCILS_DIR, COUNCIL_FILE).await?;
        councils.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(councils)
    }

    async fn add_responses(&self, responses: &[Response]) -> Result<(), RepositoryError> {
        let Some(first) = responses.first() else {
            return Ok(());
        };
        let dir = self.council_dir(&first.council_id);
        self.append(dir.join(RESPONSES_FILE), responses).await
    }

    async fn list_responses(&self, id: &CouncilId) -> Result<Vec<Response>, RepositoryError> {
        Ok(read_jsonl(&self.council_dir(id).join(RESPONSES_FILE)).await?)
    }

    async fn add_rankings(&self, rankings: &[Ranking]) -> Result<(), RepositoryError> {
        let Some(first) = rankings.first() else {
            return Ok(());
        };
        let dir = self.council_dir(&first.council_id);
        self.append(dir.join(RANKINGS_FILE), rankings).await
    }

    async fn list_rankings(&self, id: &CouncilId) -> Result<Vec<Ranking>, RepositoryError> {
        Ok(read_jsonl(&self.council_dir(id).join(RANKINGS_FILE)).await?)
    }
}

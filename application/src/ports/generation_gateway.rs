//! Generation Gateway port
//!
//! Defines the interface for invoking text-generation backends.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

/// A single generation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// `None` lets the backend use its own default
    pub model: Option<String>,
    pub working_dir: Option<PathBuf>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }
}

/// Generated text plus opaque backend metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub content: String,
    /// Never inspected by the orchestration core
    pub metadata: Option<serde_json::Value>,
}

impl Generation {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }
}

/// Gateway for text generation
///
/// Backends are addressed by identifier (e.g. `"claude"`, `"codex"`).
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Run one prompt against `backend`
    async fn execute(
        &self,
        backend: &str,
        request: GenerationRequest,
    ) -> Result<Generation, GatewayError>;

    /// Whether `backend` is configured at all
    fn knows_backend(&self, backend: &str) -> bool;

    /// Whether `backend` can be reached right now
    async fn is_available(&self, backend: &str) -> bool;
}

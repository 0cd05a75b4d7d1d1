//! Participant identity

use crate::core::id::AgentId;
use serde::{Deserialize, Serialize};

/// One participant of a debate or council (Entity)
///
/// Immutable once the owning debate/council has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Human-readable label used in transcripts and rankings
    pub name: String,
    /// Backend identifier understood by the generation gateway
    pub backend: String,
    /// Model variant; `None` lets the backend pick its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Persona identifier resolved through the template catalog
    pub persona: String,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        backend: impl Into<String>,
        model: Option<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::generate(),
            name: name.into(),
            backend: backend.into(),
            model,
            persona: persona.into(),
        }
    }

    /// Replace the generated id (used when ids must be stable, e.g. in tests)
    pub fn with_id(mut self, id: impl Into<AgentId>) -> Self {
        self.id = id.into();
        self
    }

    /// Short description: `backend` or `backend (model)`
    pub fn label(&self) -> String {
        match &self.model {
            Some(model) => format!("{} ({})", self.backend, model),
            None => self.backend.clone(),
        }
    }
}

/// Give every name a unique display form by suffixing repeats with ` #n`.
///
/// The first occurrence keeps its name; later ones become `name #2`, `name #3`.
pub fn disambiguate_names(names: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    names
        .iter()
        .map(|name| {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.clone()
            } else {
                format!("{} #{}", name, count)
            }
        })
        .collect()
}

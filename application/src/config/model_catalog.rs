//! Default and best model per backend

use std::collections::HashMap;

/// Model variants configured for one backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendModels {
    pub default_model: Option<String>,
    pub best_model: Option<String>,
}

/// Per-backend model table, injected into the create use cases.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    backends: HashMap<String, BackendModels>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl Into<String>, models: BackendModels) -> Self {
        self.backends.insert(backend.into(), models);
        self
    }

    pub fn insert(&mut self, backend: impl Into<String>, models: BackendModels) {
        self.backends.insert(backend.into(), models);
    }

    pub fn default_model(&self, backend: &str) -> Option<&str> {
        self.backends
            .get(backend)
            .and_then(|m| m.default_model.as_deref())
    }

    /// The backend's best variant, falling back to its default model.
    pub fn best_model(&self, backend: &str) -> Option<&str> {
        self.backends.get(backend).and_then(|m| {
            m.best_model
                .as_deref()
                .or(m.default_model.as_deref())
        })
    }
}

//! Backend configuration from TOML (`[backends.<id>]` sections)

use crate::gateway::CliBackend;
use colloquy_application::{BackendModels, ModelCatalog};
use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw configuration of one backend command
///
/// # Example
///
/// ```toml
/// [backends.claude]
/// command = "claude"
/// args = ["-p"]
/// model_flag = "--model"
/// default_model = "sonnet"
/// best_model = "opus"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Executable name or path
    pub command: String,
    /// Arguments placed before the model flag; the prompt goes to stdin
    pub args: Vec<String>,
    /// Flag that selects a model (e.g. `--model`); models are ignored without one
    pub model_flag: Option<String>,
    pub default_model: Option<String>,
    /// Variant the chairman uses when none is given
    pub best_model: Option<String>,
}

impl FileBackendConfig {
    fn new(command: &str, args: &[&str], model_flag: Option<&str>) -> Self {
        Self {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            model_flag: model_flag.map(str::to_string),
            default_model: None,
            best_model: None,
        }
    }

    fn with_models(mut self, default_model: &str, best_model: &str) -> Self {
        self.default_model = Some(default_model.to_string());
        self.best_model = Some(best_model.to_string());
        self
    }

    pub fn to_cli_backend(&self) -> CliBackend {
        CliBackend {
            command: self.command.clone(),
            args: self.args.clone(),
            model_flag: self.model_flag.clone(),
        }
    }

    pub fn models(&self) -> BackendModels {
        BackendModels {
            default_model: self.default_model.clone(),
            best_model: self.best_model.clone(),
        }
    }
}

/// The three backends known out of the box
pub fn default_backends() -> BTreeMap<String, FileBackendConfig> {
    BTreeMap::from([
        (
            "claude".to_string(),
            FileBackendConfig::new("claude", &["-p"], Some("--model")).with_models("sonnet", "opus"),
        ),
        (
            "codex".to_string(),
            FileBackendConfig::new("codex", &["exec"], Some("--model")),
        ),
        (
            "gemini".to_string(),
            FileBackendConfig::new("gemini", &[], Some("--model"))
                .with_models("gemini-2.5-flash", "gemini-2.5-pro"),
        ),
    ])
}

/// Build the gateway's backend table
pub fn cli_backends(backends: &BTreeMap<String, FileBackendConfig>) -> BTreeMap<String, CliBackend> {
    backends
        .iter()
        .filter(|(_, b)| !b.command.trim().is_empty())
        .map(|(id, b)| (id.clone(), b.to_cli_backend()))
        .collect()
}

/// Build the model catalog injected into the create use cases
pub fn model_catalog(backends: &BTreeMap<String, FileBackendConfig>) -> ModelCatalog {
    let mut catalog = ModelCatalog::new();
    for (id, backend) in backends {
        catalog.insert(id.clone(), backend.models());
    }
    catalog
}

pub fn validate_backends(backends: &BTreeMap<String, FileBackendConfig>) -> Vec<ConfigIssue> {
    backends
        .iter()
        .filter(|(_, b)| b.command.trim().is_empty())
        .map(|(id, _)| {
            ConfigIssue::error(
                ConfigIssueCode::EmptyCommand {
                    backend: id.clone(),
                },
                format!("backends.{}.command is empty; the backend is disabled", id),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backends() {
        let backends = default_backends();
        assert_eq!(backends.len(), 3);
        assert_eq!(backends["claude"].args, vec!["-p"]);
        assert_eq!(backends["codex"].command, "codex");
        assert!(validate_backends(&backends).is_empty());
    }

    #[test]
    fn test_model_catalog_from_backends() {
        let catalog = model_catalog(&default_backends());
        assert_eq!(catalog.default_model("claude"), Some("sonnet"));
        assert_eq!(catalog.best_model("claude"), Some("opus"));
        assert_eq!(catalog.default_model("codex"), None);
    }

    #[test]
    fn test_empty_command_is_reported_and_skipped() {
        let mut backends = default_backends();
        backends.insert("broken".to_string(), FileBackendConfig::default());

        let issues = validate_backends(&backends);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::EmptyCommand {
                backend: "broken".to_string()
            }
        );
        assert!(!cli_backends(&backends).contains_key("broken"));
    }
}

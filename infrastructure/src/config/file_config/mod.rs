//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backends;
mod behavior;
mod council;
mod debate;
mod output;
mod storage;
mod templates;

pub use backends::{FileBackendConfig, cli_backends, default_backends, model_catalog};
pub use behavior::FileBehaviorConfig;
pub use council::FileCouncilConfig;
pub use debate::FileDebateConfig;
pub use output::FileOutputConfig;
pub use storage::FileStorageConfig;
pub use templates::FileTemplatesConfig;

use crate::templates::BuiltinTemplateCatalog;
use colloquy_application::TemplateCatalog;
use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Timeout, working directory and persona rotation
    pub behavior: FileBehaviorConfig,
    /// Debate defaults
    pub debate: FileDebateConfig,
    /// Council defaults
    pub council: FileCouncilConfig,
    /// Backend commands keyed by backend id
    pub backends: BTreeMap<String, FileBackendConfig>,
    /// Persona and style overrides (`[personas]`, `[styles.<id>]`)
    #[serde(flatten)]
    pub templates: FileTemplatesConfig,
    /// Where debates and councils are stored
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            behavior: FileBehaviorConfig::default(),
            debate: FileDebateConfig::default(),
            council: FileCouncilConfig::default(),
            backends: default_backends(),
            templates: FileTemplatesConfig::default(),
            storage: FileStorageConfig::default(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// The template catalog: built-ins plus overrides from this file
    pub fn template_catalog(&self) -> BuiltinTemplateCatalog {
        let mut catalog = BuiltinTemplateCatalog::new().with_overrides(&self.templates);
        if let Some(rotation) = &self.behavior.persona_rotation {
            catalog = catalog.with_rotation(rotation.clone());
        }
        catalog
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Numeric ranges (timeout, turn budget)
    /// 2. Backends with an empty command
    /// 3. Council member and chairman specs, and the backends they name
    /// 4. The default style and the persona rotation against the catalog
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Ranges
        issues.extend(self.behavior.to_behavior_config().1);
        issues.extend(self.debate.validate());

        // 2. Backends
        issues.extend(backends::validate_backends(&self.backends));

        // 3. Council specs
        let (members, member_issues) = self.council.parse_members();
        let (chairman, chairman_issues) = self.council.parse_chairman();
        issues.extend(member_issues);
        issues.extend(chairman_issues);
        for spec in members.iter().chain(chairman.as_ref()) {
            if !self.backends.contains_key(&spec.backend) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownBackend {
                        backend: spec.backend.clone(),
                    },
                    format!("council: backend '{}' is not configured", spec.backend),
                ));
            }
        }

        // 4. Templates
        let catalog = self.template_catalog();
        if catalog.style(&self.debate.style).is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownStyle {
                    style: self.debate.style.clone(),
                },
                format!("debate.style: unknown style '{}'", self.debate.style),
            ));
        }
        for persona in catalog.persona_rotation() {
            if catalog.persona(&persona).is_none() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownPersona {
                        persona: persona.clone(),
                    },
                    format!("behavior.persona_rotation: unknown persona '{}'", persona),
                ));
            }
        }

        issues
    }
}

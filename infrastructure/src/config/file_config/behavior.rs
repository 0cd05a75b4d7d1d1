//! Behavior configuration from TOML (`[behavior]` section)

use colloquy_application::BehaviorConfig;
use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw behavior configuration from TOML
///
/// # Example
///
/// ```toml
/// [behavior]
/// timeout_seconds = 300
/// working_dir = "/tmp/colloquy"
/// persona_rotation = ["skeptic", "optimist"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Per-call timeout in seconds; no timeout when absent
    pub timeout_seconds: Option<u64>,
    /// Working directory handed to every backend process
    pub working_dir: Option<PathBuf>,
    /// Personas assigned, in order, to participants without an explicit one
    pub persona_rotation: Option<Vec<String>>,
}

impl FileBehaviorConfig {
    /// Convert into the application-level behavior, reporting a zero timeout.
    pub fn to_behavior_config(&self) -> (BehaviorConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut behavior = BehaviorConfig::default();

        match self.timeout_seconds {
            Some(0) => issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "behavior.timeout_seconds".to_string(),
                    value: "0".to_string(),
                },
                "behavior.timeout_seconds: must be at least 1, ignoring it",
            )),
            Some(seconds) => behavior = BehaviorConfig::with_timeout_seconds(seconds),
            None => {}
        }

        if let Some(dir) = &self.working_dir {
            behavior = behavior.with_working_dir(dir.clone());
        }

        (behavior, issues)
    }
}

//! Debate defaults from TOML (`[debate]` section)

use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// style = "socratic"
/// turns_per_agent = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Style used when `--style` is not given
    pub style: String,
    /// Turns per agent per round when `--turns` is not given
    pub turns_per_agent: u32,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            style: "classic".to_string(),
            turns_per_agent: 3,
        }
    }
}

impl FileDebateConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.turns_per_agent == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "debate.turns_per_agent".to_string(),
                    value: self.turns_per_agent.to_string(),
                },
                "debate.turns_per_agent must be at least 1",
            ));
        }
        issues
    }
}

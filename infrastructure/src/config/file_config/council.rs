//! Council defaults from TOML (`[council]` section)

use colloquy_domain::{ConfigIssue, ConfigIssueCode, MemberSpec};
use serde::{Deserialize, Serialize};

/// Raw council configuration from TOML
///
/// # Example
///
/// ```toml
/// [council]
/// members = ["claude", "codex:o3@skeptic", "gemini"]
/// chairman = "claude:opus"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Member specs used when `--members` is not given
    pub members: Vec<String>,
    /// Chairman spec; derived from the first member when absent
    pub chairman: Option<String>,
}

impl FileCouncilConfig {
    /// Parse member specs, skipping (and reporting) the ones that do not parse.
    pub fn parse_members(&self) -> (Vec<MemberSpec>, Vec<ConfigIssue>) {
        let mut members = Vec::new();
        let mut issues = Vec::new();
        for raw in &self.members {
            match raw.parse::<MemberSpec>() {
                Ok(spec) => members.push(spec),
                Err(e) => issues.push(invalid_member("council.members", raw, &e.to_string())),
            }
        }
        (members, issues)
    }

    pub fn parse_chairman(&self) -> (Option<MemberSpec>, Vec<ConfigIssue>) {
        let Some(raw) = &self.chairman else {
            return (None, vec![]);
        };
        match raw.parse::<MemberSpec>() {
            Ok(spec) => (Some(spec), vec![]),
            Err(e) => (
                None,
                vec![invalid_member("council.chairman", raw, &e.to_string())],
            ),
        }
    }
}

fn invalid_member(field: &str, raw: &str, reason: &str) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::InvalidMember {
            value: raw.to_string(),
        },
        format!("{}: ignoring '{}' ({})", field, raw, reason),
    )
}

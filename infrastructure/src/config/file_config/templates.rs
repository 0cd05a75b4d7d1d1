//! Persona and style overrides from TOML (`[personas]`, `[styles.<id>]`)

use colloquy_domain::Style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw template overrides from TOML
///
/// Entries replace built-ins with the same id or add new ones.
///
/// # Example
///
/// ```toml
/// [personas]
/// pirate = "You argue like a pirate captain."
///
/// [styles.courtroom]
/// opening = "As {agent}, open the case on: {topic}"
/// response = "As {agent}, answer {opponent}: {previous}"
/// conclusion = "As {agent}, close the case.\n{transcript}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTemplatesConfig {
    #[serde(default)]
    pub personas: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: BTreeMap<String, Style>,
}

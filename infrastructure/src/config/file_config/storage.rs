//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding debates and councils
    pub data_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    /// Configured directory, else `$XDG_DATA_HOME/colloquy`, else `./.colloquy`
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("colloquy")))
            .unwrap_or_else(|| PathBuf::from(".colloquy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = FileStorageConfig {
            data_dir: Some(PathBuf::from("/var/lib/colloquy")),
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/var/lib/colloquy"));
    }

    #[test]
    fn test_default_data_dir_is_named_after_the_app() {
        let dir = FileStorageConfig::default().resolve_data_dir();
        assert!(dir.to_string_lossy().contains("colloquy"));
    }
}

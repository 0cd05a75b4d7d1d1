//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["colloquy.toml", ".colloquy.toml"];

/// Prefix of environment overrides (`COLLOQUY_DEBATE__STYLE=socratic`)
const ENV_PREFIX: &str = "COLLOQUY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COLLOQUY_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./colloquy.toml` or `./.colloquy.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/colloquy/config.toml`
    /// 5. Default values
    ///
    /// Tables merge key by key, so `[backends.claude] default_model = "haiku"`
    /// keeps the built-in command and args.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().filter(|p| p.exists()),
            Self::project_config_path(),
            config_path,
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    fn figment(global: Option<PathBuf>, project: Option<PathBuf>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        if let Some(path) = global {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path (whether or not it exists)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("colloquy").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            out.push_str(&format!("  [{:<7}] Explicit: {}\n", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => out.push_str(&format!("  [FOUND  ] Project: {}\n", path.display())),
            None => out.push_str("  [       ] Project: ./colloquy.toml or ./.colloquy.toml\n"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            out.push_str(&format!("  [{:<7}] Global:  {}\n", mark, path.display()));
        }

        out.push_str("  [       ] Default: built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.debate.style, "classic");
        assert!(config.backends.contains_key("claude"));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("colloquy"));
    }

    #[test]
    fn test_backend_tables_merge_key_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colloquy.toml");
        fs::write(&path, "[backends.claude]\ndefault_model = \"haiku\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, None, Some(&path))
            .extract()
            .unwrap();

        let claude = &config.backends["claude"];
        assert_eq!(claude.default_model.as_deref(), Some("haiku"));
        assert_eq!(claude.command, "claude");
        assert_eq!(claude.args, vec!["-p"]);
        assert!(config.backends.contains_key("codex"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_explicit_file_overrides_project_and_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "[debate]\nstyle = \"socratic\"\nturns_per_agent = 5\n").unwrap();
        fs::write(&project, "[debate]\nstyle = \"adversarial\"\n").unwrap();
        fs::write(&explicit, "[behavior]\ntimeout_seconds = 60\n").unwrap();

        let config: FileConfig =
            ConfigLoader::figment(Some(global), Some(project), Some(&explicit))
                .extract()
                .unwrap();

        assert_eq!(config.debate.style, "adversarial");
        assert_eq!(config.debate.turns_per_agent, 5);
        assert_eq!(config.behavior.timeout_seconds, Some(60));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[debate\nstyle = ").unwrap();

        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&path)).extract();
        assert!(result.is_err());
    }
}

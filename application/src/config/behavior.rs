//! Behavior configuration for use case execution

use std::path::PathBuf;
use std::time::Duration;

/// Application behavior configuration.
///
/// Controls runtime behavior of use cases like the timeout applied to each
/// generation call.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// Maximum time to wait for one generation call before timing out.
    pub timeout: Option<Duration>,
    /// Working directory handed to every generation call.
    pub working_dir: Option<PathBuf>,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Default::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_constructors() {
        assert_eq!(
            BehaviorConfig::with_timeout_seconds(30).timeout,
            Some(Duration::from_secs(30))
        );
        assert!(BehaviorConfig::from_timeout_seconds(None).timeout.is_none());
    }

    #[test]
    fn test_working_dir() {
        let config = BehaviorConfig::default().with_working_dir("/tmp/x");
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp/x")));
    }
}

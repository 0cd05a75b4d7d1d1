//! Topic value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The subject of a debate or council (Value Object)
///
/// Always non-empty after trimming; surrounding whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a topic, rejecting empty or whitespace-only input
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for Topic {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_creation() {
        let topic = Topic::parse("Is Rust worth learning?").unwrap();
        assert_eq!(topic.content(), "Is Rust worth learning?");
    }

    #[test]
    fn test_topic_is_trimmed() {
        let topic: Topic = "  tabs vs spaces \n".parse().unwrap();
        assert_eq!(topic.content(), "tabs vs spaces");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert_eq!(Topic::parse(""), Err(DomainError::EmptyTopic));
        assert_eq!(Topic::parse("   "), Err(DomainError::EmptyTopic));
    }

    #[test]
    fn test_topic_serializes_as_string() {
        let topic = Topic::parse("monorepos").unwrap();
        assert_eq!(serde_json::to_string(&topic).unwrap(), "\"monorepos\"");
    }
}

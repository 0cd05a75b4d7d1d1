//! Parse-level participant requests
//!
//! A member spec is written `backend[:model][@persona]`, e.g.
//! `claude`, `codex:gpt-5`, `gemini@skeptic`, `claude:opus@analyst`.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A requested participant before it is resolved into an [`Agent`](super::Agent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSpec {
    pub backend: String,
    pub model: Option<String>,
    pub persona: Option<String>,
}

impl MemberSpec {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            model: None,
            persona: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    fn invalid(spec: &str, reason: &str) -> DomainError {
        DomainError::InvalidMemberSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::str::FromStr for MemberSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();

        let (head, persona) = match spec.split_once('@') {
            Some((head, persona)) => {
                let persona = persona.trim();
                if persona.is_empty() {
                    return Err(Self::invalid(s, "empty persona after '@'"));
                }
                (head, Some(persona.to_string()))
            }
            None => (spec, None),
        };

        let (backend, model) = match head.split_once(':') {
            Some((backend, model)) => {
                let model = model.trim();
                if model.is_empty() {
                    return Err(Self::invalid(s, "empty model after ':'"));
                }
                (backend.trim(), Some(model.to_string()))
            }
            None => (head.trim(), None),
        };

        if backend.is_empty() {
            return Err(Self::invalid(s, "missing backend"));
        }
        if !backend
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Self::invalid(s, "backend may only contain [A-Za-z0-9_-]"));
        }

        Ok(Self {
            backend: backend.to_string(),
            model,
            persona,
        })
    }
}

impl std::fmt::Display for MemberSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.backend)?;
        if let Some(model) = &self.model {
            write!(f, ":{}", model)?;
        }
        if let Some(persona) = &self.persona {
            write!(f, "@{}", persona)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_only() {
        let spec: MemberSpec = "claude".parse().unwrap();
        assert_eq!(spec, MemberSpec::new("claude"));
    }

    #[test]
    fn test_parse_full_spec() {
        let spec: MemberSpec = "codex:gpt-5.1@skeptic".parse().unwrap();
        assert_eq!(spec.backend, "codex");
        assert_eq!(spec.model.as_deref(), Some("gpt-5.1"));
        assert_eq!(spec.persona.as_deref(), Some("skeptic"));
        assert_eq!(spec.to_string(), "codex:gpt-5.1@skeptic");
    }

    #[test]
    fn test_parse_persona_without_model() {
        let spec: MemberSpec = "gemini@optimist".parse().unwrap();
        assert_eq!(spec.model, None);
        assert_eq!(spec.persona.as_deref(), Some("optimist"));
    }

    #[test]
    fn test_model_may_contain_colons() {
        let spec: MemberSpec = "ollama:llama3:8b".parse().unwrap();
        assert_eq!(spec.backend, "ollama");
        assert_eq!(spec.model.as_deref(), Some("llama3:8b"));
    }

    #[test]
    fn test_invalid_specs() {
        assert!("".parse::<MemberSpec>().is_err());
        assert!(":opus".parse::<MemberSpec>().is_err());
        assert!("claude:".parse::<MemberSpec>().is_err());
        assert!("claude@".parse::<MemberSpec>().is_err());
        assert!("bad backend".parse::<MemberSpec>().is_err());
    }
}

//! Identifier value objects
//!
//! All aggregate and entity identifiers are opaque strings. Fresh ids are
//! UUID v4; ids loaded from storage are taken as-is.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a debate or council participant.
    AgentId
);
string_id!(
    /// Identifier of a debate aggregate.
    DebateId
);
string_id!(
    /// Identifier of a council aggregate.
    CouncilId
);
string_id!(
    /// Identifier of one Stage-1 council response.
    ResponseId
);

/// Author id used for turns injected by a human follow-up.
pub const USER_AGENT_ID: &str = "user";

impl AgentId {
    /// The synthetic author of follow-up turns.
    pub fn user() -> Self {
        Self::new(USER_AGENT_ID)
    }

    pub fn is_user(&self) -> bool {
        self.0 == USER_AGENT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DebateId::generate();
        let b = DebateId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_user_agent_id() {
        assert!(AgentId::user().is_user());
        assert!(!AgentId::new("agent-a").is_user());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = ResponseId::new("r-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r-1\"");
    }
}

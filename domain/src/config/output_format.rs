//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished debate or council is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full transcript (debate) or all three stages (council)
    Full,
    /// Only the conclusion or synthesis (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}

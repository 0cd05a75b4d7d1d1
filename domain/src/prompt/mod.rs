//! Prompt domain
//!
//! Styles, placeholder rendering and the fixed prompts used by debates and
//! councils.

mod council;
mod debate;
mod style;

pub use council::{CouncilPromptTemplate, FollowUpContext};
pub use debate::{DebatePromptTemplate, FORMAT_INSTRUCTION};
pub use style::{Style, TemplateVars, render_template};

//! Template catalog port
//!
//! Personas and styles are opaque named templates. Lookups return `None`
//! for unknown ids instead of failing.

use colloquy_domain::Style;

pub trait TemplateCatalog: Send + Sync {
    /// System text for persona `id`
    fn persona(&self, id: &str) -> Option<String>;

    /// Turn templates for style `id`
    fn style(&self, id: &str) -> Option<Style>;

    /// Personas handed out, in order, to participants without an explicit one
    fn persona_rotation(&self) -> Vec<String>;
}

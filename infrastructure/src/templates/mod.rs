//! Template catalog adapter
//!
//! Built-in personas and debate styles, extended or replaced by the
//! `[personas]` and `[styles.<id>]` config sections.

mod builtin;

pub use builtin::BuiltinTemplateCatalog;

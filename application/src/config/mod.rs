//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`BehaviorConfig`] — per-call timeout and working directory
//! - [`ModelCatalog`] — per-backend default and best model variants

mod behavior;
mod model_catalog;

pub use behavior::BehaviorConfig;
pub use model_catalog::{BackendModels, ModelCatalog};

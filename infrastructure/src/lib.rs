//! Infrastructure layer for colloquy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod templates;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBackendConfig, FileBehaviorConfig, FileConfig, FileCouncilConfig,
    FileDebateConfig, FileOutputConfig, FileStorageConfig, FileTemplatesConfig,
};
pub use gateway::{CliBackend, CliGenerationGateway};
pub use logging::JsonlConversationLogger;
pub use store::{InMemoryStore, JsonFileStore, StoreError};
pub use templates::BuiltinTemplateCatalog;

//! Repository adapters
//!
//! - [`JsonFileStore`]: one directory per aggregate, the aggregate as pretty
//!   JSON and its turns, responses and rankings as append-only JSONL
//! - [`InMemoryStore`]: process-local maps

mod error;
mod json_file;
mod memory;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

//! Generation gateway adapter
//!
//! Every backend is an external command-line client. One call spawns one
//! process, writes the prompt to its stdin and reads the reply from stdout.

mod cli;

pub use cli::{CliBackend, CliGenerationGateway};

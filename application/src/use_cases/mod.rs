//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod create_council;
pub mod create_debate;
pub mod detect_consensus;
pub(crate) mod participants;
pub mod run_council;
pub mod run_debate;
pub(crate) mod shared;
#[cfg(test)]
mod test_support;

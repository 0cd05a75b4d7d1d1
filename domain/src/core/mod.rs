//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`] — a validated debate/council subject
//! - [`status::Status`] — lifecycle shared by debates and councils
//! - [`id`] — opaque identifiers for agents, debates, councils and responses
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod id;
pub mod status;
pub mod string;
pub mod topic;

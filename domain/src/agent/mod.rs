//! Participants
//!
//! - [`Agent`] — a resolved participant bound to a backend and persona
//! - [`MemberSpec`] — a participant request as written on the command line

pub mod entities;
pub mod member_spec;

pub use entities::{Agent, disambiguate_names};
pub use member_spec::MemberSpec;

//! Two-party debates
//!
//! A debate alternates turns between agent A and agent B for
//! `2 × turns_per_agent` turns per round, then closes the round with a
//! [`Conclusion`] built from both agents' [`Vote`]s. Later rounds are opened
//! by a follow-up turn authored by `"user"`.

pub mod entities;
pub mod transcript;
pub mod turn_order;
pub mod vote;

pub use entities::{
    Conclusion, Debate, Side, Turn, agent_turns_in_round, latest_round, next_turn_number,
};
pub use transcript::{condensed_transcript, render_transcript, turn_label};
pub use turn_order::{TurnKind, first_speaker, speaker_at, stable_hash};
pub use vote::{Vote, parse_vote_response};

//! Deterministic turn order and prompt-kind selection.
//!
//! Who speaks first in a round is derived from `(debate id, round)` alone, so
//! resuming a partially executed round reproduces the same alternation
//! without persisting a "whose turn" field.

use super::entities::Side;
use crate::core::id::DebateId;
use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a. Stable across platforms and compiler versions.
pub fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// The agent opening `round` of debate `debate_id`.
pub fn first_speaker(debate_id: &DebateId, round: u32) -> Side {
    let seed = stable_hash(debate_id.as_str()).wrapping_add(u64::from(round));
    if seed % 2 == 0 { Side::A } else { Side::B }
}

/// The agent speaking at 0-based `index` within `round`.
pub fn speaker_at(debate_id: &DebateId, round: u32, index: u32) -> Side {
    let first = first_speaker(debate_id, round);
    if index % 2 == 0 { first } else { first.other() }
}

/// Which style template drives a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// First turn an agent speaks in the round
    Opening,
    /// Regular reply
    Response,
    /// Socratic-questioner variant of a reply (odd indices, when the style has one)
    Questioner,
    /// Final turn of the round
    Conclusion,
}

impl TurnKind {
    /// Select the template for 0-based turn `index` of a round with
    /// `turns_per_round` turns. The final turn always uses the conclusion
    /// template, even when it is also that agent's first turn.
    pub fn for_index(index: u32, turns_per_round: u32, has_questioner: bool) -> TurnKind {
        if index + 1 >= turns_per_round {
            TurnKind::Conclusion
        } else if index < 2 {
            TurnKind::Opening
        } else if has_questioner && index % 2 == 1 {
            TurnKind::Questioner
        } else {
            TurnKind::Response
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Opening => "opening",
            TurnKind::Response => "response",
            TurnKind::Questioner => "questioner",
            TurnKind::Conclusion => "conclusion",
        }
    }
}

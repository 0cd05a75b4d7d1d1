//! Chronological transcript rendering for prompts and display

use super::entities::{Debate, Turn};
use crate::core::string::{squash_whitespace, truncate};

/// Label heading a turn, e.g. `[Round 1, Turn 3] claude`
pub fn turn_label(debate: &Debate, turn: &Turn) -> String {
    if turn.is_user() {
        format!("[Round {}, Turn {}] User (follow-up)", turn.round, turn.number)
    } else {
        format!(
            "[Round {}, Turn {}] {}",
            turn.round,
            turn.number,
            debate.speaker_name(&turn.agent_id)
        )
    }
}

/// Full transcript: every turn, labelled, in order.
pub fn render_transcript(debate: &Debate, turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "(no turns yet)".to_string();
    }
    turns
        .iter()
        .map(|turn| format!("{}:\n{}", turn_label(debate, turn), turn.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Condensed transcript: the last `max_turns` turns, each squashed to one
/// line of at most `max_chars_per_turn` bytes.
pub fn condensed_transcript(
    debate: &Debate,
    turns: &[Turn],
    max_turns: usize,
    max_chars_per_turn: usize,
) -> String {
    let start = turns.len().saturating_sub(max_turns);
    turns[start..]
        .iter()
        .map(|turn| {
            format!(
                "{}: {}",
                debate.speaker_name(&turn.agent_id),
                truncate(&squash_whitespace(&turn.content), max_chars_per_turn)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::core::id::AgentId;
    use crate::core::topic::Topic;

    fn fixture() -> (Debate, Vec<Turn>) {
        let debate = Debate::new(
            Topic::parse("Monorepo or polyrepo?").unwrap(),
            Agent::new("claude", "claude", None, "neutral").with_id("a"),
            Agent::new("codex", "codex", None, "skeptic").with_id("b"),
            "classic",
            1,
        )
        .unwrap();
        let turns = vec![
            Turn::new(debate.id.clone(), AgentId::new("a"), 1, 1, "Monorepos scale.\n"),
            Turn::new(debate.id.clone(), AgentId::new("b"), 2, 1, "Polyrepos isolate."),
            Turn::new(debate.id.clone(), AgentId::user(), 3, 2, "What about CI cost?"),
        ];
        (debate, turns)
    }

    #[test]
    fn test_render_transcript_labels() {
        let (debate, turns) = fixture();
        let transcript = render_transcript(&debate, &turns);
        assert!(transcript.contains("[Round 1, Turn 1] claude:\nMonorepos scale."));
        assert!(transcript.contains("[Round 1, Turn 2] codex:\nPolyrepos isolate."));
        assert!(transcript.contains("[Round 2, Turn 3] User (follow-up):\nWhat about CI cost?"));
    }

    #[test]
    fn test_empty_transcript() {
        let (debate, _) = fixture();
        assert_eq!(render_transcript(&debate, &[]), "(no turns yet)");
    }

    #[test]
    fn test_condensed_transcript_keeps_tail() {
        let (debate, turns) = fixture();
        let condensed = condensed_transcript(&debate, &turns, 2, 200);
        assert_eq!(condensed, "codex: Polyrepos isolate.\nUser: What about CI cost?");
    }

    #[test]
    fn test_condensed_transcript_truncates() {
        let (debate, turns) = fixture();
        let condensed = condensed_transcript(&debate, &turns[..1], 4, 10);
        assert_eq!(condensed, "claude: Monorep...");
    }
}

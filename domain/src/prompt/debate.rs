//! Prompt templates for the debate flow

use super::style::{Style, TemplateVars, render_template};
use crate::debate::TurnKind;

/// Appended to every debate turn prompt
pub const FORMAT_INSTRUCTION: &str = "Respond in plain prose, in 2-4 short paragraphs. \
Do not prefix your reply with your name or a turn label, and do not write lines for the other participant.";

/// Templates for generating prompts at each step of a debate
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// Persona text + rendered style template + formatting instruction.
    pub fn turn_prompt(
        persona: &str,
        style: &Style,
        kind: TurnKind,
        vars: &TemplateVars<'_>,
    ) -> String {
        let rendered = render_template(style.template(kind), vars);
        let mut prompt = String::new();
        if !persona.trim().is_empty() {
            prompt.push_str(persona.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str(rendered.trim());
        prompt.push_str("\n\n");
        prompt.push_str(FORMAT_INSTRUCTION);
        prompt
    }

    /// Ask one participant for an end-of-round vote
    pub fn vote_prompt(topic: &str, agent: &str, opponent: &str, transcript: &str) -> String {
        format!(
            r#"You are {agent}. You have just finished a debate with {opponent} on the topic:

{topic}

Full transcript:

{transcript}

Do you and {opponent} now substantially agree on the answer to the topic?
Answer in exactly this format and nothing else:

VOTE: AGREE or DISAGREE
REASONING: 1-2 sentences explaining your vote"#
        )
    }

    /// Ask for a short neutral summary of the round
    pub fn summary_prompt(topic: &str, transcript: &str, agreed: bool) -> String {
        let status = if agreed {
            "Both participants voted that they reached consensus."
        } else {
            "The participants did not both vote that they reached consensus."
        };
        format!(
            r#"You are a neutral moderator. Summarize the following debate in 2-3 sentences.
Do not take sides. State the main positions and where they ended up.

Topic: {topic}

Consensus status: {status}

Transcript:

{transcript}"#
        )
    }

    /// Strict YES/NO consensus confirmation over a condensed transcript
    pub fn consensus_check_prompt(topic: &str, condensed_transcript: &str) -> String {
        format!(
            r#"Two participants are debating the topic: {topic}

Recent exchange:

{condensed_transcript}

Have the two participants reached genuine consensus on the topic, rather than
merely being polite? Answer with exactly one word: YES or NO."#
        )
    }

    /// Static summary used when the summary call fails
    pub fn fallback_summary(agreed: bool) -> String {
        if agreed {
            "The participants reached agreement on the topic. \
             A detailed summary could not be generated."
                .to_string()
        } else {
            "The participants did not reach agreement on the topic. \
             A detailed summary could not be generated; see each side's position."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_prompt_layout() {
        let style = Style::new("Open on {topic} as {agent}.", "Reply to {opponent}.", "Conclude.");
        let vars = TemplateVars {
            topic: "Tabs?",
            agent: "claude",
            opponent: "codex",
            ..Default::default()
        };
        let prompt =
            DebatePromptTemplate::turn_prompt("You are a skeptic.", &style, TurnKind::Opening, &vars);
        assert!(prompt.starts_with("You are a skeptic.\n\nOpen on Tabs? as claude."));
        assert!(prompt.ends_with(FORMAT_INSTRUCTION));
    }

    #[test]
    fn test_turn_prompt_without_persona() {
        let style = Style::new("o", "r", "c");
        let prompt =
            DebatePromptTemplate::turn_prompt("  ", &style, TurnKind::Response, &TemplateVars::default());
        assert!(prompt.starts_with("r\n\n"));
    }

    #[test]
    fn test_vote_prompt_requests_fixed_format() {
        let prompt = DebatePromptTemplate::vote_prompt("Tabs?", "claude", "codex", "...");
        assert!(prompt.contains("VOTE: AGREE or DISAGREE"));
        assert!(prompt.contains("REASONING:"));
        assert!(prompt.contains("You are claude"));
    }

    #[test]
    fn test_summary_prompt_carries_status() {
        assert!(DebatePromptTemplate::summary_prompt("t", "x", true).contains("reached consensus"));
        assert!(DebatePromptTemplate::summary_prompt("t", "x", false).contains("did not both"));
    }

    #[test]
    fn test_consensus_check_prompt_is_yes_no() {
        let prompt = DebatePromptTemplate::consensus_check_prompt("Tabs?", "a: ok\nb: ok");
        assert!(prompt.contains("YES or NO"));
        assert!(prompt.contains("a: ok"));
    }
}

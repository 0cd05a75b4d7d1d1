//! Debate styles and placeholder rendering

use crate::debate::TurnKind;
use serde::{Deserialize, Serialize};

/// A named set of turn templates governing debate tone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub opening: String,
    pub response: String,
    pub conclusion: String,
    /// Replaces `response` on odd turn indices when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questioner: Option<String>,
}

impl Style {
    pub fn new(
        opening: impl Into<String>,
        response: impl Into<String>,
        conclusion: impl Into<String>,
    ) -> Self {
        Self {
            opening: opening.into(),
            response: response.into(),
            conclusion: conclusion.into(),
            questioner: None,
        }
    }

    pub fn with_questioner(mut self, questioner: impl Into<String>) -> Self {
        self.questioner = Some(questioner.into());
        self
    }

    pub fn has_questioner(&self) -> bool {
        self.questioner.is_some()
    }

    pub fn template(&self, kind: TurnKind) -> &str {
        match kind {
            TurnKind::Opening => &self.opening,
            TurnKind::Response => &self.response,
            TurnKind::Questioner => self.questioner.as_deref().unwrap_or(&self.response),
            TurnKind::Conclusion => &self.conclusion,
        }
    }
}

/// Values substituted into style templates
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateVars<'a> {
    pub topic: &'a str,
    pub agent: &'a str,
    pub opponent: &'a str,
    pub previous: &'a str,
    pub transcript: &'a str,
}

impl TemplateVars<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "topic" => Some(self.topic),
            "agent" => Some(self.agent),
            "opponent" => Some(self.opponent),
            "previous" => Some(self.previous),
            "transcript" => Some(self.transcript),
            _ => None,
        }
    }
}

/// Substitute `{topic}`, `{agent}`, `{opponent}`, `{previous}` and
/// `{transcript}` in a single pass. Unknown placeholders are left as-is, and
/// substituted text is never re-scanned.
pub fn render_template(template: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len() + vars.transcript.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match vars.lookup(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars<'static> {
        TemplateVars {
            topic: "Tabs or spaces?",
            agent: "claude",
            opponent: "codex",
            previous: "Spaces, always.",
            transcript: "[Round 1, Turn 1] codex:\nSpaces, always.",
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let rendered = render_template(
            "{agent} vs {opponent} on {topic}. Last: {previous}\n{transcript}",
            &vars(),
        );
        assert_eq!(
            rendered,
            "claude vs codex on Tabs or spaces?. Last: Spaces, always.\n\
             [Round 1, Turn 1] codex:\nSpaces, always."
        );
    }

    #[test]
    fn test_unknown_placeholder_preserved() {
        assert_eq!(render_template("{unknown} {agent}", &vars()), "{unknown} claude");
        assert_eq!(render_template("open {brace", &vars()), "open {brace");
    }

    #[test]
    fn test_substituted_text_not_rescanned() {
        let v = TemplateVars {
            previous: "{agent}",
            ..vars()
        };
        assert_eq!(render_template("{previous}", &v), "{agent}");
    }

    #[test]
    fn test_questioner_falls_back_to_response() {
        let style = Style::new("o", "r", "c");
        assert_eq!(style.template(TurnKind::Questioner), "r");
        let style = style.with_questioner("q");
        assert_eq!(style.template(TurnKind::Questioner), "q");
        assert_eq!(style.template(TurnKind::Conclusion), "c");
    }
}

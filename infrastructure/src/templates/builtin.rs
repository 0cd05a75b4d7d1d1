//! Built-in personas and debate styles, with overrides from config

use crate::config::FileTemplatesConfig;
use colloquy_application::TemplateCatalog;
use colloquy_domain::Style;
use std::collections::BTreeMap;

const PERSONAS: &[(&str, &str)] = &[
    (
        "neutral",
        "You are a thoughtful, even-handed debater. Argue for the position you find \
         most defensible, acknowledge strong points from the other side, and change \
         your mind when the evidence warrants it.",
    ),
    (
        "skeptic",
        "You are a rigorous skeptic. Question assumptions, ask for evidence, and point \
         out weak reasoning, hidden costs and failure modes. Concede only what has \
         been demonstrated.",
    ),
    (
        "optimist",
        "You are a constructive optimist. Look for opportunities and upside, build on \
         good ideas, and propose ways to make promising approaches work.",
    ),
    (
        "pragmatist",
        "You are a pragmatic engineer. Focus on what works in practice: cost, \
         effort, maintenance burden and the constraints of real teams.",
    ),
    (
        "analyst",
        "You are a careful analyst. Break the question into parts, weigh each \
         trade-off explicitly, and prefer concrete data and examples to rhetoric.",
    ),
    (
        "contrarian",
        "You are a principled contrarian. Take the less popular side seriously, \
         stress-test the consensus view, and surface arguments others overlook.",
    ),
];

/// Rotation handed to participants without an explicit persona
const DEFAULT_ROTATION: &[&str] = &["neutral", "skeptic", "optimist", "pragmatist"];

fn builtin_styles() -> BTreeMap<String, Style> {
    BTreeMap::from([
        (
            "classic".to_string(),
            Style::new(
                "You are {agent}, debating {opponent} on the topic:\n\n{topic}\n\n\
                 State your position and your strongest arguments for it.",
                "You are {agent}, debating {opponent} on the topic:\n\n{topic}\n\n\
                 Debate so far:\n{transcript}\n\n\
                 Respond to {opponent}'s latest point:\n{previous}\n\n\
                 Address their arguments directly and advance your own.",
                "You are {agent}, debating {opponent} on the topic:\n\n{topic}\n\n\
                 Debate so far:\n{transcript}\n\n\
                 Give your closing statement: summarize your position, note where you \
                 and {opponent} agree, and where you still differ.",
            ),
        ),
        (
            "socratic".to_string(),
            Style::new(
                "You are {agent}, exploring the topic with {opponent}:\n\n{topic}\n\n\
                 Offer an initial answer and the reasoning behind it.",
                "You are {agent}, exploring the topic with {opponent}:\n\n{topic}\n\n\
                 Dialogue so far:\n{transcript}\n\n\
                 {opponent} asked:\n{previous}\n\n\
                 Answer the question honestly, refining your view where it falls short.",
                "You are {agent}, exploring the topic with {opponent}:\n\n{topic}\n\n\
                 Dialogue so far:\n{transcript}\n\n\
                 Summarize what the dialogue established and what remains open.",
            )
            .with_questioner(
                "You are {agent}, exploring the topic with {opponent}:\n\n{topic}\n\n\
                 Dialogue so far:\n{transcript}\n\n\
                 {opponent} said:\n{previous}\n\n\
                 Ask one or two probing questions that expose assumptions or gaps in \
                 that reasoning. Do not argue your own position yet.",
            ),
        ),
        (
            "collaborative".to_string(),
            Style::new(
                "You are {agent}, working with {opponent} toward the best answer to:\n\n\
                 {topic}\n\nPropose an initial approach and its main trade-offs.",
                "You are {agent}, working with {opponent} toward the best answer to:\n\n\
                 {topic}\n\nDiscussion so far:\n{transcript}\n\n\
                 {opponent} proposed:\n{previous}\n\n\
                 Build on what is good, fix what is not, and move toward a shared answer.",
                "You are {agent}, working with {opponent} toward the best answer to:\n\n\
                 {topic}\n\nDiscussion so far:\n{transcript}\n\n\
                 State the answer you and {opponent} converged on, or what still separates you.",
            ),
        ),
        (
            "adversarial".to_string(),
            Style::new(
                "You are {agent}, facing {opponent} in a competitive debate on:\n\n{topic}\n\n\
                 Take a clear side and make the strongest case you can.",
                "You are {agent}, facing {opponent} in a competitive debate on:\n\n{topic}\n\n\
                 Debate so far:\n{transcript}\n\n\
                 {opponent} argued:\n{previous}\n\n\
                 Rebut their argument point by point and press your advantage.",
                "You are {agent}, facing {opponent} in a competitive debate on:\n\n{topic}\n\n\
                 Debate so far:\n{transcript}\n\n\
                 Deliver your closing argument and explain why your side prevailed.",
            ),
        ),
    ])
}

/// Built-in personas and styles with config overrides
#[derive(Debug, Clone)]
pub struct BuiltinTemplateCatalog {
    personas: BTreeMap<String, String>,
    styles: BTreeMap<String, Style>,
    rotation: Vec<String>,
}

impl Default for BuiltinTemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinTemplateCatalog {
    pub fn new() -> Self {
        Self {
            personas: PERSONAS
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
            styles: builtin_styles(),
            rotation: DEFAULT_ROTATION.iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Add or replace personas and styles
    pub fn with_overrides(mut self, overrides: &FileTemplatesConfig) -> Self {
        self.personas.extend(
            overrides
                .personas
                .iter()
                .map(|(id, text)| (id.clone(), text.clone())),
        );
        self.styles.extend(
            overrides
                .styles
                .iter()
                .map(|(id, style)| (id.clone(), style.clone())),
        );
        self
    }

    /// Replace the persona rotation; an empty list keeps the current one
    pub fn with_rotation(mut self, rotation: Vec<String>) -> Self {
        if !rotation.is_empty() {
            self.rotation = rotation;
        }
        self
    }

    pub fn persona_ids(&self) -> impl Iterator<Item = &str> {
        self.personas.keys().map(String::as_str)
    }

    pub fn style_ids(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

impl TemplateCatalog for BuiltinTemplateCatalog {
    fn persona(&self, id: &str) -> Option<String> {
        self.personas.get(id).cloned()
    }

    fn style(&self, id: &str) -> Option<Style> {
        self.styles.get(id).cloned()
    }

    fn persona_rotation(&self) -> Vec<String> {
        self.rotation.clone()
    }
}

//! Stage-2 anonymization and ranking extraction.
//!
//! Responses are relabelled `A`..`H` before review. A reviewer's reply is
//! parsed with an ordered list of independent strategies; the first one that
//! yields at least one known label wins, and if none does the submission order
//! is used. Parsing therefore never fails.
//!
//! | # | Strategy | Example |
//! |---|----------|---------|
//! | 1 | numbered `Response X` lines | `1. Response B` |
//! | 2 | numbered bare labels | `1. B` |
//! | 3 | label chain | `B > A > C`, `B, A, C` |
//! | 4 | first mention order | `... Response C is best, Response A ...` |
//! | 5 | submission order | *(fallback)* |

use super::entities::Response;
use crate::core::id::ResponseId;
use regex::Regex;
use std::sync::LazyLock;

/// Labels available for anonymization; responses beyond these are not reviewed.
pub const LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Heading that opens the machine-readable ranking section.
pub const FINAL_RANKING_HEADER: &str = "FINAL RANKING";

/// A `FINAL RANKING:` heading at the start of a line, with optional markdown decoration.
static FINAL_RANKING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\w\n]*final\s+ranking[^\w\n]*:").expect("valid regex")
});

static NUMBERED_RESPONSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\s*[.):]\s*[*_]*\s*(?i:response)\s+([A-H])\b").expect("valid regex")
});

static NUMBERED_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\s*[.):]\s*[*_]*\s*([A-H])[*_]*\s*(?:$|[-:.,;()])")
        .expect("valid regex")
});

static RESPONSE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?i:response)\s+([A-H])\b").expect("valid regex"));

/// One anonymized Stage-1 response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizedResponse {
    pub label: char,
    pub response_id: ResponseId,
    pub content: String,
}

/// The labelled block shown to every reviewer
#[derive(Debug, Clone, Default)]
pub struct AnonymizedResponses {
    entries: Vec<AnonymizedResponse>,
}

impl AnonymizedResponses {
    /// Label responses in order, keeping at most [`LABELS`]`.len()` of them.
    pub fn new(responses: &[Response]) -> Self {
        let entries = responses
            .iter()
            .zip(LABELS)
            .map(|(response, label)| AnonymizedResponse {
                label,
                response_id: response.id.clone(),
                content: response.content.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[AnonymizedResponse] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn response_for(&self, label: char) -> Option<&ResponseId> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.response_id)
    }

    /// Response ids in submission order
    pub fn submission_order(&self) -> Vec<ResponseId> {
        self.entries.iter().map(|e| e.response_id.clone()).collect()
    }

    /// Render as `Response A:\n...` blocks
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("Response {}:\n{}", e.label, e.content.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Map labels to response ids, dropping unknown labels and repeats.
    fn resolve(&self, labels: impl IntoIterator<Item = char>) -> Vec<ResponseId> {
        let mut ordering: Vec<ResponseId> = Vec::new();
        for label in labels {
            if let Some(id) = self.response_for(label)
                && !ordering.contains(id)
            {
                ordering.push(id.clone());
            }
        }
        ordering
    }
}

/// Byte ranges of every `FINAL RANKING:` heading, in order of appearance.
fn header_spans(reply: &str) -> Vec<(usize, usize)> {
    FINAL_RANKING_LINE
        .find_iter(reply)
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn section_after(reply: &str, header_end: usize) -> &str {
    reply[header_end..].trim_start_matches(['*', '_', '#', ' '])
}

/// The part of `reply` after the last `FINAL RANKING:` heading, if present.
pub fn ranking_section(reply: &str) -> Option<&str> {
    header_spans(reply)
        .last()
        .map(|&(_, end)| section_after(reply, end))
}

/// Free-text reasoning: everything before the ranking section.
pub fn ranking_reasoning(reply: &str) -> String {
    let head = match header_spans(reply).last() {
        Some(&(start, _)) => &reply[..start],
        None => reply,
    };
    head.trim()
        .trim_end_matches(['*', '#', '_'])
        .trim()
        .to_string()
}

type Strategy = fn(&str) -> Vec<char>;

/// Extraction strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("numbered_response", numbered_response_lines),
    ("numbered_label", numbered_label_lines),
    ("label_chain", label_chain),
    ("response_mentions", response_mentions),
];

fn captured_labels(re: &Regex, text: &str) -> Vec<char> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().chars().next())
        .collect()
}

fn numbered_response_lines(text: &str) -> Vec<char> {
    captured_labels(&NUMBERED_RESPONSE, text)
}

fn numbered_label_lines(text: &str) -> Vec<char> {
    captured_labels(&NUMBERED_LABEL, text)
}

fn response_mentions(text: &str) -> Vec<char> {
    captured_labels(&RESPONSE_MENTION, text)
}

/// A single line of `>`- or comma-separated labels, e.g. `B > A > C`.
fn label_chain(text: &str) -> Vec<char> {
    for line in text.lines() {
        let parts: Vec<&str> = line.split(['>', ',']).collect();
        if parts.len() < 2 {
            continue;
        }
        let labels: Option<Vec<char>> = parts.iter().map(|p| chain_label(p)).collect();
        if let Some(labels) = labels {
            return labels;
        }
    }
    Vec::new()
}

const RESPONSE_PREFIX: &str = "response ";

fn chain_label(part: &str) -> Option<char> {
    let token = part.trim().trim_matches(['*', '_', '.', '`']).trim();
    let token = match token.get(..RESPONSE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(RESPONSE_PREFIX) => {
            token[RESPONSE_PREFIX.len()..].trim()
        }
        _ => token,
    };
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if LABELS.contains(&c) => Some(c),
        _ => None,
    }
}

/// First strategy that yields a known label over `text`, with its ordering.
fn extract(text: &str, responses: &AnonymizedResponses) -> Option<(&'static str, Vec<ResponseId>)> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let ordering = responses.resolve(strategy(text));
        (!ordering.is_empty()).then_some((*name, ordering))
    })
}

/// Run the strategies over the `FINAL RANKING:` sections, last heading first,
/// or over the whole reply when there is no heading.
fn extract_ranking(
    reply: &str,
    responses: &AnonymizedResponses,
) -> Option<(&'static str, Vec<ResponseId>)> {
    let spans = header_spans(reply);
    if spans.is_empty() {
        return extract(reply, responses);
    }
    spans
        .iter()
        .rev()
        .find_map(|&(_, end)| extract(section_after(reply, end), responses))
}

/// Extract the reviewer's ordering (best first) as response ids.
///
/// Falls back to submission order.
pub fn parse_ranking(reply: &str, responses: &AnonymizedResponses) -> Vec<ResponseId> {
    extract_ranking(reply, responses)
        .map(|(_, ordering)| ordering)
        .unwrap_or_else(|| responses.submission_order())
}

/// Name of the strategy that would win for `reply` (`"submission_order"` for the fallback).
pub fn matching_strategy(reply: &str, responses: &AnonymizedResponses) -> &'static str {
    extract_ranking(reply, responses)
        .map(|(name, _)| name)
        .unwrap_or("submission_order")
}

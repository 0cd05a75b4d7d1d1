//! End-of-round votes and their parsing.
//!
//! Agents are asked to answer in a fixed two-field format:
//!
//! ```text
//! VOTE: AGREE
//! REASONING: Both sides accept the migration plan.
//! ```
//!
//! Parsing is lenient: markdown emphasis around the field names is ignored,
//! and when the fields are missing the raw reply becomes the reasoning.

use serde::{Deserialize, Serialize};

/// One agent's agree/disagree decision at round end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub agrees: bool,
    pub reasoning: String,
}

impl Vote {
    pub fn new(agrees: bool, reasoning: impl Into<String>) -> Self {
        Self {
            agrees,
            reasoning: reasoning.into(),
        }
    }

    pub fn agree(reasoning: impl Into<String>) -> Self {
        Self::new(true, reasoning)
    }

    pub fn disagree(reasoning: impl Into<String>) -> Self {
        Self::new(false, reasoning)
    }
}

/// Strip markdown decoration (`**`, `#`, `-`, `>`) from the start of a line.
fn clean_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['*', '#', '-', '>', '_', ' '])
        .trim()
}

/// Return the value of `FIELD:` if `line` starts with it (case-insensitive).
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let line = clean_line(line);
    let head = line.get(..field.len())?;
    if !head.eq_ignore_ascii_case(field) {
        return None;
    }
    let rest = line[field.len()..].trim_start_matches(['*', '_']);
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim_start_matches(['*', '_']).trim())
}

/// Decide agree/disagree from free text. `DISAGREE` wins over `AGREE`.
fn decision(text: &str) -> Option<bool> {
    let upper = text.to_uppercase();
    if upper.contains("DISAGREE") {
        Some(false)
    } else if upper.contains("AGREE") {
        Some(true)
    } else {
        None
    }
}

/// Parse a vote reply.
///
/// - `VOTE:` line present: its value decides (`DISAGREE` → false, `AGREE` → true,
///   anything else → false).
/// - `VOTE:` line absent: the whole reply is scanned for the keywords; no
///   keyword means disagreement.
/// - `REASONING:` present: its value plus any following lines is the
///   reasoning; otherwise the trimmed raw reply is used.
pub fn parse_vote_response(response: &str) -> Vote {
    let lines: Vec<&str> = response.lines().collect();

    let vote_field = lines.iter().find_map(|l| field_value(l, "VOTE"));
    let agrees = match vote_field {
        Some(value) => decision(value).unwrap_or(false),
        None => decision(response).unwrap_or(false),
    };

    let reasoning = lines
        .iter()
        .position(|l| field_value(l, "REASONING").is_some())
        .map(|idx| {
            let first = field_value(lines[idx], "REASONING").unwrap_or_default();
            std::iter::once(first)
                .chain(lines[idx + 1..].iter().map(|l| l.trim()))
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| response.trim().to_string());

    Vote { agrees, reasoning }
}

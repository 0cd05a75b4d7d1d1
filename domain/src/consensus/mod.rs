//! Consensus signals
//!
//! A cheap lexical pre-filter decides whether the last two turns of a round
//! both sound like agreement. Only then is a model asked to confirm, and only
//! a reply starting with "yes" counts as confirmation.

use crate::debate::Turn;

/// Phrases that signal agreement. Matched case-insensitively as substrings.
pub const AGREEMENT_PHRASES: &[&str] = &[
    "i agree",
    "we agree",
    "i concur",
    "agreed",
    "common ground",
    "you're right",
    "you are right",
    "fair point",
    "good point",
    "we can conclude",
    "we both",
    "in agreement",
    "consensus",
    "we've reached",
    "we have reached",
    "i accept",
    "i'm persuaded",
    "you've convinced me",
];

/// Whether `text` contains at least one agreement phrase.
pub fn has_agreement_signal(text: &str) -> bool {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    AGREEMENT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// The last two turns of `round_turns`, if both carry an agreement signal.
pub fn trailing_agreement(round_turns: &[&Turn]) -> Option<(Turn, Turn)> {
    let [.., previous, last] = round_turns else {
        return None;
    };
    (has_agreement_signal(&previous.content) && has_agreement_signal(&last.content))
        .then(|| ((*previous).clone(), (*last).clone()))
}

/// Whether a confirmation reply confirms consensus.
pub fn is_confirmation(reply: &str) -> bool {
    reply
        .trim_start()
        .trim_start_matches(['*', '#', '"', '\''])
        .get(..3)
        .is_some_and(|head| head.eq_ignore_ascii_case("yes"))
}

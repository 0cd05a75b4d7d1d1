//! Prompt templates for the council pipeline

use crate::council::FINAL_RANKING_HEADER;

/// Context carried into a round opened by a follow-up question
#[derive(Debug, Clone, Copy)]
pub struct FollowUpContext<'a> {
    pub previous_synthesis: &'a str,
    pub question: &'a str,
}

/// Templates for generating prompts at each council stage
pub struct CouncilPromptTemplate;

impl CouncilPromptTemplate {
    /// Stage 1: a member's independent perspective
    pub fn perspective_prompt(
        persona: &str,
        topic: &str,
        follow_up: Option<FollowUpContext<'_>>,
    ) -> String {
        let mut prompt = String::new();
        if !persona.trim().is_empty() {
            prompt.push_str(persona.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!("Topic: {}\n\n", topic));

        match follow_up {
            Some(ctx) => prompt.push_str(&format!(
                r#"The council already discussed this topic. The chairman's synthesis was:

{}

Follow-up question: {}

Provide your perspective on the follow-up question. Be concrete and support
your points with reasoning."#,
                ctx.previous_synthesis.trim(),
                ctx.question.trim()
            )),
            None => prompt.push_str(
                "Provide your perspective on this topic. Be concrete and support your \
                 points with reasoning.",
            ),
        }
        prompt
    }

    /// Stage 2: rank the anonymized responses
    pub fn ranking_prompt(topic: &str, question: Option<&str>, anonymized_block: &str) -> String {
        let question = question
            .map(|q| format!("\nFollow-up question: {}\n", q.trim()))
            .unwrap_or_default();
        format!(
            r#"Topic: {topic}
{question}
Below are anonymous responses from several council members:

{anonymized_block}

Evaluate each response for accuracy, insight and usefulness. Explain your
assessment briefly, then end your reply with a section in exactly this form,
listing every response from best to worst:

{FINAL_RANKING_HEADER}:
1. Response X
2. Response Y"#
        )
    }

    /// Stage 3: the chairman's synthesis
    ///
    /// `responses` are `(member name, content)`; `aggregate` is
    /// `(member name, mean position)` in ranking order.
    pub fn synthesis_prompt(
        topic: &str,
        question: Option<&str>,
        responses: &[(String, String)],
        aggregate: &[(String, f64)],
    ) -> String {
        let mut prompt = format!("You are the chairman of a council.\n\nTopic: {}\n", topic);
        if let Some(q) = question {
            prompt.push_str(&format!("Follow-up question: {}\n", q.trim()));
        }

        prompt.push_str("\nMember responses:\n");
        for (name, content) in responses {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, content.trim()));
        }

        if !aggregate.is_empty() {
            prompt.push_str("\nPeer ranking (mean position, lower is better):\n");
            for (i, (name, avg)) in aggregate.iter().enumerate() {
                prompt.push_str(&format!("{}. {} ({:.2})\n", i + 1, name, avg));
            }
        }

        prompt.push_str(
            r#"
Reconcile these perspectives into a single answer:

1. **Agreements**: where the members agree
2. **Disagreements**: where they differ and which position is better supported
3. **Recommendation**: your final recommendation, giving more weight to higher-ranked responses

Format your response with clear markdown headers."#,
        );
        prompt
    }
}

//! Console output formatter for debates and councils

use colored::Colorize;
use colloquy_domain::{
    AggregateRanking, Conclusion, Council, Debate, OutputFormat, Ranking, Response, Status, Turn,
    Vote, aggregate_rankings,
};

/// Formats debates and councils for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a debate in the requested format
    pub fn debate(format: OutputFormat, debate: &Debate, turns: &[Turn]) -> String {
        match format {
            OutputFormat::Full => Self::debate_full(debate, turns),
            OutputFormat::Summary => Self::debate_summary(debate),
            OutputFormat::Json => Self::debate_json(debate, turns),
        }
    }

    /// Format a council in the requested format
    pub fn council(
        format: OutputFormat,
        council: &Council,
        responses: &[Response],
        rankings: &[Ranking],
    ) -> String {
        match format {
            OutputFormat::Full => Self::council_full(council, responses, rankings),
            OutputFormat::Summary => Self::council_summary(council),
            OutputFormat::Json => Self::council_json(council, responses, rankings),
        }
    }

    /// Full transcript with every round's conclusion
    pub fn debate_full(debate: &Debate, turns: &[Turn]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Debate"));
        output.push('\n');
        output.push_str(&Self::debate_intro(debate));

        let last_round = turns
            .iter()
            .map(|t| t.round)
            .chain(debate.conclusions.iter().map(|c| c.round))
            .max()
            .unwrap_or(0);

        for round in 1..=last_round {
            output.push_str(&Self::section_header(&format!("Round {}", round)));
            for turn in turns.iter().filter(|t| t.round == round) {
                let title = format!("── [Turn {}] {} ──", turn.number, debate.speaker_name(&turn.agent_id));
                let title = if turn.is_user() {
                    title.magenta().bold()
                } else {
                    title.yellow().bold()
                };
                output.push_str(&format!("\n{}\n{}\n", title, turn.content));
            }
            if let Some(conclusion) = debate.conclusion_for(round) {
                output.push_str(&Self::conclusion(debate, conclusion));
            }
        }

        output.push_str(&Self::status_line(debate.status, debate.error.as_deref()));
        output.push_str(&Self::footer());
        output
    }

    /// Topic plus the latest conclusion
    pub fn debate_summary(debate: &Debate) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Debate Conclusion ===".cyan().bold()));
        output.push_str(&format!("{} {}\n", "Topic:".bold(), debate.topic.content()));
        output.push_str(&format!(
            "{} {} vs {}\n",
            "Agents:".dimmed(),
            debate.agent_a.label(),
            debate.agent_b.label()
        ));

        match debate.conclusions.last() {
            Some(conclusion) => output.push_str(&Self::conclusion(debate, conclusion)),
            None => output.push_str(&Self::status_line(debate.status, debate.error.as_deref())),
        }
        output.push_str(&format!("\n{} {}\n", "Debate id:".dimmed(), debate.id));
        output
    }

    pub fn debate_json(debate: &Debate, turns: &[Turn]) -> String {
        let value = serde_json::json!({
            "debate": debate,
            "turns": turns,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// All three stages of every round
    pub fn council_full(council: &Council, responses: &[Response], rankings: &[Ranking]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council"));
        output.push('\n');
        output.push_str(&Self::council_intro(council));

        let last_round = responses
            .iter()
            .map(|r| r.round)
            .chain(council.syntheses.iter().map(|s| s.round))
            .max()
            .unwrap_or(0);

        for round in 1..=last_round {
            output.push_str(&Self::section_header(&format!("Round {}", round)));
            if let Some(follow_up) = council.follow_up_for(round) {
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Follow-up:".magenta().bold(),
                    follow_up.content
                ));
            }

            let round_responses: Vec<Response> =
                responses.iter().filter(|r| r.round == round).cloned().collect();
            let round_rankings: Vec<Ranking> =
                rankings.iter().filter(|r| r.round == round).cloned().collect();

            output.push_str(&format!("\n{}\n", "Stage 1: Responses".cyan().bold()));
            for response in &round_responses {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", council.member_name(&response.member_id))
                        .yellow()
                        .bold(),
                    response.content
                ));
            }

            if !round_rankings.is_empty() {
                output.push_str(&format!("\n{}\n", "Stage 2: Rankings".cyan().bold()));
                let aggregate = aggregate_rankings(&round_responses, &round_rankings);
                output.push_str(&Self::aggregate_table(council, &aggregate));
            }

            if let Some(synthesis) = council.synthesis_for(round) {
                output.push_str(&format!("\n{}\n", "Stage 3: Synthesis".cyan().bold()));
                let title = format!("Chairman: {}", council.chairman.name);
                let title = if synthesis.fallback {
                    title.red().bold()
                } else {
                    title.yellow().bold()
                };
                output.push_str(&format!("\n{}\n\n{}\n", title, synthesis.content));
            }
        }

        output.push_str(&Self::status_line(council.status, council.error.as_deref()));
        output.push_str(&Self::footer());
        output
    }

    /// Topic plus the latest synthesis
    pub fn council_summary(council: &Council) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Council Synthesis ===".cyan().bold()));
        output.push_str(&format!("{} {}\n", "Topic:".bold(), council.topic.content()));
        if let Some(follow_up) = council.follow_ups.last() {
            output.push_str(&format!("{} {}\n", "Follow-up:".bold(), follow_up.content));
        }
        output.push_str(&format!(
            "{} {}\n\n",
            "Members consulted:".dimmed(),
            council
                .members
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        match council.syntheses.last() {
            Some(synthesis) => {
                output.push_str(&synthesis.content);
                output.push('\n');
            }
            None => output.push_str(&Self::status_line(council.status, council.error.as_deref())),
        }
        output.push_str(&format!("\n{} {}\n", "Council id:".dimmed(), council.id));
        output
    }

    pub fn council_json(council: &Council, responses: &[Response], rankings: &[Ranking]) -> String {
        let aggregate: Vec<serde_json::Value> = council
            .syntheses
            .iter()
            .map(|s| {
                let round_responses: Vec<Response> =
                    responses.iter().filter(|r| r.round == s.round).cloned().collect();
                let round_rankings: Vec<Ranking> =
                    rankings.iter().filter(|r| r.round == s.round).cloned().collect();
                let ranked: Vec<serde_json::Value> =
                    aggregate_rankings(&round_responses, &round_rankings)
                        .iter()
                        .map(|a| {
                            serde_json::json!({
                                "member": council.member_name(&a.member_id),
                                "response_id": a.response_id,
                                "avg_rank": a.avg_rank,
                                "votes": a.votes(),
                            })
                        })
                        .collect();
                serde_json::json!({ "round": s.round, "ranking": ranked })
            })
            .collect();

        let value = serde_json::json!({
            "council": council,
            "responses": responses,
            "rankings": rankings,
            "aggregate": aggregate,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line for `list`
    pub fn debate_list_line(debate: &Debate) -> String {
        format!(
            "{}  {}  {:<11}  {} vs {}  {}",
            debate.id.as_str().dimmed(),
            debate.created_at.format("%Y-%m-%d %H:%M"),
            Self::status_label(debate.status),
            debate.agent_a.name,
            debate.agent_b.name,
            Self::truncate(debate.topic.content(), 60)
        )
    }

    /// One line for `list`
    pub fn council_list_line(council: &Council) -> String {
        format!(
            "{}  {}  {:<11}  {} members  {}",
            council.id.as_str().dimmed(),
            council.created_at.format("%Y-%m-%d %H:%M"),
            Self::status_label(council.status),
            council.members.len(),
            Self::truncate(council.topic.content(), 60)
        )
    }

    fn debate_intro(debate: &Debate) -> String {
        format!(
            "{} {}\n\n{} {} ({}) vs {} ({})\n{} {}, {} turns per agent\n",
            "Topic:".cyan().bold(),
            debate.topic.content(),
            "Agents:".cyan().bold(),
            debate.agent_a.label(),
            debate.agent_a.persona,
            debate.agent_b.label(),
            debate.agent_b.persona,
            "Style:".cyan().bold(),
            debate.style,
            debate.turns_per_agent
        )
    }

    fn council_intro(council: &Council) -> String {
        let members: Vec<String> = council
            .members
            .iter()
            .map(|m| format!("{} ({})", m.label(), m.persona))
            .collect();
        format!(
            "{} {}\n\n{} {}\n{} {}\n",
            "Topic:".cyan().bold(),
            council.topic.content(),
            "Members:".cyan().bold(),
            members.join(", "),
            "Chairman:".cyan().bold(),
            council.chairman.name
        )
    }

    fn conclusion(debate: &Debate, conclusion: &Conclusion) -> String {
        let mut output = String::new();
        let verdict = if conclusion.agreed {
            "Consensus reached".green().bold()
        } else {
            "No consensus".yellow().bold()
        };
        output.push_str(&format!("\n{} {}", "Conclusion:".cyan().bold(), verdict));
        if conclusion.early_consensus {
            output.push_str(&format!(" {}", "(early)".dimmed()));
        }
        output.push('\n');

        for (agent, vote) in [
            (&debate.agent_a, &conclusion.agent_a_vote),
            (&debate.agent_b, &conclusion.agent_b_vote),
        ] {
            output.push_str(&format!("  {} {}\n", format!("{}:", agent.name).bold(), Self::vote(vote.as_ref())));
        }

        output.push_str(&format!("\n{}\n", conclusion.summary));
        output
    }

    fn vote(vote: Option<&Vote>) -> String {
        match vote {
            Some(v) if v.agrees => format!("{} {}", "AGREE".green(), v.reasoning),
            Some(v) => format!("{} {}", "DISAGREE".yellow(), v.reasoning),
            None => "no vote".dimmed().to_string(),
        }
    }

    fn aggregate_table(council: &Council, aggregate: &[AggregateRanking]) -> String {
        let mut output = String::new();
        for (i, entry) in aggregate.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<24} avg {:.2} ({} votes)\n",
                i + 1,
                council.member_name(&entry.member_id),
                entry.avg_rank,
                entry.votes()
            ));
        }
        output
    }

    fn status_line(status: Status, error: Option<&str>) -> String {
        match error {
            Some(error) if status == Status::Failed => {
                format!("\n{} {}\n", Self::status_label(status), error.red())
            }
            _ => format!("\n{} {}\n", "Status:".dimmed(), Self::status_label(status)),
        }
    }

    fn status_label(status: Status) -> String {
        match status {
            Status::Completed => status.as_str().green().to_string(),
            Status::Failed => status.as_str().red().to_string(),
            Status::InProgress => status.as_str().yellow().to_string(),
            Status::Pending => status.as_str().dimmed().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        let line = text.lines().next().unwrap_or_default();
        if line.chars().count() <= max_chars && !text.contains('\n') {
            return line.to_string();
        }
        let cut: String = line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::{Agent, AgentId, CouncilSynthesis, Topic};

    fn plain() {
        colored::control::set_override(false);
    }

    fn debate() -> Debate {
        let mut d = Debate::new(
            Topic::parse("Tabs or spaces?").unwrap(),
            Agent::new("claude", "claude", None, "neutral").with_id("a"),
            Agent::new("codex", "codex", None, "skeptic").with_id("b"),
            "classic",
            1,
        )
        .unwrap();
        d.conclude(Conclusion::from_votes(
            1,
            Some(Vote::agree("Spaces win.")),
            Some(Vote::agree("Agreed.")),
            "Both settled on spaces.",
            false,
        ))
        .unwrap();
        d
    }

    fn turns(d: &Debate) -> Vec<Turn> {
        vec![
            Turn::new(d.id.clone(), AgentId::new("b"), 1, 1, "Spaces."),
            Turn::new(d.id.clone(), AgentId::new("a"), 2, 1, "Fine, spaces."),
        ]
    }

    fn council() -> (Council, Vec<Response>, Vec<Ranking>) {
        let mut c = Council::new(
            Topic::parse("Adopt Rust?").unwrap(),
            Agent::new("claude:opus (chairman)", "claude", Some("opus".into()), "neutral")
                .with_id("chair"),
            vec![
                Agent::new("claude", "claude", None, "neutral").with_id("m1"),
                Agent::new("codex", "codex", None, "skeptic").with_id("m2"),
            ],
        )
        .unwrap();
        let responses = vec![
            Response::new(c.id.clone(), AgentId::new("m1"), 1, "Yes."),
            Response::new(c.id.clone(), AgentId::new("m2"), 1, "Not yet."),
        ];
        let ordering = vec![responses[1].id.clone(), responses[0].id.clone()];
        let rankings = vec![
            Ranking::new(c.id.clone(), AgentId::new("m1"), 1, ordering.clone(), ""),
            Ranking::new(c.id.clone(), AgentId::new("m2"), 1, ordering, ""),
        ];
        c.complete(CouncilSynthesis::new(1, AgentId::new("chair"), "Adopt gradually."))
            .unwrap();
        (c, responses, rankings)
    }

    #[test]
    fn test_debate_full_shows_turns_and_votes() {
        plain();
        let d = debate();
        let out = ConsoleFormatter::debate_full(&d, &turns(&d));
        assert!(out.contains("Round 1"));
        assert!(out.contains("── [Turn 1] codex ──\nSpaces."));
        assert!(out.contains("Consensus reached"));
        assert!(out.contains("claude: AGREE Spaces win."));
        assert!(out.contains("Both settled on spaces."));
    }

    #[test]
    fn test_debate_summary_omits_transcript() {
        plain();
        let d = debate();
        let out = ConsoleFormatter::debate(OutputFormat::Summary, &d, &turns(&d));
        assert!(out.contains("Both settled on spaces."));
        assert!(!out.contains("Fine, spaces."));
        assert!(out.contains(d.id.as_str()));
    }

    #[test]
    fn test_debate_json_is_valid() {
        let d = debate();
        let out = ConsoleFormatter::debate(OutputFormat::Json, &d, &turns(&d));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["turns"].as_array().unwrap().len(), 2);
        assert_eq!(value["debate"]["conclusions"][0]["agreed"], true);
    }

    #[test]
    fn test_council_full_shows_stages() {
        plain();
        let (c, responses, rankings) = council();
        let out = ConsoleFormatter::council_full(&c, &responses, &rankings);
        assert!(out.contains("Stage 1: Responses"));
        assert!(out.contains("── codex ──\nNot yet."));
        assert!(out.contains("1. codex"));
        assert!(out.contains("avg 1.00 (2 votes)"));
        assert!(out.contains("Adopt gradually."));
    }

    #[test]
    fn test_council_json_includes_aggregate() {
        let (c, responses, rankings) = council();
        let out = ConsoleFormatter::council(OutputFormat::Json, &c, &responses, &rankings);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["aggregate"][0]["ranking"][0]["member"], "codex");
        assert_eq!(value["responses"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ConsoleFormatter::truncate("short", 10), "short");
        assert_eq!(ConsoleFormatter::truncate("a much longer topic", 10), "a much ...");
        assert_eq!(ConsoleFormatter::truncate("two\nlines", 10), "two...");
    }
}

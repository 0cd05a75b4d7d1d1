//! Progress reporting for debate and council runs

use colloquy_application::{CouncilProgressNotifier, CouncilStage, DebateProgressNotifier};
use colloquy_domain::{Agent, Conclusion, CouncilSynthesis, Debate, Ranking, Response, Side, Turn};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with spinners and per-stage progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinner: Mutex::new(None),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_display_name(stage: CouncilStage) -> &'static str {
        match stage {
            CouncilStage::Responses => "Stage 1: Responses",
            CouncilStage::Rankings => "Stage 2: Peer Rankings",
            CouncilStage::Synthesis => "Stage 3: Synthesis",
        }
    }

    fn start_spinner(&self, prefix: String, message: String) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(previous) = spinner.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn finish_spinner(&self, message: String) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_with_message(message);
        }
    }

    fn advance_stage(&self, message: String) {
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(message);
            pb.inc(1);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, debate: &Debate, round: u32, first: Side) {
        let _ = self.multi.println(format!(
            "{} {} ({} opens)",
            "->".cyan(),
            format!("Round {}", round).bold(),
            debate.agent(first).name
        ));
    }

    fn on_turn_start(&self, _debate: &Debate, agent: &Agent, number: u32) {
        self.start_spinner(format!("Turn {}", number), format!("{} is thinking...", agent.name));
    }

    fn on_turn_complete(&self, debate: &Debate, turn: &Turn) {
        if turn.is_user() {
            return;
        }
        self.finish_spinner(format!(
            "{} {}",
            "v".green(),
            debate.speaker_name(&turn.agent_id)
        ));
    }

    fn on_consensus_check(&self, _debate: &Debate, confirmed: bool) {
        let line = if confirmed {
            format!("  {} consensus confirmed, concluding early", "v".green())
        } else {
            format!("  {} agreement signals not confirmed", "-".dimmed())
        };
        let _ = self.multi.println(line);
    }

    fn on_conclusion_start(&self, _debate: &Debate, round: u32) {
        self.start_spinner("Conclusion".to_string(), format!("collecting votes for round {}", round));
    }

    fn on_conclusion(&self, _debate: &Debate, conclusion: &Conclusion) {
        let verdict = if conclusion.agreed {
            "consensus reached".green().to_string()
        } else {
            "no consensus".yellow().to_string()
        };
        self.finish_spinner(format!("Round {}: {}", conclusion.round, verdict));
    }
}

impl CouncilProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: CouncilStage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_display_name(stage).to_string());
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_response(&self, member: &Agent, _response: &Response) {
        self.advance_stage(format!("{} {}", "v".green(), member.name));
    }

    fn on_ranking(&self, member: &Agent, _ranking: &Ranking) {
        self.advance_stage(format!("{} {}", "v".green(), member.name));
    }

    fn on_member_failed(&self, _stage: CouncilStage, member: &Agent, error: &str) {
        self.advance_stage(format!("{} {}", "x".red(), member.name));
        let _ = self
            .multi
            .println(format!("  {} {}: {}", "x".red(), member.name, error));
    }

    fn on_synthesis(&self, synthesis: &CouncilSynthesis) {
        if synthesis.fallback {
            self.advance_stage(format!("{} chairman unavailable", "x".red()));
        } else {
            self.advance_stage(format!("{} chairman", "v".green()));
        }
    }

    fn on_stage_complete(&self, stage: CouncilStage) {
        if let Ok(mut bar) = self.stage_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("Stage {} complete!", stage.number()).green().to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, debate: &Debate, round: u32, first: Side) {
        println!(
            "{} {} ({} opens)",
            "->".cyan(),
            format!("Round {}", round).bold(),
            debate.agent(first).name
        );
    }

    fn on_turn_complete(&self, debate: &Debate, turn: &Turn) {
        if !turn.is_user() {
            println!(
                "  {} turn {} by {}",
                "v".green(),
                turn.number,
                debate.speaker_name(&turn.agent_id)
            );
        }
    }

    fn on_consensus_check(&self, _debate: &Debate, confirmed: bool) {
        if confirmed {
            println!("  {} consensus confirmed", "v".green());
        }
    }

    fn on_conclusion(&self, _debate: &Debate, conclusion: &Conclusion) {
        let verdict = if conclusion.agreed { "agreed" } else { "no consensus" };
        println!("  {} round {}: {}", "=".cyan(), conclusion.round, verdict);
        println!();
    }
}

impl CouncilProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: CouncilStage, total_tasks: usize) {
        println!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::stage_display_name(stage).bold(),
            total_tasks
        );
    }

    fn on_response(&self, member: &Agent, _response: &Response) {
        println!("  {} {}", "v".green(), member.name);
    }

    fn on_ranking(&self, member: &Agent, _ranking: &Ranking) {
        println!("  {} {}", "v".green(), member.name);
    }

    fn on_member_failed(&self, _stage: CouncilStage, member: &Agent, error: &str) {
        println!("  {} {} (failed: {})", "x".red(), member.name, error);
    }

    fn on_synthesis(&self, synthesis: &CouncilSynthesis) {
        if synthesis.fallback {
            println!("  {} chairman unavailable", "x".red());
        }
    }

    fn on_stage_complete(&self, _stage: CouncilStage) {
        println!();
    }
}

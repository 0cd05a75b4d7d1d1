//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for debates and councils
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Full transcript, or all three council stages
    Full,
    /// Only the conclusion or synthesis
    Summary,
    /// JSON output
    Json,
}

impl From<FormatArg> for colloquy_domain::OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Full => colloquy_domain::OutputFormat::Full,
            FormatArg::Summary => colloquy_domain::OutputFormat::Summary,
            FormatArg::Json => colloquy_domain::OutputFormat::Json,
        }
    }
}

/// What `list` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListKind {
    #[default]
    All,
    Debates,
    Councils,
}

/// CLI arguments for colloquy
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(author, version, about = "Structured debates and councils between AI command-line agents")]
#[command(long_about = r#"
Colloquy runs structured conversations between AI command-line agents
(claude, codex, gemini, or any command configured under [backends]).

  debate   Two agents alternate turns, check for early consensus, then vote.
  council  N members answer independently, rank each other's anonymized
           answers, and a chairman synthesizes the result.

Participants are written BACKEND[:MODEL][@PERSONA], e.g. `codex:o3@skeptic`.

Configuration files are loaded from (in priority order):
1. --config <path>         Explicit config file
2. ./colloquy.toml         Project-level config
3. ~/.config/colloquy/config.toml   Global config

Example:
  colloquy debate "Monorepo or polyrepo?" -a claude@pragmatist -b codex@skeptic
  colloquy council "Should we adopt Rust?" -m claude -m codex -m gemini
  colloquy follow-up <ID> "What about embedded targets?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Per-call timeout in seconds (overrides [behavior] timeout_seconds)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Append every turn, vote, response, ranking and synthesis to a JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_conversation: Option<PathBuf>,

    /// Keep everything in memory instead of the data directory
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a two-agent debate
    Debate(DebateArgs),
    /// Run an N-member council
    Council(CouncilArgs),
    /// Add a follow-up to a finished debate or council and run the new round
    FollowUp {
        /// Debate or council id
        id: String,
        /// The follow-up message or question
        content: String,
    },
    /// Run the pending round of an interrupted debate or council
    Resume {
        /// Debate or council id
        id: String,
    },
    /// Show a stored debate or council
    Show {
        /// Debate or council id
        id: String,
    },
    /// List stored debates and councils, newest first
    List {
        #[arg(value_enum, default_value = "all")]
        kind: ListKind,
    },
}

#[derive(Args, Debug)]
pub struct DebateArgs {
    /// The topic to debate
    pub topic: String,

    /// First agent, BACKEND[:MODEL][@PERSONA]
    #[arg(short = 'a', long, value_name = "SPEC", default_value = "claude")]
    pub agent_a: String,

    /// Second agent, BACKEND[:MODEL][@PERSONA]
    #[arg(short = 'b', long, value_name = "SPEC", default_value = "codex")]
    pub agent_b: String,

    /// Debate style (overrides [debate] style)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Turns per agent per round (overrides [debate] turns_per_agent)
    #[arg(short, long, value_name = "N")]
    pub turns: Option<u32>,

    /// Reject follow-ups on this debate
    #[arg(long)]
    pub read_only: bool,
}

#[derive(Args, Debug)]
pub struct CouncilArgs {
    /// The topic for the council
    pub topic: String,

    /// Council member, BACKEND[:MODEL][@PERSONA] (repeatable; overrides [council] members)
    #[arg(short, long = "member", value_name = "SPEC")]
    pub members: Vec<String>,

    /// Chairman, BACKEND[:MODEL] (overrides [council] chairman)
    #[arg(short, long, value_name = "SPEC")]
    pub chairman: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_defaults() {
        let cli = Cli::try_parse_from(["colloquy", "debate", "Tabs or spaces?"]).unwrap();
        let Some(Command::Debate(args)) = cli.command else {
            panic!("expected debate");
        };
        assert_eq!(args.topic, "Tabs or spaces?");
        assert_eq!(args.agent_a, "claude");
        assert_eq!(args.agent_b, "codex");
        assert!(args.style.is_none());
        assert!(!args.read_only);
    }

    #[test]
    fn test_council_members_and_global_flags() {
        let cli = Cli::try_parse_from([
            "colloquy", "council", "Adopt Rust?", "-m", "claude", "-m", "codex:o3@skeptic",
            "--chairman", "gemini", "-vv", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(FormatArg::Json));
        let Some(Command::Council(args)) = cli.command else {
            panic!("expected council");
        };
        assert_eq!(args.members, vec!["claude", "codex:o3@skeptic"]);
        assert_eq!(args.chairman.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_follow_up_and_list() {
        let cli = Cli::try_parse_from(["colloquy", "follow-up", "abc", "And now?"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::FollowUp { ref id, ref content }) if id == "abc" && content == "And now?"
        ));

        let cli = Cli::try_parse_from(["colloquy", "list", "councils"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::List {
                kind: ListKind::Councils
            })
        ));
    }

    #[test]
    fn test_format_maps_to_domain() {
        assert_eq!(
            colloquy_domain::OutputFormat::from(FormatArg::Summary),
            colloquy_domain::OutputFormat::Summary
        );
    }
}

//! CLI entrypoint for colloquy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use colloquy_application::{
    BehaviorConfig, ConversationLogger, CouncilProgressNotifier, CouncilRepository,
    CreateCouncilInput, CreateCouncilUseCase, CreateDebateInput, CreateDebateUseCase,
    DebateProgressNotifier, DebateRepository, ModelCatalog, NoConversationLogger,
    NoCouncilProgress, NoDebateProgress, RepositoryError, RunCouncilUseCase, RunDebateUseCase,
};
use colloquy_domain::{CouncilId, DebateId, MemberSpec, OutputFormat};
use colloquy_infrastructure::config::{cli_backends, model_catalog};
use colloquy_infrastructure::{
    BuiltinTemplateCatalog, CliGenerationGateway, ConfigLoader, FileConfig, InMemoryStore,
    JsonFileStore, JsonlConversationLogger,
};
use colloquy_presentation::{
    Cli, Command, ConsoleFormatter, CouncilArgs, DebateArgs, ListKind, ProgressReporter,
    SimpleProgress,
};
use colored::Colorize;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        return Ok(());
    }

    let config = load_config(&cli)?;
    report_config_issues(&config)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // === Dependency Injection ===
    let (mut behavior, _) = config.behavior.to_behavior_config();
    if let Some(seconds) = cli.timeout {
        behavior.timeout = Some(Duration::from_secs(seconds));
    }

    let conversation_logger: Arc<dyn ConversationLogger> = match &cli.log_conversation {
        Some(path) => Arc::new(JsonlConversationLogger::open(path).with_context(|| {
            format!("Failed to open conversation log {}", path.display())
        })?),
        None => Arc::new(NoConversationLogger),
    };

    let cancellation = CancellationToken::new();
    let token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping in-flight generations");
            token.cancel();
        }
    });

    let format = cli
        .format
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    let app_config = AppConfig {
        gateway: Arc::new(CliGenerationGateway::new(cli_backends(&config.backends))),
        templates: Arc::new(config.template_catalog()),
        models: model_catalog(&config.backends),
        behavior,
        cancellation,
        conversation_logger,
        format,
        progress: !cli.quiet && format != OutputFormat::Json,
    };

    if cli.ephemeral {
        info!("Using in-memory store");
        App::new(app_config, Arc::new(InMemoryStore::new()), &config)
            .dispatch(command)
            .await
    } else {
        let data_dir = config.storage.resolve_data_dir();
        info!("Using data directory {}", data_dir.display());
        App::new(app_config, Arc::new(JsonFileStore::new(data_dir)), &config)
            .dispatch(command)
            .await
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")
}

fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("{} {}", "error:".red(), issue.message);
        } else {
            eprintln!("{} {}", "warning:".yellow(), issue.message);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Everything the commands share apart from the store
struct AppConfig {
    gateway: Arc<CliGenerationGateway>,
    templates: Arc<BuiltinTemplateCatalog>,
    models: ModelCatalog,
    behavior: BehaviorConfig,
    cancellation: CancellationToken,
    conversation_logger: Arc<dyn ConversationLogger>,
    format: OutputFormat,
    progress: bool,
}

struct App<R> {
    config: AppConfig,
    store: Arc<R>,
    default_style: String,
    default_turns: u32,
    default_members: Vec<MemberSpec>,
    default_chairman: Option<MemberSpec>,
}

impl<R> App<R>
where
    R: DebateRepository + CouncilRepository + 'static,
{
    fn new(config: AppConfig, store: Arc<R>, file: &FileConfig) -> Self {
        let (mut default_members, _) = file.council.parse_members();
        if default_members.is_empty() {
            default_members = file
                .backends
                .iter()
                .filter(|(_, backend)| !backend.command.is_empty())
                .map(|(id, _)| MemberSpec::new(id.clone()))
                .collect();
        }
        Self {
            config,
            store,
            default_style: file.debate.style.clone(),
            default_turns: file.debate.turns_per_agent,
            default_members,
            default_chairman: file.council.parse_chairman().0,
        }
    }

    async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Debate(args) => self.debate(args).await,
            Command::Council(args) => self.council(args).await,
            Command::FollowUp { id, content } => self.follow_up(&id, &content).await,
            Command::Resume { id } => self.resume(&id).await,
            Command::Show { id } => self.show(&id).await,
            Command::List { kind } => self.list(kind).await,
        }
    }

    async fn debate(&self, args: DebateArgs) -> Result<()> {
        let agent_a: MemberSpec = args.agent_a.parse()?;
        let agent_b: MemberSpec = args.agent_b.parse()?;
        let input = CreateDebateInput::new(args.topic, agent_a, agent_b)
            .with_style(args.style.unwrap_or_else(|| self.default_style.clone()))
            .with_turns_per_agent(args.turns.unwrap_or(self.default_turns))
            .read_only(args.read_only);

        let debate = CreateDebateUseCase::new(
            Arc::clone(&self.config.gateway),
            Arc::clone(&self.config.templates),
            Arc::clone(&self.store),
            self.config.models.clone(),
        )
        .execute(input)
        .await?;

        self.announce(&format!(
            "Debate {}: {} vs {}",
            debate.id,
            debate.agent_a.label(),
            debate.agent_b.label()
        ));
        self.run_debate(&debate.id).await
    }

    async fn council(&self, args: CouncilArgs) -> Result<()> {
        let members = if args.members.is_empty() {
            self.default_members.clone()
        } else {
            args.members
                .iter()
                .map(|m| m.parse())
                .collect::<Result<Vec<MemberSpec>, _>>()?
        };
        let mut input = CreateCouncilInput::new(args.topic, members);
        if let Some(chairman) = args.chairman {
            input = input.with_chairman(chairman.parse()?);
        } else if let Some(chairman) = &self.default_chairman {
            input = input.with_chairman(chairman.clone());
        }

        let council = CreateCouncilUseCase::new(
            Arc::clone(&self.config.gateway),
            Arc::clone(&self.config.templates),
            Arc::clone(&self.store),
            self.config.models.clone(),
        )
        .execute(input)
        .await?;

        self.announce(&format!(
            "Council {}: {} members, chairman {}",
            council.id,
            council.members.len(),
            council.chairman.name
        ));
        self.run_council(&council.id).await
    }

    async fn follow_up(&self, id: &str, content: &str) -> Result<()> {
        match self.lookup(id).await? {
            Stored::Debate(id) => {
                self.debate_use_case().follow_up(&id, content).await?;
                self.run_debate(&id).await
            }
            Stored::Council(id) => {
                self.council_use_case().follow_up(&id, content).await?;
                self.run_council(&id).await
            }
        }
    }

    async fn resume(&self, id: &str) -> Result<()> {
        match self.lookup(id).await? {
            Stored::Debate(id) => self.run_debate(&id).await,
            Stored::Council(id) => self.run_council(&id).await,
        }
    }

    async fn show(&self, id: &str) -> Result<()> {
        let output = match self.lookup(id).await? {
            Stored::Debate(id) => {
                let debate = self.store.get_debate(&id).await?;
                let turns = self.store.list_turns(&id).await?;
                ConsoleFormatter::debate(self.config.format, &debate, &turns)
            }
            Stored::Council(id) => {
                let council = self.store.get_council(&id).await?;
                let responses = self.store.list_responses(&id).await?;
                let rankings = self.store.list_rankings(&id).await?;
                ConsoleFormatter::council(self.config.format, &council, &responses, &rankings)
            }
        };
        println!("{}", output);
        Ok(())
    }

    async fn list(&self, kind: ListKind) -> Result<()> {
        if matches!(kind, ListKind::All | ListKind::Debates) {
            for debate in self.store.list_debates().await? {
                println!("{}", ConsoleFormatter::debate_list_line(&debate));
            }
        }
        if matches!(kind, ListKind::All | ListKind::Councils) {
            for council in self.store.list_councils().await? {
                println!("{}", ConsoleFormatter::council_list_line(&council));
            }
        }
        Ok(())
    }

    async fn run_debate(&self, id: &DebateId) -> Result<()> {
        let use_case = self.debate_use_case();
        let result = if !self.config.progress {
            use_case.execute_with_progress(id, &NoDebateProgress).await
        } else {
            use_case
                .execute_with_progress(id, self.debate_progress().as_ref())
                .await
        };

        match result {
            Ok(output) => {
                println!(
                    "{}",
                    ConsoleFormatter::debate(self.config.format, &output.debate, &output.turns)
                );
                Ok(())
            }
            Err(e) if e.is_cancelled() => {
                bail!("Debate {} interrupted; continue with `colloquy resume {}`", id, id)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn run_council(&self, id: &CouncilId) -> Result<()> {
        let use_case = self.council_use_case();
        let result = if !self.config.progress {
            use_case.execute_with_progress(id, &NoCouncilProgress).await
        } else {
            use_case
                .execute_with_progress(id, self.council_progress().as_ref())
                .await
        };

        if self.config.cancellation.is_cancelled() {
            bail!("Council {} interrupted; continue with `colloquy resume {}`", id, id);
        }
        let output = result?;
        let responses = self.store.list_responses(id).await?;
        let rankings = self.store.list_rankings(id).await?;
        println!(
            "{}",
            ConsoleFormatter::council(self.config.format, &output.council, &responses, &rankings)
        );
        Ok(())
    }

    fn debate_use_case(&self) -> RunDebateUseCase<CliGenerationGateway, BuiltinTemplateCatalog, R> {
        RunDebateUseCase::new(
            Arc::clone(&self.config.gateway),
            Arc::clone(&self.config.templates),
            Arc::clone(&self.store),
        )
        .with_behavior(self.config.behavior.clone())
        .with_cancellation(self.config.cancellation.clone())
        .with_conversation_logger(Arc::clone(&self.config.conversation_logger))
    }

    fn council_use_case(&self) -> RunCouncilUseCase<CliGenerationGateway, BuiltinTemplateCatalog, R> {
        RunCouncilUseCase::new(
            Arc::clone(&self.config.gateway),
            Arc::clone(&self.config.templates),
            Arc::clone(&self.store),
        )
        .with_behavior(self.config.behavior.clone())
        .with_cancellation(self.config.cancellation.clone())
        .with_conversation_logger(Arc::clone(&self.config.conversation_logger))
    }

    fn debate_progress(&self) -> Box<dyn DebateProgressNotifier> {
        if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    fn council_progress(&self) -> Box<dyn CouncilProgressNotifier> {
        if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    fn announce(&self, line: &str) {
        if self.config.progress {
            eprintln!("{}", line);
        }
    }

    /// Resolve an id to a stored debate or council
    async fn lookup(&self, id: &str) -> Result<Stored> {
        let debate_id = DebateId::new(id);
        match self.store.get_debate(&debate_id).await {
            Ok(_) => return Ok(Stored::Debate(debate_id)),
            Err(e) if !e.is_not_found() => return Err(e.into()),
            Err(_) => {}
        }
        let council_id = CouncilId::new(id);
        match self.store.get_council(&council_id).await {
            Ok(_) => Ok(Stored::Council(council_id)),
            Err(RepositoryError::NotFound { .. }) => {
                bail!("No debate or council with id {}", id)
            }
            Err(e) => Err(e.into()),
        }
    }
}

enum Stored {
    Debate(DebateId),
    Council(CouncilId),
}

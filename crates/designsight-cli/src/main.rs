use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Args, Parser, Subcommand};
use designsight_agents::{RegistryOptions, build_registry};
use designsight_core::{
    AgentId, Config, ConfigLoader, CredentialStore, Domain, DynModelClient, EvaluationMode,
    Orchestrator, Payload, Report, ReportAssembler, RunConfiguration, RunLogInput,
    OpenRouterClient, StaticModelClient, log_run_completion,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "designsight-cli", version, about = "DesignSight multi-agent analysis")]
struct Cli {
    /// Path to the configuration file (falls back to DESIGNSIGHT_CONFIG,
    /// then ./config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the design review panel over a mockup image.
    Analyze(AnalyzeArgs),
    /// Run a domain-conditioned research session.
    Research(ResearchArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Design mockup to analyze (PNG).
    #[arg(long)]
    image: PathBuf,

    /// Free-form description of the design and its goals.
    #[arg(long, default_value = "")]
    context: String,

    /// Comma-separated agent checklist; defaults to the full design panel.
    #[arg(long, value_delimiter = ',')]
    agents: Vec<String>,

    /// Evaluation mode: standard, judge, or debate.
    #[arg(long, default_value = "standard")]
    mode: String,

    /// Write the markdown report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Use the scripted offline client instead of a live model.
    #[arg(long)]
    offline: bool,
}

#[derive(Args, Debug)]
struct ResearchArgs {
    /// Research question to investigate.
    #[arg(long)]
    question: String,

    /// Discipline: academic, finance, medical, product_comparison, general.
    #[arg(long, default_value = "general")]
    domain: String,

    /// Evaluation mode: standard, judge, or debate.
    #[arg(long, default_value = "standard")]
    mode: String,

    /// Optional notes/document whose text is shared with every agent.
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Write the markdown report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Use the scripted offline client instead of a live model.
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,designsight_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let rt = Runtime::new()?;
    rt.block_on(async move {
        match cli.command {
            Command::Analyze(args) => analyze_command(cli.config, args).await?,
            Command::Research(args) => research_command(cli.config, args).await?,
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

fn load_config(path: Option<PathBuf>, offline: bool) -> Result<Config> {
    match ConfigLoader::load(path) {
        Ok(config) => Ok(config),
        Err(err) if offline => {
            warn!(%err, "configuration unavailable; using offline defaults");
            Ok(Config::fallback())
        }
        Err(err) => Err(err.into()),
    }
}

fn build_client(config: &Config, offline: bool) -> Result<DynModelClient> {
    if offline {
        warn!("offline mode: model replies are scripted stubs");
        return Ok(Arc::new(StaticModelClient::default()));
    }
    let client = OpenRouterClient::from_config(config)
        .context("no credential for the primary model; set the key named by llm.api_key_env")?;
    Ok(Arc::new(client))
}

fn parse_checklist(agents: &[String]) -> Result<Vec<AgentId>> {
    if agents.is_empty() {
        return Ok(AgentId::DESIGN_PANEL.to_vec());
    }
    agents
        .iter()
        .map(|raw| {
            AgentId::parse(raw).ok_or_else(|| anyhow::anyhow!("unknown agent id: {raw}"))
        })
        .collect()
}

async fn analyze_command(config_path: Option<PathBuf>, args: AnalyzeArgs) -> Result<()> {
    let config = load_config(config_path, args.offline)?;
    let client = build_client(&config, args.offline)?;

    let image_bytes = fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;
    let payload = Payload::design(BASE64.encode(image_bytes));

    let checklist = parse_checklist(&args.agents)?;
    let mode: EvaluationMode = args.mode.parse()?;
    let run = RunConfiguration::explicit(checklist)
        .with_mode(mode)
        .with_context(args.context.clone());

    info!(image = %args.image.display(), "starting design analysis");
    execute_run(config, client, run, payload, args.output).await
}

async fn research_command(config_path: Option<PathBuf>, args: ResearchArgs) -> Result<()> {
    let config = load_config(config_path, args.offline)?;
    let client = build_client(&config, args.offline)?;

    let shared_context = match &args.context_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()))?,
        None => String::new(),
    };

    let domain: Domain = args.domain.parse()?;
    let mode: EvaluationMode = args.mode.parse()?;
    let run = RunConfiguration::by_domain(domain)
        .with_mode(mode)
        .with_context(shared_context);
    let payload = Payload::research(args.question.clone());

    info!(question = %args.question, %domain, "starting research session");
    execute_run(config, client, run, payload, args.output).await
}

async fn execute_run(
    config: Config,
    client: DynModelClient,
    run: RunConfiguration,
    payload: Payload,
    output: Option<PathBuf>,
) -> Result<()> {
    let credentials = CredentialStore::from_env();

    let registry = build_registry(RegistryOptions {
        run: &run,
        llm: &config.llm,
        limits: &config.run,
        credentials: &credentials,
        client,
    });

    if registry.is_empty() {
        warn!("no agents enabled for this configuration; nothing to do");
        return Ok(());
    }

    let orchestrator = Orchestrator::from_limits(&config.run);
    let state = orchestrator.run(&registry, &run, &payload).await;
    let report = ReportAssembler::assemble(&state, &run.shared_context);

    for entry in &state.logs {
        info!(agent_id = %entry.agent_id, "{}", entry.message);
    }

    let markdown = report.to_markdown();
    let report_path = match &output {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            info!(path = %path.display(), "report written");
            Some(path.display().to_string())
        }
        None => {
            println!("{markdown}");
            None
        }
    };

    record_run(&report, report_path)?;

    info!(
        agents = report.agent_count,
        mean_score = report.mean_score,
        status = %report.status,
        "run complete"
    );

    Ok(())
}

fn record_run(report: &Report, report_path: Option<String>) -> Result<()> {
    let failed_agents = report
        .sections
        .iter()
        .filter(|section| section.failed)
        .map(|section| section.agent_id.to_string())
        .collect();

    log_run_completion(RunLogInput {
        run_id: Uuid::new_v4().to_string(),
        context: (!report.context.is_empty()).then(|| report.context.clone()),
        agent_count: report.agent_count,
        mean_score: report.mean_score,
        status: report.status.to_string(),
        failed_agents,
        report_path,
    })
}

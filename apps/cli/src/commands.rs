//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use promptcraft_core::{CreateAgent, PromptEvaluator, SubprocessEvaluator};
use promptcraft_shared::{
    AppConfig, Context, EvaluationReport, Preferences, init_config, load_config,
};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PromptCraft: structured C.R.E.A.T.E. prompts from free-text queries.
#[derive(Parser)]
#[command(
    name = "promptcraft",
    version,
    about = "Turn a free-text query into a six-section C.R.E.A.T.E. prompt document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Document output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Markdown document on stdout, report on stderr.
    Text,
    /// JSON envelope with document, report, and metadata.
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a C.R.E.A.T.E. prompt document.
    Generate(GenerateArgs),

    /// Print the agent identity.
    Identity,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct GenerateArgs {
    /// The query to turn into a prompt. Overrides any query in --context.
    pub query: Option<String>,

    /// JSON context file (`-` reads stdin).
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Upstream query type, e.g. security or implementation.
    #[arg(long)]
    pub query_type: Option<String>,

    /// Upstream complexity: simple, intermediate, or complex.
    #[arg(long)]
    pub complexity: Option<String>,

    /// Reasoning depth: basic, intermediate, or comprehensive.
    #[arg(long)]
    pub depth: Option<String>,

    /// Tone preference.
    #[arg(long)]
    pub tone: Option<String>,

    /// Run the configured evaluator on the generated document.
    #[arg(long)]
    pub evaluate: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber. Logs always go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "promptcraft=warn",
        1 => "promptcraft=info",
        2 => "promptcraft=debug",
        _ => "promptcraft=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(&args),
        Command::Identity => cmd_identity(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

/// JSON envelope printed by `generate --format json`.
#[derive(Debug, serde::Serialize)]
struct GenerateOutput<'a> {
    document: &'a str,
    report: Option<&'a EvaluationReport>,
    meta: OutputMeta,
}

#[derive(Debug, serde::Serialize)]
struct OutputMeta {
    sha256: String,
    bytes: usize,
    degraded: bool,
    generated_at: DateTime<Utc>,
}

fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let config = load_config().wrap_err("failed to load config")?;

    let base = match &args.context {
        Some(path) => read_context(path)?,
        None => Context::default(),
    };
    let context = build_context(base, args, &config);
    let preferences = Preferences::with_tone(args.tone.as_deref().unwrap_or(&config.defaults.tone));
    let include_evaluation = args.evaluate || config.defaults.include_evaluation;

    let evaluator = SubprocessEvaluator::from_config(&config.evaluator)
        .map(|e| Box::new(e) as Box<dyn PromptEvaluator>);
    if include_evaluation && evaluator.is_none() {
        warn!("evaluation requested but [evaluator].command is not set");
    }

    let agent = CreateAgent::new().with_boxed_evaluator(evaluator);
    let outcome = agent.generate(&context, Some(&preferences), include_evaluation);
    info!(
        bytes = outcome.document.len(),
        degraded = outcome.degraded,
        "generation finished"
    );

    match args.format {
        OutputFormat::Text => {
            println!("{}", outcome.document);
            if let Some(report) = &outcome.report {
                eprintln!("{}", serde_json::to_string_pretty(report)?);
            }
        }
        OutputFormat::Json => {
            let output = GenerateOutput {
                document: &outcome.document,
                report: outcome.report.as_ref(),
                meta: OutputMeta {
                    sha256: document_hash(&outcome.document),
                    bytes: outcome.document.len(),
                    degraded: outcome.degraded,
                    generated_at: Utc::now(),
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Read a JSON context from `path`, or from stdin when `path` is `-`.
fn read_context(path: &Path) -> Result<Context> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read context from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read context file {}", path.display()))?
    };
    serde_json::from_str(&raw).wrap_err("context is not a valid JSON object")
}

/// Layer CLI flags over the context file, then config defaults.
///
/// The config's default depth only applies to a context that already carries
/// something; a bare invocation keeps the empty-context default-query path.
fn build_context(mut context: Context, args: &GenerateArgs, config: &AppConfig) -> Context {
    if let Some(query) = &args.query {
        context.query = Some(query.clone());
    }

    if args.query_type.is_some() || args.complexity.is_some() {
        let mut analysis = context.query_analysis.take().unwrap_or_default();
        if let Some(query_type) = &args.query_type {
            analysis.query_type = Some(query_type.clone());
        }
        if let Some(complexity) = &args.complexity {
            analysis.complexity = Some(complexity.clone());
        }
        context.query_analysis = Some(analysis);
    }

    if let Some(depth) = &args.depth {
        context.reasoning_depth = Some(depth.clone());
    } else if context.reasoning_depth.is_none() && !context.is_empty() {
        context.reasoning_depth = Some(config.defaults.reasoning_depth.clone());
    }

    context
}

fn document_hash(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// identity / config
// ---------------------------------------------------------------------------

fn cmd_identity() -> Result<()> {
    let agent = CreateAgent::new();
    println!("agent_id: {}", agent.agent_id());
    println!("knowledge_base_path: {}", agent.knowledge_base_path());
    println!("collection: {}", agent.collection());
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(args).expect("parse args");
        match cli.command {
            Command::Generate(args) => args,
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn flags_override_context_file() {
        let args = parse(&[
            "promptcraft",
            "generate",
            "Explain TLS",
            "--complexity",
            "complex",
            "--depth",
            "basic",
        ]);
        let base: Context = serde_json::from_str(
            r#"{"query": "old", "query_analysis": {"query_type": "security", "complexity": "simple"}}"#,
        )
        .expect("context");

        let ctx = build_context(base, &args, &AppConfig::default());
        assert_eq!(ctx.resolved_query(), "Explain TLS");
        let analysis = ctx.query_analysis.expect("analysis");
        assert_eq!(analysis.query_type(), "security");
        assert_eq!(analysis.complexity(), "complex");
        assert_eq!(ctx.reasoning_depth.as_deref(), Some("basic"));
    }

    #[test]
    fn bare_invocation_stays_empty() {
        let args = parse(&["promptcraft", "generate"]);
        let ctx = build_context(Context::default(), &args, &AppConfig::default());
        assert!(ctx.is_empty());
    }

    #[test]
    fn config_depth_fills_gap() {
        let args = parse(&["promptcraft", "generate", "Explain TLS"]);
        let mut config = AppConfig::default();
        config.defaults.reasoning_depth = "comprehensive".into();

        let ctx = build_context(Context::default(), &args, &config);
        assert_eq!(ctx.reasoning_depth(), "comprehensive");
    }

    #[test]
    fn context_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"task": "Plan a migration", "reasoning_depth": "basic"}"#)
            .expect("write");

        let ctx = read_context(&path).expect("read");
        assert_eq!(ctx.resolved_query(), "Plan a migration");
        assert_eq!(ctx.reasoning_depth(), "basic");
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = document_hash("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn json_format_flag_parses() {
        let args = parse(&["promptcraft", "generate", "q", "--format", "json", "--evaluate"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.evaluate);
    }
}

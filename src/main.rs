// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use promptbridge::app_config::{self, AdapterBackend, Config};
use promptbridge::pipeline::{OutputFormat, PromptOptions};
use promptbridge::validator::PromptValidator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Plaintext,
    Json,
    Markdown,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Plaintext => OutputFormat::Plaintext,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Markdown => OutputFormat::Markdown,
        }
    }
}

/// CLI Wrapper for AdapterBackend to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAdapterBackend {
    Passthrough,
    Ollama,
}

impl From<CliAdapterBackend> for AdapterBackend {
    fn from(cli_backend: CliAdapterBackend) -> Self {
        match cli_backend {
            CliAdapterBackend::Passthrough => AdapterBackend::Passthrough,
            CliAdapterBackend::Ollama => AdapterBackend::Ollama,
        }
    }
}

/// Options shared by every command that runs the pipeline
#[derive(Args, Debug)]
struct PipelineArgs {
    /// Source language code (e.g., 'en', 'es', 'fr'); detected when omitted
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code to culturally adapt the prompt for
    #[arg(short, long)]
    target_language: Option<String>,

    /// Desired tone, reported in the metrics
    #[arg(long)]
    tone: Option<String>,

    /// Output format of the optimized prompt
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Cultural adaptation backend
    #[arg(short, long, value_enum)]
    adapter: Option<CliAdapterBackend>,

    /// Model name for the adaptation backend
    #[arg(short, long)]
    model: Option<String>,

    /// Disable the result cache
    #[arg(long)]
    no_cache: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl PipelineArgs {
    fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            tone: self.tone.clone(),
            format: self.format.map(Into::into),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a single prompt and print the result as JSON
    Validate {
        /// Prompt text; read from --file or stdin when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// Read the prompt from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        args: PipelineArgs,
    },

    /// Validate one prompt per line and print JSON Lines
    Batch {
        /// File with one prompt per line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of prompts processed concurrently
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        #[command(flatten)]
        args: PipelineArgs,
    },

    /// Generate shell completions for promptbridge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// promptbridge - prompt validation and cultural adaptation
///
/// Runs prompts through language detection, grammar correction, toxicity
/// screening, cultural adaptation and optimization, and reports the issues,
/// metrics and suggestions found along the way.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            // stdout carries results, logs go to stderr
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once the
    // config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "promptbridge", &mut std::io::stdout());
            Ok(())
        }
        Commands::Validate { text, file, args } => run_validate(text, file, args).await,
        Commands::Batch {
            file,
            concurrency,
            args,
        } => run_batch(file, concurrency, args).await,
    }
}

/// Load the config, apply CLI overrides and the log level, and build the validator
fn prepare(args: &PipelineArgs) -> Result<PromptValidator> {
    // If log level is set via command line, apply it immediately
    if let Some(cli_level) = args.log_level {
        let level: app_config::LogLevel = cli_level.into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&args.config_path)?;

    // Override config with CLI options if provided
    if let Some(backend) = args.adapter {
        config.adapter.backend = backend.into();
    }

    if let Some(model) = &args.model {
        config.adapter.model = model.clone();
    }

    if args.no_cache {
        config.cache.enabled = false;
    }

    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if args.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    PromptValidator::from_config(&config).context("Failed to initialize the validator")
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize result to JSON")
}

async fn run_validate(text: Option<String>, file: Option<PathBuf>, args: PipelineArgs) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read prompt file: {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
                .context("Failed to read prompt from stdin")?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err(anyhow!("Prompt text is empty"));
    }

    let validator = prepare(&args)?;

    let result = validator
        .run_pipeline(
            &text,
            args.source_language.as_deref(),
            args.target_language.as_deref(),
            args.prompt_options(),
        )
        .await?;

    println!("{}", to_json(&result, args.pretty)?);
    Ok(())
}

async fn run_batch(file: PathBuf, concurrency: usize, args: PipelineArgs) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read batch file: {}", file.display()))?;

    let prompts: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.to_string()))
        .collect();

    if prompts.is_empty() {
        warn!("No prompts found in {}", file.display());
        return Ok(());
    }

    let validator = Arc::new(prepare(&args)?);
    let options = args.prompt_options();

    info!("Validating {} prompt(s) from {}", prompts.len(), file.display());

    let progress_bar = ProgressBar::new(prompts.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} prompts ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));

    let mut results = stream::iter(prompts)
        .map(|(line_number, prompt)| {
            let validator = Arc::clone(&validator);
            let options = options.clone();
            let source = args.source_language.clone();
            let target = args.target_language.clone();
            let pb = progress_bar.clone();

            async move {
                let result = validator
                    .run_pipeline(&prompt, source.as_deref(), target.as_deref(), options)
                    .await;
                pb.inc(1);
                (line_number, result)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    progress_bar.finish_and_clear();

    // Sort results by line number to keep the input order
    results.sort_by_key(|(line_number, _)| *line_number);

    let mut failures = 0usize;
    for (line_number, result) in results {
        match result {
            Ok(result) => println!("{}", to_json(&result, false)?),
            Err(e) => {
                error!("Line {} failed: {}", line_number, e);
                failures += 1;
            }
        }
    }

    if let Some(stats) = validator.cache_stats() {
        info!(
            "Cache: {} hit(s), {} miss(es), {:.0}% hit rate",
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );
    }

    if failures > 0 {
        return Err(anyhow!("{} prompt(s) failed validation", failures));
    }

    Ok(())
}

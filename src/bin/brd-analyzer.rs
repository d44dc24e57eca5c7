//! CLI binary for brd-analyzer.
//!
//! A thin shim over the library crate: `serve` runs the HTTP service,
//! `analyze` runs the same pipeline on a local file.

use anyhow::{Context, Result};
use brd_analyzer::{
    analyze_path, analyze_to_file, report_filename, serve, AnalyzerConfig, AppState,
    ChatCompletionClient, OutputMode, ServerConfig,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the HTTP service on the default address (0.0.0.0:8000)
  brd-analyzer serve

  # Analyse a local document into a PDF report
  brd-analyzer analyze requirements.docx -o requirements-brd-report.pdf

  # Print the structured analysis as JSON
  brd-analyzer analyze scope.pdf --output json

  # Upload to a running service
  curl -F file=@requirements.docx 'http://localhost:8000/analyze?output=json'

ENVIRONMENT VARIABLES:
  GROQ_API_KEY          Completion service credential (required for analysis)
  GROQ_BASE_URL         OpenAI-compatible endpoint (default: https://api.groq.com/openai/v1)
  BRD_MODEL             Model ID (default: llama-3.1-8b-instant)
  BRD_ADDR              Listen address for `serve`
  BRD_MAX_UPLOAD_BYTES  Upload size limit for `serve`
  RUST_LOG              Log filter, overrides -v / -q

  A `.env` file in the working directory is loaded on startup.
"#;

/// Analyse business documents into structured BRD reports.
#[derive(Parser, Debug)]
#[command(
    name = "brd-analyzer",
    version,
    about = "Analyse PDF/DOCX business documents into structured BRD reports",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    llm: LlmArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "BRD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "BRD_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to bind.
        #[arg(long, env = "BRD_ADDR", default_value = "0.0.0.0:8000")]
        addr: String,

        /// Largest accepted upload in bytes.
        #[arg(long, env = "BRD_MAX_UPLOAD_BYTES", default_value_t = 25 * 1024 * 1024)]
        max_upload_bytes: usize,
    },

    /// Analyse a local PDF or DOCX file.
    Analyze {
        /// Path to a .pdf or .docx document.
        input: PathBuf,

        /// Output format: pdf or json.
        #[arg(long, default_value = "pdf")]
        output: OutputMode,

        /// Write the report to this file. Defaults to `<basename>-brd-report.pdf`
        /// for PDF output and stdout for JSON.
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct LlmArgs {
    /// Model ID sent to the completion service.
    #[arg(long, global = true, env = "BRD_MODEL")]
    model: Option<String>,

    /// Completion service API key.
    #[arg(long, global = true, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible base URL.
    #[arg(long, global = true, env = "GROQ_BASE_URL")]
    base_url: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, global = true, env = "BRD_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, global = true, env = "BRD_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: u32,

    /// Max document characters embedded in the prompt.
    #[arg(long, global = true, env = "BRD_MAX_DOCUMENT_CHARS", default_value_t = 120_000)]
    max_document_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is not an error.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli.llm)?;
    if config.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; analysis requests will fail until it is configured");
    }

    match cli.command {
        Command::Serve {
            addr,
            max_upload_bytes,
        } => {
            let server = ServerConfig {
                addr,
                max_upload_bytes,
            };
            let state = AppState::new(config, &server);
            serve(state, &server)
                .await
                .with_context(|| format!("HTTP server on {} failed", server.addr))?;
        }
        Command::Analyze { input, output, out } => {
            run_analyze(&input, output, out, config, cli.quiet).await?;
        }
    }

    Ok(())
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(args: &LlmArgs) -> Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfig::builder()
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .max_document_chars(args.max_document_chars)
        .api_key_opt(args.api_key.clone());
    if let Some(ref model) = args.model {
        builder = builder.model(model);
    }
    if let Some(ref url) = args.base_url {
        builder = builder.base_url(url);
    }
    builder.build().context("Invalid configuration")
}

async fn run_analyze(
    input: &Path,
    mode: OutputMode,
    out: Option<PathBuf>,
    config: AnalyzerConfig,
    quiet: bool,
) -> Result<()> {
    let client = ChatCompletionClient::new(&config);

    let spinner = (!quiet).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Analysing");
        bar.set_message(input.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    // PDF without `-o` goes to `<basename>-brd-report.pdf`; JSON without `-o` to stdout.
    let target = match (out, mode) {
        (Some(path), _) => Some(path),
        (None, OutputMode::Pdf) => {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(PathBuf::from(report_filename(&name)))
        }
        (None, OutputMode::Json) => None,
    };

    let start = Instant::now();
    match target {
        Some(path) => {
            let result = analyze_to_file(input, &path, mode, &client, &config).await;
            finish(&spinner);
            let len = result.with_context(|| format!("Analysis of {} failed", input.display()))?;
            if !quiet {
                eprintln!(
                    "{}  {}  {}  →  {}",
                    green("✔"),
                    dim(&format!("{len} bytes")),
                    dim(&format!("{:.1}s", start.elapsed().as_secs_f64())),
                    bold(&path.display().to_string()),
                );
            }
        }
        None => {
            let result = analyze_path(input, mode, &client, &config).await;
            finish(&spinner);
            let bytes = result
                .with_context(|| format!("Analysis of {} failed", input.display()))?
                .into_bytes()
                .context("Failed to serialise report")?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write to stdout")?;
            handle.write_all(b"\n").ok();
        }
    }
    Ok(())
}

fn finish(spinner: &Option<ProgressBar>) {
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
}

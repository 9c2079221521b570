//! CLI binary for pdf2diff.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CompareConfig` and prints or writes results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2diff::{
    compare_files, render::write_report, CompareConfig, CompareProgressCallback, ConstantPacing,
    ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-chunk log
/// lines using [indicatif]. Chunk pairs complete strictly in order, so the
/// bar simply advances.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of chunk pairs that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_compare_start` (called once chunk counts are known).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_compare_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Extracting text…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} chunks  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Comparing");
        self.bar.reset_eta();
    }
}

impl CompareProgressCallback for CliProgressCallback {
    fn on_compare_start(&self, total_chunks: usize) {
        self.activate_bar(total_chunks);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Comparing {total_chunks} chunks…"))
        ));
    }

    fn on_chunk_start(&self, chunk_num: usize, _total: usize) {
        self.bar.set_message(format!("chunk {chunk_num}"));
    }

    fn on_chunk_complete(&self, chunk_num: usize, total: usize, section_count: usize) {
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}",
            green("✓"),
            chunk_num,
            total,
            dim(&format!("{section_count} sections")),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_error(&self, chunk_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}",
            red("✗"),
            chunk_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_leftover(&self, chunk_num: usize, total: usize, added: bool) {
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}",
            cyan(if added { "+" } else { "-" }),
            chunk_num,
            total,
            dim(if added {
                "entire chunk added"
            } else {
                "entire chunk deleted"
            }),
        ));
        self.bar.inc(1);
    }

    fn on_compare_complete(&self, total_chunks: usize, error_count: usize) {
        self.bar.finish_and_clear();

        if error_count == 0 {
            eprintln!(
                "{} {} chunks compared successfully",
                green("✔"),
                bold(&total_chunks.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} chunks compared  ({} failed)",
                if error_count == total_chunks {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&(total_chunks - error_count).to_string()),
                total_chunks,
                red(&error_count.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic comparison (narrative to stdout)
  pdf2diff contract_v1.pdf contract_v2.pdf

  # Write a colour-coded HTML report
  pdf2diff contract_v1.pdf contract_v2.pdf -o report.html

  # Use a specific model
  pdf2diff --model gpt-4.1 --provider openai old.pdf new.pdf

  # Compare documents fetched from URLs
  pdf2diff https://example.com/v1.pdf https://example.com/v2.pdf -o diff.html

  # Full structured output as JSON
  pdf2diff --json old.pdf new.pdf > result.json

  # Larger chunks for models with big context windows
  pdf2diff --chunk-budget 24000 old.pdf new.pdf

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                       Notes
  ─────────    ─────────────────────────   ─────────────────────────
  openai       gpt-4.1-nano (default)      fast, cheap
  openai       gpt-4.1-mini / gpt-4.1      higher accuracy
  anthropic    claude-sonnet-4-20250514    long documents
  gemini       gemini-2.0-flash            alternative cheap option
  ollama       llama3.2, qwen2.5, …        free, local

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID

SETUP:
  1. Set API key:     export OPENAI_API_KEY=sk-...
  2. Compare:         pdf2diff old.pdf new.pdf -o report.html

  Chunk pairs are compared one at a time with a pause between calls, so a
  long document takes roughly (chunks × pace) plus model latency.
"#;

/// Compare two PDF document versions using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2diff",
    version,
    about = "Compare two PDF document versions using LLMs",
    long_about = "Compare two versions of a PDF document (local files or URLs) and produce a \
colour-coded semantic diff plus a narrative summary of the changes. Supports OpenAI, Anthropic, \
Google Gemini, Azure OpenAI, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Original document: local PDF file path or HTTP/HTTPS URL.
    original: String,

    /// Modified document: local PDF file path or HTTP/HTTPS URL.
    modified: String,

    /// Write an HTML report to this file instead of printing the narrative.
    #[arg(short, long, env = "PDF2DIFF_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Maximum characters of a full chunk-comparison prompt.
    #[arg(long, env = "PDF2DIFF_CHUNK_BUDGET", default_value_t = 8000)]
    chunk_budget: usize,

    /// Character ceiling on the synthesis input.
    #[arg(long, env = "PDF2DIFF_SYNTHESIS_CAP", default_value_t = 20_000)]
    synthesis_cap: usize,

    /// Max LLM output tokens per call.
    #[arg(long, env = "PDF2DIFF_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Pause in milliseconds before each LLM call.
    #[arg(long, env = "PDF2DIFF_PACE_MS", default_value_t = 1000)]
    pace_ms: u64,

    /// Output structured JSON (CompareOutput) instead of the narrative.
    #[arg(long, env = "PDF2DIFF_JSON")]
    json: bool,

    /// Treat any failed chunk pair as a fatal error.
    #[arg(long, env = "PDF2DIFF_STRICT")]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2DIFF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2DIFF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2DIFF_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2DIFF_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn CompareProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run comparison ───────────────────────────────────────────────────
    let output = compare_files(&cli.original, &cli.modified, &config)
        .await
        .context("Comparison failed")?;

    let output = if cli.strict {
        output
            .into_result()
            .context("Comparison completed with chunk failures (--strict)")?
    } else {
        output
    };

    if let Some(ref output_path) = cli.output {
        write_report(&output, output_path)
            .await
            .context("Failed to write HTML report")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} additions / {} deletions / {} modifications  →  {}",
                if output.is_complete() {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.summary.additions,
                output.summary.deletions,
                output.summary.modifications,
                bold(&output_path.display().to_string()),
            );
            if output.stats.chunk_errors > 0 {
                eprintln!(
                    "   {} chunk(s) failed — see the report's warning preamble",
                    red(&output.stats.chunk_errors.to_string())
                );
            }
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.narrative.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.narrative.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }

        if !cli.quiet {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} additions / {} deletions / {} modifications across {} chunk pair(s)",
                    output.summary.additions,
                    output.summary.deletions,
                    output.summary.modifications,
                    output.stats.chunks_processed
                ))
            );
        }
    }

    Ok(())
}

/// Map CLI args to `CompareConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CompareConfig> {
    let mut builder = CompareConfig::builder()
        .chunk_budget(cli.chunk_budget)
        .synthesis_input_cap(cli.synthesis_cap)
        .max_tokens(cli.max_tokens)
        .pacing(Arc::new(ConstantPacing::from_millis(cli.pace_ms)))
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

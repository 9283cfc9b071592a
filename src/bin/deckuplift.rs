//! CLI binary for deckuplift.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `UpliftConfig`, runs the uplift, and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use deckuplift::pipeline::extract::extract_slide_blocks;
use deckuplift::{uplift_to_file, EnrichmentLevel, UpliftConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic uplift (output name derived from the input)
  deckuplift lesson.pptx

  # Explicit output path and raw-text sidecar
  deckuplift lesson.pptx -o improved.pptx --text-out improved.txt

  # Richer generated content
  deckuplift --enrichment max lesson.pptx

  # Skip image/video lookups (only OPENAI_API_KEY needed)
  deckuplift --no-media lesson.pptx

  # Inspect extracted text without calling any API
  deckuplift --extract-only lesson.pptx

  # Machine-readable run stats on stderr-free stdout
  deckuplift --json lesson.pptx

ENRICHMENT LEVELS:
  base       Restructure only (default)
  enhanced   Also add real-world links and deeper explanation
  max        Also add interactive tasks, narration prompts,
             cross-curricular links, and advanced vocabulary

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY    Text-generation service key (always required)
  PIXABAY_API_KEY   Primary image search    (required unless --no-media)
  PEXELS_API_KEY    Fallback image search   (required unless --no-media)
  YOUTUBE_API_KEY   Video search            (required unless --no-media)

SETUP:
  1. Set API keys:  export OPENAI_API_KEY=sk-...
  2. Uplift:        deckuplift lesson.pptx
"#;

/// Restructure a PowerPoint lesson into an enriched teaching deck.
#[derive(Parser, Debug)]
#[command(
    name = "deckuplift",
    version,
    about = "Restructure PowerPoint lessons into enriched teaching decks",
    long_about = "Extract all text from a .pptx, rebuild the lesson around a fixed \
seven-part teaching structure with an LLM, and render the result as a new deck — \
each slide enriched with a stock image and a supporting video link.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input .pptx file.
    input: PathBuf,

    /// Output deck path. Default: `<input-stem>_uplifted_<YYYYMMDD>.pptx`.
    #[arg(short, long, env = "DECKUPLIFT_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the raw generated document to this text file.
    #[arg(long, env = "DECKUPLIFT_TEXT_OUT")]
    text_out: Option<PathBuf>,

    /// Enrichment level: base, enhanced, max.
    #[arg(long, env = "DECKUPLIFT_ENRICHMENT", value_enum, default_value = "base")]
    enrichment: EnrichmentArg,

    /// Generation model ID.
    #[arg(long, env = "DECKUPLIFT_MODEL", default_value = "gpt-4o")]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "DECKUPLIFT_TEMPERATURE", default_value_t = 0.5)]
    temperature: f32,

    /// Max tokens the generation call may produce.
    #[arg(long, env = "DECKUPLIFT_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Retries on transient generation failure.
    #[arg(long, env = "DECKUPLIFT_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Generation call timeout in seconds.
    #[arg(long, env = "DECKUPLIFT_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Per-lookup media timeout in seconds.
    #[arg(long, env = "DECKUPLIFT_MEDIA_TIMEOUT", default_value_t = 10)]
    media_timeout: u64,

    /// Skip image and video lookups entirely.
    #[arg(long, env = "DECKUPLIFT_NO_MEDIA")]
    no_media: bool,

    /// Print run statistics as JSON to stdout.
    #[arg(long, env = "DECKUPLIFT_JSON")]
    json: bool,

    /// Print the extracted slide text and exit; no API is contacted.
    #[arg(long)]
    extract_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DECKUPLIFT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DECKUPLIFT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EnrichmentArg {
    Base,
    Enhanced,
    Max,
}

impl From<EnrichmentArg> for EnrichmentLevel {
    fn from(v: EnrichmentArg) -> Self {
        match v {
            EnrichmentArg::Base => EnrichmentLevel::Base,
            EnrichmentArg::Enhanced => EnrichmentLevel::Enhanced,
            EnrichmentArg::Max => EnrichmentLevel::Max,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let blocks = extract_slide_blocks(&cli.input).context("Extraction failed")?;
        println!("{}", blocks.join("\n\n"));
        return Ok(());
    }

    let config = UpliftConfig::builder()
        .enrichment(cli.enrichment.into())
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .media_timeout_secs(cli.media_timeout)
        .include_media(!cli.no_media)
        .build()
        .context("Invalid configuration")?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    // ── Run uplift ───────────────────────────────────────────────────────
    let output = uplift_to_file(&cli.input, &output_path, &config)
        .await
        .context("Uplift failed")?;

    if let Some(ref text_path) = cli.text_out {
        std::fs::write(text_path, &output.raw_text)
            .with_context(|| format!("Failed to write raw text to {}", text_path.display()))?;
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?
        );
    }

    if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {} slides in → {} slides out  {}ms  →  {}",
            if stats.skipped_segments == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.source_slides,
            stats.rendered_slides,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} with image  /  {} with video  /  {} segments skipped",
            dim(&stats.slides_with_image.to_string()),
            dim(&stats.slides_with_video.to_string()),
            dim(&stats.skipped_segments.to_string()),
        );
    }

    Ok(())
}

/// `lesson.pptx` → `lesson_uplifted_20260829.pptx`, beside the input.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("deck");
    let date = chrono::Local::now().format("%Y%m%d");
    input.with_file_name(format!("{stem}_uplifted_{date}.pptx"))
}

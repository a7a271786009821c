//! CLI binary for paper2deck.
//!
//! A thin shim over the library crate: maps flags onto `DeckConfig`, runs
//! the generator, and writes the deck JSON.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use paper2deck::{
    analyze, generate, load_document, load_figures, write_deck, DeckConfig, DeckMode,
    ProviderKind,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

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
  # Heuristic deck (no API key needed), printed to stdout
  paper2deck paper.json

  # 10-frame deck written to a file
  paper2deck paper.json --slides 10 -o deck.json

  # Refine with a language model
  PAPER2DECK_API_KEY=sk-... paper2deck paper.json --mode llm -o deck.json

  # Anthropic, with custom structural instructions
  paper2deck paper.json --mode llm --provider anthropic --prompt-file prompt.txt

  # Azure OpenAI (deployment URL carries the api-version)
  paper2deck paper.json --mode llm --provider azure \
    --base-url "https://res.openai.azure.com/openai/deployments/gpt4o?api-version=2024-02-01"

  # Place extracted figures and print only the outline
  paper2deck paper.json --figures figures.json --outline-only

INPUT FORMAT:
  {"pages": [["line", ...], ...], "fullText": "...",
   "metadata": {"title": "...", "author": "...", "subject": "...", "keywords": "..."}}

PROVIDERS:
  Provider     Default base URL               Default model
  ─────────    ─────────────────────────────  ────────────────────────
  openai       https://api.openai.com/v1      gpt-4o-mini
  anthropic    https://api.anthropic.com/v1   claude-3-5-sonnet-latest
  deepseek     https://api.deepseek.com/v1    deepseek-chat
  azure        (required)                     gpt-4o-mini
  custom       (required)                     gpt-4o-mini

ENVIRONMENT VARIABLES:
  PAPER2DECK_API_KEY      API key for LLM mode
  PAPER2DECK_PROVIDER     Provider name
  PAPER2DECK_MODEL        Model ID
  PAPER2DECK_BASE_URL     API base URL
  RUST_LOG                Overrides the log filter
"#;

/// Turn an extracted research paper into a slide deck.
#[derive(Parser, Debug)]
#[command(
    name = "paper2deck",
    version,
    about = "Turn an extracted research paper into a slide deck",
    long_about = "Reads the text of a research paper (pages of lines, as produced by a PDF \
text extractor), detects its structure heuristically and writes a slide deck as JSON. \
Optionally refines the deck with an OpenAI-compatible, Azure OpenAI or Anthropic model; \
if that call fails the heuristic deck is written instead.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Extracted-document JSON file.
    input: PathBuf,

    /// Write the deck JSON to this file instead of stdout.
    #[arg(short, long, env = "PAPER2DECK_OUTPUT")]
    output: Option<PathBuf>,

    /// Total frames including title and agenda (6–30).
    #[arg(long, env = "PAPER2DECK_SLIDES", default_value_t = 12,
          value_parser = clap::value_parser!(u32).range(6..=30))]
    slides: u32,

    /// Generation mode: static or llm.
    #[arg(long, env = "PAPER2DECK_MODE", default_value = "static")]
    mode: DeckMode,

    /// LLM provider: openai, azure, anthropic, deepseek, custom.
    #[arg(long, env = "PAPER2DECK_PROVIDER", default_value = "openai")]
    provider: String,

    /// Model ID; provider default when omitted.
    #[arg(long, env = "PAPER2DECK_MODEL")]
    model: Option<String>,

    /// API base URL; provider default when omitted.
    #[arg(long, env = "PAPER2DECK_BASE_URL")]
    base_url: Option<String>,

    /// API key for LLM mode.
    #[arg(long, env = "PAPER2DECK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Text file with structural instructions for the model.
    #[arg(long, env = "PAPER2DECK_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PAPER2DECK_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// HTTP timeout for the LLM call in seconds.
    #[arg(long, env = "PAPER2DECK_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// JSON array of figure descriptors ({id, filename, caption?}).
    #[arg(long, env = "PAPER2DECK_FIGURES")]
    figures: Option<PathBuf>,

    /// Print the detected outline only; no deck is generated.
    #[arg(long)]
    outline_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPER2DECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPER2DECK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
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

    let doc = load_document(&cli.input)
        .await
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;

    // ── Outline-only mode ────────────────────────────────────────────────
    if cli.outline_only {
        let result = analyze(&doc, cli.slides);
        println!("{}", bold(&result.metadata.paper_title));
        for (i, entry) in result.outline.iter().enumerate() {
            println!("{:>2}. {}", i + 1, entry);
        }
        return Ok(());
    }

    let config = build_config(&cli).await?;

    // ── Generate ─────────────────────────────────────────────────────────
    let spinner = (config.mode == DeckMode::Llm && !cli.quiet).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("LLM");
        bar.set_message(format!("waiting for {}…", config.llm.provider));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = generate(&doc, &config).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let deck = result.context("Deck generation failed")?;

    // ── Output ───────────────────────────────────────────────────────────
    match cli.output {
        Some(ref path) => {
            write_deck(&deck, path)
                .await
                .context("Failed to write deck")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} slides ({})  →  {}",
                    green("✔"),
                    deck.metadata.slide_count,
                    deck.metadata.mode,
                    bold(&path.display().to_string()),
                );
                eprintln!("   {}", dim(&format!("package as {}", deck.suggested_filename())));
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&deck).context("Failed to serialise deck")?;
            println!("{json}");
            if !cli.quiet {
                eprintln!(
                    "{}  {} slides ({})",
                    green("✔"),
                    deck.metadata.slide_count,
                    deck.metadata.mode
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `DeckConfig`.
async fn build_config(cli: &Cli) -> Result<DeckConfig> {
    let prompt = match cli.prompt_file {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?,
        ),
        None => None,
    };
    let figures = match cli.figures {
        Some(ref path) => load_figures(path).await.context("Failed to load figures")?,
        None => Vec::new(),
    };

    let mut builder = DeckConfig::builder()
        .target_slides(cli.slides)
        .mode(cli.mode)
        .provider(ProviderKind::from_name(&cli.provider))
        .temperature(cli.temperature)
        .timeout_secs(cli.timeout)
        .figures(figures);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(prompt) = prompt {
        builder = builder.prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

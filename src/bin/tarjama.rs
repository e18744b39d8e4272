//! CLI binary for tarjama-pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tarjama_pdf::{process, LayoutConfig, OcrConfig, PipelineConfig, WrapPolicy};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic run (first 3 pages, Arabic → English)
  tarjama scan.pdf translated.pdf

  # More pages, wrapped and paginated output
  tarjama --max-pages 10 --wrap paginate scan.pdf translated.pdf

  # Another source language and model
  tarjama --lang fas --source-language Persian --model gpt-4o scan.pdf out.pdf

  # JSON outcome (recognized + translated text, per-page results, stats)
  tarjama --json scan.pdf translated.pdf > outcome.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY   Translation service credential (same as --api-key)

SETUP:
  1. Install tesseract with the source-language traineddata
     (e.g. apt install tesseract-ocr tesseract-ocr-ara).
  2. Make a pdfium shared library available to pdfium-render.
  3. export OPENAI_API_KEY=sk-...
  4. tarjama scan.pdf translated.pdf
"#;

/// Translate scanned Arabic PDFs to English PDFs via OCR and an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "tarjama",
    version,
    about = "Translate scanned Arabic PDFs to English PDFs via OCR and an LLM",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the scanned source PDF.
    input: PathBuf,

    /// Path the translated PDF is written to (created or overwritten).
    output: PathBuf,

    /// Maximum number of pages to process.
    #[arg(long, default_value_t = 3)]
    max_pages: usize,

    /// Rasterization scale factor (1.0–8.0).
    #[arg(long, default_value_t = 4.0)]
    scale: f32,

    /// Tesseract language code.
    #[arg(long, default_value = "ara")]
    lang: String,

    /// Display name of the source language, used in the translation prompt.
    #[arg(long, default_value = "Arabic")]
    source_language: String,

    /// Explicit tessdata directory for tesseract.
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,

    /// Translation service API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completion model used for translation.
    #[arg(long, default_value = "gpt-4")]
    model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Overflow handling in the output PDF: none, wrap, paginate.
    #[arg(long, value_enum, default_value = "none")]
    wrap: WrapArg,

    /// Font size for the output text, in points.
    #[arg(long, default_value_t = 12.0)]
    font_size: f32,

    /// Print the full outcome as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum WrapArg {
    None,
    Wrap,
    Paginate,
}

impl From<WrapArg> for WrapPolicy {
    fn from(v: WrapArg) -> Self {
        match v {
            WrapArg::None => WrapPolicy::None,
            WrapArg::Wrap => WrapPolicy::Wrap,
            WrapArg::Paginate => WrapPolicy::Paginate,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

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

    let config = build_config(&cli)?;

    let outcome = process(&cli.input, &cli.output, &config)
        .await
        .context("Processing failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else if !cli.quiet {
        eprintln!(
            "✔ {}/{} pages recognized, {}ms total  →  {}",
            outcome.stats.recognized_pages,
            outcome.stats.rasterized_pages,
            outcome.stats.total_duration_ms,
            cli.output.display(),
        );
        if outcome.stats.failed_pages > 0 {
            eprintln!("  {} pages failed recognition", outcome.stats.failed_pages);
        }
        println!("{}", outcome.translated_text);
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let ocr = OcrConfig {
        language: cli.lang.clone(),
        tessdata_dir: cli.tessdata_dir.clone(),
        ..OcrConfig::default()
    };

    let layout = LayoutConfig {
        font_size: cli.font_size,
        wrap: cli.wrap.clone().into(),
        ..LayoutConfig::default()
    };

    let mut builder = PipelineConfig::builder()
        .max_pages(cli.max_pages)
        .render_scale(cli.scale)
        .ocr(ocr)
        .model(&cli.model)
        .base_url(&cli.base_url)
        .source_language(&cli.source_language)
        .layout(layout);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }

    builder.build().context("Invalid configuration")
}

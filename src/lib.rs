//! # tarjama-pdf
//!
//! Translate scanned Arabic PDF documents into English PDFs.
//!
//! ## Why this crate?
//!
//! A scanned PDF carries no text layer, so text-extraction tools return
//! nothing. This crate rasterises the leading pages, runs an external OCR
//! engine over each image, translates the recognized text with a
//! chat-completion model, and writes the English rendering into a freshly
//! authored PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Read       load bytes, validate %PDF magic
//!  ├─ 2. Rasterize  first pages → PNG via pdfium (capped at 3, spawn_blocking)
//!  ├─ 3. Recognize  tesseract per page, temp artifacts cleaned up per call
//!  ├─ 4. Translate  one chat-completion call for the whole document
//!  └─ 5. Compose    translated text → new PDF via lopdf
//! ```
//!
//! Rasterization and recognition failures degrade the run (fewer pages,
//! fewer texts); reading, translation, and composition failures abort it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tarjama_pdf::{process, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder()
//!         .api_key(std::env::var("OPENAI_API_KEY")?)
//!         .build()?;
//!     let outcome = process("input.pdf", "output.pdf", &config).await?;
//!     println!("{}", outcome.translated_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `tarjama` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! tarjama-pdf = { version = "0.1", default-features = false }
//! ```
//!
//! ## External requirements
//!
//! The production adapters shell out to a `tesseract` binary (with the
//! `ara` traineddata installed) and bind to a pdfium shared library at
//! runtime. Both boundaries are traits, so neither is needed for tests
//! that inject fakes.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod process;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LayoutConfig, OcrConfig, PipelineConfig, PipelineConfigBuilder, WrapPolicy, DEFAULT_MAX_PAGES};
pub use error::{PageError, PipelineError};
pub use outcome::{PageRecognition, ProcessingOutcome, RunStats};
pub use pipeline::compose::{Composer, LopdfComposer};
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::raster::{PageImage, PdfiumRasterizer, Rasterizer};
pub use pipeline::translate::{create_translator, OpenAiTranslator, Translator};
pub use process::{process, process_sync};

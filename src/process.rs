//! Pipeline orchestration: the end-to-end document run.
//!
//! Stages run strictly in sequence, each awaited to completion:
//!
//! ```text
//! Reading → Rasterizing → Recognizing → Translating → Composing → Done
//! ```
//!
//! Reading, Translating, and Composing (including the final write) are
//! fatal: their errors propagate unmodified and no output file is written.
//! Rasterizing and Recognizing are absorbed: the run degrades to fewer
//! images or fewer recognized texts, down to an empty aggregate that is
//! still forwarded to the translator.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::outcome::{PageRecognition, ProcessingOutcome, RunStats};
use crate::pipeline::compose::{Composer, LopdfComposer};
use crate::pipeline::ocr::{recognize_page, OcrEngine, TesseractEngine};
use crate::pipeline::raster::{PdfiumRasterizer, Rasterizer};
use crate::pipeline::read;
use crate::pipeline::translate::create_translator;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Process one scanned PDF: OCR, translate, and write the output PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — Path to the source PDF
/// * `output` — Path the translated PDF is written to (created/overwritten)
/// * `config` — Run configuration
///
/// # Returns
/// `Ok(ProcessingOutcome)` once the output file is written, even if some
/// pages failed rasterization or recognition (check `outcome.stats`).
///
/// # Errors
/// Returns `Err(PipelineError)` only for fatal errors: unreadable or
/// non-PDF input, translation service failure, composition failure, or a
/// failed output write. In that case no output file is produced.
pub async fn process(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ProcessingOutcome, PipelineError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();

    // ── Reading ──────────────────────────────────────────────────────────
    info!("Reading {}", input.display());
    let source = read::read_source(input).await?;

    // ── Rasterizing (absorbed) ───────────────────────────────────────────
    let rasterizer: Arc<dyn Rasterizer> = config
        .rasterizer
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumRasterizer::new(config.render_scale)));

    let raster_start = Instant::now();
    info!("Rasterizing up to {} pages", config.max_pages);
    let mut images = match rasterizer.rasterize(&source, config.max_pages).await {
        Ok(images) => images,
        Err(e) => {
            warn!("Rasterization failed, continuing with no pages: {e}");
            Vec::new()
        }
    };
    // The cap is part of the adapter contract, but re-asserting it here
    // keeps the invariant independent of the injected implementation.
    images.truncate(config.max_pages);
    let raster_duration_ms = raster_start.elapsed().as_millis() as u64;
    info!("Rasterized {} pages in {}ms", images.len(), raster_duration_ms);

    // ── Recognizing (absorbed per page, strictly in page order) ──────────
    let engine: Arc<dyn OcrEngine> = config
        .ocr_engine
        .clone()
        .unwrap_or_else(|| Arc::new(TesseractEngine::new(config.ocr.clone())));

    let ocr_start = Instant::now();
    let mut pages = Vec::with_capacity(images.len());
    for image in &images {
        let page_num = image.index + 1;
        let page_start = Instant::now();
        let recognition =
            match recognize_page(&engine, image, config.artifact_dir.as_deref()).await {
                Ok(text) => PageRecognition {
                    page_num,
                    text,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                    error: None,
                },
                Err(e) => {
                    warn!("Skipping page {page_num}: {e}");
                    PageRecognition {
                        page_num,
                        text: String::new(),
                        duration_ms: page_start.elapsed().as_millis() as u64,
                        error: Some(e),
                    }
                }
            };
        pages.push(recognition);
    }
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    // Failed pages are omitted, not replaced with placeholders; order is
    // page order by construction.
    let original_text = pages
        .iter()
        .filter(|p| p.error.is_none())
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let recognized_pages = pages.iter().filter(|p| p.error.is_none()).count();
    let failed_pages = pages.len() - recognized_pages;
    info!(
        "Recognized {}/{} pages ({} chars) in {}ms",
        recognized_pages,
        pages.len(),
        original_text.chars().count(),
        ocr_duration_ms
    );

    // ── Translating (fatal) ──────────────────────────────────────────────
    // An empty aggregate (zero recognized pages) is still forwarded; the
    // service's answer for empty input becomes the output content.
    let translator = create_translator(config)?;
    let translate_start = Instant::now();
    info!("Translating with model {}", config.model);
    let translated_text = translator.translate(&original_text).await?;
    let translate_duration_ms = translate_start.elapsed().as_millis() as u64;

    // ── Composing (fatal) ────────────────────────────────────────────────
    let composer: Arc<dyn Composer> = config
        .composer
        .clone()
        .unwrap_or_else(|| Arc::new(LopdfComposer::new(config.layout.clone())));

    info!("Composing {}", output.display());
    let bytes = composer.compose(&translated_text)?;
    tokio::fs::write(output, &bytes)
        .await
        .map_err(|e| PipelineError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;

    let stats = RunStats {
        rasterized_pages: images.len(),
        recognized_pages,
        failed_pages,
        raster_duration_ms,
        ocr_duration_ms,
        translate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Done: {}/{} pages, {}ms total",
        stats.recognized_pages, stats.rasterized_pages, stats.total_duration_ms
    );

    Ok(ProcessingOutcome {
        original_text,
        translated_text,
        pages,
        stats,
    })
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ProcessingOutcome, PipelineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PipelineError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(process(input, output, config))
}

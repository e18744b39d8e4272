//! Result types returned by a pipeline run.

use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// The result of one document run.
///
/// Returned by [`crate::process`] on success, even when some pages were
/// absorbed as failures (check [`ProcessingOutcome::pages`] and
/// [`RunStats::failed_pages`]). The output PDF has already been written by
/// the time this value is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    /// Recognized source-language text, successful pages concatenated in
    /// page order, joined by `\n`.
    pub original_text: String,

    /// The translation service's response for `original_text`.
    pub translated_text: String,

    /// Per-page recognition results, in page order.
    pub pages: Vec<PageRecognition>,

    /// Aggregate statistics for the run.
    pub stats: RunStats,
}

/// OCR result for one page image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecognition {
    /// 1-indexed page number.
    pub page_num: usize,

    /// Recognized text; empty when `error` is set.
    pub text: String,

    /// Wall-clock OCR time for this page.
    pub duration_ms: u64,

    /// Set when recognition failed; the page's text is omitted from the
    /// aggregate.
    pub error: Option<PageError>,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages the rasterizer produced (already capped).
    pub rasterized_pages: usize,
    /// Pages recognized successfully.
    pub recognized_pages: usize,
    /// Pages whose recognition was absorbed as a failure.
    pub failed_pages: usize,
    /// Wall-clock time spent rasterizing.
    pub raster_duration_ms: u64,
    /// Wall-clock time spent in OCR across all pages.
    pub ocr_duration_ms: u64,
    /// Wall-clock time spent in the translation call.
    pub translate_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

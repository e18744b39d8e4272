//! Error types for the tarjama-pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PipelineError`] — **Fatal**: the run cannot produce an output document
//!   (unreadable input, translation service failure, composition or write
//!   failure). Returned as `Err(PipelineError)` from the top-level `process*`
//!   functions.
//!
//! * [`PageError`] — **Absorbed**: rasterization or recognition failed for
//!   the document or a single page, but the pipeline degrades gracefully
//!   (fewer images, fewer recognized texts) instead of aborting. Absorbed
//!   errors are logged and recorded in
//!   [`crate::outcome::ProcessingOutcome::pages`] for post-run inspection.
//!
//! The separation mirrors the stage contract: Reading, Translating, and
//! Composing are the only stages whose failure halts the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the tarjama-pdf library.
///
/// Rasterization and recognition failures use [`PageError`] and are stored
/// in [`crate::outcome::PageRecognition`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Reading errors ────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input file could not be read for some other I/O reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Translation errors ────────────────────────────────────────────────
    /// No translator was injected and no API key was configured.
    #[error("Translation service is not configured.\n{hint}")]
    TranslatorNotConfigured { hint: String },

    /// The translation service call itself failed (auth, network, quota).
    ///
    /// There is no fallback translation path, so this aborts the whole run.
    #[error("Translation request failed: {detail}")]
    TranslationFailed { detail: String },

    /// The service responded but the payload had no usable completion.
    #[error("Translation service returned an unusable response: {detail}")]
    TranslationMalformed { detail: String },

    // ── Composition errors ────────────────────────────────────────────────
    /// The output document could not be assembled or serialized.
    #[error("Failed to compose output PDF: {detail}")]
    CompositionFailed { detail: String },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error absorbed by the pipeline.
///
/// Stored in [`crate::outcome::PageRecognition`] when a page fails
/// recognition; a rasterization failure degrades the run to however many
/// images were produced before it (possibly zero).
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Rasterization of the document failed (malformed PDF, pdfium error).
    #[error("Rasterization failed: {detail}")]
    RasterFailed { detail: String },

    /// OCR failed for a single page image.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

//! Configuration types for the OCR-translation pipeline.
//!
//! All run behaviour is controlled through [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across runs and to diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: injected adapters
//! Each external boundary (rasterizer, OCR engine, translation service,
//! document composer) can be replaced with a caller-supplied implementation.
//! Production code leaves them `None` and gets the real adapters; tests
//! inject deterministic fakes and never touch pdfium, tesseract, or the
//! network.

use crate::error::PipelineError;
use crate::pipeline::compose::Composer;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::raster::Rasterizer;
use crate::pipeline::translate::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Hard cap on pages processed per document.
///
/// Excess pages are silently dropped, never an error. Keeps the OCR and
/// translation cost of arbitrarily long uploads bounded.
pub const DEFAULT_MAX_PAGES: usize = 3;

/// Configuration for one document run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use tarjama_pdf::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .api_key("sk-...")
///     .max_pages(3)
///     .model("gpt-4")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Maximum number of pages rasterized and recognized. Default: 3.
    ///
    /// The cap is enforced in the rasterizer adapter (it stops requesting
    /// pages once reached) and re-asserted by the orchestrator, so it holds
    /// for any injected [`Rasterizer`].
    pub max_pages: usize,

    /// Rasterization scale factor applied to each page. Default: 4.0.
    ///
    /// Scanned Arabic print needs a generous raster for tesseract to
    /// separate the connected script; 4× of the page's natural size keeps
    /// glyph strokes several pixels wide at typical scan resolutions.
    pub render_scale: f32,

    /// Fixed configuration handed to the OCR engine.
    pub ocr: OcrConfig,

    /// Directory for transient page-image files. Default: the system temp dir.
    ///
    /// Every artifact written here is deleted before the run returns,
    /// success or failure. A dedicated directory makes that invariant
    /// observable: point it at an empty directory and assert it is empty
    /// afterwards.
    pub artifact_dir: Option<PathBuf>,

    /// API key for the translation service.
    ///
    /// Always passed in explicitly; the library never reads the environment.
    /// The CLI sources it from `OPENAI_API_KEY` and forwards it here.
    pub api_key: Option<String>,

    /// Chat-completion model used for translation. Default: "gpt-4".
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    /// Default: "https://api.openai.com/v1".
    pub base_url: String,

    /// Human-readable name of the source language, used in the translation
    /// prompts. Default: "Arabic".
    pub source_language: String,

    /// Text layout applied when composing the output PDF.
    pub layout: LayoutConfig,

    /// Pre-constructed rasterizer. `None` uses the pdfium adapter.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Pre-constructed OCR engine. `None` uses the tesseract adapter.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// Pre-constructed translator. `None` builds an OpenAI translator from
    /// `api_key` / `model` / `base_url`.
    pub translator: Option<Arc<dyn Translator>>,

    /// Pre-constructed composer. `None` uses the lopdf adapter with `layout`.
    pub composer: Option<Arc<dyn Composer>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            render_scale: 4.0,
            ocr: OcrConfig::default(),
            artifact_dir: None,
            api_key: None,
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            source_language: "Arabic".to_string(),
            layout: LayoutConfig::default(),
            rasterizer: None,
            ocr_engine: None,
            translator: None,
            composer: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("max_pages", &self.max_pages)
            .field("render_scale", &self.render_scale)
            .field("ocr", &self.ocr)
            .field("artifact_dir", &self.artifact_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("source_language", &self.source_language)
            .field("layout", &self.layout)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("translator", &self.translator.as_ref().map(|_| "<dyn Translator>"))
            .field("composer", &self.composer.as_ref().map(|_| "<dyn Composer>"))
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n.max(1);
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale.clamp(1.0, 8.0);
        self
    }

    pub fn ocr(mut self, ocr: OcrConfig) -> Self {
        self.config.ocr = ocr;
        self
    }

    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.artifact_dir = Some(dir.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn source_language(mut self, name: impl Into<String>) -> Self {
        self.config.source_language = name.into();
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.config.layout.wrap = policy;
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn composer(mut self, composer: Arc<dyn Composer>) -> Self {
        self.config.composer = Some(composer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let c = &self.config;
        if c.max_pages == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_pages must be ≥ 1".into(),
            ));
        }
        if !(1.0..=8.0).contains(&c.render_scale) {
            return Err(PipelineError::InvalidConfig(format!(
                "render_scale must be 1.0–8.0, got {}",
                c.render_scale
            )));
        }
        if c.layout.font_size <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "font_size must be positive, got {}",
                c.layout.font_size
            )));
        }
        Ok(self.config)
    }
}

// ── OCR configuration ────────────────────────────────────────────────────

/// Fixed configuration for the external tesseract invocation.
///
/// The defaults target scanned Arabic print: LSTM engine (`--oem 1`),
/// uniform-block segmentation (`--psm 6`), 300 DPI, and preserved interword
/// spaces so the recognized text keeps its word boundaries for translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code, e.g. "ara".
    pub language: String,
    /// OCR engine mode (`--oem`). 1 = neural-net LSTM only.
    pub engine_mode: u8,
    /// Page segmentation mode (`--psm`). 6 = single uniform block of text.
    pub page_seg_mode: u8,
    /// Resolution hint in DPI (`--dpi`).
    pub dpi: u32,
    /// Preserve interword spaces (`-c preserve_interword_spaces=1`).
    pub preserve_interword_spaces: bool,
    /// Explicit tessdata directory (`--tessdata-dir`). `None` lets the
    /// engine use its compiled-in default.
    pub tessdata_dir: Option<PathBuf>,
    /// Name or path of the tesseract binary.
    pub binary: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "ara".to_string(),
            engine_mode: 1,
            page_seg_mode: 6,
            dpi: 300,
            preserve_interword_spaces: true,
            tessdata_dir: None,
            binary: PathBuf::from("tesseract"),
        }
    }
}

// ── Layout configuration ─────────────────────────────────────────────────

/// Text layout for the composed output PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Font size in points. Default: 12.
    pub font_size: f32,
    /// Margin from the page edges in points; text starts at
    /// `(margin, page_height - margin)`. Default: 50.
    pub margin: f32,
    /// Line-overflow handling. Default: [`WrapPolicy::None`].
    pub wrap: WrapPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            margin: 50.0,
            wrap: WrapPolicy::default(),
        }
    }
}

/// How the composer handles text that exceeds the page bounds.
///
/// A best-effort text dump does not need careful typesetting, so overflow
/// handling is an explicit choice rather than an implicit limitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapPolicy {
    /// One output line per input line; long lines and long documents run
    /// off the page edges. (default)
    #[default]
    None,
    /// Greedy word-wrap to the text width; overflow past the bottom margin
    /// is still clipped.
    Wrap,
    /// Word-wrap plus pagination: lines past the bottom margin spill onto
    /// additional pages.
    Paginate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_fixed_invocation() {
        let c = PipelineConfig::default();
        assert_eq!(c.max_pages, 3);
        assert_eq!(c.ocr.language, "ara");
        assert_eq!(c.ocr.engine_mode, 1);
        assert_eq!(c.ocr.page_seg_mode, 6);
        assert_eq!(c.ocr.dpi, 300);
        assert!(c.ocr.preserve_interword_spaces);
        assert_eq!(c.model, "gpt-4");
        assert_eq!(c.layout.wrap, WrapPolicy::None);
    }

    #[test]
    fn builder_clamps_out_of_range_values() {
        let c = PipelineConfig::builder()
            .max_pages(0)
            .render_scale(100.0)
            .build()
            .unwrap();
        assert_eq!(c.max_pages, 1);
        assert_eq!(c.render_scale, 8.0);
    }

    #[test]
    fn build_rejects_non_positive_font_size() {
        let err = PipelineConfig::builder()
            .layout(LayoutConfig {
                font_size: 0.0,
                ..LayoutConfig::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = PipelineConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}

//! Rasterizing stage: render the leading pages of a PDF to PNG images.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread pool thread designed for blocking operations, preventing the
//! Tokio worker threads from stalling during CPU-heavy rendering.
//!
//! ## Failure contract
//!
//! Rasterization is an absorbed stage. A per-page render failure stops the
//! loop and returns the images produced so far; a document-load failure is
//! reported as `Err(PageError)` and the orchestrator continues with zero
//! images. Neither aborts the run.

use crate::error::PageError;
use async_trait::async_trait;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::{debug, warn};

/// One rasterized page: its 0-based index and PNG-encoded pixels.
///
/// Created during rasterization, consumed and discarded after recognition.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub index: usize,
    pub png: Vec<u8>,
}

/// Converts PDF bytes into an ordered, capped sequence of page images.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Render up to `max_pages` pages, in page order.
    ///
    /// Implementations must stop requesting pages once the cap is reached,
    /// regardless of true document length.
    async fn rasterize(&self, pdf: &[u8], max_pages: usize)
        -> Result<Vec<PageImage>, PageError>;
}

/// The production rasterizer, backed by pdfium.
pub struct PdfiumRasterizer {
    scale: f32,
}

impl PdfiumRasterizer {
    /// `scale` multiplies each page's natural size before rendering.
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

#[async_trait]
impl Rasterizer for PdfiumRasterizer {
    async fn rasterize(
        &self,
        pdf: &[u8],
        max_pages: usize,
    ) -> Result<Vec<PageImage>, PageError> {
        let bytes = pdf.to_vec();
        let scale = self.scale;

        tokio::task::spawn_blocking(move || rasterize_blocking(&bytes, scale, max_pages))
            .await
            .map_err(|e| PageError::RasterFailed {
                detail: format!("render task panicked: {e}"),
            })?
    }
}

/// Blocking implementation of page rendering.
fn rasterize_blocking(
    bytes: &[u8],
    scale: f32,
    max_pages: usize,
) -> Result<Vec<PageImage>, PageError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| PageError::RasterFailed {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    debug!("PDF loaded: {} pages, cap {}", total_pages, max_pages);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut images = Vec::with_capacity(max_pages.min(total_pages));
    for idx in 0..total_pages.min(max_pages) {
        let rendered = pages
            .get(idx as u16)
            .and_then(|page| page.render_with_config(&render_config).map(|b| b.as_image()));

        match rendered {
            Ok(image) => {
                debug!("Rendered page {} → {}x{} px", idx + 1, image.width(), image.height());
                match encode_png(&image) {
                    Ok(png) => images.push(PageImage { index: idx, png }),
                    Err(e) => {
                        warn!("Failed to encode page {}: {e}", idx + 1);
                        break;
                    }
                }
            }
            Err(e) => {
                // Partial output: keep what rendered before the failure.
                warn!("Failed to render page {}: {e:?}", idx + 1);
                break;
            }
        }
    }

    Ok(images)
}

/// Encode a rendered page as PNG.
///
/// PNG over JPEG because it is lossless — compression artefacts on rendered
/// text measurably degrade tesseract's accuracy.
fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

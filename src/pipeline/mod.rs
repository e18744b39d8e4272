//! The four pipeline stages between reading the input and writing the output.
//!
//! Each stage wraps one external collaborator behind a small trait so unit
//! tests can substitute deterministic fakes:
//!
//! * [`read`]      — load the source PDF and validate its magic bytes
//! * [`raster`]    — [`raster::Rasterizer`]: PDF bytes → capped page images (pdfium)
//! * [`ocr`]       — [`ocr::OcrEngine`]: page image file → recognized text (tesseract)
//! * [`translate`] — [`translate::Translator`]: recognized text → English (chat completion)
//! * [`compose`]   — [`compose::Composer`]: English text → output PDF bytes (lopdf)
//!
//! The orchestration that sequences these lives in [`crate::process`].

pub mod compose;
pub mod ocr;
pub mod raster;
pub mod read;
pub mod translate;

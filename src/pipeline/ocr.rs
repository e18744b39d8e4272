//! Recognizing stage: extract text from one page image via tesseract.
//!
//! ## Artifact lifecycle
//!
//! Tesseract operates on file paths, not in-memory buffers, so every page
//! image is spilled to a uniquely-named temporary file for the duration of
//! one OCR call. [`recognize_page`] owns that lifecycle: the
//! [`tempfile::NamedTempFile`] guard deletes the file when the call
//! resolves, whether it succeeded, failed, or panicked. No run leaves
//! artifacts behind.
//!
//! ## Failure contract
//!
//! Recognition is an absorbed stage: one bad page does not abort the batch.
//! The orchestrator logs the failure and omits the page's text from the
//! aggregate — no placeholder is inserted.

use crate::config::OcrConfig;
use crate::error::PageError;
use crate::pipeline::raster::PageImage;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Extracts machine-readable text from a page image on disk.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the image at `image`, labelling failures with the
    /// 1-indexed `page_num`.
    async fn recognize(&self, page_num: usize, image: &Path) -> Result<String, PageError>;
}

/// The production engine: an external `tesseract` process with a fixed
/// configuration.
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, page_num: usize, image: &Path) -> Result<String, PageError> {
        let c = &self.config;
        let mut cmd = Command::new(&c.binary);
        cmd.arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&c.language)
            .arg("--oem")
            .arg(c.engine_mode.to_string())
            .arg("--psm")
            .arg(c.page_seg_mode.to_string())
            .arg("--dpi")
            .arg(c.dpi.to_string());
        if c.preserve_interword_spaces {
            cmd.arg("-c").arg("preserve_interword_spaces=1");
        }
        if let Some(ref dir) = c.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }

        let output = cmd.output().await.map_err(|e| PageError::OcrFailed {
            page: page_num,
            detail: format!("failed to run {}: {e}", c.binary.display()),
        })?;

        if !output.status.success() {
            return Err(PageError::OcrFailed {
                page: page_num,
                detail: format!(
                    "{} exited with {}: {}",
                    c.binary.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Page {}: recognized {} chars", page_num, text.chars().count());
        Ok(text)
    }
}

/// Recognize one page image, managing its temporary artifact.
///
/// Writes the PNG to a uniquely-named file under `artifact_dir` (the system
/// temp dir when `None`), runs the engine against that path, and deletes
/// the file when the call resolves on every path.
pub async fn recognize_page(
    engine: &Arc<dyn OcrEngine>,
    page: &PageImage,
    artifact_dir: Option<&Path>,
) -> Result<String, PageError> {
    let page_num = page.index + 1;
    let dir = artifact_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);

    let artifact = tempfile::Builder::new()
        .prefix("tarjama-page-")
        .suffix(".png")
        .tempfile_in(&dir)
        .map_err(|e| PageError::OcrFailed {
            page: page_num,
            detail: format!("failed to create temp artifact: {e}"),
        })?;

    tokio::fs::write(artifact.path(), &page.png)
        .await
        .map_err(|e| PageError::OcrFailed {
            page: page_num,
            detail: format!("failed to write temp artifact: {e}"),
        })?;

    // The artifact guard drops here on every return path, deleting the file.
    engine.recognize(page_num, artifact.path()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records the artifact path it was handed and whether it existed.
    struct ProbeEngine {
        outcome: Result<String, String>,
        seen: Mutex<Vec<(PathBuf, bool)>>,
    }

    #[async_trait]
    impl OcrEngine for ProbeEngine {
        async fn recognize(&self, page_num: usize, image: &Path) -> Result<String, PageError> {
            self.seen
                .lock()
                .unwrap()
                .push((image.to_path_buf(), image.exists()));
            self.outcome.clone().map_err(|detail| PageError::OcrFailed {
                page: page_num,
                detail,
            })
        }
    }

    fn page() -> PageImage {
        PageImage {
            index: 0,
            png: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[tokio::test]
    async fn artifact_exists_during_call_and_is_deleted_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let engine: Arc<dyn OcrEngine> = Arc::new(ProbeEngine {
            outcome: Ok("نص".into()),
            seen: Mutex::new(Vec::new()),
        });

        let text = recognize_page(&engine, &page(), Some(dir.path())).await.unwrap();
        assert_eq!(text, "نص");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn artifact_is_deleted_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine: Arc<dyn OcrEngine> = Arc::new(ProbeEngine {
            outcome: Err("simulated engine crash".into()),
            seen: Mutex::new(Vec::new()),
        });

        let err = recognize_page(&engine, &page(), Some(dir.path())).await.unwrap_err();
        assert!(matches!(err, PageError::OcrFailed { page: 1, .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn artifact_carries_page_bytes_and_png_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(ProbeEngine {
            outcome: Ok(String::new()),
            seen: Mutex::new(Vec::new()),
        });
        let dyn_engine: Arc<dyn OcrEngine> = engine.clone();

        recognize_page(&dyn_engine, &page(), Some(dir.path())).await.unwrap();

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (path, existed) = &seen[0];
        assert!(existed, "artifact must exist while the engine runs");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(path.starts_with(dir.path()));
    }

    #[test]
    fn tesseract_engine_is_constructed_from_config() {
        let engine = TesseractEngine::new(OcrConfig::default());
        assert_eq!(engine.config.language, "ara");
        assert_eq!(engine.config.page_seg_mode, 6);
    }
}

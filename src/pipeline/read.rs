//! Reading stage: load the source document and validate it is a PDF.
//!
//! Validating the `%PDF` magic bytes up front gives the caller a meaningful
//! error instead of a pdfium failure three stages later. Reading is a fatal
//! stage: with no source bytes there is nothing to degrade to.

use crate::error::PipelineError;
use std::path::Path;
use tracing::debug;

/// Read the source PDF into memory.
///
/// The returned bytes are owned by the orchestrator for the duration of the
/// run and never persisted.
pub async fn read_source(path: &Path) -> Result<Vec<u8>, PipelineError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PipelineError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => PipelineError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => PipelineError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut magic = [0u8; 4];
    let head = bytes.get(..4).unwrap_or(&[]);
    magic[..head.len()].copy_from_slice(head);
    if &magic != b"%PDF" {
        return Err(PipelineError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_file_not_found() {
        let err = read_source(Path::new("/no/such/file.pdf")).await.unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn non_pdf_content_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let err = read_source(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotAPdf { magic, .. } if &magic == b"hell"));
    }

    #[tokio::test]
    async fn truncated_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%P").unwrap();

        let err = read_source(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn pdf_magic_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.5\n%rest of the document").unwrap();

        let bytes = read_source(&path).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

//! Document text extraction: turns an uploaded CV into plain text.
//!
//! Success means "the document opened", not "text was found": a PDF with no
//! pages or no text layer yields an empty string.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is empty")]
    Empty,

    #[error("could not stage document for parsing: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("document could not be read as a PDF: {0}")]
    Unreadable(String),

    #[error("text extraction was interrupted")]
    Interrupted,
}

/// Converts a binary document into plain text.
///
/// Carried by the batch orchestrator as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// PDF extractor backed by `pdf-extract`.
///
/// Each call stages the bytes in its own temp file, which is removed when the
/// call returns, on success and on failure alike.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    scratch_dir: Option<PathBuf>,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage documents under `dir` instead of the system temp directory.
    pub fn with_scratch_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: Some(dir.into()),
        }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        let scratch_dir = self.scratch_dir.clone();
        tokio::task::spawn_blocking(move || extract_pdf_text(&document, scratch_dir.as_deref()))
            .await
            .map_err(join_failure)?
    }
}

/// A parser panic is reported as an unreadable document.
fn join_failure(e: JoinError) -> ExtractionError {
    if e.is_panic() {
        ExtractionError::Unreadable("PDF parser crashed on this document".to_string())
    } else {
        ExtractionError::Interrupted
    }
}

/// Reads every page in order and joins the page texts with a single newline.
pub fn extract_pdf_text(
    document: &[u8],
    scratch_dir: Option<&Path>,
) -> Result<String, ExtractionError> {
    if document.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix("cv_").suffix(".pdf");
    let mut scratch = match scratch_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    scratch.write_all(document)?;
    scratch.flush()?;

    let pages = pdf_extract::extract_text_by_pages(scratch.path())
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitment::test_support::minimal_pdf;
    use tempfile::TempDir;

    fn entries(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn test_extracts_text_from_single_page() {
        let pdf = minimal_pdf(&["Jane Doe Backend Engineer"]);
        let text = extract_pdf_text(&pdf, None).unwrap();
        assert!(text.contains("Jane Doe"), "extracted: {text:?}");
    }

    #[test]
    fn test_pages_are_kept_in_order() {
        let pdf = minimal_pdf(&["FirstPageMarker", "SecondPageMarker"]);
        let text = extract_pdf_text(&pdf, None).unwrap();
        let first = text.find("FirstPageMarker").expect("first page text");
        let second = text.find("SecondPageMarker").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn test_zero_page_document_yields_empty_text() {
        let pdf = minimal_pdf(&[]);
        assert_eq!(extract_pdf_text(&pdf, None).unwrap(), "");
    }

    #[test]
    fn test_zero_byte_document_is_rejected() {
        assert!(matches!(
            extract_pdf_text(&[], None),
            Err(ExtractionError::Empty)
        ));
    }

    #[test]
    fn test_non_pdf_bytes_are_unreadable() {
        let err = extract_pdf_text(b"just some plain text, not a pdf", None).unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)), "{err:?}");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let pdf = minimal_pdf(&["Go, Kubernetes, PostgreSQL"]);
        let a = extract_pdf_text(&pdf, None).unwrap();
        let b = extract_pdf_text(&pdf, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scratch_file_removed_after_success() {
        let dir = TempDir::new().unwrap();
        let pdf = minimal_pdf(&["Scratch check"]);
        extract_pdf_text(&pdf, Some(dir.path())).unwrap();
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn test_scratch_file_removed_after_failure() {
        let dir = TempDir::new().unwrap();
        assert!(extract_pdf_text(b"GIF89a not a document", Some(dir.path())).is_err());
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn test_missing_scratch_dir_is_a_scratch_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = extract_pdf_text(b"%PDF-1.7", Some(&missing)).unwrap_err();
        assert!(matches!(err, ExtractionError::Scratch(_)));
    }

    #[tokio::test]
    async fn test_async_extractor_uses_configured_scratch_dir() {
        let dir = TempDir::new().unwrap();
        let extractor = PdfTextExtractor::with_scratch_dir(dir.path());
        let text = extractor
            .extract(Bytes::from(minimal_pdf(&["Async path"])))
            .await
            .unwrap();
        assert!(text.contains("Async"));
        assert!(extractor.extract(Bytes::new()).await.is_err());
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_parser_panic_becomes_unreadable() {
        let err = tokio::task::spawn_blocking(|| -> Result<String, ExtractionError> {
            panic!("malformed xref")
        })
        .await
        .map_err(join_failure)
        .unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
        assert!(err.to_string().contains("crashed"));
    }

    #[tokio::test]
    async fn test_aborted_extraction_is_interrupted() {
        let handle = tokio::spawn(std::future::pending::<Result<String, ExtractionError>>());
        handle.abort();
        let err = handle.await.map_err(join_failure).unwrap_err();
        assert!(matches!(err, ExtractionError::Interrupted));
    }
}

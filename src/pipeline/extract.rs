//! PDF text extraction: raw document bytes → one text string.
//!
//! Extraction is treated as a black box behind [`TextExtractor`]. The
//! default [`PdfExtractor`] uses `pdf-extract`, which emits a form feed
//! between physical pages; the page splitter picks those up.
//!
//! `pdf-extract` is CPU-bound and can panic on malformed input, so
//! [`extract_text`] runs the extractor on the blocking pool and turns a
//! panicked task into [`Pdf2TasksError::ExtractionFailed`].

use crate::error::Pdf2TasksError;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, Pdf2TasksError>;
}

/// Default extractor backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, Pdf2TasksError> {
        check_pdf_magic(bytes)?;
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| Pdf2TasksError::ExtractionFailed {
            detail: e.to_string(),
        })
    }
}

/// Reject bytes that do not start with `%PDF` (HTML error pages, archives, …).
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), Pdf2TasksError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else {
        Err(Pdf2TasksError::NotAPdf {
            magic: bytes.iter().take(4).copied().collect(),
        })
    }
}

/// Run `extractor` over `bytes` on the blocking thread pool.
pub async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    bytes: Vec<u8>,
) -> Result<String, Pdf2TasksError> {
    let len = bytes.len();
    debug!("Extracting text from {} bytes", len);

    let text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .map_err(|e| Pdf2TasksError::ExtractionFailed {
            detail: format!("extractor panicked: {e}"),
        })??;

    info!("Extracted {} chars of text", text.chars().count());
    Ok(text)
}

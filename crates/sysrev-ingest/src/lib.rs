use std::path::Path;

use thiserror::Error;

// Re-export the backend seam for convenience
pub use sysrev_core::{BackendError, PdfBackend};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF extraction error: {0}")]
    Pdf(#[from] sysrev_core::BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document contains no extractable text")]
    EmptyDocument,
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of sysrev-ingest)")]
    NoPdfSupport,
}

/// Extract the raw text of one document.
///
/// Dispatches on file extension:
/// - `.txt` / `.md` → read directly
/// - anything else → PDF backend (requires the `pdf` feature / mupdf)
///
/// A document that yields only whitespace is an error: it would silently
/// contribute empty summaries to every section.
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match ext.as_str() {
        "txt" | "md" => std::fs::read_to_string(path)?,
        _ => extract_pdf(path)?,
    };

    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "document has no extractable text");
        return Err(IngestError::EmptyDocument);
    }
    Ok(text)
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    let backend = sysrev_pdf_mupdf::MupdfBackend::default();
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}

use std::path::Path;

use thiserror::Error;

pub mod aggregate;
pub mod batch;
pub mod config_file;
pub mod review;
pub mod schema;
pub mod summarize;
pub mod text;

#[cfg(test)]
pub(crate) mod mock;

// Re-export for convenience
pub use aggregate::aggregate;
pub use batch::{BatchResult, BatchStats, DocumentInput, ProgressEvent, run_batch};
pub use review::{DocumentReview, LeafFailure, ReviewNode, ReviewTree, build_review};
pub use schema::{SchemaError, SchemaNode, SectionPath, SectionSchema};
pub use summarize::{GenerationParams, ModelError, SummarizeError, SummaryModel, summarize};
pub use text::{dedupe_sentences, normalize_whitespace};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; everything
/// downstream (normalization, section summarization, aggregation) operates
/// on the plain text they return.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of a PDF file.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

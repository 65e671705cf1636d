//! The summarization model trait and the prompt-prefixing adapter around it.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Decoding parameters forwarded to the model.
///
/// Lengths are counted in the model's output-token units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    /// Sampling off means deterministic decoding, which keeps repeated runs
    /// over the same batch reproducible.
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("inference request failed: {0}")]
    Request(String),
    #[error("malformed model response: {0}")]
    InvalidResponse(String),
}

/// Failure of one leaf's summary generation, wrapping the model-level cause.
/// The caller decides whether this empties the leaf or aborts the document.
#[derive(Error, Debug)]
#[error("summarization failed: {0}")]
pub struct SummarizeError(#[from] pub ModelError);

/// A summarization model that can condense text into a short summary.
///
/// The concrete handle is constructed once at startup and passed by
/// reference to every call site.
pub trait SummaryModel: Send + Sync {
    /// The canonical name of this model backend (e.g., "hf-inference").
    fn name(&self) -> &str;

    /// Generate the single best summary for `input`.
    fn generate<'a>(
        &'a self,
        input: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;
}

/// Summarize `text` against a section `prompt`.
///
/// The model input is the prompt on its own line followed by the text.
pub async fn summarize(
    model: &dyn SummaryModel,
    text: &str,
    prompt: &str,
    params: &GenerationParams,
) -> Result<String, SummarizeError> {
    let input = format!("{prompt}\n{text}");
    let summary = model.generate(&input, params).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockModel;

    #[tokio::test]
    async fn prefixes_prompt_on_its_own_line() {
        let model = MockModel::echo_input();
        let out = summarize(
            &model,
            "body text",
            "Summarize this.",
            &GenerationParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(out, "Summarize this.\nbody text");
    }

    #[tokio::test]
    async fn wraps_model_failure() {
        let model = MockModel::failing("boom");
        let err = summarize(&model, "text", "prompt", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("summarization failed"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn default_params_match_reference_decoding() {
        let params = GenerationParams::default();
        assert_eq!(params.max_length, 150);
        assert_eq!(params.min_length, 30);
        assert!(!params.do_sample);
    }
}

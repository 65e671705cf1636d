//! HTTP summarization backend.
//!
//! Talks to a Hugging-Face-style inference endpoint hosting a summarization
//! pipeline: POST a JSON body of `{"inputs": ..., "parameters": ...}` and
//! read back `[{"summary_text": "..."}]`. The default endpoint serves the
//! same t5-base pipeline the original workflow ran locally.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::{Value, json};

use sysrev_core::{GenerationParams, ModelError, SummaryModel};

pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/t5-base";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A summarization model served over HTTP.
pub struct HttpSummaryModel {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpSummaryModel {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SummaryModel for HttpSummaryModel {
    fn name(&self) -> &str {
        "hf-inference"
    }

    fn generate<'a>(
        &'a self,
        input: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(async move {
            let body = json!({
                "inputs": input,
                "parameters": {
                    "max_length": params.max_length,
                    "min_length": params.min_length,
                    "do_sample": params.do_sample,
                },
                "options": { "wait_for_model": true },
            });

            let mut request = self
                .client
                .post(&self.endpoint)
                .timeout(REQUEST_TIMEOUT)
                .json(&body);
            if let Some(ref token) = self.api_token {
                request = request.bearer_auth(token);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| ModelError::Request(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let detail = resp.text().await.unwrap_or_default();
                tracing::debug!(%status, %detail, "inference endpoint rejected request");
                return Err(ModelError::Request(format!("HTTP {status}: {detail}")));
            }

            let data: Value = resp
                .json()
                .await
                .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
            parse_summary_response(&data)
        })
    }
}

/// Pull the single best summary out of a pipeline response.
///
/// Accepts both the list form `[{"summary_text": ...}]` and a bare object,
/// which some self-hosted servers return.
fn parse_summary_response(data: &Value) -> Result<String, ModelError> {
    let entry = match data {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| ModelError::InvalidResponse("empty response array".into()))?,
        other => other,
    };

    entry["summary_text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            ModelError::InvalidResponse(format!("missing \"summary_text\" field in {entry}"))
        })
}

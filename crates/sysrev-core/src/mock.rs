//! Mock summarization model for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::summarize::{GenerationParams, ModelError, SummaryModel};

enum MockBehavior {
    /// Return the model input verbatim.
    EchoInput,
    /// Return "summary of: {first input line}" — distinct per prompt,
    /// stable per document.
    PromptTagged,
    /// Return the same canned summary for every call.
    Canned(String),
    /// Fail every call with the given message.
    Fail(String),
}

/// A hand-rolled mock implementing [`SummaryModel`] for tests.
///
/// Supports call counting and selective failure for inputs containing a
/// trigger substring (used to fail one leaf or one document's text).
pub struct MockModel {
    behavior: MockBehavior,
    fail_when: Vec<String>,
    call_count: AtomicUsize,
}

impl MockModel {
    pub fn echo_input() -> Self {
        Self::with_behavior(MockBehavior::EchoInput)
    }

    pub fn prompt_tagged() -> Self {
        Self::with_behavior(MockBehavior::PromptTagged)
    }

    pub fn canned(summary: &str) -> Self {
        Self::with_behavior(MockBehavior::Canned(summary.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.to_string()))
    }

    /// Fail any call whose input contains `trigger`.
    pub fn failing_when(mut self, trigger: &str) -> Self {
        self.fail_when.push(trigger.to_string());
        self
    }

    /// How many times `generate()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            fail_when: Vec::new(),
            call_count: AtomicUsize::new(0),
        }
    }
}

impl SummaryModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn generate<'a>(
        &'a self,
        input: &'a str,
        _params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            if let Some(trigger) = self.fail_when.iter().find(|t| input.contains(t.as_str())) {
                return Err(ModelError::Request(format!(
                    "simulated failure on \"{trigger}\""
                )));
            }
            match &self.behavior {
                MockBehavior::EchoInput => Ok(input.to_string()),
                MockBehavior::PromptTagged => {
                    let prompt = input.lines().next().unwrap_or("");
                    Ok(format!("summary of: {prompt}"))
                }
                MockBehavior::Canned(summary) => Ok(summary.clone()),
                MockBehavior::Fail(message) => Err(ModelError::Request(message.clone())),
            }
        })
    }
}

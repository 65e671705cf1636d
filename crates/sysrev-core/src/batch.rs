//! Sequential batch driver: one document at a time, every schema leaf
//! summarized to completion before the next document begins.

use crate::aggregate::aggregate;
use crate::review::{DocumentReview, ReviewTree, build_review};
use crate::schema::{SectionPath, SectionSchema};
use crate::summarize::{GenerationParams, SummaryModel};
use crate::text::normalize_whitespace;

/// One document's extracted text, ready for review generation.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub text: String,
}

/// Progress events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    DocumentStarted {
        index: usize,
        total: usize,
        name: String,
    },
    LeafSummarized {
        index: usize,
        total: usize,
        path: SectionPath,
        ok: bool,
    },
    DocumentCompleted {
        index: usize,
        total: usize,
        name: String,
        failed_leaves: usize,
    },
}

/// Summary statistics for a complete batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub documents: usize,
    /// Documents with no failed leaves.
    pub clean_documents: usize,
    pub failed_leaves: usize,
}

/// Everything a batch run produces.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub reviews: Vec<DocumentReview>,
    pub aggregated: ReviewTree,
    pub stats: BatchStats,
}

/// Run the full pipeline over a batch of extracted documents.
///
/// Documents are processed strictly in order; per-leaf failures empty that
/// leaf and are recorded on the document, never aborting it or the batch.
/// The aggregated tree reflects whatever every document managed to produce.
pub async fn run_batch(
    documents: Vec<DocumentInput>,
    schema: &SectionSchema,
    model: &dyn SummaryModel,
    params: &GenerationParams,
    progress: impl Fn(ProgressEvent),
) -> BatchResult {
    let total = documents.len();
    let mut reviews = Vec::with_capacity(total);
    let mut stats = BatchStats {
        documents: total,
        ..BatchStats::default()
    };

    for (index, document) in documents.into_iter().enumerate() {
        progress(ProgressEvent::DocumentStarted {
            index,
            total,
            name: document.name.clone(),
        });
        tracing::info!(document = %document.name, index, total, "building review");

        let text = normalize_whitespace(&document.text);
        let (tree, failures) = build_review(&text, schema, model, params, |path, ok| {
            progress(ProgressEvent::LeafSummarized {
                index,
                total,
                path: path.clone(),
                ok,
            });
        })
        .await;

        progress(ProgressEvent::DocumentCompleted {
            index,
            total,
            name: document.name.clone(),
            failed_leaves: failures.len(),
        });

        if failures.is_empty() {
            stats.clean_documents += 1;
        }
        stats.failed_leaves += failures.len();

        reviews.push(DocumentReview {
            name: document.name,
            tree,
            failures,
        });
    }

    let trees: Vec<ReviewTree> = reviews.iter().map(|r| r.tree.clone()).collect();
    let aggregated = aggregate(&trees, schema);

    BatchResult {
        reviews,
        aggregated,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockModel;

    fn doc(name: &str, text: &str) -> DocumentInput {
        DocumentInput {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn processes_documents_in_order() {
        let schema = SectionSchema::from_json_str(r#"{"A": "p."}"#).unwrap();
        let model = MockModel::canned("Fine.");
        let events = std::sync::Mutex::new(Vec::new());

        let result = run_batch(
            vec![doc("one.pdf", "first"), doc("two.pdf", "second")],
            &schema,
            &model,
            &GenerationParams::default(),
            |event| {
                if let ProgressEvent::DocumentStarted { name, .. } = event {
                    events.lock().unwrap().push(name);
                }
            },
        )
        .await;

        assert_eq!(
            events.into_inner().unwrap(),
            vec!["one.pdf".to_string(), "two.pdf".to_string()]
        );
        assert_eq!(result.stats.documents, 2);
        assert_eq!(result.stats.clean_documents, 2);
        assert_eq!(result.stats.failed_leaves, 0);
    }

    #[tokio::test]
    async fn failing_document_does_not_disturb_the_others() {
        let schema =
            SectionSchema::from_json_str(r#"{"A": "first prompt.", "B": "second prompt."}"#)
                .unwrap();
        // Document two's text poisons every leaf of that document only.
        let model = MockModel::canned("Stable summary.").failing_when("poison");

        let result = run_batch(
            vec![
                doc("one.pdf", "clean text one"),
                doc("two.pdf", "poison text"),
                doc("three.pdf", "clean text three"),
            ],
            &schema,
            &model,
            &GenerationParams::default(),
            |_| {},
        )
        .await;

        assert_eq!(result.stats.documents, 3);
        assert_eq!(result.stats.clean_documents, 2);
        assert_eq!(result.stats.failed_leaves, 2);
        assert_eq!(result.reviews[1].failures.len(), 2);

        // Documents 1 and 3 still contribute; the failed document adds only
        // empty leaves, so the aggregated output is unaffected by it.
        let a = SectionPath::root().child("A");
        assert_eq!(result.aggregated.get(&a), Some("Stable summary."));
        assert_eq!(result.reviews[0].tree.get(&a), Some("Stable summary."));
        assert_eq!(result.reviews[1].tree.get(&a), Some(""));
        assert_eq!(result.reviews[2].tree.get(&a), Some("Stable summary."));
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_leaves() {
        let schema = SectionSchema::systematic_review();
        let model = MockModel::canned("unused");
        let result = run_batch(
            Vec::new(),
            schema,
            &model,
            &GenerationParams::default(),
            |_| {},
        )
        .await;

        assert_eq!(result.stats.documents, 0);
        assert!(result.reviews.is_empty());
        for path in result.aggregated.paths() {
            assert_eq!(result.aggregated.get(&path), Some(""));
        }
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn text_is_normalized_before_summarization() {
        let schema = SectionSchema::from_json_str(r#"{"A": "p."}"#).unwrap();
        let model = MockModel::echo_input();
        let result = run_batch(
            vec![doc("doc.pdf", "a \n\n b\tc ")],
            &schema,
            &model,
            &GenerationParams::default(),
            |_| {},
        )
        .await;

        let a = SectionPath::root().child("A");
        assert_eq!(result.reviews[0].tree.get(&a), Some("p.\na b c"));
    }
}

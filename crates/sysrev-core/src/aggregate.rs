//! Merging per-document review trees into one aggregated review.

use crate::review::ReviewTree;
use crate::schema::SectionSchema;
use crate::text::dedupe_sentences;

/// Merge per-document reviews into one tree shaped like `schema`.
///
/// For every schema leaf the corresponding value is looked up in each review
/// (a missing path contributes nothing — a document whose processing failed
/// partway still aggregates cleanly), the non-blank contributions are sorted,
/// joined with single spaces, and the result is sentence-deduplicated.
///
/// Zero input reviews produce a tree with every leaf empty. The output does
/// not depend on the order of `reviews`: contributions are put in canonical
/// order before joining, and the deduplicator is set-based. Sorting matters
/// for summaries without sentence punctuation, where the joined string is a
/// single "sentence" and dedup alone cannot restore order-independence.
pub fn aggregate(reviews: &[ReviewTree], schema: &SectionSchema) -> ReviewTree {
    let mut values = Vec::with_capacity(schema.leaf_count());
    for (path, _) in schema.leaves() {
        let mut contributions: Vec<&str> = reviews
            .iter()
            .filter_map(|review| review.get(&path))
            .filter(|value| !value.trim().is_empty())
            .collect();
        contributions.sort_unstable();
        values.push(dedupe_sentences(&contributions.join(" ")));
    }
    ReviewTree::from_leaf_values(schema, values)
}

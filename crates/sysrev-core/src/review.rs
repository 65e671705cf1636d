//! Review trees and the schema walker that fills them in.
//!
//! A [`ReviewTree`] is only ever constructed by walking a [`SectionSchema`],
//! so its path set always equals the schema's path set. Shape identity is a
//! property of the constructor, not a convention callers must maintain.

use serde_json::Value;

use crate::schema::{SchemaNode, SectionPath, SectionSchema};
use crate::summarize::{GenerationParams, SummaryModel, summarize};

/// A node of a review: a generated (or aggregated) summary string at each
/// leaf, branches mirroring the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewNode {
    Leaf(String),
    Branch(Vec<(String, ReviewNode)>),
}

/// A tree of section summaries shaped exactly like the schema it was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTree {
    sections: Vec<(String, ReviewNode)>,
}

impl ReviewTree {
    /// Build a tree shaped like `schema`, consuming `values` in leaf
    /// declaration order. Missing values become empty strings; extras are
    /// ignored.
    pub fn from_leaf_values(
        schema: &SectionSchema,
        values: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut values = values.into_iter();
        Self {
            sections: fill_branch(schema.sections(), &mut values),
        }
    }

    pub fn sections(&self) -> &[(String, ReviewNode)] {
        &self.sections
    }

    /// Tolerant lookup of the leaf value at `path`. Returns `None` when the
    /// path is absent or lands on a branch.
    pub fn get(&self, path: &SectionPath) -> Option<&str> {
        let mut children = &self.sections;
        let mut segments = path.segments().iter().peekable();
        while let Some(segment) = segments.next() {
            let (_, node) = children.iter().find(|(name, _)| name == segment)?;
            match node {
                ReviewNode::Leaf(value) => {
                    return if segments.peek().is_none() {
                        Some(value.as_str())
                    } else {
                        None
                    };
                }
                ReviewNode::Branch(grandchildren) => children = grandchildren,
            }
        }
        None
    }

    /// All leaf paths in declaration order.
    pub fn paths(&self) -> Vec<SectionPath> {
        let mut out = Vec::new();
        collect_paths(&self.sections, &SectionPath::root(), &mut out);
        out
    }

    /// Serialize to a JSON object mirroring the tree (key order preserved).
    pub fn to_json_value(&self) -> Value {
        Value::Object(branch_to_json(&self.sections))
    }
}

fn fill_branch(
    schema_children: &[(String, SchemaNode)],
    values: &mut dyn Iterator<Item = String>,
) -> Vec<(String, ReviewNode)> {
    let mut filled = Vec::with_capacity(schema_children.len());
    for (name, node) in schema_children {
        let child = match node {
            SchemaNode::Leaf(_) => ReviewNode::Leaf(values.next().unwrap_or_default()),
            SchemaNode::Branch(grandchildren) => {
                ReviewNode::Branch(fill_branch(grandchildren, values))
            }
        };
        filled.push((name.clone(), child));
    }
    filled
}

fn collect_paths(
    children: &[(String, ReviewNode)],
    path: &SectionPath,
    out: &mut Vec<SectionPath>,
) {
    for (name, node) in children {
        let child_path = path.child(name);
        match node {
            ReviewNode::Leaf(_) => out.push(child_path),
            ReviewNode::Branch(grandchildren) => collect_paths(grandchildren, &child_path, out),
        }
    }
}

fn branch_to_json(children: &[(String, ReviewNode)]) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for (name, node) in children {
        let value = match node {
            ReviewNode::Leaf(text) => Value::String(text.clone()),
            ReviewNode::Branch(grandchildren) => Value::Object(branch_to_json(grandchildren)),
        };
        map.insert(name.clone(), value);
    }
    map
}

/// One leaf whose summary generation failed during a walk.
#[derive(Debug, Clone)]
pub struct LeafFailure {
    pub path: SectionPath,
    pub message: String,
}

/// A single document's completed review.
#[derive(Debug, Clone)]
pub struct DocumentReview {
    pub name: String,
    pub tree: ReviewTree,
    pub failures: Vec<LeafFailure>,
}

/// Walk the schema over one document's text, summarizing every leaf prompt.
///
/// A failed leaf never aborts the walk: the leaf is recorded as an empty
/// string and the failure is returned alongside the tree so the caller can
/// report it. `on_leaf` fires once per leaf with its path and outcome.
pub async fn build_review(
    text: &str,
    schema: &SectionSchema,
    model: &dyn SummaryModel,
    params: &GenerationParams,
    mut on_leaf: impl FnMut(&SectionPath, bool),
) -> (ReviewTree, Vec<LeafFailure>) {
    let mut values = Vec::with_capacity(schema.leaf_count());
    let mut failures = Vec::new();

    for (path, prompt) in schema.leaves() {
        match summarize(model, text, prompt, params).await {
            Ok(summary) => {
                on_leaf(&path, true);
                values.push(summary);
            }
            Err(e) => {
                tracing::warn!(section = %path, error = %e, "leaf summarization failed");
                on_leaf(&path, false);
                failures.push(LeafFailure {
                    path,
                    message: e.to_string(),
                });
                values.push(String::new());
            }
        }
    }

    (ReviewTree::from_leaf_values(schema, values), failures)
}

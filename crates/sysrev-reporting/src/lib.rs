//! Rendering and export of the aggregated review artifact.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use sysrev_core::{ReviewNode, ReviewTree};

/// Fixed artifact file name, used when the caller does not choose one.
pub const REVIEW_FILE_NAME: &str = "systematic_review.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export formats for the aggregated review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Render the review to a string in the given format. The returned string is
/// byte-for-byte what [`export_review`] writes, so callers can also hand it
/// out directly (e.g. as a download blob).
pub fn render(tree: &ReviewTree, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => render_json(tree),
        ExportFormat::Markdown => Ok(render_markdown(tree)),
    }
}

/// Write the review artifact to `path`.
pub fn export_review(
    tree: &ReviewTree,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = render(tree, format)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// The review as 4-space-indented JSON, key order following the schema.
pub fn render_json(tree: &ReviewTree) -> Result<String, ExportError> {
    render_json_value(&tree.to_json_value())
}

/// Pretty-print any JSON value with the artifact's 4-space indentation.
pub fn render_json_value(value: &serde_json::Value) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The review as nested Markdown headings with the leaf text beneath.
pub fn render_markdown(tree: &ReviewTree) -> String {
    let mut out = String::from("# Systematic Review\n");
    render_markdown_children(tree.sections(), 2, &mut out);
    out
}

fn render_markdown_children(children: &[(String, ReviewNode)], depth: usize, out: &mut String) {
    // Markdown headings stop at h6
    let level = depth.min(6);
    for (name, node) in children {
        out.push('\n');
        out.push_str(&"#".repeat(level));
        out.push(' ');
        out.push_str(name);
        out.push('\n');
        match node {
            ReviewNode::Leaf(text) => {
                if !text.is_empty() {
                    out.push('\n');
                    out.push_str(text);
                    out.push('\n');
                }
            }
            ReviewNode::Branch(grandchildren) => {
                render_markdown_children(grandchildren, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysrev_core::SectionSchema;

    fn sample_tree() -> ReviewTree {
        let schema = SectionSchema::from_json_str(
            r#"{"A: Abstract": "p.", "B: Methods": {"1. Question": "q."}}"#,
        )
        .unwrap();
        ReviewTree::from_leaf_values(
            &schema,
            vec!["An abstract.".to_string(), "A question.".to_string()],
        )
    }

    #[test]
    fn json_uses_four_space_indent_and_schema_order() {
        let rendered = render_json(&sample_tree()).unwrap();
        assert!(rendered.starts_with("{\n    \"A: Abstract\""));
        assert!(rendered.contains("        \"1. Question\": \"A question.\""));
        // Top-level key order follows the schema, not alphabetical sorting
        let a_pos = rendered.find("A: Abstract").unwrap();
        let b_pos = rendered.find("B: Methods").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn json_round_trips_as_valid_json() {
        let rendered = render_json(&sample_tree()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["B: Methods"]["1. Question"], "A question.");
    }

    #[test]
    fn markdown_nests_headings_by_depth() {
        let rendered = render_markdown(&sample_tree());
        assert!(rendered.contains("# Systematic Review"));
        assert!(rendered.contains("\n## A: Abstract\n"));
        assert!(rendered.contains("\n### 1. Question\n"));
        assert!(rendered.contains("\nAn abstract.\n"));
    }

    #[test]
    fn export_writes_rendered_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REVIEW_FILE_NAME);
        let tree = sample_tree();
        export_review(&tree, ExportFormat::Json, &path).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, render_json(&tree).unwrap());
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(ExportFormat::from_name("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_name("md"), Some(ExportFormat::Markdown));
        assert_eq!(
            ExportFormat::from_name("Markdown"),
            Some(ExportFormat::Markdown)
        );
        assert_eq!(ExportFormat::from_name("yaml"), None);
    }
}

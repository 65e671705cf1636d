//! The section schema: a fixed nested template of report sections, each leaf
//! carrying the generation prompt for that section.

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("schema root must be a JSON object")]
    RootNotObject,
    #[error("invalid node at \"{path}\": expected a prompt string or an object of subsections")]
    InvalidNode { path: String },
    #[error("empty branch at \"{path}\"")]
    EmptyBranch { path: String },
}

/// The sequence of section names from the schema root down to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPath(Vec<String>);

impl SectionPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}

/// A node of the section schema: either a generation prompt (leaf) or an
/// ordered set of named subsections (branch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Leaf(String),
    Branch(Vec<(String, SchemaNode)>),
}

/// A complete section schema. The root is always a branch; nesting depth is
/// unbounded. Declaration order is preserved and drives the order of every
/// walk and of the serialized output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSchema {
    sections: Vec<(String, SchemaNode)>,
}

impl SectionSchema {
    pub fn new(sections: Vec<(String, SchemaNode)>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[(String, SchemaNode)] {
        &self.sections
    }

    /// All leaf (path, prompt) pairs in declaration order.
    pub fn leaves(&self) -> Vec<(SectionPath, &str)> {
        let mut out = Vec::new();
        collect_leaves(&self.sections, &SectionPath::root(), &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// The built-in systematic-review template.
    pub fn systematic_review() -> &'static SectionSchema {
        &SYSTEMATIC_REVIEW
    }

    /// Parse a schema from its JSON file form: an object whose values are
    /// either prompt strings (leaves) or nested objects (branches).
    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::RootNotObject)?;
        if object.is_empty() {
            return Err(SchemaError::EmptyBranch {
                path: String::new(),
            });
        }
        let mut sections = Vec::with_capacity(object.len());
        for (name, child) in object {
            let path = SectionPath::root().child(name);
            sections.push((name.clone(), node_from_json(child, &path)?));
        }
        Ok(Self { sections })
    }

    pub fn to_json_value(&self) -> Value {
        Value::Object(branch_to_json(&self.sections))
    }
}

fn collect_leaves<'a>(
    children: &'a [(String, SchemaNode)],
    path: &SectionPath,
    out: &mut Vec<(SectionPath, &'a str)>,
) {
    for (name, node) in children {
        let child_path = path.child(name);
        match node {
            SchemaNode::Leaf(prompt) => out.push((child_path, prompt.as_str())),
            SchemaNode::Branch(grandchildren) => {
                collect_leaves(grandchildren, &child_path, out);
            }
        }
    }
}

fn node_from_json(value: &Value, path: &SectionPath) -> Result<SchemaNode, SchemaError> {
    match value {
        Value::String(prompt) => Ok(SchemaNode::Leaf(prompt.clone())),
        Value::Object(object) => {
            if object.is_empty() {
                return Err(SchemaError::EmptyBranch {
                    path: path.to_string(),
                });
            }
            let mut children = Vec::with_capacity(object.len());
            for (name, child) in object {
                let child_path = path.child(name);
                children.push((name.clone(), node_from_json(child, &child_path)?));
            }
            Ok(SchemaNode::Branch(children))
        }
        _ => Err(SchemaError::InvalidNode {
            path: path.to_string(),
        }),
    }
}

fn branch_to_json(children: &[(String, SchemaNode)]) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for (name, node) in children {
        let value = match node {
            SchemaNode::Leaf(prompt) => Value::String(prompt.clone()),
            SchemaNode::Branch(grandchildren) => Value::Object(branch_to_json(grandchildren)),
        };
        map.insert(name.clone(), value);
    }
    map
}

/// The default template. Section labels and numbering (including the gaps)
/// match the report format reviewers already use.
static SYSTEMATIC_REVIEW: Lazy<SectionSchema> = Lazy::new(|| {
    use SchemaNode::{Branch, Leaf};

    let leaf = |prompt: &str| Leaf(prompt.to_string());

    SectionSchema::new(vec![
        (
            "A: Abstract".to_string(),
            leaf("Provide a concise and clear summary of the document's key focus and purpose."),
        ),
        (
            "B: Methods".to_string(),
            Branch(vec![
                (
                    "1. Research Question".to_string(),
                    leaf("What is the primary research question explicitly stated in the document?"),
                ),
                (
                    "2. Search Strategy".to_string(),
                    leaf(
                        "Summarize the methods used to identify and select studies, such as databases searched and keywords.",
                    ),
                ),
                (
                    "3. Inclusion and Exclusion Criteria".to_string(),
                    Branch(vec![
                        (
                            "Inclusion".to_string(),
                            leaf("List the specific criteria used to include studies in this review."),
                        ),
                        (
                            "Exclusion".to_string(),
                            leaf("List the specific criteria used to exclude studies from this review."),
                        ),
                    ]),
                ),
                (
                    "5. Data Extraction".to_string(),
                    leaf("Describe the process and tools used for extracting data in this research."),
                ),
                (
                    "6. Data Synthesis".to_string(),
                    leaf("Explain the approach and methods used to synthesize the data extracted."),
                ),
            ]),
        ),
        (
            "D: Results".to_string(),
            leaf("Summarize the primary findings and results of this review."),
        ),
    ])
});

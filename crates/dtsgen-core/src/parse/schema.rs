use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` field can be a single type name or a list of type names.
///
/// Type names are kept as raw strings: real-world documents use values such as
/// `dateTime` or `float` that are formats in the strict dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    /// All type names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeSet::Single(t) => vec![t.as_str()],
            TypeSet::Multiple(ts) => ts.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }
}

/// A schema node. Every attribute is optional; classification decides which
/// of them drives the resulting shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The `$ref` as written in the document.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Canonical lookup path for `ref_path`, set by the reference pre-pass.
    #[serde(skip)]
    pub canonical_ref: Option<String>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,

    // Enum values
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Schema {
    /// Shorthand for a `$ref` node.
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            ref_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Shorthand for a node with a single declared type.
    pub fn typed(name: impl Into<String>) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(name.into())),
            ..Self::default()
        }
    }

    /// The definition this node points at: the canonical path once references
    /// are resolved, the authored `$ref` before that.
    pub fn reference_target(&self) -> Option<&str> {
        self.canonical_ref.as_deref().or(self.ref_path.as_deref())
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.schema_type.as_ref().is_some_and(|t| t.contains(name))
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

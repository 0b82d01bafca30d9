pub mod document;
pub mod ref_resolve;
pub mod schema;

use crate::error::ParseError;
use document::SchemaDocument;

/// Parse a schema document from YAML.
pub fn from_yaml(input: &str) -> Result<SchemaDocument, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse a schema document from JSON.
pub fn from_json(input: &str) -> Result<SchemaDocument, ParseError> {
    Ok(serde_json::from_str(input)?)
}

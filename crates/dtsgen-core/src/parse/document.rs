use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::Schema;

/// The root input: named definitions, either Swagger 2 style (`definitions`)
/// or OpenAPI 3 style (`components.schemas`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

impl SchemaDocument {
    /// Build a document from `definitions` entries.
    pub fn from_definitions(definitions: IndexMap<String, Schema>) -> Self {
        Self {
            definitions: Some(definitions),
            components: None,
        }
    }

    /// The definitions root: `definitions` when present, else `components.schemas`.
    pub fn definitions_root(&self) -> Option<&IndexMap<String, Schema>> {
        self.definitions
            .as_ref()
            .or_else(|| self.components.as_ref().map(|c| &c.schemas))
    }
}

use indexmap::IndexMap;

use super::document::SchemaDocument;
use super::schema::{AdditionalProperties, Schema};
use crate::error::ResolveError;

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// A schema document in which every `$ref` carries its canonical lookup path.
///
/// The canonical path of a definition is its key in the definitions root, so
/// lookups are a single map access. Authored `$ref` strings are left as they
/// were written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedDocument {
    definitions: IndexMap<String, Schema>,
}

impl ResolvedDocument {
    /// Definitions in input order, keyed by canonical path.
    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }

    /// Dereference a canonical path.
    pub fn resolve(&self, path: &str) -> Result<&Schema, ResolveError> {
        self.definitions
            .get(path)
            .ok_or_else(|| ResolveError::UnresolvedReference(path.to_string()))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Attach the canonical path to every `$ref` in the document.
///
/// Fails when the document has no definitions root or when any reference,
/// at any depth, points at a definition that does not exist.
pub fn rewrite_reference_paths(document: &SchemaDocument) -> Result<ResolvedDocument, ResolveError> {
    let root = document
        .definitions_root()
        .ok_or(ResolveError::MissingDefinitions)?;
    let rewriter = RefRewriter { root };

    let mut definitions = IndexMap::with_capacity(root.len());
    for (name, schema) in root {
        definitions.insert(name.clone(), rewriter.rewrite(schema)?);
    }
    log::debug!("rewrote references in {} definitions", definitions.len());

    Ok(ResolvedDocument { definitions })
}

/// Convert a raw `$ref` string into a canonical path, without checking that
/// the target exists.
///
/// Accepts `#/definitions/<Name>` and `#/components/schemas/<Name>`; the name
/// may use JSON pointer (`~0`, `~1`) and percent escapes.
pub fn canonical_path(raw: &str) -> Option<String> {
    let token = raw
        .strip_prefix(DEFINITIONS_PREFIX)
        .or_else(|| raw.strip_prefix(COMPONENTS_PREFIX))?;
    if token.is_empty() || token.contains('/') {
        return None;
    }
    let decoded = urlencoding::decode(token).ok()?;
    Some(decode_pointer_token(&decoded))
}

struct RefRewriter<'a> {
    root: &'a IndexMap<String, Schema>,
}

impl RefRewriter<'_> {
    fn rewrite(&self, schema: &Schema) -> Result<Schema, ResolveError> {
        let mut rewritten = schema.clone();

        if let Some(ref raw) = schema.ref_path {
            rewritten.canonical_ref = Some(self.canonicalize(raw)?);
        }

        let mut properties = IndexMap::with_capacity(schema.properties.len());
        for (name, prop) in &schema.properties {
            properties.insert(name.clone(), self.rewrite(prop)?);
        }
        rewritten.properties = properties;

        if let Some(ref items) = schema.items {
            rewritten.items = Some(Box::new(self.rewrite(items)?));
        }

        rewritten.all_of = self.rewrite_all(&schema.all_of)?;
        rewritten.one_of = self.rewrite_all(&schema.one_of)?;
        rewritten.any_of = self.rewrite_all(&schema.any_of)?;

        if let Some(AdditionalProperties::Schema(ref s)) = schema.additional_properties {
            rewritten.additional_properties =
                Some(AdditionalProperties::Schema(Box::new(self.rewrite(s)?)));
        }

        Ok(rewritten)
    }

    fn rewrite_all(&self, schemas: &[Schema]) -> Result<Vec<Schema>, ResolveError> {
        schemas.iter().map(|s| self.rewrite(s)).collect()
    }

    fn canonicalize(&self, raw: &str) -> Result<String, ResolveError> {
        canonical_path(raw)
            .filter(|path| self.root.contains_key(path))
            .ok_or_else(|| ResolveError::UnresolvedReference(raw.to_string()))
    }
}

fn decode_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entries: Vec<(&str, Schema)>) -> SchemaDocument {
        SchemaDocument::from_definitions(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn canonical_path_accepts_both_roots() {
        assert_eq!(canonical_path("#/definitions/User").as_deref(), Some("User"));
        assert_eq!(
            canonical_path("#/components/schemas/User").as_deref(),
            Some("User")
        );
    }

    #[test]
    fn canonical_path_decodes_escapes() {
        assert_eq!(
            canonical_path("#/definitions/a~1b~0c").as_deref(),
            Some("a/b~c")
        );
        assert_eq!(
            canonical_path("#/definitions/Pet%20Owner").as_deref(),
            Some("Pet Owner")
        );
    }

    #[test]
    fn canonical_path_rejects_malformed_escapes() {
        assert_eq!(canonical_path("#/definitions/Bad%FFName"), None);
        assert_eq!(
            canonical_path("#/definitions/%E2%82%AC").as_deref(),
            Some("\u{20ac}")
        );
    }

    #[test]
    fn canonical_path_rejects_foreign_refs() {
        assert_eq!(canonical_path("other.json#/definitions/User"), None);
        assert_eq!(canonical_path("#/definitions/"), None);
        assert_eq!(canonical_path("#/definitions/User/properties/id"), None);
        assert_eq!(canonical_path("User"), None);
    }

    #[test]
    fn rewrites_nested_references() {
        let mut user = Schema::typed("object");
        let mut teams = Schema::typed("array");
        teams.items = Some(Box::new(Schema::reference("#/definitions/Team")));
        user.properties.insert("teams".to_string(), teams);

        let resolved =
            rewrite_reference_paths(&doc(vec![("User", user), ("Team", Schema::typed("object"))]))
                .unwrap();

        let teams = &resolved.resolve("User").unwrap().properties["teams"];
        let items = teams.items.as_ref().unwrap();
        assert_eq!(items.canonical_ref.as_deref(), Some("Team"));
        assert_eq!(items.ref_path.as_deref(), Some("#/definitions/Team"));
    }

    #[test]
    fn rewrites_composition_and_map_values() {
        let mut admin = Schema::default();
        admin.all_of.push(Schema::reference("#/definitions/User"));
        admin.additional_properties = Some(AdditionalProperties::Schema(Box::new(
            Schema::reference("#/components/schemas/User"),
        )));

        let resolved =
            rewrite_reference_paths(&doc(vec![("User", Schema::typed("object")), ("Admin", admin)]))
                .unwrap();

        let admin = resolved.resolve("Admin").unwrap();
        assert_eq!(admin.all_of[0].reference_target(), Some("User"));
        match &admin.additional_properties {
            Some(AdditionalProperties::Schema(s)) => {
                assert_eq!(s.canonical_ref.as_deref(), Some("User"));
                assert_eq!(s.ref_path.as_deref(), Some("#/components/schemas/User"));
            }
            other => panic!("expected schema map value, got {other:?}"),
        }
    }

    #[test]
    fn missing_definitions_is_an_error() {
        let err = rewrite_reference_paths(&SchemaDocument::default()).unwrap_err();
        assert_eq!(err, ResolveError::MissingDefinitions);
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let mut user = Schema::typed("object");
        user.properties
            .insert("team".to_string(), Schema::reference("#/definitions/Team"));
        let err = rewrite_reference_paths(&doc(vec![("User", user)])).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedReference("#/definitions/Team".to_string())
        );
    }

    #[test]
    fn resolve_unknown_path_fails() {
        let resolved = rewrite_reference_paths(&doc(vec![])).unwrap();
        assert!(resolved.is_empty());
        assert!(resolved.resolve("Nope").is_err());
    }
}

use crate::ir::Primitive;
use crate::parse::schema::{AdditionalProperties, Schema};

/// The structural kind of one schema node.
///
/// Classification happens once per node, in fixed precedence order, so the
/// builder never has to re-inspect raw field presence.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    Enum(&'a [serde_json::Value]),
    Primitive(Vec<Primitive>),
    Array(Option<&'a Schema>),
    /// A record: explicit properties, or `type: object` without an
    /// `additionalProperties` override.
    Object,
    /// An open map; `None` means any value.
    OpenMap(Option<&'a Schema>),
    AllOf(&'a [Schema]),
    OneOf(&'a [Schema]),
    AnyOf(&'a [Schema]),
    Reference(&'a str),
    Unknown,
}

/// Classify a schema node. First match wins:
/// enum, primitive, array, object, open map, allOf, oneOf, anyOf, reference.
pub fn classify(schema: &Schema) -> NodeKind<'_> {
    if !schema.enum_values.is_empty() {
        return NodeKind::Enum(&schema.enum_values);
    }

    let is_array = schema.has_type("array");
    let is_object = schema.has_type("object");

    if !is_array && !is_object {
        let primitives = declared_primitives(schema);
        if !primitives.is_empty() {
            return NodeKind::Primitive(primitives);
        }
    }

    if is_array || (schema.schema_type.is_none() && schema.items.is_some()) {
        return NodeKind::Array(schema.items.as_deref());
    }

    let open_map = match &schema.additional_properties {
        Some(AdditionalProperties::Bool(true)) => Some(None),
        Some(AdditionalProperties::Schema(values)) => Some(Some(values.as_ref())),
        Some(AdditionalProperties::Bool(false)) | None => None,
    };

    if !schema.properties.is_empty() || (is_object && open_map.is_none()) {
        return NodeKind::Object;
    }

    if let Some(values) = open_map
        && (is_object || schema.schema_type.is_none())
    {
        return NodeKind::OpenMap(values);
    }

    if !schema.all_of.is_empty() {
        return NodeKind::AllOf(&schema.all_of);
    }
    if !schema.one_of.is_empty() {
        return NodeKind::OneOf(&schema.one_of);
    }
    if !schema.any_of.is_empty() {
        return NodeKind::AnyOf(&schema.any_of);
    }
    if let Some(path) = schema.reference_target() {
        return NodeKind::Reference(path);
    }

    NodeKind::Unknown
}

/// Whether a node becomes a named record (and therefore a declaration).
pub fn is_record_kind(schema: &Schema) -> bool {
    matches!(classify(schema), NodeKind::Object | NodeKind::AllOf(_))
}

/// Declared primitive types, deduplicated, in declaration order. Type names
/// missing from the primitive table are skipped.
fn declared_primitives(schema: &Schema) -> Vec<Primitive> {
    let Some(ref types) = schema.schema_type else {
        return Vec::new();
    };
    let mut primitives = Vec::new();
    for name in types.names() {
        match Primitive::from_type_name(name) {
            Some(p) if !primitives.contains(&p) => primitives.push(p),
            Some(_) => {}
            None => log::debug!("ignoring unknown type name {name:?}"),
        }
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::schema::TypeSet;

    fn from_yaml(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn enum_wins_over_type() {
        let s = from_yaml("type: string\nenum: [user, admin]");
        assert!(matches!(classify(&s), NodeKind::Enum(values) if values.len() == 2));
    }

    #[test]
    fn primitives() {
        assert_eq!(
            classify(&Schema::typed("dateTime")),
            NodeKind::Primitive(vec![Primitive::String])
        );
        assert_eq!(
            classify(&Schema::typed("float")),
            NodeKind::Primitive(vec![Primitive::Number])
        );
        let s = Schema {
            schema_type: Some(TypeSet::Multiple(vec![
                "string".to_string(),
                "null".to_string(),
                "password".to_string(),
            ])),
            ..Schema::default()
        };
        assert_eq!(
            classify(&s),
            NodeKind::Primitive(vec![Primitive::String, Primitive::Null])
        );
    }

    #[test]
    fn arrays() {
        let s = from_yaml("type: array\nitems:\n  type: string");
        assert!(matches!(classify(&s), NodeKind::Array(Some(_))));
        assert_eq!(classify(&Schema::typed("array")), NodeKind::Array(None));
        let implicit = from_yaml("items:\n  type: string");
        assert!(matches!(classify(&implicit), NodeKind::Array(Some(_))));
    }

    #[test]
    fn objects_and_maps() {
        assert_eq!(classify(&Schema::typed("object")), NodeKind::Object);
        assert_eq!(
            classify(&from_yaml("properties:\n  id:\n    type: string")),
            NodeKind::Object
        );
        assert_eq!(
            classify(&from_yaml("type: object\nadditionalProperties: false")),
            NodeKind::Object
        );
        assert_eq!(
            classify(&from_yaml("type: object\nadditionalProperties: true")),
            NodeKind::OpenMap(None)
        );
        assert!(matches!(
            classify(&from_yaml("type: object\nadditionalProperties:\n  type: integer")),
            NodeKind::OpenMap(Some(_))
        ));
        // Explicit properties keep the record even with a typed map.
        assert_eq!(
            classify(&from_yaml(
                "type: object\nproperties:\n  id:\n    type: string\nadditionalProperties:\n  type: integer"
            )),
            NodeKind::Object
        );
    }

    #[test]
    fn composition_and_references() {
        let all_of = from_yaml("allOf:\n  - $ref: '#/definitions/User'");
        assert!(matches!(classify(&all_of), NodeKind::AllOf(m) if m.len() == 1));
        let one_of = from_yaml("oneOf:\n  - type: string\n  - type: integer");
        assert!(matches!(classify(&one_of), NodeKind::OneOf(m) if m.len() == 2));
        let any_of = from_yaml("anyOf:\n  - type: string");
        assert!(matches!(classify(&any_of), NodeKind::AnyOf(_)));
        assert_eq!(
            classify(&Schema::reference("User")),
            NodeKind::Reference("User")
        );
    }

    #[test]
    fn unknown_nodes() {
        assert_eq!(classify(&Schema::default()), NodeKind::Unknown);
        assert_eq!(classify(&Schema::typed("file")), NodeKind::Unknown);
    }

    #[test]
    fn record_kinds() {
        assert!(is_record_kind(&Schema::typed("object")));
        assert!(is_record_kind(&from_yaml("allOf:\n  - type: object")));
        assert!(!is_record_kind(&Schema::typed("array")));
        assert!(!is_record_kind(&from_yaml("enum: [a]")));
    }
}

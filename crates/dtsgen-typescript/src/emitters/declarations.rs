use std::sync::Arc;

use dtsgen_core::config::Wrapper;
use dtsgen_core::ir::{PropertyShape, RecordShape, ShapeForest, ShapeKind, TypeShape};
use dtsgen_core::parse::schema::Schema;
use minijinja::{Environment, context};

use crate::type_mapper::type_ref_to_ts;

/// A property as it will be written into an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The name written before the colon, quoted when needed.
    pub name: String,
    /// The schema key the property came from.
    pub original_name: String,
    pub type_annotation: String,
    pub optional: bool,
    pub description: Option<String>,
}

/// Per-property hook. Receives the property's schema node and the draft
/// property; whatever it returns is emitted.
pub type PropertyMapper = Arc<dyn Fn(&Schema, Property) -> Property + Send + Sync>;

pub struct EmitOptions<'a> {
    pub wrapper: &'a Wrapper,
    pub banner: bool,
    pub property_mapper: Option<&'a PropertyMapper>,
}

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Emit the unformatted declaration text for every record in the forest.
///
/// The wrapper is left out when there is nothing to declare, so such a
/// forest renders as the banner alone.
pub fn emit_declarations(
    forest: &ShapeForest,
    options: &EmitOptions<'_>,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template(
        "declarations.ts.j2",
        include_str!("../../templates/declarations.ts.j2"),
    )?;
    let tmpl = env.get_template("declarations.ts.j2")?;

    let declarations: Vec<minijinja::Value> = forest
        .iter()
        .filter_map(|shape| match &shape.kind {
            ShapeKind::Record(record) => Some(record_to_ctx(shape, record, options)),
            _ => None,
        })
        .collect();
    log::debug!("emitting {} declarations", declarations.len());

    let wrapper = if declarations.is_empty() {
        None
    } else {
        options.wrapper.header()
    };

    tmpl.render(context! {
        banner => options.banner,
        wrapper => wrapper,
        declarations => declarations,
    })
}

fn record_to_ctx(shape: &TypeShape, record: &RecordShape, options: &EmitOptions<'_>) -> minijinja::Value {
    let properties: Vec<minijinja::Value> = record
        .properties
        .iter()
        .map(|p| {
            let property = map_property(p, options.property_mapper);
            context! {
                name => property.name,
                type_annotation => property.type_annotation,
                optional => property.optional,
                description => description_lines(property.description.as_deref()),
            }
        })
        .collect();

    context! {
        name => shape.name.clone(),
        description => description_lines(shape.description.as_deref()),
        extends => record.extends.clone(),
        properties => properties,
        index_signature => record.index_signature.as_ref().map(type_ref_to_ts),
    }
}

fn map_property(shape: &PropertyShape, mapper: Option<&PropertyMapper>) -> Property {
    let draft = Property {
        name: shape.identifier_name.clone(),
        original_name: shape.original_name.clone(),
        type_annotation: type_ref_to_ts(&shape.type_ref),
        optional: shape.optional,
        description: shape.description.clone(),
    };
    match mapper {
        Some(mapper) => mapper(&shape.schema, draft),
        None => draft,
    }
}

fn description_lines(description: Option<&str>) -> Vec<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.lines().map(|l| l.trim_end().to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtsgen_core::parse;
    use dtsgen_core::transform;

    fn emit(yaml: &str, wrapper: &Wrapper, banner: bool) -> String {
        let doc = parse::from_yaml(yaml).unwrap();
        let forest = transform::transform(&doc).unwrap();
        emit_declarations(
            &forest,
            &EmitOptions {
                wrapper,
                banner,
                property_mapper: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_emit_interface() {
        let out = emit(
            r#"
definitions:
  User:
    type: object
    required: [id]
    properties:
      id: { type: integer }
      email: { type: string }
"#,
            &Wrapper::None,
            false,
        );
        assert!(out.contains("export interface User {"));
        assert!(out.contains("id: number;"));
        assert!(out.contains("email?: string;"));
    }

    #[test]
    fn test_emit_descriptions_escape_comment_close() {
        let out = emit(
            r#"
definitions:
  User:
    description: "A user. */ not the end"
    properties:
      email:
        type: string
        description: |
          Primary address.
          Must be verified.
"#,
            &Wrapper::None,
            false,
        );
        assert!(out.contains(" * A user. *\\/ not the end"));
        assert!(out.contains(" * Primary address.\n * Must be verified.\n"));
    }

    #[test]
    fn test_emit_extends_and_index_signature() {
        let out = emit(
            r##"
definitions:
  User:
    properties:
      email: { type: string }
  Admin:
    allOf:
      - $ref: '#/definitions/User'
      - properties:
          rbac: { type: string }
        additionalProperties: { type: boolean }
"##,
            &Wrapper::None,
            false,
        );
        assert!(out.contains("export interface Admin extends User {"));
        assert!(out.contains("[key: string]: boolean;"));
    }

    #[test]
    fn test_emit_nothing_skips_wrapper() {
        let out = emit("definitions: {}\n", &Wrapper::default(), false);
        assert!(out.trim().is_empty());

        let out = emit("definitions: {}\n", &Wrapper::default(), true);
        assert!(out.contains("auto-generated"));
        assert!(!out.contains("declare namespace"));
    }

    #[test]
    fn test_emit_wrapper_header() {
        let out = emit(
            "definitions:\n  User:\n    type: object\n",
            &Wrapper::Module("api".to_string()),
            false,
        );
        assert!(out.starts_with("declare module 'api' {\n"));
        assert!(out.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escape_jsdoc() {
        assert_eq!(escape_jsdoc("a */ b".to_string()), "a *\\/ b");
        assert_eq!(escape_jsdoc("plain".to_string()), "plain");
    }
}

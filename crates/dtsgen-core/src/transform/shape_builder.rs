use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::{ResolveError, TransformError};
use crate::ir::{
    Literal, PropertyShape, RecordShape, ShapeForest, ShapeKind, TypeRef, TypeShape,
};
use crate::parse::ref_resolve::ResolvedDocument;
use crate::parse::schema::{AdditionalProperties, Schema};

use super::classify::{NodeKind, classify, is_record_kind};
use super::name_normalizer::{to_identifier, to_pascal_segment, to_type_name, unique_name};

/// Options controlling how names are derived.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Lower-camel-case property names and PascalCase type names.
    pub camel_case: bool,
}

/// Build the forest of named shapes for every definition in the document.
///
/// Record definitions become declarations in input order, each followed by
/// the anonymous records promoted out of it. Every other definition is
/// inlined at the places that reference it.
pub fn build_forest(
    document: &ResolvedDocument,
    options: &TransformOptions,
) -> Result<ShapeForest, TransformError> {
    let mut builder = ShapeBuilder::new(document, options);
    for (path, schema) in document.definitions() {
        builder.build_definition(path, schema)?;
    }
    Ok(builder.forest)
}

struct ShapeBuilder<'a> {
    document: &'a ResolvedDocument,
    options: &'a TransformOptions,
    /// Canonical path → type name.
    type_names: IndexMap<String, String>,
    used_names: HashSet<String>,
    /// Inline types of non-record definitions that were already built.
    inline_refs: HashMap<String, TypeRef>,
    in_progress: HashSet<String>,
    /// Records promoted while building the current definition.
    pending: Vec<TypeShape>,
    forest: ShapeForest,
}

impl<'a> ShapeBuilder<'a> {
    fn new(document: &'a ResolvedDocument, options: &'a TransformOptions) -> Self {
        let mut used_names = HashSet::new();
        let mut type_names = IndexMap::with_capacity(document.len());

        // Declarations claim their names before any anonymous type is named,
        // so reference sites and declarations always agree.
        for (path, schema) in document.definitions() {
            let base = to_type_name(path, options.camel_case);
            let name = if is_record_kind(schema) {
                let name = unique_name(&base, &mut used_names);
                if name != base {
                    log::warn!("definition {path:?} renamed to {name} to avoid a collision");
                }
                name
            } else {
                base
            };
            type_names.insert(path.clone(), name);
        }

        Self {
            document,
            options,
            type_names,
            used_names,
            inline_refs: HashMap::new(),
            in_progress: HashSet::new(),
            pending: Vec::new(),
            forest: ShapeForest::new(),
        }
    }

    fn build_definition(&mut self, path: &str, schema: &Schema) -> Result<(), TransformError> {
        let name = self.type_name(path)?;
        log::debug!("building definition {path:?} as {name}");

        if is_record_kind(schema) {
            let record = self.build_record(schema, &name)?;
            self.forest.insert(TypeShape {
                name,
                description: schema.description.clone(),
                kind: ShapeKind::Record(record),
            });
        } else {
            self.reference_type(path)?;
        }

        for shape in self.pending.drain(..) {
            self.forest.insert(shape);
        }
        Ok(())
    }

    fn type_name(&self, path: &str) -> Result<String, ResolveError> {
        self.type_names
            .get(path)
            .cloned()
            .ok_or_else(|| ResolveError::UnresolvedReference(path.to_string()))
    }

    /// The type used at a site that references `path`.
    ///
    /// Records are referenced by name without recursing. Other definitions
    /// are built once and inlined; re-entering one that is still being built
    /// yields `any`.
    fn reference_type(&mut self, path: &str) -> Result<TypeRef, TransformError> {
        let document = self.document;
        let schema = document.resolve(path)?;
        let name = self.type_name(path)?;

        if is_record_kind(schema) {
            return Ok(TypeRef::Named(name));
        }
        if let Some(existing) = self.inline_refs.get(path) {
            return Ok(existing.clone());
        }
        if !self.in_progress.insert(path.to_string()) {
            log::warn!("definition {path:?} references itself without an object in between; using any");
            return Ok(TypeRef::Any);
        }

        let kind = self.build_kind(schema, &name);
        self.in_progress.remove(path);
        let kind = kind?;

        let type_ref = kind.to_type_ref(&name);
        self.inline_refs.insert(path.to_string(), type_ref.clone());
        self.forest.insert_inlined(
            path,
            TypeShape {
                name,
                description: schema.description.clone(),
                kind,
            },
        );
        Ok(type_ref)
    }

    fn build_kind(&mut self, schema: &Schema, context: &str) -> Result<ShapeKind, TransformError> {
        Ok(match self.build_type(schema, context)? {
            TypeRef::Array(items) => ShapeKind::Array { items: *items },
            TypeRef::Union(members) => ShapeKind::Union { members },
            TypeRef::Map(values) => ShapeKind::Map { values: *values },
            target => ShapeKind::Alias { target },
        })
    }

    /// Build the type of a node at a use site. `context` names the node if it
    /// turns out to be an anonymous record.
    fn build_type(&mut self, schema: &Schema, context: &str) -> Result<TypeRef, TransformError> {
        match classify(schema) {
            NodeKind::Enum(values) => Ok(enum_type(values)),
            NodeKind::Primitive(primitives) => Ok(if primitives.len() == 1 {
                TypeRef::Primitive(primitives[0])
            } else {
                TypeRef::Union(primitives.into_iter().map(TypeRef::Primitive).collect())
            }),
            NodeKind::Array(items) => {
                let element = match items {
                    Some(items) => self.build_type(items, context)?,
                    None => TypeRef::Any,
                };
                Ok(TypeRef::Array(Box::new(element)))
            }
            NodeKind::Object
                if schema.properties.is_empty()
                    && schema.all_of.is_empty()
                    && !is_closed(schema) =>
            {
                Ok(TypeRef::Map(Box::new(TypeRef::Any)))
            }
            NodeKind::Object | NodeKind::AllOf(_) => {
                let name = unique_name(context, &mut self.used_names);
                self.promote(schema, &name)?;
                Ok(TypeRef::Named(name))
            }
            NodeKind::OpenMap(values) => {
                let value = match values {
                    Some(values) => self.build_type(values, &format!("{context}Value"))?,
                    None => TypeRef::Any,
                };
                Ok(TypeRef::Map(Box::new(value)))
            }
            NodeKind::OneOf(members) | NodeKind::AnyOf(members) => {
                let mut variants = Vec::with_capacity(members.len());
                for (i, member) in members.iter().enumerate() {
                    variants.push(self.build_type(member, &format!("{context}Variant{}", i + 1))?);
                }
                Ok(TypeRef::Union(variants))
            }
            NodeKind::Reference(path) => self.reference_type(path),
            NodeKind::Unknown => Ok(TypeRef::Any),
        }
    }

    /// Turn an anonymous record into a named shape. The shape is queued ahead
    /// of any records promoted out of its own properties.
    fn promote(&mut self, schema: &Schema, name: &str) -> Result<(), TransformError> {
        let position = self.pending.len();
        let record = self.build_record(schema, name)?;
        self.pending.insert(
            position,
            TypeShape {
                name: name.to_string(),
                description: schema.description.clone(),
                kind: ShapeKind::Record(record),
            },
        );
        Ok(())
    }

    fn build_record(&mut self, schema: &Schema, name: &str) -> Result<RecordShape, TransformError> {
        let mut record = RecordShape::default();
        let mut seen = HashSet::new();

        if !schema.all_of.is_empty() {
            if !self.composable(&schema.all_of)? {
                log::warn!(
                    "allOf in {name} mixes members that cannot be extended or merged; using a placeholder"
                );
                return Ok(RecordShape::placeholder());
            }
            self.compose(&schema.all_of, name, &mut record, &mut seen)?;
        }

        self.add_properties(schema, name, &mut record, &mut seen)?;
        if let Some(index) = self.index_signature(schema, name)? {
            record.index_signature = Some(index);
        }

        // `required` anywhere in the composition applies to the merged record.
        let mut required = HashSet::new();
        collect_required(schema, &mut required);
        for property in &mut record.properties {
            if required.contains(property.original_name.as_str()) {
                property.optional = false;
            }
        }
        Ok(record)
    }

    /// Whether every allOf member is a reference to a record definition, an
    /// inline object, or a member that adds no structure.
    fn composable(&self, members: &[Schema]) -> Result<bool, TransformError> {
        for member in members {
            let ok = match classify(member) {
                NodeKind::Reference(path) => is_record_kind(self.document.resolve(path)?),
                NodeKind::Object => member.all_of.is_empty() || self.composable(&member.all_of)?,
                NodeKind::AllOf(inner) => self.composable(inner)?,
                NodeKind::Unknown => member.schema_type.is_none(),
                _ => false,
            };
            if !ok {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compose(
        &mut self,
        members: &[Schema],
        name: &str,
        record: &mut RecordShape,
        seen: &mut HashSet<String>,
    ) -> Result<(), TransformError> {
        for member in members {
            match classify(member) {
                NodeKind::Reference(path) => {
                    let base = self.type_name(path)?;
                    if base == name {
                        log::warn!("{name} lists itself in allOf; skipping");
                    } else if !record.extends.contains(&base) {
                        record.extends.push(base);
                    }
                }
                NodeKind::Object | NodeKind::AllOf(_) => {
                    if !member.all_of.is_empty() {
                        self.compose(&member.all_of, name, record, seen)?;
                    }
                    self.add_properties(member, name, record, seen)?;
                    if record.index_signature.is_none() {
                        record.index_signature = self.index_signature(member, name)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn add_properties(
        &mut self,
        schema: &Schema,
        name: &str,
        record: &mut RecordShape,
        seen: &mut HashSet<String>,
    ) -> Result<(), TransformError> {
        for (key, prop) in &schema.properties {
            let context = format!("{name}{}", to_pascal_segment(key));
            let type_ref = self.build_type(prop, &context)?;
            record.properties.push(PropertyShape {
                original_name: key.clone(),
                identifier_name: self.property_identifier(key, name, seen),
                type_ref,
                optional: !schema.required.contains(key),
                description: prop.description.clone(),
                schema: prop.clone(),
            });
        }
        Ok(())
    }

    fn index_signature(
        &mut self,
        schema: &Schema,
        name: &str,
    ) -> Result<Option<TypeRef>, TransformError> {
        Ok(match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => Some(TypeRef::Any),
            Some(AdditionalProperties::Schema(values)) => {
                Some(self.build_type(values, &format!("{name}Value"))?)
            }
            Some(AdditionalProperties::Bool(false)) | None => None,
        })
    }

    fn property_identifier(&self, key: &str, owner: &str, seen: &mut HashSet<String>) -> String {
        let identifier = to_identifier(key, self.options.camel_case);
        if seen.insert(identifier.clone()) {
            return identifier;
        }
        log::warn!("property {key:?} of {owner} collides with another property name");
        let (open, inner, close) = match identifier
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
        {
            Some(inner) => ("'", inner, "'"),
            None => ("", identifier.as_str(), ""),
        };
        let mut i = 2;
        loop {
            let candidate = format!("{open}{inner}{i}{close}");
            if seen.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }
}

/// `additionalProperties: false`
fn is_closed(schema: &Schema) -> bool {
    matches!(
        schema.additional_properties,
        Some(AdditionalProperties::Bool(false))
    )
}

/// Required names of a node and of its inline allOf members, recursively.
fn collect_required<'s>(schema: &'s Schema, required: &mut HashSet<&'s str>) {
    required.extend(schema.required.iter().map(String::as_str));
    for member in &schema.all_of {
        if !matches!(classify(member), NodeKind::Reference(_)) {
            collect_required(member, required);
        }
    }
}

/// Literal union for enum values, duplicates removed, declaration order kept.
fn enum_type(values: &[serde_json::Value]) -> TypeRef {
    let mut members: Vec<TypeRef> = Vec::with_capacity(values.len());
    for value in values {
        let literal = match value {
            serde_json::Value::String(s) => Literal::String(s.clone()),
            serde_json::Value::Number(n) => Literal::Number(n.clone()),
            serde_json::Value::Bool(b) => Literal::Boolean(*b),
            serde_json::Value::Null => Literal::Null,
            other => {
                log::warn!("skipping enum value {other} that has no literal type");
                continue;
            }
        };
        let member = TypeRef::Literal(literal);
        if !members.contains(&member) {
            members.push(member);
        }
    }
    match members.len() {
        0 => TypeRef::Any,
        1 => members.remove(0),
        _ => TypeRef::Union(members),
    }
}

use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::schema::Schema;

/// The ordered, name-indexed set of declarations produced by one transform.
///
/// Shapes refer to each other only by name, so cyclic inputs are represented
/// without cyclic ownership.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShapeForest {
    shapes: IndexMap<String, TypeShape>,
    /// Definitions that produce no declaration, keyed by canonical path.
    inlined: IndexMap<String, TypeShape>,
}

impl ShapeForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape, keeping first-insertion order.
    pub fn insert(&mut self, shape: TypeShape) {
        self.shapes.insert(shape.name.clone(), shape);
    }

    /// Record a definition that is inlined at its use sites.
    pub fn insert_inlined(&mut self, path: &str, shape: TypeShape) {
        self.inlined.insert(path.to_string(), shape);
    }

    pub fn inlined(&self) -> impl Iterator<Item = (&str, &TypeShape)> {
        self.inlined.iter().map(|(path, shape)| (path.as_str(), shape))
    }

    pub fn get(&self, name: &str) -> Option<&TypeShape> {
        self.shapes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeShape> {
        self.shapes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// A named, resolved type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeShape {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: ShapeKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeKind {
    Alias { target: TypeRef },
    Array { items: TypeRef },
    Union { members: Vec<TypeRef> },
    Record(RecordShape),
    Map { values: TypeRef },
}

impl ShapeKind {
    /// The inline type for a non-record shape. Records are referenced by name.
    pub fn to_type_ref(&self, name: &str) -> TypeRef {
        match self {
            ShapeKind::Alias { target } => target.clone(),
            ShapeKind::Array { items } => TypeRef::Array(Box::new(items.clone())),
            ShapeKind::Union { members } => TypeRef::Union(members.clone()),
            ShapeKind::Record(_) => TypeRef::Named(name.to_string()),
            ShapeKind::Map { values } => TypeRef::Map(Box::new(values.clone())),
        }
    }
}

/// An interface body: optional base interfaces, properties in input order and
/// an optional `[key: string]` index signature.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordShape {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    pub properties: Vec<PropertyShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<TypeRef>,
}

impl RecordShape {
    /// A record with no known structure that accepts any keys.
    pub fn placeholder() -> Self {
        Self {
            index_signature: Some(TypeRef::Any),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyShape {
    /// The schema key, preserved verbatim.
    pub original_name: String,
    /// The normalized property name, quoted when not a bare identifier.
    pub identifier_name: String,
    pub type_ref: TypeRef,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The property's schema node, handed to property mappers.
    #[serde(skip)]
    pub schema: Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
}

impl Primitive {
    /// Look up a declared type name in the primitive table.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" | "password" | "date" | "dateTime" | "date-time" | "byte" | "binary"
            | "uuid" | "email" | "uri" => Some(Primitive::String),
            "integer" | "number" | "int32" | "int64" | "long" | "float" | "double" => {
                Some(Primitive::Number)
            }
            "boolean" => Some(Primitive::Boolean),
            "null" => Some(Primitive::Null),
            _ => None,
        }
    }
}

/// A literal enum member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Null,
}

/// A type at a use site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(Primitive),
    Literal(Literal),
    /// Reference to a declaration in the forest.
    Named(String),
    Array(Box<TypeRef>),
    Union(Vec<TypeRef>),
    /// `{ [key: string]: T }`
    Map(Box<TypeRef>),
    Any,
}

impl TypeRef {
    /// Number of array levels wrapped around the element type.
    pub fn array_depth(&self) -> usize {
        match self {
            TypeRef::Array(inner) => 1 + inner.array_depth(),
            _ => 0,
        }
    }
}

pub mod classify;
pub mod name_normalizer;
pub mod shape_builder;

pub use shape_builder::{TransformOptions, build_forest};

use crate::error::TransformError;
use crate::ir::ShapeForest;
use crate::parse::document::SchemaDocument;
use crate::parse::ref_resolve::rewrite_reference_paths;

/// Transform a schema document into its forest of named shapes.
pub fn transform(document: &SchemaDocument) -> Result<ShapeForest, TransformError> {
    transform_with_options(document, &TransformOptions::default())
}

/// Transform with explicit naming options.
pub fn transform_with_options(
    document: &SchemaDocument,
    options: &TransformOptions,
) -> Result<ShapeForest, TransformError> {
    // Phase 1: Canonicalize every $ref
    let resolved = rewrite_reference_paths(document)?;

    // Phase 2: Build shapes per definition
    build_forest(&resolved, options)
}

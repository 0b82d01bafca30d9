use std::fmt;

use dtsgen_core::CodeGenerator;
use dtsgen_core::config::Wrapper;
use dtsgen_core::error::{ResolveError, TransformError};
use dtsgen_core::parse::document::SchemaDocument;
use dtsgen_core::transform::{self, TransformOptions};
use thiserror::Error;

use crate::emitters::declarations::{EmitOptions, PropertyMapper, emit_declarations};
use crate::formatter::{DeclarationFormatter, FormatError, Formatter};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("formatting failed: {0}")]
    Format(#[from] FormatError),
}

impl From<TransformError> for GenerateError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Resolve(e) => GenerateError::Resolve(e),
        }
    }
}

/// Options for one generation call.
#[derive(Clone)]
pub struct GenerateOptions {
    /// camelCase property names and PascalCase type names.
    pub camel_case: bool,
    pub wrapper: Wrapper,
    /// Prepend the "auto-generated" banner.
    pub warning: bool,
    pub property_mapper: Option<PropertyMapper>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            camel_case: false,
            wrapper: Wrapper::default(),
            warning: true,
            property_mapper: None,
        }
    }
}

impl fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("camel_case", &self.camel_case)
            .field("wrapper", &self.wrapper)
            .field("warning", &self.warning)
            .field("property_mapper", &self.property_mapper.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Generate a TypeScript declaration file, formatted with [`DeclarationFormatter`].
pub fn generate(
    document: &SchemaDocument,
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    generate_with_formatter(document, options, &DeclarationFormatter)
}

/// Generate a TypeScript declaration file using the given formatter.
pub fn generate_with_formatter(
    document: &SchemaDocument,
    options: &GenerateOptions,
    formatter: &dyn Formatter,
) -> Result<String, GenerateError> {
    let transform_options = TransformOptions {
        camel_case: options.camel_case,
    };
    let forest = transform::transform_with_options(document, &transform_options)?;
    log::debug!("built {} declarations", forest.len());

    let source = emit_declarations(
        &forest,
        &EmitOptions {
            wrapper: &options.wrapper,
            banner: options.warning,
            property_mapper: options.property_mapper.as_ref(),
        },
    )?;
    Ok(formatter.format(&source)?)
}

/// TypeScript declaration generator.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptGenerator<F = DeclarationFormatter> {
    formatter: F,
}

impl<F: Formatter> TypeScriptGenerator<F> {
    pub fn with_formatter(formatter: F) -> Self {
        Self { formatter }
    }
}

impl<F: Formatter> CodeGenerator for TypeScriptGenerator<F> {
    type Options = GenerateOptions;
    type Error = GenerateError;

    fn generate(
        &self,
        document: &SchemaDocument,
        options: &Self::Options,
    ) -> Result<String, Self::Error> {
        generate_with_formatter(document, options, &self.formatter)
    }
}

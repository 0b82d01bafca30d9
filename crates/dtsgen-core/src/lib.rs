pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use parse::document::SchemaDocument;

/// Trait for generators that turn a schema document into declaration text.
pub trait CodeGenerator {
    type Options;
    type Error: std::error::Error;
    fn generate(
        &self,
        document: &SchemaDocument,
        options: &Self::Options,
    ) -> Result<String, Self::Error>;
}

pub mod emitters;
pub mod formatter;
pub mod generator;
pub mod type_mapper;

pub use emitters::declarations::{Property, PropertyMapper};
pub use formatter::{DeclarationFormatter, FormatError, Formatter};
pub use generator::{
    GenerateError, GenerateOptions, TypeScriptGenerator, generate, generate_with_formatter,
};

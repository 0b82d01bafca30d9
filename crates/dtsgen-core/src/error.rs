use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("document has no definitions")]
    MissingDefinitions,

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

/// Top-level project configuration loaded from `.dtsgen.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DtsgenConfig {
    pub input: String,
    pub output: String,
    pub camel_case: bool,
    pub wrapper: Wrapper,
    pub warning: bool,
}

impl Default for DtsgenConfig {
    fn default() -> Self {
        Self {
            input: "swagger.yaml".to_string(),
            output: "types.d.ts".to_string(),
            camel_case: false,
            wrapper: Wrapper::default(),
            warning: true,
        }
    }
}

/// Name used by the namespace and module wrappers unless one is given.
pub const DEFAULT_WRAPPER_NAME: &str = "OpenAPI2";

/// The block enclosing all emitted declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// `declare namespace <name> { … }`
    Namespace(String),
    /// `declare module '<name>' { … }`
    Module(String),
    /// A verbatim block header, e.g. `export namespace Api`.
    Custom(String),
    None,
}

impl Default for Wrapper {
    fn default() -> Self {
        Wrapper::Namespace(DEFAULT_WRAPPER_NAME.to_string())
    }
}

impl Wrapper {
    /// Interpret a wrapper setting: `namespace` and `module` select the
    /// default-named wrappers, `none`/`false`/empty disable wrapping, and any
    /// other text is used as the block header.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "namespace" => Wrapper::Namespace(DEFAULT_WRAPPER_NAME.to_string()),
            "module" => Wrapper::Module(DEFAULT_WRAPPER_NAME.to_string()),
            "" | "none" | "false" => Wrapper::None,
            other => Wrapper::Custom(other.to_string()),
        }
    }

    /// The text preceding the opening brace, if the output is wrapped.
    pub fn header(&self) -> Option<String> {
        match self {
            Wrapper::Namespace(name) => Some(format!("declare namespace {name}")),
            Wrapper::Module(name) => Some(format!("declare module '{name}'")),
            Wrapper::Custom(header) => Some(header.clone()),
            Wrapper::None => None,
        }
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.header() {
            Some(header) => write!(f, "{header}"),
            None => write!(f, "none"),
        }
    }
}

impl<'de> Deserialize<'de> for Wrapper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Enabled(bool),
            Setting(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Enabled(true) => Wrapper::default(),
            Raw::Enabled(false) => Wrapper::None,
            Raw::Setting(value) => Wrapper::parse(&value),
        })
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".dtsgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<DtsgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: DtsgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# dtsgen configuration
input: swagger.yaml
output: types.d.ts

camel_case: false     # camelCase property names and PascalCase type names
wrapper: namespace    # namespace | module | false | any block header, e.g. "export namespace Api"
warning: true         # prepend the "auto-generated" banner
"#
}

//! Generator configuration (`gozer.toml`).

use std::path::Path;

use gozer_ir::OperationKind;
use serde::Deserialize;

use crate::{Error, Result, SourceContext};

/// Name of the optional configuration file in the spec directory.
pub const CONFIG_FILE_NAME: &str = "gozer.toml";

/// Root of `gozer.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GozerToml {
    #[serde(default)]
    pub generate: GenConfig,
}

/// Options that shape IR construction and emission.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// One of `snake`, `camel`, `lower_camel`, `unchanged`; checked by the naming resolver.
    pub naming_format: String,
    /// Rewrite existing scaffolded files in CRUD mode.
    pub overwrite: bool,
    pub use_casbin: bool,
    pub use_i18n: bool,
    pub use_uuid: bool,
    /// Translate handler errors through the service context translator.
    pub trans_err: bool,
    /// Maximum number of string columns promoted to list filters.
    pub search_key_num: usize,
    /// Go module path; read from `go.mod` when absent.
    pub module_path: Option<String>,
    /// Service-context field holding the RPC client, e.g. `CoreRpc`.
    pub rpc_name: Option<String>,
    /// Go package of the RPC client, e.g. `coreclient`.
    pub rpc_package: Option<String>,
    /// Import path of the RPC client package; defaults to `{module_path}/rpc/{rpc_package}`.
    pub rpc_import: Option<String>,
    /// Package declared in generated proto descriptors.
    pub proto_package: Option<String>,
    pub model_package: String,
    /// Normalize spec files in place (with a backup) before generating.
    pub format_spec: bool,
    /// Classification rules tried before the built-in ones.
    pub classify: Vec<ClassifyRule>,
}

/// A `[[generate.classify]]` entry.
///
/// ```toml
/// [[generate.classify]]
/// contains = ["export"]
/// operation = "getList"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifyRule {
    /// Substrings that must all occur in the logic identifier, ignoring case.
    pub contains: Vec<String>,
    pub operation: OperationKind,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            naming_format: "snake".to_string(),
            overwrite: false,
            use_casbin: false,
            use_i18n: false,
            use_uuid: false,
            trans_err: false,
            search_key_num: 3,
            module_path: None,
            rpc_name: None,
            rpc_package: None,
            rpc_import: None,
            proto_package: None,
            model_package: "model".to_string(),
            format_spec: true,
            classify: Vec::new(),
        }
    }
}

impl GozerToml {
    /// Load `gozer.toml`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        toml::from_str(content).map_err(|e| ctx.parse_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.naming_format, "snake");
        assert_eq!(config.search_key_num, 3);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml = GozerToml::from_str_with_filename(
            r#"
[generate]
naming_format = "lower_camel"
overwrite = true
rpc_name = "CoreRpc"
"#,
            "gozer.toml",
        )
        .unwrap();
        assert_eq!(toml.generate.naming_format, "lower_camel");
        assert!(toml.generate.overwrite);
        assert_eq!(toml.generate.rpc_name.as_deref(), Some("CoreRpc"));
        assert_eq!(toml.generate.model_package, "model");
    }

    #[test]
    fn test_classify_rules() {
        let toml = GozerToml::from_str_with_filename(
            r#"
[[generate.classify]]
contains = ["export", "user"]
operation = "getById"
"#,
            "gozer.toml",
        )
        .unwrap();
        assert_eq!(
            toml.generate.classify,
            [ClassifyRule {
                contains: vec!["export".into(), "user".into()],
                operation: OperationKind::GetById,
            }]
        );

        let err = GozerToml::from_str_with_filename(
            "[[generate.classify]]\ncontains = [\"x\"]\noperation = \"purge\"\n",
            "gozer.toml",
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let toml = GozerToml::load_or_default(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(toml.generate.format_spec);
    }
}

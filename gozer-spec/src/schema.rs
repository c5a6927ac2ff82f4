//! Schema config: the table and column metadata that drives CRUD mode.

use std::path::Path;

use gozer_core::to_pascal_case;
use serde::Deserialize;

use crate::{Error, Result, SourceContext};

/// Tables to scaffold, as resolved from a live database or written by hand.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub tables: Vec<SchemaTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaTable {
    pub table_name: String,
    pub struct_name: Option<String>,
    pub package_name: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl SchemaTable {
    /// Exported model name; defaults to the table name in PascalCase.
    pub fn struct_name(&self) -> String {
        self.struct_name
            .clone()
            .unwrap_or_else(|| to_pascal_case(&self.table_name))
    }

    /// Go package of the table's logic; defaults to the lowercased table name without separators.
    pub fn package_name(&self) -> String {
        self.package_name.clone().unwrap_or_else(|| {
            self.table_name
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub native_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// The database reports this column as a UUID even if its type name does not say so.
    #[serde(default, rename = "uuid")]
    pub uuid_type: bool,
    pub comment: Option<String>,
    #[serde(rename = "default")]
    pub default_value: Option<String>,
}

impl SchemaConfig {
    /// Parse a `.json` or `.toml` schema config.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content, &filename),
            Some("toml") => Self::from_toml_str(&content, &filename),
            _ => Err(Box::new(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })),
        }
    }

    pub fn from_json_str(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let config: Self = serde_json::from_str(content).map_err(|e| ctx.json_error(e))?;
        config.validate(&ctx)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let config: Self = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        config.validate(&ctx)?;
        Ok(config)
    }
}

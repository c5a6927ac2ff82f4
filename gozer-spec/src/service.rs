//! Route-spec input model.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::{Error, Result, SourceContext};

/// Annotation keys recognized on groups and routes.
pub mod annotation {
    pub const GROUP: &str = "group";
    pub const JWT: &str = "jwt";
    pub const JWT_TRANSITION: &str = "jwtTransition";
    pub const SIGNATURE: &str = "signature";
    pub const TIMEOUT: &str = "timeout";
    pub const MAX_BYTES: &str = "maxBytes";
    pub const MIDDLEWARE: &str = "middleware";
    pub const PREFIX: &str = "prefix";
}

/// Annotation key/value pairs in declaration order.
pub type Annotations = IndexMap<String, String>;

/// A service specification file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub service: ServiceMeta,

    #[serde(default)]
    pub types: Vec<TypeDef>,

    #[serde(default)]
    pub groups: Vec<RouteGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceMeta {
    pub name: Option<String>,
}

/// A declared data-transfer type.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    /// Empty for inline (embedded) members.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Raw struct tag, including the backquotes.
    pub tag: Option<String>,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub inline: bool,
}

/// Routes sharing one set of annotations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteGroup {
    #[serde(default, deserialize_with = "deserialize_annotations")]
    pub annotations: Annotations,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteGroup {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub method: String,
    pub path: String,
    pub handler: String,
    pub request: Option<String>,
    pub response: Option<String>,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_annotations")]
    pub annotations: Annotations,
}

impl Route {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

/// Accept any scalar annotation value and keep its textual form.
fn deserialize_annotations<'de, D>(deserializer: D) -> std::result::Result<Annotations, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    let raw: IndexMap<String, Scalar> = IndexMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Scalar::Str(s) => s,
                Scalar::Bool(b) => b.to_string(),
                Scalar::Int(i) => i.to_string(),
                Scalar::Float(f) => f.to_string(),
            };
            (key, value)
        })
        .collect())
}

impl ServiceSpec {
    /// Parse and validate a spec file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse and validate a spec from a string with a filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let spec: Self = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        spec.validate(&ctx)?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
[service]
name = "core-api"

[[types]]
name = "UserInfo"
fields = [
    { name = "Id", type = "*string", tag = '`json:"id,optional"`' },
    { name = "Username", type = "string" },
]

[[groups]]
annotations = { group = "user", jwt = "Auth", signature = true, timeout = 3 }

[[groups.routes]]
method = "post"
path = "/user/create"
handler = "createUser"
request = "UserInfo"
response = "BaseMsgResp"
"#;

    #[test]
    fn test_parse_spec() {
        let spec = ServiceSpec::from_str_with_filename(SPEC, "user.toml").unwrap();
        assert_eq!(spec.service.name.as_deref(), Some("core-api"));
        assert_eq!(spec.types[0].fields.len(), 2);
        assert_eq!(spec.groups[0].routes[0].handler, "createUser");
    }

    #[test]
    fn test_scalar_annotations_become_strings() {
        let spec = ServiceSpec::from_str_with_filename(SPEC, "user.toml").unwrap();
        let group = &spec.groups[0];
        assert_eq!(group.annotation(annotation::SIGNATURE), Some("true"));
        assert_eq!(group.annotation(annotation::TIMEOUT), Some("3"));
        let keys: Vec<_> = group.annotations.keys().collect();
        assert_eq!(keys, ["group", "jwt", "signature", "timeout"]);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ServiceSpec::from_str_with_filename("[[groups]\n", "bad.toml").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}

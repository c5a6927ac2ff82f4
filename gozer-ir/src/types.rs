//! Fundamental IR value types.

use serde::{Deserialize, Serialize};

/// HTTP verbs accepted in route declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
}

impl HttpMethod {
    /// Parse a method name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let method = match s.to_ascii_lowercase().as_str() {
            "get" => Self::Get,
            "head" => Self::Head,
            "post" => Self::Post,
            "put" => Self::Put,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "connect" => Self::Connect,
            "options" => Self::Options,
            "trace" => Self::Trace,
            _ => return None,
        };
        Some(method)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Connect => "connect",
            Self::Options => "options",
            Self::Trace => "trace",
        }
    }

    /// The `net/http` constant naming this method.
    pub fn go_constant(&self) -> &'static str {
        match self {
            Self::Get => "http.MethodGet",
            Self::Head => "http.MethodHead",
            Self::Post => "http.MethodPost",
            Self::Put => "http.MethodPut",
            Self::Patch => "http.MethodPatch",
            Self::Delete => "http.MethodDelete",
            Self::Connect => "http.MethodConnect",
            Self::Options => "http.MethodOptions",
            Self::Trace => "http.MethodTrace",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical CRUD operation a logic routine performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Create,
    Delete,
    Update,
    GetById,
    GetList,
    Custom,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::GetById => "getById",
            Self::GetList => "getList",
            Self::Custom => "custom",
        }
    }
}

/// Scalar types shared by the native and wire type systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarType {
    String,
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bytes,
}

impl ScalarType {
    /// The Go spelling of this scalar.
    pub fn go_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bytes => "[]byte",
        }
    }

    /// The protobuf spelling of this scalar.
    pub fn proto_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Bytes => "bytes",
        }
    }
}

/// An in-process (Go) type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GoType {
    Scalar(ScalarType),
    /// Go builtins without a wire counterpart (`int`, `uint8`, `rune`, ...).
    Builtin(String),
    /// `time.Time`
    Time,
    /// `uuid.UUID`
    Uuid,
    /// A named struct declared in the types package.
    Struct(String),
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    Map {
        key: Box<GoType>,
        value: Box<GoType>,
    },
    /// `interface{}`
    Any,
}

impl GoType {
    /// Render the Go type expression, qualifying named structs with `pkg`.
    pub fn expr(&self, pkg: Option<&str>) -> String {
        match self {
            Self::Scalar(s) => s.go_type().to_string(),
            Self::Builtin(name) => name.clone(),
            Self::Time => "time.Time".to_string(),
            Self::Uuid => "uuid.UUID".to_string(),
            Self::Struct(name) => match pkg {
                Some(pkg) => format!("{}.{}", pkg, name),
                None => name.clone(),
            },
            Self::Pointer(inner) => format!("*{}", inner.expr(pkg)),
            Self::Slice(inner) => format!("[]{}", inner.expr(pkg)),
            Self::Map { key, value } => format!("map[{}]{}", key.expr(pkg), value.expr(pkg)),
            Self::Any => "interface{}".to_string(),
        }
    }

    /// Whether no named struct appears anywhere in this type.
    pub fn is_primitive_only(&self) -> bool {
        match self {
            Self::Struct(_) => false,
            Self::Pointer(inner) | Self::Slice(inner) => inner.is_primitive_only(),
            Self::Map { key, value } => key.is_primitive_only() && value.is_primitive_only(),
            _ => true,
        }
    }

    /// The named struct at the root of this type, looking through pointers.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            Self::Pointer(inner) => inner.struct_name(),
            _ => None,
        }
    }

    pub fn uses_time(&self) -> bool {
        match self {
            Self::Time => true,
            Self::Pointer(inner) | Self::Slice(inner) => inner.uses_time(),
            Self::Map { key, value } => key.uses_time() || value.uses_time(),
            _ => false,
        }
    }
}

/// Conversion between the native and wire representation of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coercion {
    Identity,
    /// `time.Time` <-> Unix milliseconds.
    Time,
    /// `uuid.UUID` <-> canonical hyphenated string.
    Uuid,
}

impl Coercion {
    /// Go expression converting a wire value into its native form.
    pub fn parse_expr(&self, wire: &str) -> String {
        match self {
            Self::Identity => wire.to_string(),
            Self::Time => format!("time.UnixMilli({})", wire),
            Self::Uuid => format!("uuidx.ParseUUIDString({})", wire),
        }
    }

    /// Go expression converting a native value into its wire form.
    pub fn format_expr(&self, native: &str) -> String {
        match self {
            Self::Identity => native.to_string(),
            Self::Time => format!("{}.UnixMilli()", native),
            Self::Uuid => format!("{}.String()", native),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

/// A type resolved across the native and wire type systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedType {
    pub native: GoType,
    pub wire: ScalarType,
    pub coercion: Coercion,
}

/// Kind of emitted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    Routes,
    Handler,
    Logic,
    Types,
    Context,
    ProtoMessage,
    Model,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routes => "routes",
            Self::Handler => "handler",
            Self::Logic => "logic",
            Self::Types => "types",
            Self::Context => "context",
            Self::ProtoMessage => "proto-message",
            Self::Model => "model",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

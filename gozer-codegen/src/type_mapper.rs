//! Mapping between schema column types, Go types and wire types.

use gozer_ir::{Coercion, GoType, MappedType, ScalarType};
use gozer_spec::{Column, TypeRef};

use crate::{Error, Result};

const TIME_TYPES: &[&str] = &[
    "timestamp",
    "timestamptz",
    "timestamp with time zone",
    "timestamp without time zone",
    "datetime",
    "datetime2",
    "smalldatetime",
    "date",
    "time",
    "timetz",
    "time.time",
];

const UUID_TYPES: &[&str] = &["uuid", "uniqueidentifier", "uuid.uuid", "[16]byte"];

/// Scalar lookup table. Entries are matched after lowercasing and removing
/// length specifiers, so `VARCHAR(255)` finds `varchar`.
const SCALAR_TYPES: &[(&str, ScalarType)] = &[
    ("string", ScalarType::String),
    ("char", ScalarType::String),
    ("character", ScalarType::String),
    ("varchar", ScalarType::String),
    ("character varying", ScalarType::String),
    ("nchar", ScalarType::String),
    ("nvarchar", ScalarType::String),
    ("text", ScalarType::String),
    ("tinytext", ScalarType::String),
    ("mediumtext", ScalarType::String),
    ("longtext", ScalarType::String),
    ("citext", ScalarType::String),
    ("enum", ScalarType::String),
    ("set", ScalarType::String),
    ("json", ScalarType::String),
    ("jsonb", ScalarType::String),
    ("xml", ScalarType::String),
    ("inet", ScalarType::String),
    ("bool", ScalarType::Bool),
    ("boolean", ScalarType::Bool),
    ("bit", ScalarType::Bool),
    ("tinyint", ScalarType::Int32),
    ("smallint", ScalarType::Int32),
    ("mediumint", ScalarType::Int32),
    ("int", ScalarType::Int32),
    ("integer", ScalarType::Int32),
    ("int2", ScalarType::Int32),
    ("int4", ScalarType::Int32),
    ("int16", ScalarType::Int32),
    ("int32", ScalarType::Int32),
    ("serial", ScalarType::Int32),
    ("smallserial", ScalarType::Int32),
    ("bigint", ScalarType::Int64),
    ("int8", ScalarType::Int64),
    ("int64", ScalarType::Int64),
    ("bigserial", ScalarType::Int64),
    ("uint8", ScalarType::Uint32),
    ("uint16", ScalarType::Uint32),
    ("uint32", ScalarType::Uint32),
    ("uint64", ScalarType::Uint64),
    ("float", ScalarType::Float32),
    ("float4", ScalarType::Float32),
    ("real", ScalarType::Float32),
    ("float32", ScalarType::Float32),
    ("double", ScalarType::Float64),
    ("double precision", ScalarType::Float64),
    ("float8", ScalarType::Float64),
    ("float64", ScalarType::Float64),
    ("decimal", ScalarType::Float64),
    ("numeric", ScalarType::Float64),
    ("blob", ScalarType::Bytes),
    ("tinyblob", ScalarType::Bytes),
    ("mediumblob", ScalarType::Bytes),
    ("longblob", ScalarType::Bytes),
    ("binary", ScalarType::Bytes),
    ("varbinary", ScalarType::Bytes),
    ("bytea", ScalarType::Bytes),
    ("bytes", ScalarType::Bytes),
    ("[]byte", ScalarType::Bytes),
];

/// Family of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Time,
    Uuid,
    Scalar(ScalarType),
}

/// Lowercase, drop `(...)` specifiers and split off `unsigned`/`zerofill`.
fn normalize(raw: &str) -> (String, bool) {
    let mut without_params = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => without_params.push(c),
            _ => {}
        }
    }
    let lowered = without_params.to_lowercase();
    let mut unsigned = false;
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| match *w {
            "unsigned" => {
                unsigned = true;
                false
            }
            "zerofill" => false,
            _ => true,
        })
        .collect();
    (words.join(" "), unsigned)
}

/// Classify a raw column type, or `None` when it has no mapping.
pub fn classify(raw: &str) -> Option<TypeFamily> {
    let (base, unsigned) = normalize(raw);
    if TIME_TYPES.contains(&base.as_str()) {
        return Some(TypeFamily::Time);
    }
    if UUID_TYPES.contains(&base.as_str()) {
        return Some(TypeFamily::Uuid);
    }
    let scalar = SCALAR_TYPES
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, scalar)| *scalar)?;
    let scalar = match (scalar, unsigned) {
        (ScalarType::Int32, true) => ScalarType::Uint32,
        (ScalarType::Int64, true) => ScalarType::Uint64,
        (other, _) => other,
    };
    Some(TypeFamily::Scalar(scalar))
}

/// Map a schema column across the native and wire type systems.
pub fn map_column(table: &str, column: &Column) -> Result<MappedType> {
    let family = if column.uuid_type {
        Some(TypeFamily::Uuid)
    } else {
        classify(&column.native_type)
    };

    match family {
        Some(TypeFamily::Time) => Ok(MappedType {
            native: GoType::Time,
            wire: ScalarType::Int64,
            coercion: Coercion::Time,
        }),
        Some(TypeFamily::Uuid) => Ok(MappedType {
            native: GoType::Uuid,
            wire: ScalarType::String,
            coercion: Coercion::Uuid,
        }),
        Some(TypeFamily::Scalar(scalar)) => Ok(MappedType {
            native: GoType::Scalar(scalar),
            wire: scalar,
            coercion: Coercion::Identity,
        }),
        None => Err(Box::new(Error::UnsupportedType {
            table: table.to_string(),
            column: column.name.clone(),
            raw_type: column.native_type.clone(),
        })),
    }
}

/// Map a declared field or route type to a Go type.
pub fn map_type_ref(ty: &TypeRef) -> GoType {
    match ty {
        TypeRef::Primitive(name) => match name.as_str() {
            "string" => GoType::Scalar(ScalarType::String),
            "bool" => GoType::Scalar(ScalarType::Bool),
            "int32" => GoType::Scalar(ScalarType::Int32),
            "int64" => GoType::Scalar(ScalarType::Int64),
            "uint32" => GoType::Scalar(ScalarType::Uint32),
            "uint64" => GoType::Scalar(ScalarType::Uint64),
            "float32" => GoType::Scalar(ScalarType::Float32),
            "float64" => GoType::Scalar(ScalarType::Float64),
            other => GoType::Builtin(other.to_string()),
        },
        TypeRef::Named(name) => match name.as_str() {
            "time.Time" => GoType::Time,
            "uuid.UUID" => GoType::Uuid,
            qualified if qualified.contains('.') => GoType::Builtin(qualified.to_string()),
            plain => GoType::Struct(plain.to_string()),
        },
        TypeRef::Pointer(inner) => GoType::Pointer(Box::new(map_type_ref(inner))),
        TypeRef::Slice(inner) => GoType::Slice(Box::new(map_type_ref(inner))),
        TypeRef::Map { key, value } => GoType::Map {
            key: Box::new(map_type_ref(key)),
            value: Box::new(map_type_ref(value)),
        },
        TypeRef::Any => GoType::Any,
    }
}

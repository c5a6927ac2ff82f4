//! Go-syntax type references used by spec fields and routes.

use std::str::FromStr;

/// Go builtin type names accepted as primitives.
const PRIMITIVES: &[&str] = &[
    "bool", "string", "byte", "rune", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128",
];

/// A parsed type reference such as `[]*UserInfo` or `map[string]int64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(String),
    /// A named type, possibly package-qualified (`time.Time`).
    Named(String),
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    Any,
}

impl TypeRef {
    /// Named types declared in the spec itself (unqualified), in order of appearance.
    pub fn named_types(&self) -> Vec<&str> {
        match self {
            TypeRef::Named(name) if !name.contains('.') => vec![name.as_str()],
            TypeRef::Pointer(inner) | TypeRef::Slice(inner) => inner.named_types(),
            TypeRef::Map { key, value } => {
                let mut names = key.named_types();
                names.extend(value.named_types());
                names
            }
            _ => Vec::new(),
        }
    }
}

impl FromStr for TypeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("type reference is empty".to_string());
        }
        if s == "interface{}" || s == "any" {
            return Ok(TypeRef::Any);
        }
        if let Some(rest) = s.strip_prefix('*') {
            return Ok(TypeRef::Pointer(Box::new(rest.parse()?)));
        }
        if let Some(rest) = s.strip_prefix("[]") {
            return Ok(TypeRef::Slice(Box::new(rest.parse()?)));
        }
        if let Some(rest) = s.strip_prefix("map[") {
            let close = matching_bracket(rest).ok_or("unbalanced brackets in map type")?;
            let key: TypeRef = rest[..close].parse()?;
            let value: TypeRef = rest[close + 1..].parse()?;
            return Ok(TypeRef::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }

        let valid = s.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        });
        if !valid || s.matches('.').count() > 1 {
            return Err("expected a Go type such as `string`, `[]T`, `*T` or `map[K]V`".to_string());
        }

        if PRIMITIVES.contains(&s) {
            Ok(TypeRef::Primitive(s.to_string()))
        } else {
            Ok(TypeRef::Named(s.to_string()))
        }
    }
}

/// Index of the `]` closing an already-opened bracket.
fn matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

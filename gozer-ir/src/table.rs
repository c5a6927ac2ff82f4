//! Schema-driven IR.

use serde::Serialize;

use crate::MappedType;

/// How rows of a table are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyMode {
    AutoIncrement,
    Uuid,
}

impl KeyMode {
    pub fn is_uuid(&self) -> bool {
        matches!(self, Self::Uuid)
    }

    /// Protobuf type of the `id` field.
    pub fn id_proto_type(&self) -> &'static str {
        match self {
            Self::AutoIncrement => "uint64",
            Self::Uuid => "string",
        }
    }

    /// Request message carrying one id.
    pub fn id_request(&self) -> &'static str {
        match self {
            Self::AutoIncrement => "IDReq",
            Self::Uuid => "UUIDReq",
        }
    }

    /// Request message carrying a list of ids.
    pub fn ids_request(&self) -> &'static str {
        match self {
            Self::AutoIncrement => "IDsReq",
            Self::Uuid => "UUIDsReq",
        }
    }

    /// Request message carrying an id and a status code.
    pub fn status_request(&self) -> &'static str {
        match self {
            Self::AutoIncrement => "StatusCodeReq",
            Self::Uuid => "StatusCodeUUIDReq",
        }
    }
}

/// A lowered table ready for CRUD emission.
#[derive(Debug, Clone, Serialize)]
pub struct TableIR {
    pub table_name: String,
    /// Exported model name, e.g. `User`.
    pub struct_name: String,
    /// Go package of the table's logic files.
    pub package_name: String,
    pub key: KeyMode,
    pub primary_key: FieldIR,
    /// Every column except the primary key, in declaration order.
    pub info_fields: Vec<FieldIR>,
    /// String columns promoted to list filters.
    pub filter_fields: Vec<FieldIR>,
    pub has_status: bool,
}

impl TableIR {
    /// Primary key followed by the info fields.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldIR> {
        std::iter::once(&self.primary_key).chain(self.info_fields.iter())
    }
}

/// A mapped column.
#[derive(Debug, Clone, Serialize)]
pub struct FieldIR {
    pub column: String,
    /// Exported Go field name.
    pub name: String,
    pub json_name: String,
    pub proto_name: String,
    pub mapped: MappedType,
    pub raw_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub comment: Option<String>,
    pub default: Option<String>,
}

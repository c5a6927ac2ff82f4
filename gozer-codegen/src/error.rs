use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for gozer-codegen operations.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// How far an error reaches.
///
/// Orchestrators skip the failing unit for every scope except
/// [`ErrorScope::Invocation`], which aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// One spec or schema file.
    File,
    /// One route group.
    Group,
    /// One table in schema-driven mode.
    Table,
    /// The whole invocation.
    Invocation,
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(gozer::spec))]
    Spec(Box<gozer_spec::Error>),

    #[error("timeout '{value}' of {group} is below 1ms")]
    #[diagnostic(
        code(gozer::timeout_too_small),
        help("a bare number is read as nanoseconds; add a unit such as '500ms' or '3s'")
    )]
    TimeoutTooSmall { group: String, value: String },

    #[error("timeout '{value}' of {group} is not a duration")]
    #[diagnostic(code(gozer::timeout_invalid), help("use a duration such as '500ms' or '3s'"))]
    TimeoutInvalid { group: String, value: String },

    #[error("maxBytes '{value}' of {group} is not an integer")]
    #[diagnostic(code(gozer::max_bytes_invalid))]
    MaxBytesInvalid { group: String, value: String },

    #[error("column '{column}' of table '{table}' has unsupported type '{raw_type}'")]
    #[diagnostic(code(gozer::unsupported_type))]
    UnsupportedType {
        table: String,
        column: String,
        raw_type: String,
    },

    #[error("table '{table}' has no primary key")]
    #[diagnostic(
        code(gozer::missing_primary_key),
        help("add an 'id' column or mark a column with primary_key = true")
    )]
    MissingPrimaryKey { table: String },

    #[error("unknown naming format '{value}'")]
    #[diagnostic(
        code(gozer::naming_format),
        help("valid formats are: snake, camel, lower_camel, unchanged")
    )]
    NamingFormat { value: String },

    #[error("file system error at '{path}'")]
    #[diagnostic(code(gozer::file_system))]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn scope(&self) -> ErrorScope {
        match self {
            Error::Spec(_) => ErrorScope::File,
            Error::TimeoutTooSmall { .. }
            | Error::TimeoutInvalid { .. }
            | Error::MaxBytesInvalid { .. } => ErrorScope::Group,
            Error::UnsupportedType { .. } | Error::MissingPrimaryKey { .. } => ErrorScope::Table,
            Error::NamingFormat { .. } | Error::FileSystem { .. } => ErrorScope::Invocation,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.scope() == ErrorScope::Invocation
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::FileSystem {
            path: path.into(),
            source,
        })
    }
}

impl From<Box<gozer_spec::Error>> for Box<Error> {
    fn from(err: Box<gozer_spec::Error>) -> Self {
        Box::new(Error::Spec(err))
    }
}

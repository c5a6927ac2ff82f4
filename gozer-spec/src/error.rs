use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for gozer-spec operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename so error factories do not
/// need both threaded through every call.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Byte span of the first quoted occurrence of `needle` in the source.
    pub fn find_quoted(&self, needle: &str) -> Option<SourceSpan> {
        let quoted = format!("\"{}\"", needle);
        self.src
            .find(&quoted)
            .map(|offset| SourceSpan::new((offset + 1).into(), needle.len()))
    }

    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = line_column_offset(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::new(offset.into(), 0));
        Box::new(Error::Json {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Validation error, pointing at `needle` when it can be located.
    pub fn validation_error(&self, message: impl Into<String>, needle: Option<&str>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: needle.and_then(|n| self.find_quoted(n)),
            message: message.into(),
        })
    }

    pub fn unknown_method_error(&self, method: &str) -> Box<Error> {
        Box::new(Error::UnknownMethod {
            src: self.named_source(),
            span: self.find_quoted(method),
            method: method.to_string(),
        })
    }

    pub fn invalid_type_ref_error(&self, expr: &str, reason: impl Into<String>) -> Box<Error> {
        Box::new(Error::InvalidTypeRef {
            src: self.named_source(),
            span: self.find_quoted(expr),
            expr: expr.to_string(),
            reason: reason.into(),
        })
    }
}

fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src.split_inclusive('\n').take(line - 1).map(str::len).sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(gozer::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse spec")]
    #[diagnostic(code(gozer::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse schema config")]
    #[diagnostic(code(gozer::json_error))]
    Json {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(gozer::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("unknown HTTP method '{method}'")]
    #[diagnostic(
        code(gozer::unknown_method),
        help("valid methods are: get, head, post, put, patch, delete, connect, options, trace")
    )]
    UnknownMethod {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown method")]
        span: Option<SourceSpan>,
        method: String,
    },

    #[error("invalid type reference '{expr}'")]
    #[diagnostic(code(gozer::invalid_type), help("{reason}"))]
    InvalidTypeRef {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid type")]
        span: Option<SourceSpan>,
        expr: String,
        reason: String,
    },

    #[error("unsupported schema config format '{path}'")]
    #[diagnostic(code(gozer::unsupported_format), help("use a .json or .toml file"))]
    UnsupportedFormat { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_quoted_span() {
        let ctx = SourceContext::new("handler = \"createUser\"", "user.toml");
        let span = ctx.find_quoted("createUser").unwrap();
        assert_eq!(span.offset(), 11);
        assert_eq!(span.len(), 10);
    }

    #[test]
    fn test_line_column_offset() {
        let src = "{\n  \"tables\": x\n}";
        assert_eq!(line_column_offset(src, 2, 13), Some(14));
        assert_eq!(line_column_offset(src, 0, 0), None);
    }
}

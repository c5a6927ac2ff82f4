//! Code builder utility for generating properly indented code.

use super::Indent;

/// Fluent API for building code with proper indentation.
///
/// Supports both consuming methods (returning `Self`) for chaining and
/// mutable methods prefixed with `push_` for loops that build in place.
///
/// # Example
///
/// ```
/// use gozer_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::go()
///     .block("func main() {", |b| b.line("fmt.Println(\"hi\")"))
///     .build();
///
/// assert_eq!(code, "func main() {\n\tfmt.Println(\"hi\")\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Tab indentation for Go sources.
    pub fn go() -> Self {
        Self::new(Indent::GO)
    }

    /// 2-space indentation for protobuf descriptors.
    pub fn proto() -> Self {
        Self::new(Indent::PROTO)
    }

    // Mutable API

    /// Add a line of code with current indentation.
    ///
    /// Empty lines are written without indentation so no trailing
    /// whitespace ends up in the output.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        if !s.is_empty() {
            self.write_indent();
            self.buffer.push_str(s);
        }
        self.buffer.push('\n');
        self
    }

    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add raw text without indentation or newline.
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a `//` comment line.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str("//");
        if !text.is_empty() {
            self.buffer.push(' ');
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
        self
    }

    // Consuming API

    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    pub fn raw(mut self, s: &str) -> Self {
        self.push_raw(s);
        self
    }

    pub fn indent(mut self) -> Self {
        self.push_indent();
        self
    }

    pub fn dedent(mut self) -> Self {
        self.push_dedent();
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        self.push_comment(text);
        self
    }

    /// Add one comment line per entry of `lines`.
    pub fn comments<S: AsRef<str>>(self, lines: &[S]) -> Self {
        self.each(lines, |b, line| b.comment(line.as_ref()))
    }

    /// Add a brace block closed with `}`.
    pub fn block<F>(self, header: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.block_with_close(header, "}", f)
    }

    /// Add a block with a closing line.
    ///
    /// ```
    /// use gozer_codegen::builder::CodeBuilder;
    ///
    /// let code = CodeBuilder::go()
    ///     .block_with_close("import (", ")", |b| b.line("\"fmt\""))
    ///     .build();
    /// assert_eq!(code, "import (\n\t\"fmt\"\n)\n");
    /// ```
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Conditionally add content.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::go()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let code = CodeBuilder::go()
            .block("func f() {", |b| {
                b.block("if err != nil {", |b| b.line("return err"))
                    .line("return nil")
            })
            .build();

        assert_eq!(
            code,
            "func f() {\n\tif err != nil {\n\t\treturn err\n\t}\n\treturn nil\n}\n"
        );
    }

    #[test]
    fn test_empty_line_has_no_indent() {
        let code = CodeBuilder::go().indent().line("a").line("").line("b").build();
        assert_eq!(code, "\ta\n\n\tb\n");
    }

    #[test]
    fn test_comments() {
        let code = CodeBuilder::go()
            .comments(&["swagger:route post /user user CreateUser", "", "Create user"])
            .build();
        assert_eq!(
            code,
            "// swagger:route post /user user CreateUser\n//\n// Create user\n"
        );
    }

    #[test]
    fn test_conditional_and_each() {
        let code = CodeBuilder::proto()
            .block("message Empty {", |b| {
                b.when(false, |b| b.line("string skipped = 1;"))
                    .each(["uint64 id = 1;"], |b, l| b.line(l))
            })
            .build();
        assert_eq!(code, "message Empty {\n  uint64 id = 1;\n}\n");
    }

    #[test]
    fn test_mutable_api() {
        let mut builder = CodeBuilder::go();
        builder
            .push_line("type A struct {")
            .push_indent()
            .push_comment("id")
            .push_line("ID uint64")
            .push_dedent()
            .push_line("}");
        assert_eq!(builder.build(), "type A struct {\n\t// id\n\tID uint64\n}\n");
    }
}

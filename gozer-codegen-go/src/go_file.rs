use gozer_codegen::generation::GoImports;

/// A Go source file: package clause, imports and top-level declarations.
///
/// Declarations are separated by one blank line, the way `gofmt` leaves them.
#[derive(Debug, Clone)]
pub struct GoFile {
    package: String,
    imports: GoImports,
    decls: Vec<String>,
}

impl GoFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: GoImports::new(),
            decls: Vec::new(),
        }
    }

    pub fn imports(mut self, imports: &GoImports) -> Self {
        self.imports.merge(imports);
        self
    }

    /// Add a top-level declaration.
    pub fn add(mut self, decl: impl Into<String>) -> Self {
        self.decls.push(decl.into());
        self
    }

    pub fn add_all(mut self, decls: impl IntoIterator<Item = String>) -> Self {
        self.decls.extend(decls);
        self
    }

    pub fn render(&self) -> String {
        let mut out = format!("package {}\n", self.package);
        let imports = self.imports.render();
        if !imports.is_empty() {
            out.push('\n');
            out.push_str(&imports);
        }
        for decl in &self.decls {
            out.push('\n');
            out.push_str(decl.trim_end_matches('\n'));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let mut imports = GoImports::new();
        imports.add("context");
        let file = GoFile::new("user")
            .imports(&imports)
            .add("type A struct{}\n")
            .add("type B struct{}");
        assert_eq!(
            file.render(),
            "package user\n\nimport \"context\"\n\ntype A struct{}\n\ntype B struct{}\n"
        );
    }

    #[test]
    fn test_no_imports() {
        assert_eq!(GoFile::new("types").render(), "package types\n");
    }
}

use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports};
use gozer_core::{FileRules, GeneratedFile};
use gozer_ir::TypeIR;

use super::{TYPES_PACKAGE, doc_comments, imports, uses_uuid};
use crate::GoFile;

/// `internal/types/types.go`: the types of every processed spec file.
pub struct TypesGo<'a> {
    types: Vec<&'a TypeIR>,
}

impl<'a> TypesGo<'a> {
    /// Collect `types`; a name declared twice keeps its first declaration.
    pub fn new(types: impl IntoIterator<Item = &'a TypeIR>) -> Self {
        let mut kept: Vec<&'a TypeIR> = Vec::new();
        for ty in types {
            if kept.iter().any(|k| k.name == ty.name) {
                tracing::debug!(name = %ty.name, "type already declared, skipping");
                continue;
            }
            kept.push(ty);
        }
        Self { types: kept }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn imports(&self) -> GoImports {
        let fields = || self.types.iter().flat_map(|t| t.fields.iter());
        let mut imports = GoImports::new();
        imports.add_if(fields().any(|f| f.ty.uses_time()), "time");
        imports.add_if(fields().any(|f| uses_uuid(&f.ty)), imports::UUID);
        imports
    }
}

fn declaration(ty: &TypeIR) -> String {
    let swagger = ty.documented && !ty.docs.iter().any(|d| d.contains("swagger:"));
    CodeBuilder::go()
        .each(doc_comments(&ty.docs), |b, line| b.line(&line))
        .when(swagger, |b| b.line(&format!("// swagger:model {}", ty.name)))
        .block(&format!("type {} struct {{", ty.name), |b| {
            b.each(&ty.fields, |b, field| {
                let b = b.each(doc_comments(&field.docs), |b, line| b.line(&line));
                if field.inline {
                    return b.line(&field.ty.expr(None));
                }
                let decl = format!("{} {}", field.name, field.ty.expr(None));
                match &field.tag {
                    Some(tag) => b.line(&format!("{} {}", decl, tag)),
                    None => b.line(&decl),
                }
            })
        })
        .build()
}

impl GeneratedFile for TypesGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("internal").join(TYPES_PACKAGE).join("types.go")
    }

    fn rules(&self) -> FileRules {
        FileRules::generated()
    }

    fn render(&self) -> String {
        GoFile::new(TYPES_PACKAGE)
            .imports(&self.imports())
            .add_all(self.types.iter().map(|t| declaration(t)))
            .render()
    }
}

#[cfg(test)]
mod tests {
    use gozer_ir::{GoType, TypeFieldIR};

    use super::*;
    use crate::files::fixtures::user_service;

    #[test]
    fn test_swagger_model_on_documented_types() {
        let service = user_service();
        let content = TypesGo::new(&service.types).render();

        assert!(content.starts_with("package types\n"));
        assert!(content.contains(
            "// The user information\n// swagger:model UserInfo\ntype UserInfo struct {\n"
        ));
        assert!(content.contains("\tId *uint64 `json:\"id,optional\"`\n"));
        // already carries a swagger annotation
        assert!(!content.contains("swagger:model UserListReq"));
        assert!(!content.contains("swagger:model BaseMsgResp"));
        assert!(!content.contains("import"));
    }

    #[test]
    fn test_inline_fields_and_duplicates() {
        let paged = TypeIR {
            name: "PageListReq".into(),
            docs: Vec::new(),
            fields: vec![
                TypeFieldIR {
                    name: "PageInfo".into(),
                    ty: GoType::Struct("PageInfo".into()),
                    tag: None,
                    docs: Vec::new(),
                    inline: true,
                },
                TypeFieldIR {
                    name: "CreatedAt".into(),
                    ty: GoType::Time,
                    tag: Some("`json:\"createdAt\"`".into()),
                    docs: vec!["Creation time".into()],
                    inline: false,
                },
            ],
            documented: true,
        };
        let types = [paged.clone(), paged];
        let file = TypesGo::new(&types);
        let content = file.render();

        assert_eq!(file.len(), 1);
        assert!(content.contains("\tPageInfo\n"));
        assert!(content.contains(
            "\t// Creation time\n\tCreatedAt time.Time `json:\"createdAt\"`\n"
        ));
        assert!(content.contains("import \"time\""));
    }
}

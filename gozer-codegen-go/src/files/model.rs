use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports, naming::Naming};
use gozer_core::{FileRules, GeneratedFile};
use gozer_ir::{FieldIR, GoType, TableIR};

use super::{imports, nested_path};
use crate::{GoFile, GoSettings};

/// Gorm model of one table.
pub struct ModelGo<'a> {
    settings: &'a GoSettings,
    table: &'a TableIR,
}

impl<'a> ModelGo<'a> {
    pub fn new(settings: &'a GoSettings, table: &'a TableIR) -> Self {
        Self { settings, table }
    }

    fn imports(&self) -> GoImports {
        let mut imports = GoImports::new();
        imports.add_if(
            self.table.all_fields().any(|f| f.mapped.native == GoType::Time),
            "time",
        );
        imports.add_if(
            self.table.all_fields().any(|f| f.mapped.native == GoType::Uuid),
            imports::UUID,
        );
        imports
    }

    fn struct_decl(&self) -> String {
        let rows: Vec<[String; 3]> = self
            .table
            .all_fields()
            .map(|f| [f.name.clone(), f.mapped.native.expr(None), struct_tag(f)])
            .collect();
        let name_width = rows.iter().map(|r| r[0].len()).max().unwrap_or(0);
        let type_width = rows.iter().map(|r| r[1].len()).max().unwrap_or(0);

        CodeBuilder::go()
            .comment(&format!(
                "{} maps the {} table.",
                self.table.struct_name, self.table.table_name
            ))
            .block(&format!("type {} struct {{", self.table.struct_name), |b| {
                b.each(&rows, |b, [name, ty, tag]| {
                    b.line(&format!(
                        "{:<nw$} {:<tw$} {}",
                        name,
                        ty,
                        tag,
                        nw = name_width,
                        tw = type_width
                    ))
                })
            })
            .build()
    }

    fn table_name_fn(&self) -> String {
        CodeBuilder::go()
            .block(
                &format!("func ({}) TableName() string {{", self.table.struct_name),
                |b| b.line(&format!("return \"{}\"", self.table.table_name)),
            )
            .build()
    }
}

/// Struct tag with gorm column options followed by the json name.
pub(crate) fn struct_tag(field: &FieldIR) -> String {
    let mut gorm = vec![format!("column:{}", field.column)];
    if field.primary_key {
        gorm.push("primaryKey".into());
    }
    if field.auto_increment {
        gorm.push("autoIncrement".into());
    }
    if field.mapped.native == GoType::Uuid {
        gorm.push("type:uuid".into());
    }
    if let Some(default) = &field.default {
        gorm.push(format!("default:{}", tag_safe(default)));
    }
    if let Some(comment) = &field.comment {
        gorm.push(format!("comment:'{}'", tag_safe(comment).replace('\'', "")));
    }
    if !field.nullable {
        gorm.push("not null".into());
    }
    format!("`gorm:\"{}\" json:\"{}\"`", gorm.join(";"), field.json_name)
}

/// Drop characters that end a tag or a gorm option.
fn tag_safe(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '`' | '"' | ';'))
        .collect()
}

impl GeneratedFile for ModelGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        nested_path(base, &["internal"], Some(&self.settings.model_package))
            .join(self.settings.naming.file_name(&self.table.table_name, ".go"))
    }

    fn rules(&self) -> FileRules {
        FileRules::scaffold(self.settings.overwrite)
    }

    fn render(&self) -> String {
        GoFile::new(Naming::package_name(&self.settings.model_package))
            .imports(&self.imports())
            .add(self.struct_decl())
            .add(self.table_name_fn())
            .render()
    }
}

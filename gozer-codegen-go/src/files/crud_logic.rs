use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports, naming::Naming};
use gozer_core::{FileRules, GeneratedFile, to_pascal_case, upper_first};
use gozer_ir::{Coercion, FieldIR, GoType, KeyMode, ScalarType, TableIR};

use super::{imports, key_values, nested_path};
use crate::{CrudOperation, GoFile, GoSettings};

/// One CRUD logic routine of a table, backed by gorm.
pub struct CrudLogicGo<'a> {
    settings: &'a GoSettings,
    table: &'a TableIR,
    op: CrudOperation,
}

impl<'a> CrudLogicGo<'a> {
    pub fn new(settings: &'a GoSettings, table: &'a TableIR, op: CrudOperation) -> Self {
        Self {
            settings,
            table,
            op,
        }
    }

    pub fn operation(&self) -> CrudOperation {
        self.op
    }

    fn method(&self) -> String {
        upper_first(&self.op.method(&self.table.struct_name))
    }

    fn logic_type(&self) -> String {
        format!("{}Logic", self.method())
    }

    fn proto_package(&self) -> &str {
        &self.settings.proto_package
    }

    fn model_package(&self) -> String {
        Naming::package_name(&self.settings.model_package)
    }

    fn model(&self) -> String {
        format!("{}.{}", self.model_package(), self.table.struct_name)
    }

    fn db(&self) -> &'static str {
        "l.svcCtx.DB.WithContext(l.ctx)"
    }

    /// Native primary key parsed from a wire expression.
    fn parse_key(&self, wire: &str) -> String {
        let native = &self.table.primary_key.mapped.native;
        match self.table.key {
            KeyMode::Uuid => Coercion::Uuid.parse_expr(wire),
            KeyMode::AutoIncrement if *native == GoType::Scalar(ScalarType::Uint64) => {
                wire.to_string()
            }
            KeyMode::AutoIncrement => format!("{}({})", native.expr(None), wire),
        }
    }

    /// Wire primary key formatted from a native expression.
    fn format_key(&self, native_expr: &str) -> String {
        let native = &self.table.primary_key.mapped.native;
        match self.table.key {
            KeyMode::Uuid => Coercion::Uuid.format_expr(native_expr),
            KeyMode::AutoIncrement if *native == GoType::Scalar(ScalarType::Uint64) => {
                native_expr.to_string()
            }
            KeyMode::AutoIncrement => format!("uint64({})", native_expr),
        }
    }

    fn message(&self, key: &str) -> String {
        if self.settings.use_i18n {
            format!("i18n.{}", key)
        } else {
            "\"success\"".to_string()
        }
    }

    fn body(&self) -> String {
        let b = CodeBuilder::go().indent();
        let b = match self.op {
            CrudOperation::CreateOrUpdate => self.create_or_update(b),
            CrudOperation::Delete => self.delete(b, false),
            CrudOperation::BatchDelete => self.delete(b, true),
            CrudOperation::GetById => self.get_by_id(b),
            CrudOperation::GetList => self.get_list(b),
            CrudOperation::UpdateStatus => self.update_status(b),
        };
        b.build()
    }

    fn base_resp(&self, key: &str) -> String {
        format!(
            "return &{}.BaseResp{{Msg: {}}}, nil",
            self.proto_package(),
            self.message(key)
        )
    }

    fn fail(b: CodeBuilder, statement: &str) -> CodeBuilder {
        b.block(&format!("if err := {}; err != nil {{", statement), |b| {
            b.line("return nil, err")
        })
    }

    fn create_or_update(&self, b: CodeBuilder) -> CodeBuilder {
        let assignments: Vec<(String, String)> = self
            .table
            .info_fields
            .iter()
            .map(|f| (f.name.clone(), f.mapped.coercion.parse_expr(&wire_accessor("in", f))))
            .collect();
        let pk = &self.table.primary_key.name;
        let is_new = match self.table.key {
            KeyMode::Uuid => "in.Id == \"\"",
            KeyMode::AutoIncrement => "in.Id == 0",
        };

        let b = b
            .block_with_close(&format!("data := {}{{", self.model()), "}", |b| {
                b.each(key_values(&assignments), |b, line| b.line(&line))
            })
            .blank()
            .block(&format!("if {} {{", is_new), |b| {
                let b = b.when(self.table.key.is_uuid(), |b| {
                    b.line(&format!("data.{} = uuidx.NewUUID()", pk))
                });
                Self::fail(b, &format!("{}.Create(&data).Error", self.db()))
                    .line(&self.base_resp("CreateSuccess"))
            })
            .blank()
            .line(&format!("data.{} = {}", pk, self.parse_key("in.Id")));
        Self::fail(b, &format!("{}.Save(&data).Error", self.db()))
            .line(&self.base_resp("UpdateSuccess"))
    }

    fn delete(&self, b: CodeBuilder, batch: bool) -> CodeBuilder {
        let column = &self.table.primary_key.column;
        let condition = if batch {
            let ids = match self.table.key {
                KeyMode::Uuid => "uuidx.ParseUUIDSlice(in.Ids)".to_string(),
                KeyMode::AutoIncrement => "in.Ids".to_string(),
            };
            format!("Where(\"{} IN ?\", {})", column, ids)
        } else {
            format!("Where(\"{} = ?\", {})", column, self.parse_key("in.Id"))
        };
        let statement = format!("{}.{}.Delete(&{}{{}}).Error", self.db(), condition, self.model());
        Self::fail(b, &statement).blank().line(&self.base_resp("DeleteSuccess"))
    }

    /// `{prefix}&pkg.XInfo{...}{close}` built from the model value `source`.
    fn info_literal(&self, b: CodeBuilder, prefix: &str, source: &str, close: &str) -> CodeBuilder {
        let mut values = vec![(
            "Id".to_string(),
            self.format_key(&format!("{}.{}", source, self.table.primary_key.name)),
        )];
        values.extend(self.table.info_fields.iter().map(|f| {
            (
                wire_name(f),
                f.mapped
                    .coercion
                    .format_expr(&format!("{}.{}", source, f.name)),
            )
        }));
        b.block_with_close(
            &format!(
                "{}&{}.{}Info{{",
                prefix,
                self.proto_package(),
                self.table.struct_name
            ),
            close,
            |b| b.each(key_values(&values), |b, line| b.line(&line)),
        )
    }

    fn get_by_id(&self, b: CodeBuilder) -> CodeBuilder {
        let statement = format!(
            "{}.Where(\"{} = ?\", {}).First(&data).Error",
            self.db(),
            self.table.primary_key.column,
            self.parse_key("in.Id")
        );
        let b = b.line(&format!("var data {}", self.model()));
        let b = Self::fail(b, &statement).blank();
        self.info_literal(b, "return ", "data", "}, nil")
    }

    fn get_list(&self, b: CodeBuilder) -> CodeBuilder {
        let b = b
            .line(&format!(
                "db := {}.Model(&{}{{}})",
                self.db(),
                self.model()
            ))
            .each(&self.table.filter_fields, |b, f| {
                let wire = wire_accessor("in", f);
                b.block(&format!("if {} != \"\" {{", wire), |b| {
                    b.line(&format!(
                        "db = db.Where(\"{} LIKE ?\", \"%\"+{}+\"%\")",
                        f.column, wire
                    ))
                })
            })
            .blank()
            .line("var total int64");
        let b = Self::fail(b, "db.Count(&total).Error")
            .blank()
            .line(&format!("var rows []{}", self.model()));
        let b = Self::fail(
            b,
            "db.Offset(int((in.Page - 1) * in.PageSize)).Limit(int(in.PageSize)).Find(&rows).Error",
        )
        .blank()
        .line(&format!(
            "resp := &{}.{}ListResp{{Total: uint64(total)}}",
            self.proto_package(),
            self.table.struct_name
        ));
        b.block("for _, v := range rows {", |b| {
            self.info_literal(b, "resp.Data = append(resp.Data, ", "v", "})")
        })
        .blank()
        .line("return resp, nil")
    }

    fn update_status(&self, b: CodeBuilder) -> CodeBuilder {
        let statement = format!(
            "{}.Model(&{}{{}}).Where(\"{} = ?\", {}).Update(\"status\", in.Status).Error",
            self.db(),
            self.model(),
            self.table.primary_key.column,
            self.parse_key("in.Id")
        );
        Self::fail(b, &statement).blank().line(&self.base_resp("UpdateSuccess"))
    }

    fn imports(&self, body: &str) -> GoImports {
        let mut imports = GoImports::new();
        imports.add("context");
        imports.add(&self.settings.internal("svc"));
        imports.add(&self.settings.proto_import());
        imports.add(imports::LOGX);
        imports.add_if(
            body.contains(&format!("{}.", self.model_package())),
            &self.settings.internal(&self.settings.model_package),
        );
        imports.add_if(body.contains("time."), "time");
        imports.add_if(body.contains("uuidx."), imports::UUIDX);
        imports.add_if(body.contains("i18n."), imports::I18N);
        imports
    }
}

/// Field name of a column on the generated protobuf struct.
fn wire_name(field: &FieldIR) -> String {
    to_pascal_case(&field.proto_name)
}

fn wire_accessor(source: &str, field: &FieldIR) -> String {
    format!("{}.{}", source, wire_name(field))
}

impl GeneratedFile for CrudLogicGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        nested_path(base, &["internal", "logic"], Some(&self.table.package_name))
            .join(self.settings.naming.file_name(&self.op.method(&self.table.struct_name), ".go"))
    }

    fn rules(&self) -> FileRules {
        FileRules::scaffold(self.settings.overwrite)
    }

    fn render(&self) -> String {
        let logic = self.logic_type();
        let body = self.body();
        let request = self.op.request(&self.table.struct_name, self.table.key);
        let response = self.op.response(&self.table.struct_name);
        let pkg = self.proto_package();

        let decls = vec![
            CodeBuilder::go()
                .block(&format!("type {} struct {{", logic), |b| {
                    b.line("ctx    context.Context")
                        .line("svcCtx *svc.ServiceContext")
                        .line("logx.Logger")
                })
                .build(),
            CodeBuilder::go()
                .block(
                    &format!(
                        "func New{0}(ctx context.Context, svcCtx *svc.ServiceContext) *{0} {{",
                        logic
                    ),
                    |b| {
                        b.block_with_close(&format!("return &{}{{", logic), "}", |b| {
                            b.line("ctx:    ctx,")
                                .line("svcCtx: svcCtx,")
                                .line("Logger: logx.WithContext(ctx),")
                        })
                    },
                )
                .build(),
            CodeBuilder::go()
                .block(
                    &format!(
                        "func (l *{}) {}(in *{pkg}.{}) (*{pkg}.{}, error) {{",
                        logic,
                        self.method(),
                        request,
                        response,
                        pkg = pkg
                    ),
                    |b| b.raw(&body),
                )
                .build(),
        ];

        GoFile::new(Naming::package_name(&self.table.package_name))
            .imports(&self.imports(&body))
            .add_all(decls)
            .render()
    }
}

#[cfg(test)]
mod tests {
    use gozer_codegen::schema::lower_table;
    use gozer_core::Overwrite;
    use gozer_spec::SchemaConfig;

    use super::*;
    use crate::files::fixtures::settings;

    fn user_table() -> TableIR {
        let schema = SchemaConfig::from_json_str(
            r#"{ "tables": [{ "table_name": "user", "columns": [
                { "name": "id", "type": "uuid", "primary_key": true },
                { "name": "username", "type": "varchar(64)" },
                { "name": "status", "type": "tinyint unsigned" },
                { "name": "created_at", "type": "timestamp" }
            ]}]}"#,
            "schema.json",
        )
        .unwrap();
        lower_table(&schema.tables[0], &Naming::default(), 3).unwrap()
    }

    fn render(op: CrudOperation) -> String {
        let settings = settings();
        let table = user_table();
        CrudLogicGo::new(&settings, &table, op).render()
    }

    #[test]
    fn test_paths_and_rules() {
        let settings = GoSettings {
            overwrite: true,
            ..settings()
        };
        let table = user_table();
        let logic = CrudLogicGo::new(&settings, &table, CrudOperation::GetById);
        assert_eq!(
            logic.path(Path::new("")),
            Path::new("internal/logic/user/get_user_by_id.go")
        );
        assert_eq!(logic.rules().overwrite, Overwrite::Always);
    }

    #[test]
    fn test_create_or_update_coerces_fields() {
        let content = render(CrudOperation::CreateOrUpdate);
        assert!(content.contains(
            concat!(
                "func (l *CreateOrUpdateUserLogic) ",
                "CreateOrUpdateUser(in *core.UserInfo) (*core.BaseResp, error) {"
            )
        ));
        assert!(content.contains("\t\tCreatedAt: time.UnixMilli(in.CreatedAt),\n"));
        assert!(content.contains("\t\tdata.ID = uuidx.NewUUID()\n"));
        assert!(content.contains("\tdata.ID = uuidx.ParseUUIDString(in.Id)\n"));
        assert!(content.contains("\"github.com/acme/core/internal/model\""));
        assert!(content.contains("\"github.com/acme/core/types/core\""));
        assert!(content.contains("return &core.BaseResp{Msg: \"success\"}, nil"));
    }

    #[test]
    fn test_get_by_id_formats_fields() {
        let content = render(CrudOperation::GetById);
        assert!(content.contains("(in *core.UUIDReq) (*core.UserInfo, error)"));
        assert!(content.contains(
            "Where(\"id = ?\", uuidx.ParseUUIDString(in.Id)).First(&data).Error"
        ));
        assert!(content.contains("\treturn &core.UserInfo{\n"));
        assert!(content.contains("\t\tId:        data.ID.String(),\n"));
        assert!(content.contains("\t\tCreatedAt: data.CreatedAt.UnixMilli(),\n"));
        assert!(content.contains("\t}, nil\n"));
    }

    #[test]
    fn test_get_list_filters_strings() {
        let content = render(CrudOperation::GetList);
        assert!(content.contains("if in.Username != \"\" {"));
        assert!(content.contains("db = db.Where(\"username LIKE ?\", \"%\"+in.Username+\"%\")"));
        assert!(!content.contains("in.Status != \"\""));
        assert!(content.contains("\t\tresp.Data = append(resp.Data, &core.UserInfo{\n"));
        assert!(content.contains("\t\t})\n"));
    }

    #[test]
    fn test_batch_delete_and_status() {
        let content = render(CrudOperation::BatchDelete);
        assert!(content.contains(
            "Where(\"id IN ?\", uuidx.ParseUUIDSlice(in.Ids)).Delete(&model.User{}).Error"
        ));
        let content = render(CrudOperation::UpdateStatus);
        assert!(content.contains("(in *core.StatusCodeUUIDReq) (*core.BaseResp, error)"));
        assert!(content.contains(".Update(\"status\", in.Status).Error"));
        assert!(!content.contains("\"time\""));
    }
}

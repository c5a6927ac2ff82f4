use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports};
use gozer_core::{FileRules, GeneratedFile, strip_suffix_ignore_case, upper_first};

use super::{imports, key_values, struct_fields};
use crate::{GoFile, GoSettings};

/// `internal/svc/service_context.go`: config, middleware and client wiring.
pub struct ServiceContextGo<'a> {
    settings: &'a GoSettings,
    middleware: Vec<String>,
}

impl<'a> ServiceContextGo<'a> {
    /// `middleware` lists distinct middleware names in first-use order.
    pub fn new(settings: &'a GoSettings, middleware: Vec<String>) -> Self {
        Self {
            settings,
            middleware,
        }
    }

    fn imports(&self) -> GoImports {
        let mut imports = GoImports::new();
        imports.add(&self.settings.internal("config"));
        imports.add_if(!self.middleware.is_empty(), &self.settings.internal("middleware"));
        imports.add_if(!self.middleware.is_empty(), imports::REST);
        imports.add_if(self.settings.use_casbin, imports::CASBIN);
        if self.settings.has_translator() {
            imports.add(imports::I18N);
            imports.add_aliased(&self.settings.internal("i18n"), "i18n2");
        }
        if let Some(rpc) = &self.settings.rpc {
            imports.add(&rpc.import);
            imports.add(imports::ZRPC);
        }
        imports
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("Config".to_string(), "config.Config".to_string())];
        fields.extend(
            self.middleware
                .iter()
                .map(|m| (m.clone(), "rest.Middleware".to_string())),
        );
        if self.settings.use_casbin {
            fields.push(("Casbin".into(), "*casbin.Enforcer".into()));
        }
        if self.settings.has_translator() {
            fields.push(("Trans".into(), "*i18n.Translator".into()));
        }
        if let Some(rpc) = &self.settings.rpc {
            fields.push((rpc.field.clone(), format!("{}.{}", rpc.package, rpc.service)));
        }
        fields
    }

    fn values(&self) -> Vec<(String, String)> {
        let mut values = vec![("Config".to_string(), "c".to_string())];
        values.extend(self.middleware.iter().map(|m| {
            let stem = strip_suffix_ignore_case(m, "Middleware")
                .filter(|s| !s.is_empty())
                .unwrap_or(m);
            (
                m.clone(),
                format!("middleware.New{}Middleware().Handle", upper_first(stem)),
            )
        }));
        if self.settings.use_casbin {
            values.push(("Casbin".into(), "cbn".into()));
        }
        if self.settings.has_translator() {
            values.push(("Trans".into(), "trans".into()));
        }
        if let Some(rpc) = &self.settings.rpc {
            values.push((
                rpc.field.clone(),
                format!(
                    "{}.New{}(zrpc.NewClientIfEnable(c.{}))",
                    rpc.package, rpc.service, rpc.field
                ),
            ));
        }
        values
    }

    fn constructor(&self) -> String {
        CodeBuilder::go()
            .block("func NewServiceContext(c config.Config) *ServiceContext {", |b| {
                b.when(self.settings.use_casbin, |b| {
                    b.line(concat!(
                        "cbn := c.CasbinConf.MustNewCasbinWithRedisWatcher(",
                        "c.DatabaseConf.Type, c.DatabaseConf.GetDSN(), c.RedisConf)",
                    ))
                    .blank()
                })
                .when(self.settings.has_translator(), |b| {
                    b.line("trans := i18n.NewTranslator(i18n2.LocaleFS)").blank()
                })
                .block_with_close("return &ServiceContext{", "}", |b| {
                    b.each(key_values(&self.values()), |b, line| b.line(&line))
                })
            })
            .build()
    }
}

impl GeneratedFile for ServiceContextGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("internal")
            .join("svc")
            .join(self.settings.naming.file_name("service_context", ".go"))
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let decl = CodeBuilder::go()
            .block("type ServiceContext struct {", |b| {
                b.each(struct_fields(&self.fields()), |b, line| b.line(&line))
            })
            .build();
        GoFile::new("svc")
            .imports(&self.imports())
            .add(decl)
            .add(self.constructor())
            .render()
    }
}

#[cfg(test)]
mod tests {
    use gozer_codegen::naming::{Naming, NamingFormat};

    use super::*;
    use crate::RpcClient;
    use crate::files::fixtures::settings;

    #[test]
    fn test_minimal_context() {
        let settings = settings();
        let file = ServiceContextGo::new(&settings, Vec::new());
        let content = file.render();

        assert_eq!(
            file.path(Path::new("")),
            Path::new("internal/svc/service_context.go")
        );
        assert!(content.contains("type ServiceContext struct {\n\tConfig config.Config\n}"));
        assert!(content.contains("\t\tConfig: c,\n"));
        assert!(!content.contains("rest"));
    }

    #[test]
    fn test_full_wiring() {
        let settings = GoSettings {
            use_casbin: true,
            trans_err: true,
            naming: Naming::new(NamingFormat::LowerCamel),
            rpc: Some(RpcClient {
                field: "CoreRpc".into(),
                package: "coreclient".into(),
                import: "github.com/acme/core/rpc/coreclient".into(),
                service: "Core".into(),
            }),
            ..settings()
        };
        let file = ServiceContextGo::new(&settings, vec!["Authority".into()]);
        let content = file.render();

        assert_eq!(
            file.path(Path::new("")),
            Path::new("internal/svc/serviceContext.go")
        );
        assert!(content.contains("\tAuthority rest.Middleware\n"));
        assert!(content.contains("\tCasbin    *casbin.Enforcer\n"));
        assert!(content.contains("\tCoreRpc   coreclient.Core\n"));
        assert!(content.contains("Authority: middleware.NewAuthorityMiddleware().Handle,"));
        assert!(content.contains(
            "CoreRpc:   coreclient.NewCore(zrpc.NewClientIfEnable(c.CoreRpc)),"
        ));
        assert!(content.contains("trans := i18n.NewTranslator(i18n2.LocaleFS)"));
        assert!(content.contains("i18n2 \"github.com/acme/core/internal/i18n\""));
    }
}

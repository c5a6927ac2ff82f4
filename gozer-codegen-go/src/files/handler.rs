use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports, naming::Naming};
use gozer_core::{FileRules, GeneratedFile, strip_suffix_ignore_case};
use gozer_ir::{EffectiveGroupPolicy, RouteIR, ServiceIR};

use super::{TYPES_PACKAGE, imports, nested_path, request_type, routes_in_folder};
use crate::{GoFile, GoSettings};

/// Marker in type docs that makes a request documented as parameters.
const SWAGGER_PARAMETERS: &str = "swagger:parameters";

/// Handlers of one spec file that share a handler folder.
pub struct HandlerGo<'a> {
    settings: &'a GoSettings,
    service: &'a ServiceIR,
    folder: Option<&'a str>,
    routes: Vec<(&'a EffectiveGroupPolicy, &'a RouteIR)>,
}

impl<'a> HandlerGo<'a> {
    pub fn new(settings: &'a GoSettings, service: &'a ServiceIR, folder: Option<&'a str>) -> Self {
        Self {
            settings,
            service,
            folder,
            routes: routes_in_folder(service, folder),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn package(&self) -> String {
        self.folder
            .map(Naming::package_name)
            .unwrap_or_else(|| "handler".to_string())
    }

    fn logic_package(&self) -> String {
        self.folder
            .map(Naming::package_name)
            .unwrap_or_else(|| "logic".to_string())
    }

    fn imports(&self) -> GoImports {
        let mut imports = GoImports::new();
        imports.add("net/http");
        imports.add(imports::HTTPX);
        imports.add(&self.settings.internal("svc"));
        imports.add(&self.settings.internal(&match self.folder {
            Some(folder) => format!("logic/{}", folder),
            None => "logic".to_string(),
        }));
        imports.add_if(
            self.routes.iter().any(|(_, r)| r.has_request()),
            &self.settings.internal(TYPES_PACKAGE),
        );
        imports
    }

    fn is_parameter_request(&self, route: &RouteIR) -> bool {
        let Some(name) = route.request.as_ref().and_then(|t| t.struct_name()) else {
            return false;
        };
        self.service
            .types
            .iter()
            .find(|t| t.name == name)
            .is_some_and(|t| t.docs.iter().any(|d| d.contains(SWAGGER_PARAMETERS)))
    }

    /// Swagger route annotation, one entry per comment line.
    fn swagger_doc(&self, policy: &EffectiveGroupPolicy, route: &RouteIR) -> Vec<String> {
        let path = swagger_path(policy.prefix.as_deref(), &route.path);
        let tag = route.folder.as_deref().unwrap_or(&self.service.name);
        let name = strip_suffix_ignore_case(&route.handler, "Handler").unwrap_or(&route.handler);
        let summary = route.docs.join(" ");

        let mut doc = vec![
            format!("swagger:route {} {} {} {}", route.method, path, tag, name),
            String::new(),
            summary.clone(),
            String::new(),
            summary,
            String::new(),
        ];
        if let Some(request) = route
            .request
            .as_ref()
            .filter(|_| !self.is_parameter_request(route))
        {
            doc.extend([
                "Parameters:".to_string(),
                " + name: body".to_string(),
                "   require: true".to_string(),
                "   in: body".to_string(),
                format!("   type: {}", request.expr(None).trim_start_matches('*')),
                String::new(),
            ]);
        }
        if let Some(response) = &route.response {
            doc.extend([
                "Responses:".to_string(),
                format!(" 200: {}", response.expr(None).trim_start_matches('*')),
            ]);
        }
        doc
    }

    fn handler_fn(&self, policy: &EffectiveGroupPolicy, route: &RouteIR) -> String {
        let logic_type = self.settings.naming.logic_type(&self.service.source);
        let call = match (route.has_request(), route.has_response()) {
            (true, true) => format!("resp, err := l.{}(&req)", route.logic_method),
            (true, false) => format!("err := l.{}(&req)", route.logic_method),
            (false, true) => format!("resp, err := l.{}()", route.logic_method),
            (false, false) => format!("err := l.{}()", route.logic_method),
        };
        let ok = if route.has_response() {
            "httpx.OkJsonCtx(r.Context(), w, resp)"
        } else {
            "httpx.Ok(w)"
        };

        CodeBuilder::go()
            .comments(&self.swagger_doc(policy, route))
            .blank()
            .block(
                &format!(
                    "func {}(svcCtx *svc.ServiceContext) http.HandlerFunc {{",
                    route.handler
                ),
                |b| {
                    b.block("return func(w http.ResponseWriter, r *http.Request) {", |b| {
                        let b = match &route.request {
                            Some(request) => b
                                .line(&format!("var req {}", request_type(request)))
                                .block("if err := httpx.Parse(r, &req); err != nil {", |b| {
                                    b.line("httpx.ErrorCtx(r.Context(), w, err)").line("return")
                                })
                                .blank(),
                            None => b,
                        };
                        b.line(&format!(
                            "l := {}.New{}(r.Context(), svcCtx)",
                            self.logic_package(),
                            logic_type
                        ))
                        .line(&call)
                        .line("if err != nil {")
                        .indent()
                        .when(self.settings.trans_err, |b| {
                            b.line("err = svcCtx.Trans.TransError(r.Context(), err)")
                        })
                        .line("httpx.ErrorCtx(r.Context(), w, err)")
                        .dedent()
                        .line("} else {")
                        .indent()
                        .line(ok)
                        .dedent()
                        .line("}")
                    })
                },
            )
            .build()
    }
}

/// Route path in swagger form: `:id` becomes `{id}`, the prefix is joined in front.
pub(crate) fn swagger_path(prefix: Option<&str>, path: &str) -> String {
    let converted = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");
    let joined = format!("{}/{}", prefix.unwrap_or(""), converted.trim_start_matches('/'));
    let segments: Vec<&str> = joined.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

impl GeneratedFile for HandlerGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        nested_path(base, &["internal", "handler"], self.folder)
            .join(self.settings.naming.file_name(&self.service.source, ".go"))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated()
    }

    fn render(&self) -> String {
        GoFile::new(self.package())
            .imports(&self.imports())
            .add_all(self.routes.iter().map(|(p, r)| self.handler_fn(p, r)))
            .render()
    }
}

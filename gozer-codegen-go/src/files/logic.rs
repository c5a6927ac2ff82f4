use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports, naming::Naming};
use gozer_core::{FileRules, GeneratedFile, to_pascal_case};
use gozer_ir::{GoType, OperationKind, RouteIR, ServiceIR, TypeFieldIR};

use super::{
    TYPES_PACKAGE, imports, key_values, nested_path, request_type, response_type, routes_in_folder,
};
use crate::{GoFile, GoSettings, RpcClient};

/// Shared id messages a request type may already be.
const ID_MESSAGES: [&str; 4] = ["IDReq", "IDsReq", "UUIDReq", "UUIDsReq"];

/// Inline structs are expanded at most this deep.
const MAX_INLINE_DEPTH: usize = 4;

/// Logic of one spec file for the routes in one folder.
///
/// CRUD-classified routes are wired to the configured RPC client; everything
/// else gets a stub body to fill in.
pub struct LogicGo<'a> {
    settings: &'a GoSettings,
    service: &'a ServiceIR,
    folder: Option<&'a str>,
    routes: Vec<&'a RouteIR>,
}

impl<'a> LogicGo<'a> {
    pub fn new(settings: &'a GoSettings, service: &'a ServiceIR, folder: Option<&'a str>) -> Self {
        Self {
            settings,
            service,
            folder,
            routes: routes_in_folder(service, folder)
                .into_iter()
                .map(|(_, r)| r)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn logic_type(&self) -> String {
        self.settings.naming.logic_type(&self.service.source)
    }

    /// Model the RPC messages are named after, e.g. `User` for `user.toml`.
    fn model(&self) -> String {
        to_pascal_case(self.settings.naming.base_name(&self.service.source))
    }

    fn rpc_for(&self, route: &RouteIR) -> Option<&'a RpcClient> {
        self.settings
            .rpc
            .as_ref()
            .filter(|_| route.operation != OperationKind::Custom)
    }

    fn uses_types(&self) -> bool {
        self.routes
            .iter()
            .any(|r| r.has_request() || (r.has_response() && !r.response_primitive_only))
    }

    fn imports(&self, decls: &[String]) -> GoImports {
        let mut imports = GoImports::new();
        imports.add("context");
        imports.add(&self.settings.internal("svc"));
        imports.add_if(self.uses_types(), &self.settings.internal(TYPES_PACKAGE));
        imports.add(imports::LOGX);
        if let Some(rpc) = self.routes.iter().find_map(|r| self.rpc_for(r)) {
            imports.add(&rpc.import);
            imports.add_if(decls.iter().any(|d| d.contains("i18n.")), imports::I18N);
        }
        imports
    }

    /// Fields of a named type with inline members expanded.
    fn flat_fields(&self, name: &str) -> Vec<&'a TypeFieldIR> {
        let mut fields = Vec::new();
        self.collect_fields(name, 0, &mut fields);
        fields
    }

    fn collect_fields(&self, name: &str, depth: usize, out: &mut Vec<&'a TypeFieldIR>) {
        let service: &'a ServiceIR = self.service;
        let Some(ty) = service.types.iter().find(|t| t.name == name) else {
            return;
        };
        for field in &ty.fields {
            match field.ty.struct_name().filter(|_| field.inline) {
                Some(inner) if depth < MAX_INLINE_DEPTH => {
                    self.collect_fields(inner, depth + 1, out)
                }
                _ => out.push(field),
            }
        }
    }

    fn field<'f>(&self, fields: &[&'f TypeFieldIR], name: &str) -> Option<&'f TypeFieldIR> {
        fields.iter().copied().find(|f| f.name == name)
    }

    fn decls(&self) -> Vec<String> {
        let logic = self.logic_type();
        let mut decls = vec![
            CodeBuilder::go()
                .block(&format!("type {} struct {{", logic), |b| {
                    b.line("logx.Logger")
                        .line("ctx    context.Context")
                        .line("svcCtx *svc.ServiceContext")
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
                            b.line("Logger: logx.WithContext(ctx),")
                                .line("ctx:    ctx,")
                                .line("svcCtx: svcCtx,")
                        })
                    },
                )
                .build(),
        ];
        decls.extend(self.routes.iter().map(|r| self.method(r)));
        decls
    }

    fn signature(&self, route: &RouteIR) -> String {
        let params = match &route.request {
            Some(request) => format!("req *{}", request_type(request)),
            None => String::new(),
        };
        let results = match &route.response {
            Some(response) => format!("(resp {}, err error)", response_type(response)),
            None => "error".to_string(),
        };
        format!(
            "func (l *{}) {}({}) {} {{",
            self.logic_type(),
            route.logic_method,
            params,
            results
        )
    }

    fn method(&self, route: &RouteIR) -> String {
        let body = match self.rpc_for(route) {
            Some(rpc) => self.rpc_body(rpc, route),
            None => stub_body(route),
        };
        CodeBuilder::go()
            .comments(&route.docs)
            .block(&self.signature(route), |b| b.raw(&body))
            .build()
    }

    /// RPC method and request message for a CRUD route.
    fn rpc_call(&self, route: &RouteIR) -> (String, String) {
        let model = self.model();
        let request = route.request.as_ref().and_then(|r| r.struct_name());
        let id_message = request.filter(|r| ID_MESSAGES.contains(r));
        let uuid = self.settings.use_uuid;
        match route.operation {
            OperationKind::Delete => (
                format!("Delete{}", model),
                id_message
                    .unwrap_or(if uuid { "UUIDReq" } else { "IDReq" })
                    .to_string(),
            ),
            OperationKind::GetById => (
                format!("Get{}ById", model),
                id_message
                    .unwrap_or(if uuid { "UUIDReq" } else { "IDReq" })
                    .to_string(),
            ),
            OperationKind::GetList => (format!("Get{}List", model), format!("{}ListReq", model)),
            _ => (format!("CreateOrUpdate{}", model), format!("{}Info", model)),
        }
    }

    fn rpc_body(&self, rpc: &RpcClient, route: &RouteIR) -> String {
        let (method, message) = self.rpc_call(route);
        let request_fields = route
            .request
            .as_ref()
            .and_then(|r| r.struct_name())
            .map(|name| self.flat_fields(name))
            .unwrap_or_default();
        let fail = match &route.response {
            Some(response) if response.struct_name().is_some() => "return nil, err",
            Some(_) => "return resp, err",
            None => "return err",
        };
        let tail = self.rpc_response(route);
        // `err` is already declared when the results are named.
        let target = match (tail.contains("data."), route.has_response()) {
            (true, _) => "data, err :=",
            (false, true) => "_, err =",
            (false, false) => "_, err :=",
        };

        CodeBuilder::go()
            .indent()
            .block_with_close(
                &format!(
                    "{} l.svcCtx.{}.{}(l.ctx, &{}.{}{{",
                    target, rpc.field, method, rpc.package, message
                ),
                "})",
                |b| b.each(copies(&request_fields, "req"), |b, line| b.line(&line)),
            )
            .block("if err != nil {", |b| b.line(fail))
            .blank()
            .raw(&tail)
            .build()
    }

    /// Statements after a successful RPC call, ending in a return.
    fn rpc_response(&self, route: &RouteIR) -> String {
        let b = CodeBuilder::go().indent();
        let Some(response_ty) = &route.response else {
            return b.line("return nil").build();
        };
        let Some(response) = response_ty.struct_name() else {
            return self.bare_response(b, route, response_ty);
        };
        let fields = self.flat_fields(response);
        let msg = self.field(&fields, "Msg").map(|_| self.message_expr(route));

        match route.operation {
            OperationKind::GetList => self.list_response(b, response, &fields, msg),
            OperationKind::GetById => self.info_response(b, response, &fields, msg),
            _ => b
                .line(&format!("return &{}.{}{{", TYPES_PACKAGE, response))
                .indent()
                .when(msg.is_some(), |b| {
                    b.line(&format!("Msg: {},", msg.clone().unwrap_or_default()))
                })
                .dedent()
                .line("}, nil")
                .build(),
        }
    }

    /// Responses that are not a named struct: a list of structs is filled from
    /// `data.Data`, anything else is returned as its zero value.
    fn bare_response(&self, b: CodeBuilder, route: &RouteIR, response: &GoType) -> String {
        let item = match response {
            GoType::Slice(inner) if route.operation == OperationKind::GetList => {
                inner.struct_name().map(String::from)
            }
            _ => None,
        };
        match item {
            Some(item) => b
                .block("for _, v := range data.Data {", |b| {
                    b.line(&format!("resp = append(resp, {}.{}{{", TYPES_PACKAGE, item))
                        .indent()
                        .each(self.copy_fields(&item, "v"), |b, line| b.line(&line))
                        .dedent()
                        .line("})")
                })
                .line("return resp, nil")
                .build(),
            None => b.line("return resp, nil").build(),
        }
    }

    /// Message returned to the caller; write operations pass the RPC's message through.
    fn message_expr(&self, route: &RouteIR) -> String {
        let value = match route.operation {
            OperationKind::GetById | OperationKind::GetList => {
                if self.settings.use_i18n {
                    "i18n.Success".to_string()
                } else {
                    "\"successful\"".to_string()
                }
            }
            _ => "data.Msg".to_string(),
        };
        if self.settings.has_translator() {
            format!("l.svcCtx.Trans.Trans(l.ctx, {})", value)
        } else {
            value
        }
    }

    /// Assignments copying `source` into the fields of `target`.
    fn copy_fields(&self, target: &str, source: &str) -> Vec<String> {
        copies(&self.flat_fields(target), source)
    }

    fn info_response(
        &self,
        b: CodeBuilder,
        response: &str,
        fields: &[&TypeFieldIR],
        msg: Option<String>,
    ) -> String {
        let data = self
            .field(fields, "Data")
            .and_then(|f| f.ty.struct_name().map(String::from));
        b.line(&format!("return &{}.{}{{", TYPES_PACKAGE, response))
            .indent()
            .when(msg.is_some(), |b| {
                b.line(&format!("Msg: {},", msg.clone().unwrap_or_default()))
            })
            .raw(&match &data {
                Some(data) => CodeBuilder::go()
                    .indent()
                    .indent()
                    .block_with_close(&format!("Data: {}.{}{{", TYPES_PACKAGE, data), "},", |b| {
                        b.each(self.copy_fields(data, "data"), |b, line| b.line(&line))
                    })
                    .build(),
                None => CodeBuilder::go()
                    .indent()
                    .indent()
                    .each(
                        copies(
                            &fields.iter().copied().filter(|f| f.name != "Msg").collect::<Vec<_>>(),
                            "data",
                        ),
                        |b, line| b.line(&line),
                    )
                    .build(),
            })
            .dedent()
            .line("}, nil")
            .build()
    }

    fn list_response(
        &self,
        b: CodeBuilder,
        response: &str,
        fields: &[&TypeFieldIR],
        msg: Option<String>,
    ) -> String {
        // A list either sits on the response or on its `Data` struct.
        let nested = self
            .field(fields, "Data")
            .and_then(|f| f.ty.struct_name())
            .map(|name| (name.to_string(), self.flat_fields(name)));
        let (holder, list_fields) = match &nested {
            Some((_, inner)) => ("resp.Data", inner.as_slice()),
            None => ("resp", fields),
        };
        let item = self
            .field(list_fields, "Data")
            .and_then(|f| match &f.ty {
                GoType::Slice(inner) => inner.struct_name().map(String::from),
                _ => None,
            });

        b.line(&format!("resp = &{}.{}{{}}", TYPES_PACKAGE, response))
            .when(msg.is_some(), |b| {
                b.line(&format!("resp.Msg = {}", msg.clone().unwrap_or_default()))
            })
            .when(self.field(list_fields, "Total").is_some(), |b| {
                b.line(&format!("{}.Total = data.GetTotal()", holder))
            })
            .when(item.is_some(), |b| {
                let item = item.clone().unwrap_or_default();
                b.block("for _, v := range data.Data {", |b| {
                    b.line(&format!(
                        "{}.Data = append({}.Data, {}.{}{{",
                        holder, holder, TYPES_PACKAGE, item
                    ))
                    .indent()
                    .each(self.copy_fields(&item, "v"), |b, line| b.line(&line))
                    .dedent()
                    .line("})")
                })
            })
            .line("return resp, nil")
            .build()
    }
}

/// `Name: source.Name,` for every field.
fn copies(fields: &[&TypeFieldIR], source: &str) -> Vec<String> {
    let pairs: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.name.clone(), format!("{}.{}", source, f.name)))
        .collect();
    key_values(&pairs)
}

fn stub_body(route: &RouteIR) -> String {
    CodeBuilder::go()
        .indent()
        .comment("todo: add your logic here and delete this line")
        .blank()
        .line(if route.has_response() { "return" } else { "return nil" })
        .build()
}

impl GeneratedFile for LogicGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        nested_path(base, &["internal", "logic"], self.folder)
            .join(self.settings.naming.file_name(&self.service.source, ".go"))
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let package = self
            .folder
            .map(Naming::package_name)
            .unwrap_or_else(|| "logic".to_string());
        let decls = self.decls();
        GoFile::new(package)
            .imports(&self.imports(&decls))
            .add_all(decls)
            .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::fixtures::{settings, user_service};

    fn rpc_settings() -> GoSettings {
        GoSettings {
            rpc: Some(RpcClient {
                field: "CoreRpc".into(),
                package: "coreclient".into(),
                import: "github.com/acme/core/rpc/coreclient".into(),
                service: "Core".into(),
            }),
            ..settings()
        }
    }

    #[test]
    fn test_stub_without_rpc() {
        let settings = settings();
        let service = user_service();
        let logic = LogicGo::new(&settings, &service, Some("user"));
        let content = logic.render();

        assert_eq!(logic.path(Path::new("")), Path::new("internal/logic/user/user.go"));
        assert!(content.starts_with("package user\n"));
        assert!(content.contains("type UserLogic struct {\n\tlogx.Logger\n"));
        assert!(content.contains(
            "func NewUserLogic(ctx context.Context, svcCtx *svc.ServiceContext) *UserLogic {"
        ));
        assert!(content.contains(
            concat!(
                "func (l *UserLogic) ",
                "CreateUser(req *types.UserInfo) (resp *types.BaseMsgResp, err error) {"
            )
        ));
        assert_eq!(content.matches("// todo: add your logic here and delete this line").count(), 3);
        assert!(!content.contains("coreclient"));
    }

    #[test]
    fn test_rpc_bodies() {
        let settings = rpc_settings();
        let service = user_service();
        let content = LogicGo::new(&settings, &service, Some("user")).render();

        assert!(content.contains("\"github.com/acme/core/rpc/coreclient\""));
        assert!(content.contains(
            "data, err := l.svcCtx.CoreRpc.CreateOrUpdateUser(l.ctx, &coreclient.UserInfo{"
        ));
        assert!(content.contains("\t\tUsername: req.Username,\n"));
        assert!(content.contains("\t\tMsg: data.Msg,\n"));
        assert!(content.contains(
            "data, err := l.svcCtx.CoreRpc.GetUserList(l.ctx, &coreclient.UserListReq{"
        ));
        assert!(content.contains("\tresp.Total = data.GetTotal()\n"));
        assert!(content.contains("\t\tresp.Data = append(resp.Data, types.UserInfo{\n"));
        assert!(content.contains(
            "data, err := l.svcCtx.CoreRpc.GetUserById(l.ctx, &coreclient.IDReq{"
        ));
        assert!(content.contains("\t\tMsg: \"successful\",\n"));
        assert!(content.contains("\t\tData: types.UserInfo{\n\t\t\tId:       data.Id,\n"));
        assert!(!content.contains("todo:"));
        assert!(!content.contains("simple-admin-common/i18n"));
    }

    #[test]
    fn test_delete_keeps_id_message() {
        let settings = GoSettings {
            use_uuid: true,
            ..rpc_settings()
        };
        let mut service = user_service();
        let route = &mut service.groups[0].routes[0];
        route.operation = OperationKind::Delete;
        route.request = Some(GoType::Struct("UUIDsReq".into()));
        let logic = LogicGo::new(&settings, &service, Some("user"));
        let route = &service.groups[0].routes[0];
        assert_eq!(
            logic.rpc_call(route),
            ("DeleteUser".to_string(), "UUIDsReq".to_string())
        );

        let route = &service.groups[0].routes[2];
        assert_eq!(
            logic.rpc_call(route),
            ("GetUserById".to_string(), "IDReq".to_string())
        );
    }
}

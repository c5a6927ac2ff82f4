use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::GoImports, naming::Naming};
use gozer_core::{FileRules, GeneratedFile};
use gozer_ir::{EffectiveGroupPolicy, GroupIR, RouteIR, SERVICE_CONTEXT_ACCESSOR};

use super::imports::REST;
use crate::GoFile;

/// `internal/handler/routes.go`: registers every route group once.
pub struct RoutesGo<'a> {
    module_path: &'a str,
    groups: &'a [GroupIR],
}

impl<'a> RoutesGo<'a> {
    pub fn new(module_path: &'a str, groups: &'a [GroupIR]) -> Self {
        Self {
            module_path,
            groups,
        }
    }

    fn imports(&self) -> GoImports {
        let mut imports = GoImports::new();
        imports.add("net/http");
        imports.add_if(self.groups.iter().any(|g| g.policy.has_timeout()), "time");
        imports.add(&format!("{}/internal/svc", self.module_path));
        imports.add(REST);
        for folder in self.routes().filter_map(|r| r.folder.as_deref()) {
            imports.add_aliased(
                &format!("{}/internal/handler/{}", self.module_path, folder),
                &Naming::package_alias(folder),
            );
        }
        imports
    }

    fn routes(&self) -> impl Iterator<Item = &RouteIR> {
        self.groups.iter().flat_map(|g| g.routes.iter())
    }

    fn register_fn(&self) -> String {
        CodeBuilder::go()
            .block(
                &format!(
                    "func RegisterHandlers(server *rest.Server, {} *svc.ServiceContext) {{",
                    SERVICE_CONTEXT_ACCESSOR
                ),
                |b| {
                    b.each(self.groups.iter().enumerate(), |b, (index, group)| {
                        b.when(index > 0, |b| b.blank()).raw(&add_routes(group))
                    })
                },
            )
            .build()
    }
}

/// One `server.AddRoutes(...)` statement, indented for the function body.
fn add_routes(group: &GroupIR) -> String {
    CodeBuilder::go()
        .indent()
        .block_with_close("server.AddRoutes(", ")", |b| {
            let b = if group.policy.middleware.is_empty() {
                route_slice(b, &group.routes, "},")
            } else {
                b.block_with_close("rest.WithMiddlewares(", "),", |b| {
                    let b = b.line(&format!(
                        "[]rest.Middleware{{{}}},",
                        group.policy.qualified_middleware().join(", ")
                    ));
                    route_slice(b, &group.routes, "}...,")
                })
            };
            b.each(server_options(&group.policy), |b, option| b.line(&option))
        })
        .build()
}

fn route_slice(b: CodeBuilder, routes: &[RouteIR], close: &str) -> CodeBuilder {
    b.block_with_close("[]rest.Route{", close, |b| {
        b.each(routes, |b, route| {
            b.block_with_close("{", "},", |b| {
                b.line(&format!("Method:  {},", route.method.go_constant()))
                    .line(&format!("Path:    \"{}\",", route.path))
                    .line(&format!(
                        "Handler: {}({}),",
                        handler_expr(route),
                        SERVICE_CONTEXT_ACCESSOR
                    ))
            })
        })
    })
}

fn handler_expr(route: &RouteIR) -> String {
    match &route.folder {
        Some(folder) => format!("{}.{}", Naming::package_alias(folder), route.handler),
        None => route.handler.clone(),
    }
}

/// Server options derived from a group policy, in a fixed order.
pub(crate) fn server_options(policy: &EffectiveGroupPolicy) -> Vec<String> {
    let ctx = SERVICE_CONTEXT_ACCESSOR;
    let mut options = Vec::new();
    if let Some(auth) = &policy.auth {
        if let Some(secret) = &auth.secret {
            options.push(format!("rest.WithJwt({}.Config.{}.AccessSecret),", ctx, secret));
        }
        if let Some(transition) = &auth.transition {
            options.push(format!(
                "rest.WithJwtTransition({ctx}.Config.{t}.PrevSecret, {ctx}.Config.{t}.Secret),",
                ctx = ctx,
                t = transition
            ));
        }
    }
    if policy.signature {
        options.push(format!("rest.WithSignature({}.Config.Signature),", ctx));
    }
    if let Some(prefix) = &policy.prefix {
        options.push(format!("rest.WithPrefix(\"{}\"),", prefix));
    }
    if let Some(timeout) = policy.timeout {
        options.push(format!("rest.WithTimeout({} * time.Millisecond),", timeout.as_millis()));
    }
    if let Some(max_bytes) = policy.max_bytes {
        options.push(format!("rest.WithMaxBytes({}),", max_bytes));
    }
    options
}

impl GeneratedFile for RoutesGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("internal").join("handler").join("routes.go")
    }

    fn rules(&self) -> FileRules {
        FileRules::generated()
    }

    fn render(&self) -> String {
        GoFile::new("handler")
            .imports(&self.imports())
            .add(self.register_fn())
            .render()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gozer_ir::{AuthPolicy, HttpMethod, OperationKind};

    use super::*;

    fn route(handler: &str, folder: Option<&str>) -> RouteIR {
        RouteIR {
            method: HttpMethod::Post,
            path: "/user/create".into(),
            handler: handler.into(),
            logic_method: handler.trim_end_matches("Handler").into(),
            folder: folder.map(String::from),
            request: None,
            response: None,
            response_primitive_only: true,
            operation: OperationKind::Create,
            docs: Vec::new(),
        }
    }

    fn group(policy: EffectiveGroupPolicy, routes: Vec<RouteIR>) -> GroupIR {
        GroupIR {
            label: "group 'user'".into(),
            policy,
            routes,
        }
    }

    #[test]
    fn test_each_group_registered_once() {
        let groups = vec![
            group(
                EffectiveGroupPolicy::default(),
                vec![route("CreateUserHandler", Some("user"))],
            ),
            group(
                EffectiveGroupPolicy::default(),
                vec![route("PingHandler", None)],
            ),
        ];
        let content = RoutesGo::new("example.com/core", &groups).render();

        assert_eq!(content.matches("server.AddRoutes(").count(), 2);
        assert_eq!(content.matches("user.CreateUserHandler(serverCtx)").count(), 1);
        assert!(content.contains("Handler: PingHandler(serverCtx),"));
        assert!(content.contains("user \"example.com/core/internal/handler/user\""));
        assert!(content.contains(
            "func RegisterHandlers(server *rest.Server, serverCtx *svc.ServiceContext) {"
        ));
        assert!(!content.contains("\"time\""));
    }

    #[test]
    fn test_policy_options() {
        let policy = EffectiveGroupPolicy {
            auth: Some(AuthPolicy {
                secret: Some("Auth".into()),
                transition: Some("Rotation".into()),
            }),
            signature: true,
            timeout: Some(Duration::from_secs(3)),
            max_bytes: Some(1024),
            middleware: vec!["Authority".into(), "Log".into()],
            prefix: Some("/api/v1".into()),
            folder: Some("user".into()),
        };
        let groups = vec![group(policy, vec![route("CreateUserHandler", Some("user"))])];
        let content = RoutesGo::new("example.com/core", &groups).render();

        assert!(content.contains("rest.WithMiddlewares(\n"));
        assert!(content.contains("[]rest.Middleware{serverCtx.Authority, serverCtx.Log},"));
        assert!(content.contains("}...,"));
        assert!(content.contains("rest.WithJwt(serverCtx.Config.Auth.AccessSecret),"));
        assert!(content.contains(concat!(
            "rest.WithJwtTransition(",
            "serverCtx.Config.Rotation.PrevSecret, serverCtx.Config.Rotation.Secret),"
        )));
        assert!(content.contains("rest.WithSignature(serverCtx.Config.Signature),"));
        assert!(content.contains("rest.WithPrefix(\"/api/v1\"),"));
        assert!(content.contains("rest.WithTimeout(3000 * time.Millisecond),"));
        assert!(content.contains("rest.WithMaxBytes(1024),"));
        assert!(content.contains("\t\"time\""));
    }

    #[test]
    fn test_path() {
        let groups = Vec::new();
        let routes = RoutesGo::new("example.com/core", &groups);
        assert_eq!(
            routes.path(Path::new("out")),
            Path::new("out/internal/handler/routes.go")
        );
    }
}

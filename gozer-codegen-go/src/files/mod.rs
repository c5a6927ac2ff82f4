//! One type per emitted Go or proto file.

use std::path::{Path, PathBuf};

use gozer_ir::{EffectiveGroupPolicy, GoType, RouteIR, ServiceIR};

mod crud_logic;
mod handler;
mod logic;
mod model;
mod proto;
mod routes;
mod service_context;
mod types;

pub use crud_logic::CrudLogicGo;
pub use handler::HandlerGo;
pub use logic::LogicGo;
pub use model::ModelGo;
pub use proto::{ProtoGo, umbrella_preamble};
pub use routes::RoutesGo;
pub use service_context::ServiceContextGo;
pub use types::TypesGo;

/// Well-known import paths.
pub mod imports {
    pub const REST: &str = "github.com/zeromicro/go-zero/rest";
    pub const HTTPX: &str = "github.com/zeromicro/go-zero/rest/httpx";
    pub const LOGX: &str = "github.com/zeromicro/go-zero/core/logx";
    pub const ZRPC: &str = "github.com/zeromicro/go-zero/zrpc";
    pub const CASBIN: &str = "github.com/casbin/casbin/v2";
    pub const I18N: &str = "github.com/suyuan32/simple-admin-common/i18n";
    pub const UUIDX: &str = "github.com/suyuan32/simple-admin-common/utils/uuidx";
    pub const UUID: &str = "github.com/gofrs/uuid/v5";
}

/// Package name of the Go types package.
pub(crate) const TYPES_PACKAGE: &str = "types";

/// `base/{root...}/{folder}`; no folder segment when `folder` is `None`.
pub(crate) fn nested_path(base: &Path, root: &[&str], folder: Option<&str>) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in root {
        path.push(segment);
    }
    if let Some(folder) = folder {
        for segment in folder.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
    }
    path
}

/// Routes of `service` whose effective folder is `folder`, with their group policy.
pub(crate) fn routes_in_folder<'a>(
    service: &'a ServiceIR,
    folder: Option<&str>,
) -> Vec<(&'a EffectiveGroupPolicy, &'a RouteIR)> {
    service
        .groups
        .iter()
        .flat_map(|g| g.routes.iter().map(move |r| (&g.policy, r)))
        .filter(|(_, r)| r.folder.as_deref() == folder)
        .collect()
}

/// `name: value` pairs with values aligned like `gofmt` aligns them.
pub(crate) fn key_values(pairs: &[(String, String)]) -> Vec<String> {
    let width = pairs.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$} {},", format!("{}:", k), v, width = width))
        .collect()
}

/// Struct field lines with aligned types.
pub(crate) fn struct_fields(fields: &[(String, String)]) -> Vec<String> {
    let width = fields.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(n, t)| format!("{:<width$} {}", n, t, width = width))
        .collect()
}

/// Doc strings as `//` comment lines; lines already starting with `//` are kept.
pub(crate) fn doc_comments(docs: &[String]) -> Vec<String> {
    docs.iter()
        .map(|d| {
            let d = d.trim();
            if d.starts_with("//") {
                d.to_string()
            } else if d.is_empty() {
                "//".to_string()
            } else {
                format!("// {}", d)
            }
        })
        .collect()
}

/// Type the handler decodes into: the request without a leading pointer.
pub(crate) fn request_type(ty: &GoType) -> String {
    match ty {
        GoType::Pointer(inner) => inner.expr(Some(TYPES_PACKAGE)),
        other => other.expr(Some(TYPES_PACKAGE)),
    }
}

/// Type a logic method returns; named structs are returned by pointer.
pub(crate) fn response_type(ty: &GoType) -> String {
    match ty {
        GoType::Struct(name) => format!("*{}.{}", TYPES_PACKAGE, name),
        other => other.expr(Some(TYPES_PACKAGE)),
    }
}

pub(crate) fn uses_uuid(ty: &GoType) -> bool {
    match ty {
        GoType::Uuid => true,
        GoType::Pointer(inner) | GoType::Slice(inner) => uses_uuid(inner),
        GoType::Map { key, value } => uses_uuid(key) || uses_uuid(value),
        _ => false,
    }
}

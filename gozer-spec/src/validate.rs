//! Structural validation of parsed inputs.

use std::collections::{HashMap, HashSet};

use gozer_ir::HttpMethod;

use crate::{
    Result, Route, RouteGroup, SchemaConfig, ServiceSpec, SourceContext, TypeRef, annotation,
};

impl ServiceSpec {
    /// Check the structural invariants of a spec.
    ///
    /// Type names must be unique, handler names unique within the folder
    /// their routes land in, every method known, every path absolute and
    /// every type reference well formed.
    pub fn validate(&self, ctx: &SourceContext) -> Result<()> {
        let mut type_names = HashSet::new();
        for def in &self.types {
            if !is_identifier(&def.name) {
                return Err(ctx.validation_error(
                    format!("type name '{}' is not a valid identifier", def.name),
                    Some(&def.name),
                ));
            }
            if !type_names.insert(def.name.as_str()) {
                return Err(ctx.validation_error(
                    format!("type '{}' is declared more than once", def.name),
                    Some(&def.name),
                ));
            }
            for field in &def.fields {
                if field.name.is_empty() && !field.inline {
                    return Err(ctx.validation_error(
                        format!("field of type '{}' in '{}' has no name", field.ty, def.name),
                        Some(&def.name),
                    ));
                }
                check_type_ref(ctx, &field.ty)?;
            }
        }

        let mut handlers: HashMap<String, HashSet<String>> = HashMap::new();
        for group in &self.groups {
            for route in &group.routes {
                if HttpMethod::parse(&route.method).is_none() {
                    return Err(ctx.unknown_method_error(&route.method));
                }
                if !route.path.starts_with('/') {
                    return Err(ctx.validation_error(
                        format!("route path '{}' must start with '/'", route.path),
                        Some(&route.path),
                    ));
                }
                if !is_identifier(&route.handler) {
                    return Err(ctx.validation_error(
                        format!("handler name '{}' is not a valid identifier", route.handler),
                        Some(&route.handler),
                    ));
                }
                let folder = folder_key(route, group);
                if !handlers
                    .entry(folder.clone())
                    .or_default()
                    .insert(route.handler.to_ascii_lowercase())
                {
                    return Err(ctx.validation_error(
                        format!(
                            "handler '{}' is declared more than once in folder '{}'",
                            route.handler, folder
                        ),
                        Some(&route.handler),
                    ));
                }
                for ty in route.request.iter().chain(route.response.iter()) {
                    check_type_ref(ctx, ty)?;
                }
            }
        }

        Ok(())
    }
}

impl SchemaConfig {
    /// Check that tables and their columns are uniquely named.
    pub fn validate(&self, ctx: &SourceContext) -> Result<()> {
        let mut tables = HashSet::new();
        for table in &self.tables {
            if table.table_name.trim().is_empty() {
                return Err(ctx.validation_error("table name must not be empty", None));
            }
            if !tables.insert(table.table_name.as_str()) {
                return Err(ctx.validation_error(
                    format!("table '{}' is listed more than once", table.table_name),
                    Some(&table.table_name),
                ));
            }
            let mut columns = HashSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(ctx.validation_error(
                        format!(
                            "column '{}' appears twice in table '{}'",
                            column.name, table.table_name
                        ),
                        Some(&column.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_type_ref(ctx: &SourceContext, expr: &str) -> Result<()> {
    expr.parse::<TypeRef>()
        .map(|_| ())
        .map_err(|reason| ctx.invalid_type_ref_error(expr, reason))
}

/// Case-folded folder a route resolves to: its own `group` annotation,
/// else its group's. Empty for the handler root.
fn folder_key(route: &Route, group: &RouteGroup) -> String {
    [route.annotation(annotation::GROUP), group.annotation(annotation::GROUP)]
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .trim_matches('/')
                .to_lowercase()
        })
        .find(|folder| !folder.is_empty())
        .unwrap_or_default()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

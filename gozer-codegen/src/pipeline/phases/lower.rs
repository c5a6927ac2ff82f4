//! Lower phase - builds the route-spec IR.

use eyre::{Result, eyre};
use gozer_ir::{GoType, GroupIR, RouteIR, ServiceIR, TypeFieldIR, TypeIR};
use gozer_spec::{Route, RouteGroup, TypeDef, TypeRef, annotation};

use crate::{
    annotations,
    classifier::Classifier,
    naming::Naming,
    pipeline::{CompilationContext, Diagnostic, Phase},
    type_mapper::map_type_ref,
};

/// Type name suffixes that receive swagger model documentation.
const DOCUMENTED_SUFFIXES: &[&str] = &["Req", "Info", "Resp"];

/// Phase that resolves the spec into a [`ServiceIR`].
pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let naming = ctx.options.naming;
        let mut groups = Vec::with_capacity(ctx.spec.groups.len());
        let mut skipped = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, group) in ctx.spec.groups.iter().enumerate() {
            let label = group_label(index, group);
            let mut policy = match annotations::resolve_group(group, &label) {
                Ok(policy) => policy,
                Err(err) => {
                    tracing::warn!(source = %ctx.source, group = %label, "skipping group: {}", err);
                    diagnostics.push(Diagnostic::error(self.name(), err.to_string()).at(&label));
                    skipped.push(label);
                    continue;
                }
            };
            policy.folder = policy.folder.map(|f| naming.folder(&f));

            let routes = group
                .routes
                .iter()
                .map(|route| lower_route(route, &policy, &naming, &ctx.options.classifier))
                .collect::<Result<Vec<_>>>()?;

            groups.push(GroupIR {
                label,
                policy,
                routes,
            });
        }

        let types = ctx
            .spec
            .types
            .iter()
            .map(lower_type)
            .collect::<Result<Vec<_>>>()?;

        ctx.ir = Some(ServiceIR {
            name: ctx
                .spec
                .service
                .name
                .clone()
                .unwrap_or_else(|| ctx.source.clone()),
            source: ctx.source.clone(),
            groups,
            types,
        });
        ctx.skipped_groups.extend(skipped);
        ctx.diagnostics.extend(diagnostics);
        Ok(())
    }
}

/// Diagnostic label of a group: its folder when it has one.
fn group_label(index: usize, group: &RouteGroup) -> String {
    match group.annotation(annotation::GROUP) {
        Some(folder) => format!("group '{}'", folder.trim()),
        None => format!("group #{}", index + 1),
    }
}

fn lower_route(
    route: &Route,
    policy: &gozer_ir::EffectiveGroupPolicy,
    naming: &Naming,
    classifier: &Classifier,
) -> Result<RouteIR> {
    let request = route.request.as_deref().map(parse_type).transpose()?;
    let response = route.response.as_deref().map(parse_type).transpose()?;
    let folder = annotations::route_folder(route, policy).map(|f| naming.folder(&f));
    let logic_method = naming.logic_method(&route.handler);

    Ok(RouteIR {
        method: gozer_ir::HttpMethod::parse(&route.method)
            .ok_or_else(|| eyre!("unknown HTTP method '{}'", route.method))?,
        path: route.path.clone(),
        handler: naming.handler_name(&route.handler),
        operation: classifier.classify(&format!("{}Logic", logic_method)),
        logic_method,
        folder,
        response_primitive_only: response.as_ref().is_some_and(GoType::is_primitive_only),
        request,
        response,
        docs: route.docs.clone(),
    })
}

fn lower_type(def: &TypeDef) -> Result<TypeIR> {
    let fields = def
        .fields
        .iter()
        .map(|field| {
            Ok(TypeFieldIR {
                name: field.name.clone(),
                ty: parse_type(&field.ty)?,
                tag: field.tag.clone(),
                docs: field.docs.clone(),
                inline: field.inline,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TypeIR {
        name: def.name.clone(),
        docs: def.docs.clone(),
        fields,
        documented: DOCUMENTED_SUFFIXES.iter().any(|s| def.name.ends_with(s)),
    })
}

fn parse_type(expr: &str) -> Result<GoType> {
    let ty: TypeRef = expr
        .parse()
        .map_err(|reason| eyre!("invalid type reference '{}': {}", expr, reason))?;
    Ok(map_type_ref(&ty))
}

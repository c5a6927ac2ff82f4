//! Route-spec IR.

use serde::Serialize;

use crate::{EffectiveGroupPolicy, GoType, HttpMethod, OperationKind};

/// One lowered service specification file.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceIR {
    /// Service name, from the spec or the file stem.
    pub name: String,
    /// File stem of the spec, used to name handler and logic files.
    pub source: String,
    /// Groups whose policy resolved, each exactly once.
    pub groups: Vec<GroupIR>,
    pub types: Vec<TypeIR>,
}

impl ServiceIR {
    /// Distinct middleware names across all groups, in first-use order.
    pub fn middleware(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for group in &self.groups {
            for name in &group.policy.middleware {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    pub fn route_count(&self) -> usize {
        self.groups.iter().map(|g| g.routes.len()).sum()
    }
}

/// A route group with its resolved policy.
#[derive(Debug, Clone, Serialize)]
pub struct GroupIR {
    /// Display label used in diagnostics.
    pub label: String,
    pub policy: EffectiveGroupPolicy,
    pub routes: Vec<RouteIR>,
}

/// Per-route metadata for handler and logic emission.
#[derive(Debug, Clone, Serialize)]
pub struct RouteIR {
    pub method: HttpMethod,
    pub path: String,
    /// Exported handler function, e.g. `CreateUserHandler`.
    pub handler: String,
    /// Logic method invoked by the handler, e.g. `CreateUser`.
    pub logic_method: String,
    /// Effective folder: the route's own override or the group's.
    pub folder: Option<String>,
    pub request: Option<GoType>,
    pub response: Option<GoType>,
    /// Response mentions no named struct, so no types import is needed.
    pub response_primitive_only: bool,
    pub operation: OperationKind,
    pub docs: Vec<String>,
}

impl RouteIR {
    pub fn has_request(&self) -> bool {
        self.request.is_some()
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

/// A declared data-transfer type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeIR {
    pub name: String,
    pub docs: Vec<String>,
    pub fields: Vec<TypeFieldIR>,
    /// Name ends in `Req`, `Info` or `Resp`.
    pub documented: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeFieldIR {
    pub name: String,
    pub ty: GoType,
    pub tag: Option<String>,
    pub docs: Vec<String>,
    pub inline: bool,
}

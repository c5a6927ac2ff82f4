//! Resolved route-group policy.

use std::time::Duration;

use serde::Serialize;

/// Identifier through which generated route code reaches the service context.
pub const SERVICE_CONTEXT_ACCESSOR: &str = "serverCtx";

/// Authentication settings of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthPolicy {
    /// Config section holding the signing secret.
    pub secret: Option<String>,
    /// Config section holding the previous and current secret during rotation.
    pub transition: Option<String>,
}

/// The validated merge of a route group's annotations.
///
/// Computed once per group and handed to emitters by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveGroupPolicy {
    pub auth: Option<AuthPolicy>,
    pub signature: bool,
    /// At least one millisecond when present.
    pub timeout: Option<Duration>,
    pub max_bytes: Option<i64>,
    /// Trimmed middleware names in declaration order.
    pub middleware: Vec<String>,
    /// Absolute path prefix, e.g. `/api/v1`.
    pub prefix: Option<String>,
    /// Handler/logic folder of the group.
    pub folder: Option<String>,
}

impl EffectiveGroupPolicy {
    pub fn auth_enabled(&self) -> bool {
        self.auth.is_some()
    }

    pub fn has_timeout(&self) -> bool {
        self.timeout.is_some()
    }

    /// Middleware names qualified with the service-context accessor.
    pub fn qualified_middleware(&self) -> Vec<String> {
        self.middleware
            .iter()
            .map(|m| format!("{}.{}", SERVICE_CONTEXT_ACCESSOR, m))
            .collect()
    }
}

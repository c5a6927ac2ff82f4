//! Validate phase - runs lints on the spec.
//!
//! Structural errors are caught when the spec is parsed; lints only look for
//! things that are legal but probably unintended.

use std::collections::HashMap;

use eyre::Result;
use gozer_spec::ServiceSpec;

use crate::pipeline::{CompilationContext, Diagnostic, Phase};

/// A lint that checks the spec for issues.
pub trait Lint: Send + Sync {
    fn name(&self) -> &'static str;

    /// Check the spec and add any diagnostics.
    fn check(&self, spec: &ServiceSpec, diagnostics: &mut Vec<Diagnostic>);
}

/// Phase that checks the spec using configurable lints.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// Create a new validate phase with default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![
                Box::new(DuplicateRouteLint),
                Box::new(EmptyGroupLint),
                Box::new(UndocumentedRouteLint),
            ],
        }
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        for lint in &self.lints {
            lint.check(&ctx.spec, &mut ctx.diagnostics);
        }
        Ok(())
    }
}

/// Warns when the same method and path are declared more than once.
pub struct DuplicateRouteLint;

impl Lint for DuplicateRouteLint {
    fn name(&self) -> &'static str {
        "duplicate-route"
    }

    fn check(&self, spec: &ServiceSpec, diagnostics: &mut Vec<Diagnostic>) {
        let mut seen: HashMap<(String, String), usize> = HashMap::new();
        for (index, group) in spec.groups.iter().enumerate() {
            for route in &group.routes {
                let key = (route.method.to_ascii_lowercase(), route.path.clone());
                if let Some(first) = seen.insert(key, index) {
                    diagnostics.push(
                        Diagnostic::warning(
                            "validate",
                            format!(
                                "{} {} is also declared in group #{}",
                                route.method.to_uppercase(),
                                route.path,
                                first + 1
                            ),
                        )
                        .at(format!("group #{}", index + 1)),
                    );
                }
            }
        }
    }
}

/// Warns about groups without routes.
pub struct EmptyGroupLint;

impl Lint for EmptyGroupLint {
    fn name(&self) -> &'static str {
        "empty-group"
    }

    fn check(&self, spec: &ServiceSpec, diagnostics: &mut Vec<Diagnostic>) {
        for (index, group) in spec.groups.iter().enumerate() {
            if group.routes.is_empty() {
                diagnostics.push(
                    Diagnostic::warning("validate", "group declares no routes")
                        .at(format!("group #{}", index + 1)),
                );
            }
        }
    }
}

/// Notes routes without documentation lines.
pub struct UndocumentedRouteLint;

impl Lint for UndocumentedRouteLint {
    fn name(&self) -> &'static str {
        "undocumented-route"
    }

    fn check(&self, spec: &ServiceSpec, diagnostics: &mut Vec<Diagnostic>) {
        for group in &spec.groups {
            for route in group.routes.iter().filter(|r| r.docs.is_empty()) {
                diagnostics.push(
                    Diagnostic::info("validate", "route has no documentation")
                        .at(format!("handler '{}'", route.handler)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(src: &str) -> ServiceSpec {
        ServiceSpec::from_str_with_filename(src, "test.toml").unwrap()
    }

    #[test]
    fn test_duplicate_route_across_groups() {
        let spec = spec(
            r#"
[[groups]]
routes = [{ method = "get", path = "/user", handler = "getUser", docs = ["x"] }]
[[groups]]
routes = [{ method = "GET", path = "/user", handler = "fetchUser", docs = ["x"] }]
"#,
        );
        let mut diagnostics = Vec::new();
        DuplicateRouteLint.check(&spec, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.as_deref(), Some("group #2"));
    }

    #[test]
    fn test_empty_group() {
        let spec = spec("[[groups]]\nannotations = { group = \"user\" }\n");
        let mut diagnostics = Vec::new();
        EmptyGroupLint.check(&spec, &mut diagnostics);
        assert!(diagnostics[0].severity.is_warning());
    }

    #[test]
    fn test_phase_runs_default_lints() {
        let spec = spec(
            r#"
[[groups]]
routes = [{ method = "get", path = "/user", handler = "getUser" }]
"#,
        );
        let mut ctx = CompilationContext::new(spec, "user", Default::default());
        ValidatePhase::new().run(&mut ctx).unwrap();
        assert_eq!(ctx.diagnostics.len(), 1);
    }
}

//! Go import collection.

use std::collections::BTreeMap;

use crate::builder::CodeBuilder;

/// Tracks the imports of one Go file.
///
/// Standard-library paths and module paths are kept in separate groups,
/// each sorted by path, which is the layout `goimports` produces.
///
/// # Example
///
/// ```
/// use gozer_codegen::generation::GoImports;
///
/// let mut imports = GoImports::new();
/// imports.add("net/http");
/// imports.add("github.com/zeromicro/go-zero/rest");
/// imports.add_aliased("example.com/core/internal/logic/admin/user", "adminuser");
///
/// assert!(imports.render().starts_with("import (\n\t\"net/http\"\n\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoImports {
    std: BTreeMap<String, Option<String>>,
    external: BTreeMap<String, Option<String>>,
}

impl GoImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str) {
        self.group_mut(path).entry(path.to_string()).or_insert(None);
    }

    /// Import `path` under `alias`. A later alias for the same path wins.
    pub fn add_aliased(&mut self, path: &str, alias: &str) {
        self.group_mut(path)
            .insert(path.to_string(), Some(alias.to_string()));
    }

    /// Add `path` only when `condition` holds.
    pub fn add_if(&mut self, condition: bool, path: &str) {
        if condition {
            self.add(path);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.std.contains_key(path) || self.external.contains_key(path)
    }

    pub fn merge(&mut self, other: &GoImports) {
        self.std
            .extend(other.std.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.external
            .extend(other.external.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn is_empty(&self) -> bool {
        self.std.is_empty() && self.external.is_empty()
    }

    pub fn len(&self) -> usize {
        self.std.len() + self.external.len()
    }

    /// Render the import declaration, or an empty string when there is none.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        if self.len() == 1 {
            let (path, alias) = self
                .std
                .iter()
                .chain(self.external.iter())
                .next()
                .map(|(p, a)| (p.as_str(), a.as_deref()))
                .unwrap_or_default();
            return format!("import {}\n", spec_line(path, alias));
        }

        CodeBuilder::go()
            .block_with_close("import (", ")", |b| {
                b.each(&self.std, |b, (path, alias)| {
                    b.line(&spec_line(path, alias.as_deref()))
                })
                .when(!self.std.is_empty() && !self.external.is_empty(), |b| {
                    b.blank()
                })
                .each(&self.external, |b, (path, alias)| {
                    b.line(&spec_line(path, alias.as_deref()))
                })
            })
            .build()
    }

    fn group_mut(&mut self, path: &str) -> &mut BTreeMap<String, Option<String>> {
        if is_std(path) {
            &mut self.std
        } else {
            &mut self.external
        }
    }
}

/// Standard-library paths have no dot in their first element.
fn is_std(path: &str) -> bool {
    !path.split('/').next().unwrap_or(path).contains('.')
}

fn spec_line(path: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{} \"{}\"", alias, path),
        None => format!("\"{}\"", path),
    }
}

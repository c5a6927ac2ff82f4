//! Umbrella descriptor merging.
//!
//! An umbrella descriptor (`all.proto`, `all.api`) is a preamble followed by
//! a list of imports. It is parsed into that structure, entries are
//! deduplicated by equality, and the result is serialized the same way every
//! time, so merging an entry that is already present changes nothing.

use std::path::Path;

use indexmap::IndexSet;

use crate::{Error, Result};

/// A parsed umbrella descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateDescriptor {
    /// Every non-import line, in order, without trailing blank lines.
    preamble: Vec<String>,
    /// Imported file names in first-appearance order.
    entries: IndexSet<String>,
}

impl AggregateDescriptor {
    /// A descriptor with the given preamble and no entries.
    pub fn with_preamble(preamble: &str) -> Self {
        Self::parse(preamble)
    }

    /// Parse descriptor text.
    ///
    /// Both `import "a.proto";` lines and `.api` style `import ( ... )`
    /// blocks are recognized.
    pub fn parse(text: &str) -> Self {
        let mut descriptor = Self::default();
        let mut in_block = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if in_block {
                if trimmed == ")" {
                    in_block = false;
                } else if let Some(target) = unquote(trimmed) {
                    descriptor.entries.insert(target.to_string());
                }
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("import") {
                let rest = rest.trim();
                if rest == "(" {
                    in_block = true;
                    continue;
                }
                if let Some(target) = unquote(rest.trim_end_matches(';').trim_end()) {
                    descriptor.entries.insert(target.to_string());
                    continue;
                }
            }
            descriptor.preamble.push(line.trim_end().to_string());
        }

        while descriptor.preamble.last().is_some_and(|l| l.is_empty()) {
            descriptor.preamble.pop();
        }
        descriptor
    }

    /// Add an entry. Returns `false` when it was already present.
    pub fn add(&mut self, entry: &str) -> bool {
        self.entries.insert(entry.to_string())
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        if !self.preamble.is_empty() && !self.entries.is_empty() {
            out.push('\n');
        }
        for entry in &self.entries {
            if entry.ends_with(".proto") {
                out.push_str(&format!("import \"{}\";\n", entry));
            } else {
                out.push_str(&format!("import \"{}\"\n", entry));
            }
        }
        out
    }

    /// Merge `entry` into the descriptor at `path`, creating it from
    /// `default_preamble` when missing.
    ///
    /// Returns whether the file changed.
    pub fn merge_into_file(path: &Path, default_preamble: &str, entry: &str) -> Result<bool> {
        let mut descriptor = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
            Self::parse(&text)
        } else {
            Self::with_preamble(default_preamble)
        };

        let before = descriptor.render();
        descriptor.add(entry);
        let after = descriptor.render();
        if path.exists() && before == after {
            tracing::debug!(path = %path.display(), entry, "descriptor already up to date");
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
        }
        std::fs::write(path, after).map_err(|e| Error::fs(path, e))?;
        tracing::debug!(path = %path.display(), entry, "merged descriptor entry");
        Ok(true)
    }
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('"')?.strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const PREAMBLE: &str = r#"syntax = "proto3";

package core;
option go_package = "./core";
"#;

    #[test]
    fn test_add_is_idempotent() {
        let mut descriptor = AggregateDescriptor::with_preamble(PREAMBLE);
        assert!(descriptor.add("user.proto"));
        let once = descriptor.render();
        assert!(!descriptor.add("user.proto"));
        assert_eq!(descriptor.render(), once);
        assert_eq!(once.matches("import \"user.proto\";").count(), 1);
    }

    #[test]
    fn test_parse_render_is_stable() {
        let text = r#"syntax = "proto3";

package core;

import "role.proto";
import "user.proto";
import "role.proto";


"#;
        let parsed = AggregateDescriptor::parse(text);
        let rendered = parsed.render();
        assert_eq!(AggregateDescriptor::parse(&rendered).render(), rendered);
        let entries: Vec<_> = parsed.entries().collect();
        assert_eq!(entries, ["role.proto", "user.proto"]);
    }

    #[test]
    fn test_substring_entries_are_distinct() {
        let mut descriptor = AggregateDescriptor::parse("import \"user_role.proto\";\n");
        assert!(!descriptor.contains("user.proto"));
        assert!(descriptor.add("user.proto"));
    }

    #[test]
    fn test_api_import_block() {
        let parsed = AggregateDescriptor::parse(
            "syntax = \"v1\"\n\nimport (\n\t\"base.api\"\n\t\"user.api\"\n)\n",
        );
        let entries: Vec<_> = parsed.entries().collect();
        assert_eq!(entries, ["base.api", "user.api"]);
        assert_eq!(
            parsed.render(),
            "syntax = \"v1\"\n\nimport \"base.api\"\nimport \"user.api\"\n"
        );
    }

    #[test]
    fn test_merge_into_file_twice() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("desc/all.proto");

        assert!(AggregateDescriptor::merge_into_file(&path, PREAMBLE, "user.proto").unwrap());
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(!AggregateDescriptor::merge_into_file(&path, PREAMBLE, "user.proto").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

        assert!(AggregateDescriptor::merge_into_file(&path, PREAMBLE, "role.proto").unwrap());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("syntax = \"proto3\";"));
        assert!(text.ends_with("import \"user.proto\";\nimport \"role.proto\";\n"));
    }
}

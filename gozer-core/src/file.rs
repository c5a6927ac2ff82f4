use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Header placed on top of files that are fully owned by the generator.
pub const GENERATED_HEADER: &str = "// Code generated by gozer. DO NOT EDIT.";

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk
    fn write(&self, base: &Path) -> Result<WriteResult> {
        let rules = self.rules();
        apply_rules(&self.path(base), &rules, &self.render())
    }
}

fn apply_rules(path: &Path, rules: &FileRules, content: &str) -> Result<WriteResult> {
    let content = match rules.header {
        Some(header) => format!("{}\n\n{}", header, content),
        None => content.to_string(),
    };

    match rules.overwrite {
        Overwrite::Always => {
            let existed = path.exists();
            if existed {
                std::fs::remove_file(path)
                    .wrap_err_with(|| format!("failed to remove {}", path.display()))?;
            }
            write_file(path, &content)?;
            tracing::debug!(path = %path.display(), existed, "wrote generated file");
            if existed {
                Ok(WriteResult::Replaced)
            } else {
                Ok(WriteResult::Written)
            }
        }
        Overwrite::IfMissing => {
            if path.exists() {
                tracing::debug!(path = %path.display(), "kept existing file");
                Ok(WriteResult::Skipped)
            } else {
                write_file(path, &content)?;
                tracing::debug!(path = %path.display(), "created file");
                Ok(WriteResult::Written)
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File did not exist and was created
    Written,
    /// File existed and was deleted, then written fresh
    Replaced,
    /// File was skipped (already exists)
    Skipped,
}

/// A file to be generated
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the write rules.
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        apply_rules(&self.path, &self.rules, &self.content)
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone)]
pub struct FileRules {
    pub overwrite: Overwrite,
    pub header: Option<&'static str>,
}

impl FileRules {
    /// Rules for a file the generator fully owns.
    pub fn generated() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: Some(GENERATED_HEADER),
        }
    }

    /// Rules for a file that is only scaffolded once unless `overwrite` is set.
    pub fn scaffold(overwrite: bool) -> Self {
        Self {
            overwrite: if overwrite {
                Overwrite::Always
            } else {
                Overwrite::IfMissing
            },
            header: None,
        }
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Delete any existing file, then write
    Always,
    /// Only create if file doesn't exist (hand-edited code)
    IfMissing,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("internal").join("logic").join("user.go");

        write_file(&path, "package user").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "package user");
    }

    #[test]
    fn test_always_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("routes.go");
        fs::write(&path, "stale").unwrap();

        let result = File::new(&path, "fresh").write().unwrap();

        assert_eq!(result, WriteResult::Replaced);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_always_on_missing_file_reports_written() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("types.go");

        let result = File::new(&path, "package types").write().unwrap();

        assert_eq!(result, WriteResult::Written);
    }

    #[test]
    fn test_scaffold_keeps_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logic.go");
        fs::write(&path, "hand edited").unwrap();

        let file = File::new(&path, "template").with_rules(FileRules::scaffold(false));

        assert_eq!(file.write().unwrap(), WriteResult::Skipped);
        assert_eq!(file.write().unwrap(), WriteResult::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand edited");
    }

    #[test]
    fn test_scaffold_with_overwrite_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logic.go");
        fs::write(&path, "hand edited").unwrap();

        let file = File::new(&path, "template").with_rules(FileRules::scaffold(true));

        assert_eq!(file.write().unwrap(), WriteResult::Replaced);
        assert_eq!(fs::read_to_string(&path).unwrap(), "template");
    }

    #[test]
    fn test_generated_rules_prepend_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("routes.go");

        File::new(&path, "package handler\n")
            .with_rules(FileRules::generated())
            .write()
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(GENERATED_HEADER));
        assert!(content.ends_with("package handler\n"));
    }
}

//! Spec-file backups taken before a spec is rewritten in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Error, Result};

/// Directory under the system temp dir that holds backups.
pub const BACKUP_DIR_NAME: &str = "gozer-backup";

/// Backups older than this many days are removed by the sweep.
pub const BACKUP_RETENTION_DAYS: i64 = 7;

/// Copy `spec` into `backup_dir` as `{file}-{unix_secs}` and, at the same
/// time, remove backups older than [`BACKUP_RETENTION_DAYS`].
///
/// Both tasks finish before this returns. The first failure is returned;
/// a copy that succeeded stays on disk even when the sweep fails.
pub fn backup_and_sweep(spec: &Path, backup_dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(backup_dir).map_err(|e| Error::fs(backup_dir, e))?;

    let file_name = spec
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spec".to_string());
    let target = backup_dir.join(format!("{}-{}", file_name, now.timestamp()));

    let (copied, swept) = std::thread::scope(|s| {
        let copy = s.spawn(|| {
            std::fs::copy(spec, &target)
                .map(|_| ())
                .map_err(|e| Error::fs(spec, e))
        });
        let sweep = s.spawn(|| sweep(backup_dir, now));
        (join(copy), join(sweep))
    });

    copied?;
    let removed = swept?;
    tracing::debug!(
        spec = %spec.display(),
        backup = %target.display(),
        removed,
        "backed up spec"
    );
    Ok(target)
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle.join().unwrap_or_else(|_| {
        Err(Error::fs(
            PathBuf::from(BACKUP_DIR_NAME),
            std::io::Error::other("backup task panicked"),
        ))
    })
}

/// Remove expired backups, returning how many were removed.
///
/// Entries whose suffix after the last `-` is not a Unix timestamp are left
/// alone.
fn sweep(dir: &Path, now: DateTime<Utc>) -> Result<usize> {
    let cutoff = now - TimeDelta::days(BACKUP_RETENTION_DAYS);
    let mut removed = 0;

    for entry in std::fs::read_dir(dir).map_err(|e| Error::fs(dir, e))? {
        let entry = entry.map_err(|e| Error::fs(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(pos) = name.rfind('-').filter(|&p| p > 0) else {
            continue;
        };
        let Some(created) = name[pos + 1..]
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        else {
            tracing::warn!(path = %path.display(), "sweep ignored file");
            continue;
        };
        if created < cutoff {
            std::fs::remove_file(&path).map_err(|e| Error::fs(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Reformatted spec text, or `None` when reformatting would change what
/// the TOML document parses to (or it does not parse at all).
pub fn reformat_spec(text: &str) -> Option<String> {
    let before: toml::Table = toml::from_str(text).ok()?;
    let formatted = format_spec_text(text);
    let after: toml::Table = toml::from_str(&formatted).ok()?;
    (before == after).then_some(formatted)
}

/// Normalize spec text: trailing whitespace trimmed, blank-line runs
/// collapsed, exactly one final newline.
///
/// Lines ending inside a multi-line string are kept verbatim.
fn format_spec_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    let mut open = None;
    for raw in text.lines() {
        open = scan_multiline(raw, open);
        if open.is_some() {
            blank_run = false;
            out.push_str(raw);
            out.push('\n');
            continue;
        }

        let line = raw.trim_end();
        if line.is_empty() {
            if !blank_run && !out.is_empty() {
                out.push('\n');
            }
            blank_run = true;
            continue;
        }
        blank_run = false;
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Multi-line string delimiter still open after `line`, given the one open
/// before it.
fn scan_multiline(line: &str, mut open: Option<&'static str>) -> Option<&'static str> {
    let mut rest = line;
    loop {
        match open {
            Some(delim) => {
                let Some(end) = find_closing(rest, delim) else {
                    return open;
                };
                // A closing delimiter may be followed by up to two quotes of the same kind.
                let quote = &delim[..1];
                rest = rest[end + 3..].trim_start_matches(quote);
                open = None;
            }
            None => {
                let Some((index, delim)) = next_string(rest) else {
                    return None;
                };
                match delim {
                    "\"\"\"" | "'''" => {
                        rest = &rest[index + 3..];
                        open = Some(delim);
                    }
                    quote => {
                        let body = &rest[index + 1..];
                        let Some(end) = find_closing(body, quote) else {
                            return None;
                        };
                        rest = &body[end + 1..];
                    }
                }
            }
        }
    }
}

/// Start of the next string outside of a comment, with its delimiter.
fn next_string(text: &str) -> Option<(usize, &'static str)> {
    for (index, c) in text.char_indices() {
        let delim = match c {
            '#' => return None,
            '"' if text[index..].starts_with("\"\"\"") => "\"\"\"",
            '\'' if text[index..].starts_with("'''") => "'''",
            '"' => "\"",
            '\'' => "'",
            _ => continue,
        };
        return Some((index, delim));
    }
    None
}

/// Offset of the unescaped `delim` closing a string in `text`.
///
/// Only basic (double-quoted) strings have escapes.
fn find_closing(text: &str, delim: &str) -> Option<usize> {
    let escapes = delim.starts_with('"');
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if escapes && c == '\\' {
            escaped = true;
        } else if text[index..].starts_with(delim) {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_backup_and_sweep() {
        let temp = TempDir::new().unwrap();
        let spec = temp.path().join("user.toml");
        std::fs::write(&spec, "[service]\n").unwrap();
        let backups = temp.path().join(BACKUP_DIR_NAME);
        std::fs::create_dir_all(&backups).unwrap();

        let stale = (now() - TimeDelta::days(8)).timestamp();
        let fresh = (now() - TimeDelta::days(1)).timestamp();
        std::fs::write(backups.join(format!("user.toml-{}", stale)), "old").unwrap();
        std::fs::write(backups.join(format!("user.toml-{}", fresh)), "recent").unwrap();
        std::fs::write(backups.join("notes-latest"), "keep").unwrap();

        let target = backup_and_sweep(&spec, &backups, now()).unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[service]\n");
        assert!(
            target
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(&now().timestamp().to_string())
        );
        assert!(!backups.join(format!("user.toml-{}", stale)).exists());
        assert!(backups.join(format!("user.toml-{}", fresh)).exists());
        assert!(backups.join("notes-latest").exists());
    }

    #[test]
    fn test_missing_spec_is_file_system_error() {
        let temp = TempDir::new().unwrap();
        let err = backup_and_sweep(&temp.path().join("gone.toml"), temp.path(), now()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_format_spec_text() {
        assert_eq!(format_spec_text("a  \n\n\n\nb\t\n\n"), "a\n\nb\n");
        assert_eq!(format_spec_text("\n\na"), "a\n");
        let formatted = format_spec_text("x = 1\n\n\ny = 2");
        assert_eq!(format_spec_text(&formatted), formatted);
    }

    #[test]
    fn test_multiline_strings_are_kept() {
        let text = concat!(
            "docs = \"\"\"\nline one  \n\n\n\nline two\"\"\"   \n\n\n",
            "lit = '''a \n\n\nb'''\nx = 1  \n",
        );
        let formatted = format_spec_text(text);
        assert_eq!(
            formatted,
            "docs = \"\"\"\nline one  \n\n\n\nline two\"\"\"\n\nlit = '''a \n\n\nb'''\nx = 1\n"
        );
        assert_eq!(reformat_spec(text).as_deref(), Some(formatted.as_str()));
    }

    #[test]
    fn test_scan_multiline() {
        assert_eq!(scan_multiline("a = \"\"\"start", None), Some("\"\"\""));
        assert_eq!(scan_multiline("end\"\"\"", Some("\"\"\"")), None);
        assert_eq!(scan_multiline("end \\\"\"\" still", Some("\"\"\"")), Some("\"\"\""));
        assert_eq!(scan_multiline("a = \"x\" # \"\"\" in a comment", None), None);
        assert_eq!(scan_multiline("a = \"say \\\"\"\"", None), None);
        assert_eq!(scan_multiline("a = '''one''' # b = '''", None), None);
        assert_eq!(scan_multiline("a = \"\"\"one\"\"\"\"\"", None), None);
    }

    #[test]
    fn test_reformat_refuses_value_changes() {
        assert_eq!(reformat_spec("[broken\n"), None);
        assert_eq!(
            reformat_spec("x = 1   \n\n\n\ny = 2\n").as_deref(),
            Some("x = 1\n\ny = 2\n")
        );
    }
}

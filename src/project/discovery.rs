//! Document discovery: deterministic file walking plus ignore rules.
//!
//! Discovery walks the project root, prunes hidden entries, drops the
//! project's own metadata files, applies `.caignore` rules, restricts to the
//! tracked list when one is configured, and sorts. The same project on the
//! same disk always yields the same file list in the same order.

use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{CamdError, ErrorKind};
use crate::project::{CODEBOOK_FILE, CONFIG_FILE};

// ============================================================================
// IGNORE RULES
// ============================================================================

/// One `.caignore` pattern, compiled.
///
/// Patterns use shell glob syntax: `*`, `?`, and `[...]` classes with `!`
/// negation. A pattern containing `/` matches against the root-relative
/// path; any other pattern matches against the file name alone.
#[derive(Debug)]
struct IgnorePattern {
    matches_path: bool,
    regex: Regex,
}

/// The compiled contents of a `.caignore` file. A file is excluded when any
/// pattern matches it.
#[derive(Debug, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreRules {
    /// Read and compile an ignore file.
    pub fn load(path: &Path) -> Result<IgnoreRules, CamdError> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            CamdError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        IgnoreRules::parse(&content)
    }

    /// Compile ignore rules from text. `#` comments and blank lines are
    /// skipped.
    pub fn parse(content: &str) -> Result<IgnoreRules, CamdError> {
        let mut patterns = Vec::new();
        for line in content.lines() {
            let rule = line.split('#').next().unwrap_or("").trim();
            if rule.is_empty() {
                continue;
            }
            let regex = Regex::new(&glob_to_regex(rule)).map_err(|_| {
                CamdError::without_source(ErrorKind::IgnorePattern {
                    pattern: rule.to_string(),
                })
                .with_help("patterns use shell glob syntax: *, ?, and [...] classes")
            })?;
            patterns.push(IgnorePattern {
                matches_path: rule.contains('/'),
                regex,
            });
        }
        Ok(IgnoreRules { patterns })
    }

    /// Whether any rule excludes the file at this root-relative path.
    pub fn is_ignored(&self, rel_path: &Path) -> bool {
        let path_text = rel_path.to_string_lossy();
        let name = rel_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        self.patterns.iter().any(|pattern| {
            let candidate: &str = if pattern.matches_path {
                path_text.as_ref()
            } else {
                name.as_ref()
            };
            pattern.regex.is_match(candidate)
        })
    }
}

/// Translate one glob pattern into an anchored regex.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // Find the closing bracket, honoring the glob conventions
                // that a leading `!` negates and a `]` right after the
                // opening (or the negation) is a literal member.
                let mut j = i + 1;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    // Unclosed class: the bracket is literal.
                    out.push_str("\\[");
                } else {
                    let inner: String = chars[i + 1..j].iter().collect();
                    out.push('[');
                    let body = match inner.strip_prefix('!') {
                        Some(rest) => {
                            out.push('^');
                            rest
                        }
                        None => {
                            // Only `!` negates; a leading `^` is a literal
                            // member, as in fnmatch.
                            if inner.starts_with('^') {
                                out.push('\\');
                            }
                            inner.as_str()
                        }
                    };
                    for ch in body.chars() {
                        if ch == '\\' || ch == ']' {
                            out.push('\\');
                        }
                        out.push(ch);
                    }
                    out.push(']');
                    i = j;
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

// ============================================================================
// FILE WALKING
// ============================================================================

/// All document files under `root`, as sorted root-relative paths.
///
/// Hidden files and directories are pruned at any depth, the project's
/// config and codebook files are never documents, ignore rules drop what
/// they match, and a non-empty `tracked` list restricts results to entries
/// that are listed or sit under a listed directory.
pub fn project_files(
    root: &Path,
    ignore: &IgnoreRules,
    tracked: &[String],
) -> Result<Vec<PathBuf>, CamdError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry
                .file_name()
                .to_string_lossy()
                .starts_with('.')
    });

    for entry in walker {
        let entry = entry.map_err(|err| {
            CamdError::io(format!("failed to walk {}: {err}", root.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == CONFIG_FILE || name == CODEBOOK_FILE {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };
        if ignore.is_ignored(&rel) {
            continue;
        }
        if !tracked.is_empty() && !is_tracked(&rel, tracked) {
            continue;
        }
        files.push(rel);
    }

    files.sort();
    Ok(files)
}

/// Whether `rel` is a tracked entry or sits under a tracked directory.
fn is_tracked(rel: &Path, tracked: &[String]) -> bool {
    tracked
        .iter()
        .any(|entry| rel.starts_with(Path::new(entry)))
}

//! Project handling: a directory of coded documents plus its metadata.
//!
//! A camd project is any directory holding the three marker files this
//! module owns: `camd.yaml` (configuration), `codebook.md` (tag
//! documentation), and `.caignore` (discovery exclusions). Presence of the
//! configuration file is what makes a directory a project; no version
//! control metadata is consulted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codebook::{Codebook, CodebookEntry};
use crate::codes::tag::Tag;
use crate::codes::tree::ParseTree;
use crate::errors::{CamdError, ErrorKind};
use crate::project::config::ProjectConfig;
use crate::project::discovery::IgnoreRules;

pub mod config;
pub mod discovery;

pub const CONFIG_FILE: &str = "camd.yaml";
pub const CODEBOOK_FILE: &str = "codebook.md";
pub const IGNORE_FILE: &str = ".caignore";

const DEFAULT_CONFIG: &str = "\
# camd project configuration.
# `tracked` limits scanning to the listed paths; an empty list means
# every discoverable file is in scope.
tracked: []
";

const DEFAULT_CODEBOOK: &str = "\
# camd codebook: one tag per line, `<sigil>name : description`.
# Sigils: @ context, $ content, ^ meta. Lines starting with # are comments.
";

const DEFAULT_IGNORE: &str = "\
# Files camd should not scan, one shell glob per line.
# Patterns with a / match the whole project-relative path, others match
# file names anywhere in the tree.
";

// ============================================================================
// REPORTS
// ============================================================================

/// What `Project::init` did.
#[derive(Debug)]
pub struct InitReport {
    pub root: PathBuf,
    pub created: Vec<&'static str>,
}

/// What `Project::add_paths` did.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<PathBuf>,
    pub already_tracked: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// What `Project::sync_codebook` did, or would do under `--dry-run`.
#[derive(Debug)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub dry_run: bool,
}

/// The project's tag groups with codebook documentation applied, plus the
/// codebook entries no coded tag matched.
#[derive(Debug)]
pub struct DocumentedTags {
    pub tags: BTreeMap<String, Tag>,
    pub unused: Vec<CodebookEntry>,
}

impl DocumentedTags {
    /// Coded tags the codebook does not document yet.
    pub fn undocumented(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.tags.values().filter(|tag| !tag.documented())
    }
}

// ============================================================================
// PROJECT
// ============================================================================

/// An opened camd project.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Create the marker files for a project at `dir`, creating the
    /// directory itself if needed. Files already present are left alone, so
    /// init is safe to run repeatedly and restores whichever markers are
    /// missing.
    pub fn init(dir: &Path) -> Result<InitReport, CamdError> {
        fs::create_dir_all(dir).map_err(|err| {
            CamdError::io(format!("failed to create {}: {err}", dir.display()))
        })?;
        let mut created = Vec::new();
        for (name, default_body) in [
            (CONFIG_FILE, DEFAULT_CONFIG),
            (CODEBOOK_FILE, DEFAULT_CODEBOOK),
            (IGNORE_FILE, DEFAULT_IGNORE),
        ] {
            let path = dir.join(name);
            if !path.exists() {
                fs::write(&path, default_body).map_err(|err| {
                    CamdError::io(format!("failed to write {}: {err}", path.display()))
                })?;
                created.push(name);
            }
        }
        let root = fs::canonicalize(dir).map_err(|err| {
            CamdError::io(format!("failed to resolve {}: {err}", dir.display()))
        })?;
        Ok(InitReport { root, created })
    }

    /// Open the project rooted exactly at `dir`. All three marker files
    /// must be present.
    pub fn open(dir: &Path) -> Result<Project, CamdError> {
        let root = fs::canonicalize(dir).map_err(|_| {
            CamdError::without_source(ErrorKind::ProjectMissing {
                path: dir.display().to_string(),
            })
            .with_help("check that the directory exists and is readable")
        })?;
        for file in [CONFIG_FILE, CODEBOOK_FILE, IGNORE_FILE] {
            if !root.join(file).is_file() {
                return Err(CamdError::without_source(ErrorKind::MissingProjectFile {
                    file: file.to_string(),
                })
                .with_help("run `camd init` to restore missing project files"));
            }
        }
        let config = ProjectConfig::load(&root.join(CONFIG_FILE))?;
        Ok(Project { root, config })
    }

    /// Walk from `start` upward to the nearest directory holding a project
    /// configuration file.
    pub fn find_root(start: &Path) -> Result<PathBuf, CamdError> {
        for dir in start.ancestors() {
            if dir.join(CONFIG_FILE).is_file() {
                return Ok(dir.to_path_buf());
            }
        }
        Err(CamdError::without_source(ErrorKind::NotAProject {
            start: start.display().to_string(),
        })
        .with_help("run `camd init` to start a project in this directory"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The sorted, root-relative document files in scope for this project.
    pub fn tracked_files(&self) -> Result<Vec<PathBuf>, CamdError> {
        let ignore = IgnoreRules::load(&self.root.join(IGNORE_FILE))?;
        discovery::project_files(&self.root, &ignore, &self.config.tracked)
    }

    /// Parse every tracked document into one merged tree. Files that are
    /// not valid UTF-8 are skipped as binary. An empty project yields an
    /// empty tree.
    pub fn parse_tree(&self) -> Result<ParseTree, CamdError> {
        let mut tree: Option<ParseTree> = None;
        for rel in self.tracked_files()? {
            let absolute = self.root.join(&rel);
            let bytes = fs::read(&absolute).map_err(|err| {
                CamdError::io(format!("failed to read {}: {err}", absolute.display()))
            })?;
            let Ok(text) = String::from_utf8(bytes) else {
                continue;
            };
            let parsed = ParseTree::parse_with_path(&text, rel);
            match &mut tree {
                Some(combined) => combined.merge(parsed)?,
                None => tree = Some(parsed),
            }
        }
        Ok(tree.unwrap_or_else(|| ParseTree::parse("")))
    }

    /// The project codebook.
    pub fn codebook(&self) -> Result<Codebook, CamdError> {
        Codebook::load(&self.root.join(CODEBOOK_FILE))
    }

    /// Aggregate every coded tag in the project and apply codebook
    /// documentation to the groups it covers.
    pub fn documented_tags(&self) -> Result<DocumentedTags, CamdError> {
        let codebook = self.codebook()?;
        let mut tags = self.parse_tree()?.into_tags()?;
        for group in tags.values_mut() {
            if let Some(entry) = codebook.get(group.tag()) {
                group.apply_docs(entry.docs());
            }
        }
        let unused = codebook
            .entries()
            .filter(|entry| !tags.contains_key(&entry.tag))
            .cloned()
            .collect();
        Ok(DocumentedTags { tags, unused })
    }

    /// Track the given files or directories. Directories are tracked as a
    /// whole when `recursive` holds; otherwise their direct child files are
    /// tracked individually. Paths that do not exist are reported, not
    /// fatal; paths outside the project root are an error. The configuration
    /// is saved when anything was added.
    pub fn add_paths(&mut self, paths: &[PathBuf], recursive: bool) -> Result<AddReport, CamdError> {
        let mut report = AddReport::default();
        for given in paths {
            let Ok(resolved) = fs::canonicalize(given) else {
                report.missing.push(given.clone());
                continue;
            };
            let rel = resolved
                .strip_prefix(&self.root)
                .map_err(|_| {
                    CamdError::without_source(ErrorKind::OutsideProject {
                        path: given.display().to_string(),
                    })
                    .with_help("only files under the project root can be tracked")
                })?
                .to_path_buf();
            if rel.as_os_str().is_empty() {
                // The root itself: everything is already in scope.
                report.already_tracked.push(PathBuf::from("."));
                continue;
            }
            if resolved.is_dir() && !recursive {
                for child in direct_child_files(&resolved)? {
                    self.track(rel.join(child), &mut report);
                }
            } else {
                self.track(rel, &mut report);
            }
        }
        if !report.added.is_empty() {
            self.config.save(&self.root.join(CONFIG_FILE))?;
        }
        Ok(report)
    }

    fn track(&mut self, rel: PathBuf, report: &mut AddReport) {
        let entry = config_entry(&rel);
        if self.config.tracked.iter().any(|existing| existing == &entry) {
            report.already_tracked.push(rel);
        } else {
            self.config.tracked.push(entry);
            report.added.push(rel);
        }
    }

    /// Append stub codebook lines for every coded-but-undocumented tag.
    /// With `dry_run`, report what would be appended without writing.
    pub fn sync_codebook(&self, dry_run: bool) -> Result<SyncReport, CamdError> {
        let docs = self.documented_tags()?;
        let mut added: Vec<String> = docs
            .undocumented()
            .map(|tag| tag.tag().to_string())
            .collect();
        added.sort_unstable();
        if !added.is_empty() && !dry_run {
            let path = self.root.join(CODEBOOK_FILE);
            let mut book = fs::read_to_string(&path).map_err(|err| {
                CamdError::io(format!("failed to read {}: {err}", path.display()))
            })?;
            book.push_str(&Codebook::render_stubs(&added));
            fs::write(&path, book).map_err(|err| {
                CamdError::io(format!("failed to write {}: {err}", path.display()))
            })?;
        }
        Ok(SyncReport { added, dry_run })
    }
}

/// Non-hidden direct child files of a directory, sorted by name. Project
/// metadata files are never documents.
fn direct_child_files(dir: &Path) -> Result<Vec<PathBuf>, CamdError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| CamdError::io(format!("failed to list {}: {err}", dir.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|err| CamdError::io(format!("failed to list {}: {err}", dir.display())))?;
        let name = entry.file_name();
        let name_text = name.to_string_lossy();
        if name_text.starts_with('.') || name_text == CONFIG_FILE || name_text == CODEBOOK_FILE {
            continue;
        }
        let file_type = entry.file_type().map_err(|err| {
            CamdError::io(format!("failed to inspect {}: {err}", dir.display()))
        })?;
        if file_type.is_file() {
            files.push(PathBuf::from(name));
        }
    }
    files.sort();
    Ok(files)
}

/// Root-relative path as a config entry, `/`-separated on every platform.
fn config_entry(rel: &Path) -> String {
    rel.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

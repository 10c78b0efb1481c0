//! Project configuration, persisted as `camd.yaml` at the project root.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{unspanned, CamdError, ErrorKind, SourceContext};

/// The on-disk project configuration.
///
/// `tracked` holds root-relative paths, files or directories, using `/`
/// separators. An empty list means every discoverable file is in scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub tracked: Vec<String>,
}

impl ProjectConfig {
    /// Read the configuration from `path`.
    pub fn load(path: &Path) -> Result<ProjectConfig, CamdError> {
        let text = fs::read_to_string(path).map_err(|err| {
            CamdError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_yaml(&text, path)
    }

    /// Parse configuration text. An empty or comments-only file is the
    /// default configuration; anything else must be valid YAML for this
    /// shape.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<ProjectConfig, CamdError> {
        let parsed: Option<ProjectConfig> = serde_yaml::from_str(text).map_err(|err| {
            let source = SourceContext::from_file(origin.display().to_string(), text.to_string());
            let span = err
                .location()
                .map(|at| (at.index()..at.index() + 1).into())
                .unwrap_or_else(unspanned);
            CamdError::new(
                ErrorKind::Config {
                    message: err.to_string(),
                },
                &source,
                span,
            )
            .with_help("expected a mapping with a `tracked` list of paths")
        })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Write the configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), CamdError> {
        let body = serde_yaml::to_string(self).map_err(|err| {
            CamdError::without_source(ErrorKind::Config {
                message: err.to_string(),
            })
        })?;
        fs::write(path, body)
            .map_err(|err| CamdError::io(format!("failed to write {}: {err}", path.display())))
    }
}

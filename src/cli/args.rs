//! Defines the command-line arguments and subcommands for the camd CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "camd",
    version,
    about = "Inline qualitative coding for plain text and markdown."
)]
pub struct CamdArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a camd project: camd.yaml, codebook.md, and .caignore.
    Init {
        /// The directory to initialize, created if needed.
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Summarize the project: files scanned, tags per kind, codebook gaps.
    Status,
    /// Track files or directories in the project configuration.
    Add {
        /// Files or directories to track.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Track a directory's direct child files instead of the directory.
        #[arg(long)]
        non_recursive: bool,
    },
    /// Show every coded section of one tag, sigil included.
    Tag {
        /// The tag to look up, e.g. '@interview'.
        #[arg(required = true)]
        name: String,
    },
    /// Append codebook stubs for every coded but undocumented tag.
    Sync {
        /// Report what would be appended without writing the codebook.
        #[arg(long)]
        dry_run: bool,
    },
    /// Export every tag group with its sections as JSON or YAML.
    Export {
        /// The report format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write the report to a file instead of standard output.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Serialization formats for `camd export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

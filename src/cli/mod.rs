//! The camd Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Every handler returns a [`CamdError`] on
//! failure; rendering happens exactly once, here, through miette.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

use crate::cli::args::{CamdArgs, Command, ExportFormat};
use crate::errors::{print_error, CamdError};
use crate::project::Project;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CamdArgs::parse();

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Init { dir } => handle_init(&dir),
        Command::Status => handle_status(),
        Command::Add {
            paths,
            non_recursive,
        } => handle_add(&paths, !non_recursive),
        Command::Tag { name } => handle_tag(&name),
        Command::Sync { dry_run } => handle_sync(dry_run),
        Command::Export { format, output } => handle_export(format, output.as_deref()),
    };

    if let Err(error) = result {
        print_error(error);
        process::exit(1);
    }
}

/// Open the project enclosing the current working directory.
fn current_project() -> Result<Project, CamdError> {
    let cwd = env::current_dir()
        .map_err(|err| CamdError::io(format!("failed to read the working directory: {err}")))?;
    let root = Project::find_root(&cwd)?;
    Project::open(&root)
}

/// Handles the `init` subcommand.
fn handle_init(dir: &Path) -> Result<(), CamdError> {
    let report = Project::init(dir)?;
    output::print_init(&report);
    Ok(())
}

/// Handles the `status` subcommand.
fn handle_status() -> Result<(), CamdError> {
    let project = current_project()?;
    let files = project.tracked_files()?;
    let docs = project.documented_tags()?;
    output::print_status(project.root(), files.len(), &docs);
    Ok(())
}

/// Handles the `add` subcommand.
fn handle_add(paths: &[PathBuf], recursive: bool) -> Result<(), CamdError> {
    let mut project = current_project()?;
    let report = project.add_paths(paths, recursive)?;
    output::print_add(&report);
    Ok(())
}

/// Handles the `tag` subcommand. An unknown tag is an empty query result,
/// not an error.
fn handle_tag(name: &str) -> Result<(), CamdError> {
    let project = current_project()?;
    let docs = project.documented_tags()?;
    output::print_tag(name, docs.tags.get(name));
    Ok(())
}

/// Handles the `sync` subcommand.
fn handle_sync(dry_run: bool) -> Result<(), CamdError> {
    let project = current_project()?;
    let report = project.sync_codebook(dry_run)?;
    output::print_sync(&report);
    Ok(())
}

/// Handles the `export` subcommand.
fn handle_export(format: ExportFormat, destination: Option<&Path>) -> Result<(), CamdError> {
    let project = current_project()?;
    let docs = project.documented_tags()?;
    let report = output::build_report(&docs);
    let rendered = output::render_report(&report, format)?;
    match destination {
        Some(path) => {
            fs::write(path, rendered.as_bytes()).map_err(|err| {
                CamdError::io(format!("failed to write {}: {err}", path.display()))
            })?;
            println!("report written to {}", path.display());
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }
    Ok(())
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

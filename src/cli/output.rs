//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for pretty-printing, colorizing output, and
//! rendering export reports. By centralizing output logic here, we ensure a
//! consistent user experience across all commands. Color is applied only
//! when standard output is a terminal.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::ExportFormat;
use crate::codes::{CodeKind, Tag};
use crate::errors::{CamdError, ErrorKind};
use crate::project::{AddReport, DocumentedTags, InitReport, SyncReport};

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints the outcome of `camd init`.
pub fn print_init(report: &InitReport) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    println!("camd project at {}", report.root.display());
    let _ = stdout.reset();
    if report.created.is_empty() {
        println!("all project files were already present");
    } else {
        for name in &report.created {
            println!("created {}", name);
        }
    }
}

/// Prints the project summary for `camd status`.
pub fn print_status(root: &Path, file_count: usize, docs: &DocumentedTags) {
    let mut stdout = StandardStream::stdout(color_choice());

    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    println!("camd project at {}", root.display());
    let _ = stdout.reset();
    println!("{} file(s) scanned", file_count);
    println!();

    for kind in CodeKind::ALL {
        let groups: Vec<&Tag> = docs.tags.values().filter(|tag| tag.kind() == kind).collect();
        let sections: usize = groups.iter().map(|tag| tag.sections().len()).sum();
        let documented = groups.iter().filter(|tag| tag.documented()).count();

        let _ = stdout.set_color(ColorSpec::new().set_bold(true));
        print!("{} ({})", kind.label(), kind.sigil());
        let _ = stdout.reset();
        println!(
            ": {} tag(s), {} section(s), {} documented",
            groups.len(),
            sections,
            documented
        );
    }

    let undocumented: Vec<&str> = docs.undocumented().map(Tag::tag).collect();
    if !undocumented.is_empty() {
        println!();
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        println!("undocumented tags: {}", undocumented.join(" "));
        let _ = stdout.reset();
    }
    if !docs.unused.is_empty() {
        let unused: Vec<&str> = docs.unused.iter().map(|entry| entry.tag.as_str()).collect();
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        println!("codebook entries never coded: {}", unused.join(" "));
        let _ = stdout.reset();
    }
}

/// Prints every section of one tag for `camd tag`.
pub fn print_tag(name: &str, tag: Option<&Tag>) {
    let mut stdout = StandardStream::stdout(color_choice());
    let Some(tag) = tag else {
        println!("tag '{}' is not coded anywhere in this project", name);
        println!("tag names include their sigil, e.g. '@interview'");
        return;
    };

    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    print!("{}", tag.tag());
    let _ = stdout.reset();
    println!(" ({}): {} section(s)", tag.kind().label(), tag.sections().len());
    if let Some(description) = tag.description() {
        println!("{}", description);
    }
    println!();

    for section in tag.sections() {
        let file = section
            .source_file()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| String::from("(unnamed)"));
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        println!("From {}", file);
        let _ = stdout.reset();
        println!(
            "Line {}\tCharacter Number {}\tLength {}",
            section.line(),
            section.offset() + 1,
            section.raw().chars().count()
        );
        println!("{}", section.raw());
        println!();
    }
}

/// Prints the outcome of `camd add`.
pub fn print_add(report: &AddReport) {
    for path in &report.added {
        println!("tracking {}", path.display());
    }
    for path in &report.already_tracked {
        println!("{} is already tracked", path.display());
    }
    let mut stdout = StandardStream::stdout(color_choice());
    for path in &report.missing {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        println!("{} does not exist, skipping", path.display());
        let _ = stdout.reset();
    }
    if report.added.is_empty() && report.missing.is_empty() && report.already_tracked.is_empty() {
        println!("nothing to add");
    }
}

/// Prints the outcome of `camd sync`.
pub fn print_sync(report: &SyncReport) {
    if report.added.is_empty() {
        println!("the codebook already covers every coded tag");
        return;
    }
    if report.dry_run {
        println!("would append {} codebook stub(s):", report.added.len());
    } else {
        println!("appended {} codebook stub(s):", report.added.len());
    }
    for tag in &report.added {
        println!("  {}", tag);
    }
}

// ============================================================================
// EXPORT REPORT
// ============================================================================

/// One coded span in an export report. `character` is 1-based; `length`
/// counts characters of the raw span text.
#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub file: Option<String>,
    pub line: usize,
    pub character: usize,
    pub length: usize,
    pub raw: String,
}

/// One tag group in an export report.
#[derive(Debug, Serialize)]
pub struct TagReport {
    pub tag: String,
    pub kind: CodeKind,
    pub documented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<BTreeMap<String, String>>,
    pub sections: Vec<SectionReport>,
}

/// Flatten documented tag groups into serializable report rows.
pub fn build_report(docs: &DocumentedTags) -> Vec<TagReport> {
    docs.tags
        .values()
        .map(|tag| TagReport {
            tag: tag.tag().to_string(),
            kind: tag.kind(),
            documented: tag.documented(),
            description: tag.description().map(str::to_string),
            extra_info: tag.extra_info().cloned(),
            sections: tag
                .sections()
                .iter()
                .map(|section| SectionReport {
                    file: section.source_file().map(|path| path.display().to_string()),
                    line: section.line(),
                    character: section.offset() + 1,
                    length: section.raw().chars().count(),
                    raw: section.raw().to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Serialize a report in the requested format.
pub fn render_report(report: &[TagReport], format: ExportFormat) -> Result<String, CamdError> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(report).map_err(|err| {
            CamdError::without_source(ErrorKind::Export {
                message: err.to_string(),
            })
        }),
        ExportFormat::Yaml => serde_yaml::to_string(report).map_err(|err| {
            CamdError::without_source(ErrorKind::Export {
                message: err.to_string(),
            })
        }),
    }
}

//! camd Error Handling - Unified Encapsulated API
//!
//! Every failure the library can report flows through a single [`CamdError`]
//! value: what went wrong ([`ErrorKind`]), where it happened ([`SourceInfo`]),
//! and how to help ([`DiagnosticInfo`]). Parsing itself never fails - malformed
//! annotation syntax degrades to plain text inside the tree builder - so the
//! kinds here cover contract violations, codebook faults, and project-level
//! problems only. Errors render exactly once, at the CLI boundary, via
//! [`print_error`].

use miette::{Diagnostic, SourceSpan};
use miette::{LabeledSpan, NamedSource};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Represents source context for error reporting with explicit hierarchy
/// between real sources (preferred) and fallbacks (tolerated when necessary)
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    /// This is the preferred method for error reporting
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable
    /// Use only when real source cannot be obtained
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("# {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("no source available")
    }
}

/// The single error type - no wrapper, no nesting, just essential data
#[derive(Debug)]
pub struct CamdError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened (context-specific source information)
    pub source_info: SourceInfo,
    /// How to help (error code plus optional help text)
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds as one clean enum
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Contract violations: these signal a bug in aggregation code and are
    // never produced by scanning a document.
    #[error("tag groups are single-tag: expected '{expected}', found a section tagged '{found}'")]
    TagMismatch { expected: String, found: String },
    #[error("'{token}' does not begin with a code sigil")]
    UnknownSigil { token: String },

    // Codebook faults
    #[error("codebook line {line} is neither a tag entry nor a comment")]
    CodebookLine { line: usize },

    // Project faults
    #[error("{path} could not be opened as a camd project")]
    ProjectMissing { path: String },
    #[error("{file} is missing; this is not a camd project")]
    MissingProjectFile { file: String },
    #[error("{start} is not inside a camd project")]
    NotAProject { start: String },
    #[error("{path} is outside the camd project")]
    OutsideProject { path: String },
    #[error("ignore pattern '{pattern}' is not a valid glob")]
    IgnorePattern { pattern: String },
    #[error("invalid project configuration: {message}")]
    Config { message: String },

    // Ambient failures
    #[error("{context}")]
    Io { context: String },
    #[error("could not serialize the report: {message}")]
    Export { message: String },
}

/// Source information for different error contexts
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement information
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TagMismatch { .. } | Self::UnknownSigil { .. } => ErrorCategory::Contract,

            Self::CodebookLine { .. } => ErrorCategory::Codebook,

            Self::ProjectMissing { .. }
            | Self::MissingProjectFile { .. }
            | Self::NotAProject { .. }
            | Self::OutsideProject { .. }
            | Self::IgnorePattern { .. }
            | Self::Config { .. } => ErrorCategory::Project,

            Self::Io { .. } | Self::Export { .. } => ErrorCategory::Io,
        }
    }

    /// Get the error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::TagMismatch { .. } => "tag_mismatch",
            Self::UnknownSigil { .. } => "unknown_sigil",
            Self::CodebookLine { .. } => "codebook_line",
            Self::ProjectMissing { .. } => "missing_directory",
            Self::MissingProjectFile { .. } => "missing_file",
            Self::NotAProject { .. } => "not_a_project",
            Self::OutsideProject { .. } => "outside_project",
            Self::IgnorePattern { .. } => "ignore_pattern",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Export { .. } => "export",
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Contract,
    Codebook,
    Project,
    Io,
}

impl ErrorCategory {
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Codebook => "codebook",
            Self::Project => "project",
            Self::Io => "io",
        }
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl CamdError {
    /// Create an error anchored to a span of real source text.
    pub fn new(kind: ErrorKind, source: &SourceContext, span: SourceSpan) -> Self {
        let error_code = format!(
            "camd::{}::{}",
            kind.category().code_prefix(),
            kind.code_suffix()
        );
        CamdError {
            kind,
            source_info: SourceInfo {
                source: source.to_named_source(),
                primary_span: span,
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }

    /// Create an error with no meaningful source location, such as an I/O
    /// failure or a contract violation detected away from any file.
    pub fn without_source(kind: ErrorKind) -> Self {
        Self::new(kind, &SourceContext::default(), unspanned())
    }

    /// Attach a help message shown beneath the rendered diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    /// Shorthand for wrapping an I/O failure with context text.
    pub fn io(context: impl Into<String>) -> Self {
        Self::without_source(ErrorKind::Io {
            context: context.into(),
        })
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::TagMismatch { .. } => "mismatched tag".into(),
            ErrorKind::UnknownSigil { .. } => "not a code tag".into(),
            ErrorKind::CodebookLine { .. } => "not a codebook entry".into(),
            ErrorKind::ProjectMissing { .. } => "directory not usable".into(),
            ErrorKind::MissingProjectFile { .. } => "missing project file".into(),
            ErrorKind::NotAProject { .. } => "no project here".into(),
            ErrorKind::OutsideProject { .. } => "outside the project".into(),
            ErrorKind::IgnorePattern { .. } => "bad ignore pattern".into(),
            ErrorKind::Config { .. } => "invalid configuration".into(),
            ErrorKind::Io { .. } => "I/O failure".into(),
            ErrorKind::Export { .. } => "serialization failed".into(),
        }
    }
}

/// A placeholder span for errors not tied to a specific source location.
/// Makes the intent of an empty span explicit and searchable.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

impl std::error::Error for CamdError {}

impl fmt::Display for CamdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for CamdError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a CamdError with full miette diagnostics.
///
/// This provides rich formatting with source spans and help text. Use it for
/// user-facing error display in CLI contexts; the library layers only ever
/// return errors, they never print.
pub fn print_error(error: CamdError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

//! camd: inline qualitative coding for plain text and markdown.
//!
//! Documents carry annotations of the form `[coded span](@tag $tag ^tag)`.
//! Parsing turns a document into a tree of nodes, each coded span yields one
//! [`CodeSection`] per tag, and same-tag sections aggregate into [`Tag`]
//! groups across every document of a project. Malformed annotation syntax is
//! never an error; it degrades back into literal text.

pub use crate::errors::{print_error, CamdError, ErrorCategory, ErrorKind, SourceContext};

pub mod cli;
pub mod codebook;
pub mod codes;
pub mod errors;
pub mod project;
pub mod syntax;

pub use crate::codebook::{Codebook, CodebookEntry};
pub use crate::codes::{CodeKind, CodeSection, ParseTree, Tag, TagDocs};
pub use crate::project::Project;
pub use crate::syntax::{Content, Fragment, Node, Scanner};

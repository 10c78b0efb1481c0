//! Code aggregation: kinds, sections, tag groups, and the parse tree.

pub mod kind;
pub mod section;
pub mod tag;
pub mod tree;

pub use kind::CodeKind;
pub use section::CodeSection;
pub use tag::{Tag, TagDocs};
pub use tree::ParseTree;

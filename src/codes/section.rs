//! Code sections: the per-tag view of a coded span.
//!
//! A span tagged `[like this](@a $b)` produces one [`CodeSection`] per valid
//! tag token, each a snapshot of the owning node taken at construction time.
//! Sections share the node's child nodes by reference, so a section stays
//! valid and cheap to clone however the tree around it is reorganized.

use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

use crate::codes::kind::CodeKind;
use crate::syntax::node::{Content, Node};

/// One tag's view of one coded span. Immutable once built.
#[derive(Debug, Clone)]
pub struct CodeSection {
    kind: CodeKind,
    tag: String,
    content: Vec<Content>,
    line: usize,
    offset: usize,
    raw: String,
    source_file: Option<Arc<Path>>,
    children: OnceCell<Vec<Arc<Node>>>,
}

impl CodeSection {
    /// Snapshot `node` under one of its tags. The caller has already
    /// validated the token against the sigil table.
    pub(crate) fn new(kind: CodeKind, tag: &str, node: &Node) -> CodeSection {
        CodeSection {
            kind,
            tag: tag.to_string(),
            content: node.content().to_vec(),
            line: node.line(),
            offset: node.offset(),
            raw: node.raw().to_string(),
            source_file: node.shared_source(),
            children: OnceCell::new(),
        }
    }

    /// The full tag, sigil included.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Content entries of the span, shared with the owning node.
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// 1-based line the span starts on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based character offset the span starts at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The exact document substring of the span, brackets and tokens
    /// included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The file the span came from, when the tree was parsed from one.
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// The nested nodes inside this span, in content order.
    pub fn children(&self) -> &[Arc<Node>] {
        self.children.get_or_init(|| {
            self.content
                .iter()
                .filter_map(|entry| match entry {
                    Content::Child(node) => Some(Arc::clone(node)),
                    Content::Text(_) => None,
                })
                .collect()
        })
    }

    /// Whether any direct child span carries `tag`. This looks one level
    /// down only; deep containment is answered by the owning tag group.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.children()
            .iter()
            .any(|child| child.codes().iter().any(|section| section.tag() == tag))
    }

    /// The direct child sections carrying `tag`.
    pub fn sections_tagged(&self, tag: &str) -> Vec<&CodeSection> {
        self.children()
            .iter()
            .flat_map(|child| child.codes())
            .filter(|section| section.tag() == tag)
            .collect()
    }
}

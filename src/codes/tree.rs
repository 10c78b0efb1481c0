//! The parse tree: one document - or several merged ones - plus the lazy
//! tag index over it.
//!
//! Merging is left-biased and in-place: the right-hand tree's root content
//! is appended to the left root's, file lists concatenate, and same-tag
//! groups combine left-sections-first. The tag index is rebuilt from both
//! sides' indexes during the merge and installed atomically, so a tree never
//! exposes a half-merged view.

use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codes::section::CodeSection;
use crate::codes::tag::Tag;
use crate::errors::CamdError;
use crate::syntax::node::Node;
use crate::syntax::scanner::Scanner;

/// A parsed document tree with per-tag aggregation.
#[derive(Debug)]
pub struct ParseTree {
    root: Node,
    source_files: Vec<PathBuf>,
    tags: OnceCell<BTreeMap<String, Tag>>,
}

impl ParseTree {
    /// Parse an anonymous piece of text. Never fails; malformed annotation
    /// syntax degrades to literal content.
    pub fn parse(text: &str) -> ParseTree {
        let mut scanner = Scanner::new(text);
        let root = Node::parse_root(&mut scanner, None);
        ParseTree {
            root,
            source_files: Vec::new(),
            tags: OnceCell::new(),
        }
    }

    /// Parse a document and stamp every node and section with the file it
    /// came from.
    pub fn parse_with_path(text: &str, path: impl Into<PathBuf>) -> ParseTree {
        let path = path.into();
        let shared: Arc<Path> = Arc::from(path.as_path());
        let mut scanner = Scanner::new(text);
        let root = Node::parse_root(&mut scanner, Some(shared));
        ParseTree {
            root,
            source_files: vec![path],
            tags: OnceCell::new(),
        }
    }

    /// The root node. Covers the concatenation of every merged document.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The files this tree was parsed from, in merge order.
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    /// Every code section in the tree, in depth-first document order.
    pub fn sections(&self) -> &[CodeSection] {
        self.root.all_codes()
    }

    /// The tag index: tag string to group, sorted by tag. Built on first
    /// use; construction fails only on a grouping contract violation, which
    /// would be a bug rather than a property of the document.
    pub fn tags(&self) -> Result<&BTreeMap<String, Tag>, CamdError> {
        self.tags.get_or_try_init(|| {
            let mut grouped: BTreeMap<String, Vec<CodeSection>> = BTreeMap::new();
            for section in self.root.all_codes() {
                grouped
                    .entry(section.tag().to_string())
                    .or_default()
                    .push(section.clone());
            }
            let mut tags = BTreeMap::new();
            for (name, sections) in grouped {
                let tag = Tag::new(name.clone(), sections)?;
                tags.insert(name, tag);
            }
            Ok(tags)
        })
    }

    /// Consume the tree and keep only its tag index.
    pub fn into_tags(self) -> Result<BTreeMap<String, Tag>, CamdError> {
        self.tags()?;
        Ok(self.tags.into_inner().unwrap_or_default())
    }

    /// Fold `other` into this tree, keeping this tree's material first
    /// everywhere: root content, file order, and section order within each
    /// combined tag group. Grouping the two indexes is done before any state
    /// changes, so a failed merge leaves this tree as it was.
    pub fn merge(&mut self, other: ParseTree) -> Result<(), CamdError> {
        self.tags()?;
        other.tags()?;

        let mine = self.tags.take().unwrap_or_default();
        let ParseTree {
            root: other_root,
            source_files: other_files,
            tags: other_tags,
        } = other;
        let mut theirs = other_tags.into_inner().unwrap_or_default();

        let mut merged = BTreeMap::new();
        for (name, tag) in mine {
            let combined = match theirs.remove(&name) {
                Some(other_tag) => tag.merge(other_tag)?,
                None => tag,
            };
            merged.insert(name, combined);
        }
        // Tags present only on the right side carry over unchanged.
        merged.extend(theirs);

        self.root.splice(other_root);
        self.source_files.extend(other_files);
        self.tags = OnceCell::with_value(merged);
        Ok(())
    }
}

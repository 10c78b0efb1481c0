//! Tag groups: every section carrying one tag, across documents.
//!
//! A [`Tag`] owns its sections outright, so a group survives the trees its
//! sections were cut from. Codebook documentation is attached after
//! aggregation and deliberately does not survive merging - a merged group is
//! new material until the codebook is applied to it again.

use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

use crate::codes::kind::CodeKind;
use crate::codes::section::CodeSection;
use crate::errors::{CamdError, ErrorKind};

/// Documentation for one tag, as read from the codebook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDocs {
    pub description: Option<String>,
    pub extra: BTreeMap<String, String>,
}

/// All sections of one tag, with optional codebook documentation.
#[derive(Debug)]
pub struct Tag {
    kind: CodeKind,
    tag: String,
    sections: Vec<CodeSection>,
    description: Option<String>,
    extra_info: Option<BTreeMap<String, String>>,
    documented: bool,

    contained_sections: OnceCell<Vec<CodeSection>>,
    contained_tags: OnceCell<Vec<String>>,
}

impl Tag {
    /// Group `sections` under `tag`. Fails when the tag has no recognized
    /// sigil or when any section carries a different tag; a group is
    /// single-tag by contract.
    pub fn new(tag: impl Into<String>, sections: Vec<CodeSection>) -> Result<Tag, CamdError> {
        let tag = tag.into();
        let Some(kind) = CodeKind::of_tag(&tag) else {
            return Err(CamdError::without_source(ErrorKind::UnknownSigil {
                token: tag,
            }));
        };
        if let Some(stray) = sections.iter().find(|section| section.tag() != tag) {
            return Err(CamdError::without_source(ErrorKind::TagMismatch {
                expected: tag.clone(),
                found: stray.tag().to_string(),
            }));
        }
        Ok(Tag {
            kind,
            tag,
            sections,
            description: None,
            extra_info: None,
            documented: false,
            contained_sections: OnceCell::new(),
            contained_tags: OnceCell::new(),
        })
    }

    /// Combine two groups of the same tag: this group's sections first, then
    /// the other's. The result starts undocumented regardless of what either
    /// input carried.
    pub fn merge(self, other: Tag) -> Result<Tag, CamdError> {
        if self.tag != other.tag {
            return Err(CamdError::without_source(ErrorKind::TagMismatch {
                expected: self.tag,
                found: other.tag,
            }));
        }
        let mut sections = self.sections;
        sections.extend(other.sections);
        Tag::new(self.tag, sections)
    }

    /// Attach codebook documentation. Marks the group documented even when
    /// the codebook entry had no description text.
    pub fn apply_docs(&mut self, docs: TagDocs) {
        self.description = docs.description;
        self.extra_info = if docs.extra.is_empty() {
            None
        } else {
            Some(docs.extra)
        };
        self.documented = true;
    }

    /// The full tag, sigil included.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Sections in aggregation order: document order within a tree, merge
    /// order across trees.
    pub fn sections(&self) -> &[CodeSection] {
        &self.sections
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn extra_info(&self) -> Option<&BTreeMap<String, String>> {
        self.extra_info.as_ref()
    }

    /// Whether the codebook documents this tag.
    pub fn documented(&self) -> bool {
        self.documented
    }

    /// Every section nested anywhere inside this group's sections, at any
    /// depth. Computed once per group.
    pub fn contained_sections(&self) -> &[CodeSection] {
        self.contained_sections.get_or_init(|| {
            let mut nested = Vec::new();
            for section in &self.sections {
                for child in section.children() {
                    nested.extend(child.all_codes().iter().cloned());
                }
            }
            nested
        })
    }

    /// The distinct tags of [`Tag::contained_sections`], in first-appearance
    /// order.
    pub fn contained_tags(&self) -> &[String] {
        self.contained_tags.get_or_init(|| {
            let mut tags: Vec<String> = Vec::new();
            for section in self.contained_sections() {
                if !tags.iter().any(|known| known == section.tag()) {
                    tags.push(section.tag().to_string());
                }
            }
            tags
        })
    }

    /// Whether `tag` appears anywhere inside this group's sections.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.contained_tags().iter().any(|known| known == tag)
    }
}

//! The fixed sigil table.
//!
//! Three code categories exist and the set is closed: the rest of the crate
//! matches on [`CodeKind`] exhaustively, so growing the taxonomy is a
//! deliberate source change here rather than a runtime registration.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CONTEXT_SIGIL: char = '@';
pub const CONTENT_SIGIL: char = '$';
pub const META_SIGIL: char = '^';

/// The category a code tag belongs to, determined entirely by the sigil
/// character the tag starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Context,
    Content,
    Meta,
}

// Sigil -> kind, in sorted order. The codebook line pattern interpolates the
// sigils into a regex character class, where `^` must never come first, so
// the sorted order a BTreeMap gives us is load-bearing.
static SIGIL_TABLE: Lazy<BTreeMap<char, CodeKind>> = Lazy::new(|| {
    BTreeMap::from([
        (CONTEXT_SIGIL, CodeKind::Context),
        (CONTENT_SIGIL, CodeKind::Content),
        (META_SIGIL, CodeKind::Meta),
    ])
});

impl CodeKind {
    /// Presentation order for reports: context, content, meta.
    pub const ALL: [CodeKind; 3] = [CodeKind::Context, CodeKind::Content, CodeKind::Meta];

    /// Look up the kind a sigil character introduces.
    pub fn of_sigil(sigil: char) -> Option<CodeKind> {
        SIGIL_TABLE.get(&sigil).copied()
    }

    /// Classify a full tag string. A tag is a sigil followed by at least one
    /// more character; a bare sigil is not a tag.
    pub fn of_tag(tag: &str) -> Option<CodeKind> {
        let mut chars = tag.chars();
        let kind = Self::of_sigil(chars.next()?)?;
        if chars.next().is_none() {
            return None;
        }
        Some(kind)
    }

    pub const fn sigil(self) -> char {
        match self {
            CodeKind::Context => CONTEXT_SIGIL,
            CodeKind::Content => CONTENT_SIGIL,
            CodeKind::Meta => META_SIGIL,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CodeKind::Context => "context",
            CodeKind::Content => "content",
            CodeKind::Meta => "meta",
        }
    }

    /// All recognized sigils in sorted order.
    pub fn sigils() -> impl Iterator<Item = char> {
        SIGIL_TABLE.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_sigil_maps_to_its_kind() {
        assert_eq!(CodeKind::of_sigil('@'), Some(CodeKind::Context));
        assert_eq!(CodeKind::of_sigil('$'), Some(CodeKind::Content));
        assert_eq!(CodeKind::of_sigil('^'), Some(CodeKind::Meta));
        assert_eq!(CodeKind::of_sigil('x'), None);
    }

    #[test]
    fn a_tag_needs_a_sigil_and_a_name() {
        assert_eq!(CodeKind::of_tag("@interview"), Some(CodeKind::Context));
        assert_eq!(CodeKind::of_tag("@"), None);
        assert_eq!(CodeKind::of_tag("plain"), None);
        assert_eq!(CodeKind::of_tag(""), None);
    }

    #[test]
    fn sigils_come_out_sorted() {
        let sigils: String = CodeKind::sigils().collect();
        assert_eq!(sigils, "$@^");
        assert_ne!(sigils.chars().next(), Some('^'));
    }
}

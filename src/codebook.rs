//! The codebook: a human-maintained list of tag descriptions.
//!
//! The codebook is a plain text file, one tag per line, with an optional
//! colon-separated description. `#` starts a comment, whole-line or
//! trailing; blank lines are skipped. Anything else is a hard error with a
//! span pointing at the offending line, so a typo in the codebook never
//! passes silently as an undocumented tag.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::codes::kind::CodeKind;
use crate::codes::tag::TagDocs;
use crate::errors::{CamdError, ErrorKind, SourceContext};

// Sigil-led tag, then optionally `: description`. The sigils interpolate in
// sorted order because `^` first in a character class would negate it.
static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| {
    let sigils: String = CodeKind::sigils().collect();
    Regex::new(&format!(
        r"^\s*([{}][^:\s]*)(\s*:\s*(.*))?$",
        regex::escape(&sigils)
    ))
    .expect("codebook entry pattern is a valid regex")
});

/// One documented tag.
#[derive(Debug, Clone, PartialEq)]
pub struct CodebookEntry {
    pub tag: String,
    pub description: Option<String>,
}

impl CodebookEntry {
    /// The documentation payload this entry contributes to a tag group.
    pub fn docs(&self) -> TagDocs {
        TagDocs {
            description: self.description.clone(),
            extra: BTreeMap::new(),
        }
    }
}

/// The parsed codebook: tag string to entry, sorted by tag.
#[derive(Debug, Default)]
pub struct Codebook {
    entries: BTreeMap<String, CodebookEntry>,
}

impl Codebook {
    /// Read and parse a codebook file.
    pub fn load(path: &Path) -> Result<Codebook, CamdError> {
        let content = fs::read_to_string(path).map_err(|err| {
            CamdError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        let source = SourceContext::from_file(path.display().to_string(), content);
        Codebook::parse(&source)
    }

    /// Parse codebook text. Later entries for the same tag replace earlier
    /// ones.
    pub fn parse(source: &SourceContext) -> Result<Codebook, CamdError> {
        let mut entries = BTreeMap::new();
        let mut offset = 0usize;

        for (index, raw_line) in source.content.split('\n').enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            let visible = line.split('#').next().unwrap_or("");

            if !visible.trim().is_empty() {
                let Some(captures) = ENTRY_LINE.captures(visible) else {
                    let span = offset..offset + raw_line.len();
                    return Err(CamdError::new(
                        ErrorKind::CodebookLine { line: index + 1 },
                        source,
                        span.into(),
                    )
                    .with_help(
                        "codebook lines are `<sigil><tag> : description`, \
                         a `#` comment, or blank",
                    ));
                };
                let tag = captures[1].to_string();
                let description = captures
                    .get(3)
                    .map(|text| text.as_str().trim_end())
                    .filter(|text| !text.is_empty())
                    .map(str::to_string);
                entries.insert(tag.clone(), CodebookEntry { tag, description });
            }

            // +1 for the newline the split consumed.
            offset += raw_line.len() + 1;
        }
        Ok(Codebook { entries })
    }

    pub fn get(&self, tag: &str) -> Option<&CodebookEntry> {
        self.entries.get(tag)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CodebookEntry> + '_ {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render bare stub lines for `tags`, sorted, under a marker comment.
    /// Appended to the codebook by `sync` so every coded tag has a line to
    /// fill in.
    pub fn render_stubs(tags: &[String]) -> String {
        let mut sorted: Vec<&str> = tags.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let mut block = String::from("\n# added by camd sync\n");
        for tag in sorted {
            block.push_str(tag);
            block.push('\n');
        }
        block
    }
}

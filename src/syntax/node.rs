//! The annotation tree and its recursive builder.
//!
//! A document is a flat run of text until a `[` opens a candidate code span.
//! The builder enters a child node there and keeps consuming until it either
//! sees the span close as `](tokens)` - the node stays a code node - or the
//! syntax falls apart, in which case the node *degrades*: it keeps everything
//! it consumed as literal content, re-materializes the `[` that opened it as
//! a leading fragment, and stops claiming to be a code span.
//!
//! Two invariants fall out of that design and the tests lean on both:
//!
//! - the root node's `raw` is always the entire document, byte for byte;
//! - for any non-code node, concatenating its content entries in order
//!   reproduces its `raw` exactly.
//!
//! Building never fails. There is no malformed document, only text.

use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

use crate::codes::{CodeKind, CodeSection};
use crate::syntax::scanner::Scanner;

// ============================================================================
// CONTENT ENTRIES
// ============================================================================

/// A run of literal text inside a node, stamped with the position of its
/// first character. Positions are kept for diagnostics; consumers that only
/// need the text use [`Fragment::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub line: usize,
    pub offset: usize,
    pub text: String,
}

/// One ordered entry of a node's content: literal text or a nested node.
#[derive(Debug, Clone)]
pub enum Content {
    Text(Fragment),
    Child(Arc<Node>),
}

// ============================================================================
// NODE
// ============================================================================

/// One node of the annotation tree.
///
/// The root node covers the whole document and is never a code span. Every
/// other node was opened by a `[` and is a code span exactly when
/// [`Node::is_code`] holds, in which case [`Node::token_text`] carries the
/// verbatim text between `](` and `)`.
#[derive(Debug)]
pub struct Node {
    is_code: bool,
    token_text: Option<String>,
    raw: String,
    content: Vec<Content>,
    line: usize,
    offset: usize,
    source_file: Option<Arc<Path>>,

    children: OnceCell<Vec<Arc<Node>>>,
    codes: OnceCell<Vec<CodeSection>>,
    all_codes: OnceCell<Vec<CodeSection>>,
}

impl Node {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build the root node for a whole document. The root sits at line 1,
    /// offset 0, regardless of what the document starts with.
    pub(crate) fn parse_root(scanner: &mut Scanner<'_>, source_file: Option<Arc<Path>>) -> Node {
        Node::build(scanner, 1, 0, false, source_file)
    }

    fn new(line: usize, offset: usize, entered: bool, source_file: Option<Arc<Path>>) -> Node {
        Node {
            is_code: entered,
            token_text: None,
            // An entered node has already consumed its opening bracket.
            raw: if entered { String::from("[") } else { String::new() },
            content: Vec::new(),
            line,
            offset,
            source_file,
            children: OnceCell::new(),
            codes: OnceCell::new(),
            all_codes: OnceCell::new(),
        }
    }

    /// Consume characters from the scanner until this node closes or the
    /// input ends. `entered` is true for every node except the root and
    /// means the caller already consumed a `[` at (`line`, `offset`).
    fn build(
        scanner: &mut Scanner<'_>,
        line: usize,
        offset: usize,
        entered: bool,
        source_file: Option<Arc<Path>>,
    ) -> Node {
        let mut node = Node::new(line, offset, entered, source_file);
        let mut run: Option<Fragment> = None;

        loop {
            let Some(next) = scanner.next() else {
                // Input ended inside this node. Whatever was consumed stays
                // as literal content; a non-root node loses code status.
                Self::flush(&mut node.content, &mut run);
                if entered {
                    node.degrade();
                }
                break;
            };

            match next.ch {
                '[' => {
                    Self::flush(&mut node.content, &mut run);
                    node.enter_child(scanner, next.line, next.index);
                }
                ']' if node.is_code => {
                    node.raw.push(']');
                    node.close(scanner, &mut run, next.line, next.index);
                    break;
                }
                ch => {
                    node.raw.push(ch);
                    Self::append(&mut run, next.line, next.index, ch);
                }
            }
        }
        node
    }

    /// Recurse into a child node opened by a `[` at the given position.
    fn enter_child(&mut self, scanner: &mut Scanner<'_>, line: usize, offset: usize) {
        let child = Node::build(scanner, line, offset, true, self.source_file.clone());
        // The child's raw starts with its own `[`.
        self.raw.push_str(&child.raw);
        self.content.push(Content::Child(Arc::new(child)));
    }

    /// Handle the character after a `]` inside a code span. The node is
    /// finished when this returns, whether it closed cleanly or degraded;
    /// the remaining input belongs to the parent.
    fn close(
        &mut self,
        scanner: &mut Scanner<'_>,
        run: &mut Option<Fragment>,
        bracket_line: usize,
        bracket_offset: usize,
    ) {
        let Some(after) = scanner.next() else {
            // `]` was the last character of the input.
            Self::append(run, bracket_line, bracket_offset, ']');
            Self::flush(&mut self.content, run);
            self.degrade();
            return;
        };

        match after.ch {
            '(' => {
                self.raw.push('(');
                Self::flush(&mut self.content, run);
                self.capture_tokens(scanner, bracket_line, bracket_offset);
            }
            '[' => {
                // `][` starts a sibling-looking span: the `]` turns into
                // literal text, the new `[` opens a nested child, and this
                // node gives up its code status.
                Self::append(run, bracket_line, bracket_offset, ']');
                Self::flush(&mut self.content, run);
                self.enter_child(scanner, after.line, after.index);
                self.degrade();
            }
            other => {
                // `]x` for any other x: both characters are literal text.
                self.raw.push(other);
                Self::append(run, bracket_line, bracket_offset, ']');
                Self::append(run, after.line, after.index, other);
                Self::flush(&mut self.content, run);
                self.degrade();
            }
        }
    }

    /// Consume the token text after `](`, verbatim, up to the first `)`.
    /// A `)` always closes the list; there is no nesting or escaping. If the
    /// input ends first, the consumed `](...` prefix is reified as a literal
    /// fragment and the node degrades.
    fn capture_tokens(
        &mut self,
        scanner: &mut Scanner<'_>,
        bracket_line: usize,
        bracket_offset: usize,
    ) {
        let mut tokens = String::new();
        while let Some(next) = scanner.next() {
            self.raw.push(next.ch);
            if next.ch == ')' {
                self.token_text = Some(tokens);
                return;
            }
            tokens.push(next.ch);
        }
        let mut text = String::from("](");
        text.push_str(&tokens);
        self.content.push(Content::Text(Fragment {
            line: bracket_line,
            offset: bracket_offset,
            text,
        }));
        self.degrade();
    }

    /// Give up code status. The opening bracket this node consumed comes
    /// back as a literal fragment so content still concatenates to raw.
    fn degrade(&mut self) {
        self.is_code = false;
        self.content.insert(
            0,
            Content::Text(Fragment {
                line: self.line,
                offset: self.offset,
                text: String::from("["),
            }),
        );
    }

    fn append(run: &mut Option<Fragment>, line: usize, offset: usize, ch: char) {
        match run {
            Some(fragment) => fragment.text.push(ch),
            None => {
                *run = Some(Fragment {
                    line,
                    offset,
                    text: ch.to_string(),
                })
            }
        }
    }

    fn flush(content: &mut Vec<Content>, run: &mut Option<Fragment>) {
        if let Some(fragment) = run.take() {
            content.push(Content::Text(fragment));
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Whether this node is a completed code span.
    pub fn is_code(&self) -> bool {
        self.is_code
    }

    /// The verbatim token text between `](` and `)`, present only on
    /// completed code spans. May list zero valid tags.
    pub fn token_text(&self) -> Option<&str> {
        self.token_text.as_deref()
    }

    /// The exact substring of the document this node spans.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Ordered literal fragments and child nodes.
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// 1-based line of the first character of this node.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based character offset of the first character of this node.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The document this node was parsed from, when one was named.
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub(crate) fn shared_source(&self) -> Option<Arc<Path>> {
        self.source_file.clone()
    }

    /// Just the literal fragments of this node's content, in order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.content.iter().filter_map(|entry| match entry {
            Content::Text(fragment) => Some(fragment),
            Content::Child(_) => None,
        })
    }

    // ------------------------------------------------------------------
    // Cached views
    // ------------------------------------------------------------------

    /// The nested nodes of this node's content, in order. Computed once.
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

    /// The code sections declared on this node itself: one per valid tag
    /// token. Tokens split on whitespace; a token counts only when it starts
    /// with a recognized sigil and has at least one character after it.
    /// Non-code nodes and empty token lists yield no sections.
    pub fn codes(&self) -> &[CodeSection] {
        self.codes.get_or_init(|| {
            let Some(tokens) = self.token_text.as_deref() else {
                return Vec::new();
            };
            tokens
                .split_whitespace()
                .filter_map(|token| {
                    let kind = CodeKind::of_tag(token)?;
                    Some(CodeSection::new(kind, token, self))
                })
                .collect()
        })
    }

    /// All code sections of this subtree in depth-first order: this node's
    /// own sections first, then each child's `all_codes` in content order.
    pub fn all_codes(&self) -> &[CodeSection] {
        self.all_codes.get_or_init(|| {
            let mut sections = self.codes().to_vec();
            for child in self.children() {
                sections.extend(child.all_codes().iter().cloned());
            }
            sections
        })
    }

    // ------------------------------------------------------------------
    // Mutation (tree merging only)
    // ------------------------------------------------------------------

    /// Append another root node's raw text and content to this one and drop
    /// every cached view so it is recomputed over the combined content.
    pub(crate) fn splice(&mut self, other: Node) {
        self.raw.push_str(&other.raw);
        self.content.extend(other.content);
        self.children.take();
        self.codes.take();
        self.all_codes.take();
    }
}

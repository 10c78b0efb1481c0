//! Character scanner with line and offset accounting.
//!
//! The scanner is the only component that looks at the document text
//! directly. It walks the input one character at a time and stamps each one
//! with the line it sits on and its absolute character offset, so that every
//! position recorded higher up the stack (nodes, sections, reports) is in
//! characters, never bytes. Exhaustion is a normal condition: the iterator
//! simply ends, and a scanner cannot be rewound - parse a fresh one instead.

use std::str::Chars;

/// One scanned character together with the position it was read at.
///
/// `line` is 1-based. `index` counts characters from the start of the
/// document, 0-based, across line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub line: usize,
    pub index: usize,
    pub ch: char,
}

/// Single-pass character source over a document.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars: Chars<'a>,
    line: usize,
    index: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner {
            chars: text.chars(),
            line: 1,
            index: 0,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let ch = self.chars.next()?;
        let scanned = Scanned {
            line: self.line,
            index: self.index,
            ch,
        };
        // A newline is reported on the line it terminates; the line counter
        // moves only after the newline itself has been yielded.
        if ch == '\n' {
            self.line += 1;
        }
        self.index += 1;
        Some(scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(text: &str) -> Vec<Scanned> {
        Scanner::new(text).collect()
    }

    #[test]
    fn positions_advance_per_character() {
        let scanned = drain("ab");
        assert_eq!(scanned.len(), 2);
        assert_eq!((scanned[0].line, scanned[0].index, scanned[0].ch), (1, 0, 'a'));
        assert_eq!((scanned[1].line, scanned[1].index, scanned[1].ch), (1, 1, 'b'));
    }

    #[test]
    fn newline_belongs_to_the_line_it_ends() {
        let scanned = drain("a\nb");
        assert_eq!((scanned[0].line, scanned[0].ch), (1, 'a'));
        assert_eq!((scanned[1].line, scanned[1].ch), (1, '\n'));
        assert_eq!((scanned[2].line, scanned[2].index, scanned[2].ch), (2, 2, 'b'));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let scanned = drain("é[");
        assert_eq!((scanned[0].index, scanned[0].ch), (0, 'é'));
        assert_eq!((scanned[1].index, scanned[1].ch), (1, '['));
    }

    #[test]
    fn exhaustion_is_quiet_and_repeatable() {
        let mut scanner = Scanner::new("x");
        assert!(scanner.next().is_some());
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(drain("").is_empty());
    }
}

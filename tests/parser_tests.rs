// tests/parser_tests.rs

use camd::{Content, Node, ParseTree};

// A helper to concatenate a node's content entries in order.
fn concat(node: &Node) -> String {
    let mut out = String::new();
    for entry in node.content() {
        match entry {
            Content::Text(fragment) => out.push_str(&fragment.text),
            Content::Child(child) => out.push_str(child.raw()),
        }
    }
    out
}

// ---
// Well-formed spans
// ---

#[test]
fn test_parse_simple_span() {
    let tree = ParseTree::parse("hello [world](@ctx) bye");
    let root = tree.root();

    assert!(!root.is_code());
    assert_eq!(root.raw(), "hello [world](@ctx) bye");
    assert_eq!(root.children().len(), 1);

    let span = &root.children()[0];
    assert!(span.is_code());
    assert_eq!(span.token_text(), Some("@ctx"));
    assert_eq!(span.raw(), "[world](@ctx)");
    assert_eq!(span.line(), 1);
    assert_eq!(span.offset(), 6);

    let sections = tree.sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].tag(), "@ctx");
    assert_eq!(sections[0].raw(), "[world](@ctx)");
}

#[test]
fn test_multiple_tags_share_one_span() {
    let tree = ParseTree::parse("[x](@place $theme)");
    let sections = tree.sections();
    assert_eq!(sections.len(), 2);

    assert_eq!(sections[0].tag(), "@place");
    assert_eq!(sections[1].tag(), "$theme");
    for section in sections {
        assert_eq!(section.raw(), "[x](@place $theme)");
        assert_eq!(section.line(), 1);
        assert_eq!(section.offset(), 0);
    }
}

#[test]
fn test_token_splitting_honors_all_whitespace() {
    let tree = ParseTree::parse("[x](@a\t$b\n^c   @d)");
    let tags: Vec<&str> = tree.sections().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, vec!["@a", "$b", "^c", "@d"]);
    // The raw span keeps the token text verbatim, newline included.
    assert_eq!(tree.root().raw(), "[x](@a\t$b\n^c   @d)");
}

#[test]
fn test_invalid_tokens_are_dropped_not_fatal() {
    // `bogus` has no sigil; `@` and `$` are bare sigils with no name.
    let tree = ParseTree::parse("[x](@a bogus @ $ ^ok)");
    let tags: Vec<&str> = tree.sections().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, vec!["@a", "^ok"]);
}

#[test]
fn test_empty_token_list_is_a_code_node_with_no_sections() {
    let tree = ParseTree::parse("[x]()");
    let span = &tree.root().children()[0];
    assert!(span.is_code());
    assert_eq!(span.token_text(), Some(""));
    assert!(span.codes().is_empty());
    assert!(tree.sections().is_empty());
}

#[test]
fn test_nested_spans_and_depth_first_order() {
    let tree = ParseTree::parse("[outer [a](@a) and [b [c](@c)](@b)](@top)");
    let tags: Vec<&str> = tree.sections().iter().map(|s| s.tag()).collect();
    // A node's own sections come first, then each child subtree in order.
    assert_eq!(tags, vec!["@top", "@a", "@b", "@c"]);
}

#[test]
fn test_sections_see_the_same_child_nodes() {
    let tree = ParseTree::parse("[outer [inner]($i)](@o)");
    let outer_node = &tree.root().children()[0];
    let outer_section = &tree.sections()[0];
    assert_eq!(outer_section.tag(), "@o");
    assert_eq!(outer_section.children().len(), 1);
    assert!(std::sync::Arc::ptr_eq(
        &outer_section.children()[0],
        &outer_node.children()[0]
    ));
}

// ---
// Degradation: malformed syntax becomes literal text
// ---

#[test]
fn test_unterminated_token_list_degrades() {
    let tree = ParseTree::parse("text ending in [abc](tok");
    let root = tree.root();
    assert_eq!(root.raw(), "text ending in [abc](tok");
    assert!(tree.sections().is_empty());

    let degraded = &root.children()[0];
    assert!(!degraded.is_code());
    assert_eq!(degraded.token_text(), None);
    assert_eq!(degraded.raw(), "[abc](tok");
    // Everything consumed survives as literal fragments.
    let texts: Vec<&str> = degraded.fragments().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["[", "abc", "](tok"]);
}

#[test]
fn test_unterminated_span_at_end_of_input() {
    let tree = ParseTree::parse("[abc");
    let degraded = &tree.root().children()[0];
    assert!(!degraded.is_code());
    assert_eq!(degraded.raw(), "[abc");
    assert_eq!(concat(degraded), "[abc");
}

#[test]
fn test_bracket_then_bracket_opens_a_child() {
    let tree = ParseTree::parse("[abc][def](@x)");
    let root = tree.root();
    assert_eq!(root.raw(), "[abc][def](@x)");

    let outer = &root.children()[0];
    assert!(!outer.is_code());
    assert_eq!(outer.children().len(), 1);

    let inner = &outer.children()[0];
    assert!(inner.is_code());
    assert_eq!(inner.raw(), "[def](@x)");

    let tags: Vec<&str> = tree.sections().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, vec!["@x"]);
}

#[test]
fn test_close_bracket_at_end_of_input_degrades() {
    let tree = ParseTree::parse("[abc]");
    let degraded = &tree.root().children()[0];
    assert!(!degraded.is_code());
    assert_eq!(degraded.raw(), "[abc]");
    assert_eq!(concat(degraded), "[abc]");
}

#[test]
fn test_close_bracket_followed_by_plain_text_degrades() {
    let tree = ParseTree::parse("[ab]c more");
    let root = tree.root();
    assert_eq!(root.raw(), "[ab]c more");
    assert!(tree.sections().is_empty());

    let degraded = &root.children()[0];
    assert!(!degraded.is_code());
    assert_eq!(degraded.raw(), "[ab]c");
}

#[test]
fn test_degraded_node_reifies_its_opening_bracket() {
    let tree = ParseTree::parse("[oops");
    let degraded = &tree.root().children()[0];
    let first = degraded.fragments().next().expect("a leading fragment");
    assert_eq!(first.text, "[");
    assert_eq!(first.line, 1);
    assert_eq!(first.offset, 0);
}

#[test]
fn test_parent_resumes_after_clean_and_degraded_closes_alike() {
    // Every way a span can end returns control to the parent at the same
    // place: right after the last character the span consumed.
    let tree = ParseTree::parse("[a](@x)[b]z[c](@y)");
    let root = tree.root();
    assert_eq!(root.raw(), "[a](@x)[b]z[c](@y)");
    assert_eq!(root.children().len(), 3);
    assert!(!root.children()[1].is_code());
    let tags: Vec<&str> = tree.sections().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, vec!["@x", "@y"]);
    assert_eq!(concat(root), "[a](@x)[b]z[c](@y)");
}

#[test]
fn test_close_bracket_at_root_is_plain_text() {
    let tree = ParseTree::parse("a ] b ](x)");
    let root = tree.root();
    assert_eq!(root.raw(), "a ] b ](x)");
    assert!(root.children().is_empty());
    assert_eq!(concat(root), "a ] b ](x)");
}

// ---
// Raw-text identities
// ---

#[test]
fn test_root_raw_is_always_the_whole_document() {
    let cases = vec![
        "",
        "plain text, no annotations",
        "[x](@a)",
        "pre [x](@a) post",
        "[unterminated",
        "[a](open",
        "[a]b",
        "[a][b](@c)",
        "[]",
        "[](",
        "[]()",
        "deep [a [b [c](@c)](@b)](@a) end",
        "line one\nline [two](@t)\nline three",
        "unicode é[ü]($ü) ok",
        "][ stray brackets ]",
    ];
    for src in cases {
        let tree = ParseTree::parse(src);
        assert_eq!(tree.root().raw(), src, "root raw mismatch for: {:?}", src);
        assert_eq!(
            concat(tree.root()),
            src,
            "content concatenation mismatch for: {:?}",
            src
        );
    }
}

#[test]
fn test_code_node_raw_rebuilds_from_parts() {
    let cases = vec!["[x](@a)", "[x y z](@a $b)", "[nested [n](@n) here](^m)"];
    for src in cases {
        let tree = ParseTree::parse(src);
        let span = &tree.root().children()[0];
        assert!(span.is_code(), "expected a code span for: {:?}", src);
        let rebuilt = format!(
            "[{}]({})",
            concat(span),
            span.token_text().expect("token text")
        );
        assert_eq!(rebuilt, span.raw(), "raw identity failed for: {:?}", src);
    }
}

// ---
// Positions
// ---

#[test]
fn test_positions_across_lines() {
    let tree = ParseTree::parse("one\ntwo [x](@t)");
    let section = &tree.sections()[0];
    assert_eq!(section.line(), 2);
    assert_eq!(section.offset(), 8);
}

#[test]
fn test_offsets_count_characters_not_bytes() {
    // 'é' is two bytes but one character; the span starts at offset 6.
    let tree = ParseTree::parse("héllo [wörld](@ü)");
    let section = &tree.sections()[0];
    assert_eq!(section.tag(), "@ü");
    assert_eq!(section.offset(), 6);
    assert_eq!(section.raw(), "[wörld](@ü)");
}

#[test]
fn test_fragment_positions_track_their_first_character() {
    let tree = ParseTree::parse("ab [x](@t) cd");
    let fragments: Vec<_> = tree.root().fragments().collect();
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].text, "ab ");
    assert_eq!(fragments[0].offset, 0);
    assert_eq!(fragments[1].text, " cd");
    assert_eq!(fragments[1].offset, 10);
}

#[test]
fn test_no_stale_fragment_when_input_ends_on_a_closed_span() {
    // The run before the span was already flushed when the span opened;
    // end of input must not flush it a second time or record an empty one.
    let tree = ParseTree::parse("pre [x](@t)");
    let root = tree.root();
    let texts: Vec<&str> = root.fragments().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["pre "]);
    assert_eq!(root.content().len(), 2);
    assert_eq!(concat(root), "pre [x](@t)");
}

// ---
// Section containment (one level)
// ---

#[test]
fn test_contains_tag_looks_one_level_down() {
    let tree = ParseTree::parse("[outer [a](@a) and [b [c](@c)](@b)](@top)");
    let top = &tree.sections()[0];
    assert_eq!(top.tag(), "@top");
    assert!(top.contains_tag("@a"));
    assert!(top.contains_tag("@b"));
    // `@c` sits two levels down; direct containment does not see it.
    assert!(!top.contains_tag("@c"));

    let found = top.sections_tagged("@a");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].raw(), "[a](@a)");
}

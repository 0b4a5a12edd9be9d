#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use apidoc_lexer_core::SourceBuffer;
use pretty_assertions::assert_eq;

fn buffer(source: &str) -> SourceBuffer {
    SourceBuffer::from_text(source, "test.src").unwrap()
}

/// Match `block` at the start of `source` and consume it.
/// Returns the block end and the unread remainder.
fn run(block: &LexicalBlock, source: &str) -> (Vec<String>, bool, String) {
    let buf = buffer(source);
    let mut cursor = buf.cursor();
    let open = block.begins_here(&mut cursor).unwrap();
    let end = open.consume_to_end(&mut cursor);
    (
        end.lines.iter().map(|line| (*line).to_owned()).collect(),
        end.well_terminated,
        cursor.rest().to_owned(),
    )
}

fn no_lines() -> Vec<String> {
    Vec::new()
}

// === filter_symbols ===

#[test]
fn filter_symbols_strips_marker_and_one_space() {
    assert_eq!(filter_symbols(" * line\n", "*"), "line\n");
    assert_eq!(filter_symbols("*  two spaces\n", "*"), " two spaces\n");
    assert_eq!(filter_symbols("\t*\n", "*"), "\n");
}

#[test]
fn filter_symbols_leaves_other_lines() {
    assert_eq!(filter_symbols(" a\n", "//"), " a\n");
    assert_eq!(filter_symbols("*bold*\n", "*"), "*bold*\n");
    assert_eq!(filter_symbols("   \n", "*"), "   \n");
    assert_eq!(filter_symbols("*", "*"), "*");
    assert_eq!(filter_symbols("", "*"), "");
}

// === begins_here ===

#[test]
fn failed_begin_leaves_cursor_untouched() {
    let buf = buffer("<<<\nEOT\n");
    let blocks = [
        LexicalBlock::single_line("//"),
        LexicalBlock::multi_line("/*", "*/"),
        LexicalBlock::Heredoc,
        LexicalBlock::LineAnchored {
            begin: "=begin",
            end: "=end",
        },
    ];
    for block in &blocks {
        let mut cursor = buf.cursor();
        assert!(block.begins_here(&mut cursor).is_none(), "{block:?}");
        assert_eq!(cursor.position(), apidoc_lexer_core::Position::ZERO);
    }
}

#[test]
fn kinds() {
    assert_eq!(LexicalBlock::string("\"", "\"", "\\").kind(), BlockKind::String);
    assert_eq!(LexicalBlock::Heredoc.kind(), BlockKind::String);
    assert_eq!(LexicalBlock::single_line("#").kind(), BlockKind::SingleLineComment);
    assert_eq!(
        LexicalBlock::NestedComment {
            begin: "/*",
            end: "*/",
            prefix: None
        }
        .kind(),
        BlockKind::MultiLineComment
    );
    assert!(!BlockKind::String.is_comment());
    assert!(BlockKind::MultiLineComment.is_comment());
}

// === String ===

#[test]
fn string_skips_escaped_end() {
    let block = LexicalBlock::string("\"", "\"", "\\");
    let (lines, ok, rest) = run(&block, r#""a\"b" tail"#);
    assert_eq!(lines, no_lines());
    assert!(ok);
    assert_eq!(rest, " tail");
}

#[test]
fn string_escape_skips_one_code_point() {
    let block = LexicalBlock::string("'", "'", "\\");
    let (_, ok, rest) = run(&block, "'\\注' x");
    assert!(ok);
    assert_eq!(rest, " x");
}

#[test]
fn unterminated_string() {
    let block = LexicalBlock::string("\"", "\"", "\\");
    let (_, ok, rest) = run(&block, "\"abc\\\"");
    assert!(!ok);
    assert_eq!(rest, "");
}

#[test]
fn raw_go_string_has_no_escape() {
    let block = LexicalBlock::raw_string("`", "`");
    let (_, ok, rest) = run(&block, "`a\\`b");
    assert!(ok);
    assert_eq!(rest, "b");
}

// === SingleLineComment ===

#[test]
fn single_line_chain_merges_adjacent_lines() {
    let block = LexicalBlock::single_line("//");
    let (lines, ok, rest) = run(&block, "// a\n  // b\nx\n");
    assert_eq!(lines, vec![" a\n", " b\n"]);
    assert!(ok);
    assert_eq!(rest, "x\n");
}

#[test]
fn single_line_chain_stops_at_blank_line() {
    let block = LexicalBlock::single_line("#");
    let (lines, _, rest) = run(&block, "# one\n\n# two\n");
    assert_eq!(lines, vec![" one\n"]);
    assert_eq!(rest, "\n# two\n");
}

#[test]
fn single_line_strips_repeated_marker() {
    let block = LexicalBlock::single_line("%");
    let (lines, _, _) = run(&block, "%% doc\n%%\n");
    assert_eq!(lines, vec!["doc\n", "\n"]);
}

#[test]
fn single_line_at_end_of_buffer() {
    let block = LexicalBlock::single_line("//");
    let (lines, ok, rest) = run(&block, "// last");
    assert_eq!(lines, vec![" last"]);
    assert!(ok);
    assert_eq!(rest, "");
}

// === MultiLineComment ===

#[test]
fn multi_line_strips_prefix_per_line() {
    let block = LexicalBlock::multi_line_with_prefix("/*", "*/", "*");
    let (lines, ok, rest) = run(&block, "/**\n * @api GET /x\n *\n * text\n */ int");
    assert_eq!(lines, vec!["\n", "@api GET /x\n", "\n", "text\n", " "]);
    assert!(ok);
    assert_eq!(rest, " int");
}

#[test]
fn multi_line_single_line_content() {
    let block = LexicalBlock::multi_line_with_prefix("/*", "*/", "*");
    let (lines, ok, _) = run(&block, "/** doc */");
    assert_eq!(lines, vec!["doc "]);
    assert!(ok);
}

#[test]
fn multi_line_drops_empty_final_segment() {
    let block = LexicalBlock::multi_line("{", "}");
    let (lines, _, _) = run(&block, "{ a\n}");
    assert_eq!(lines, vec![" a\n"]);
}

#[test]
fn multi_line_unterminated() {
    let block = LexicalBlock::multi_line("/*", "*/");
    let (lines, ok, _) = run(&block, "/* comment");
    assert_eq!(lines, no_lines());
    assert!(!ok);
}

// === DoubledQuoteString ===

#[test]
fn doubled_quote_is_escaped_quote() {
    let block = LexicalBlock::DoubledQuoteString { quote: "'" };
    let (_, ok, rest) = run(&block, "'it''s' + x");
    assert!(ok);
    assert_eq!(rest, " + x");
}

#[test]
fn doubled_quote_empty_string() {
    let block = LexicalBlock::DoubledQuoteString { quote: "'" };
    let (_, ok, rest) = run(&block, "'' { c }");
    assert!(ok);
    assert_eq!(rest, " { c }");
}

#[test]
fn doubled_quote_unterminated() {
    let block = LexicalBlock::DoubledQuoteString { quote: "\"" };
    let (_, ok, _) = run(&block, "\"abc\"\"");
    assert!(!ok);
}

// === LineAnchored ===

fn ruby_block() -> LexicalBlock {
    LexicalBlock::LineAnchored {
        begin: "=begin",
        end: "=end",
    }
}

#[test]
fn line_anchored_content_is_lines_between() {
    let (lines, ok, rest) = run(&ruby_block(), "=begin\n  a\nb\n=end\nx = 1\n");
    assert_eq!(lines, vec!["  a\n", "b\n"]);
    assert!(ok);
    assert_eq!(rest, "x = 1\n");
}

#[test]
fn line_anchored_end_may_end_buffer() {
    let (lines, ok, _) = run(&ruby_block(), "=begin\na\n=end");
    assert_eq!(lines, vec!["a\n"]);
    assert!(ok);
}

#[test]
fn line_anchored_end_must_fill_line() {
    let (lines, ok, _) = run(&ruby_block(), "=begin\n=end x\n =end\n=end\n");
    assert_eq!(lines, vec!["=end x\n", " =end\n"]);
    assert!(ok);
}

#[test]
fn line_anchored_begin_must_fill_line() {
    let buf = buffer("=begin x\n=end\n");
    let mut cursor = buf.cursor();
    assert!(ruby_block().begins_here(&mut cursor).is_none());
    assert_eq!(cursor.rest(), "=begin x\n=end\n");
}

#[test]
fn line_anchored_begin_requires_column_zero() {
    let buf = buffer(" =begin\n=end\n");
    let mut cursor = buf.cursor();
    cursor.take(1);
    assert!(ruby_block().begins_here(&mut cursor).is_none());
}

#[test]
fn line_anchored_unterminated() {
    let perl = LexicalBlock::LineAnchored {
        begin: "=pod",
        end: "=cut",
    };
    let (_, ok, _) = run(&perl, "=pod\ntext\n=cutting\n");
    assert!(!ok);
}

#[test]
fn line_anchored_accepts_crlf_delimiters() {
    let (lines, ok, rest) = run(&ruby_block(), "=begin\r\n@api GET /x\r\n=end\r\nx = 1\r\n");
    assert_eq!(lines, vec!["@api GET /x\r\n"]);
    assert!(ok);
    assert_eq!(rest, "x = 1\r\n");
}

// === NestedComment ===

fn swift_block() -> LexicalBlock {
    LexicalBlock::NestedComment {
        begin: "/*",
        end: "*/",
        prefix: Some("*"),
    }
}

#[test]
fn nested_closes_on_matching_depth() {
    let (lines, ok, rest) = run(&swift_block(), "/*0/*1/*2*/*/*/ */");
    assert!(ok);
    assert_eq!(lines, vec!["0/*1/*2*/*/"]);
    assert_eq!(rest, " */");
}

#[test]
fn nested_keeps_inner_delimiters_across_lines() {
    let (lines, ok, _) = run(&swift_block(), "/*\n * outer /* inner */\n * more\n */");
    assert!(ok);
    assert_eq!(lines, vec!["\n", "outer /* inner */\n", "more\n", " "]);
}

#[test]
fn nested_unterminated_when_depth_stays_positive() {
    let (_, ok, _) = run(&swift_block(), "/* a /* b */");
    assert!(!ok);
}

// === Heredoc ===

#[test]
fn heredoc_captures_terminator() {
    let buf = buffer("<<<EOF\nA\nB\nEOF\n");
    let mut cursor = buf.cursor();
    let open = LexicalBlock::Heredoc.begins_here(&mut cursor).unwrap();
    assert_eq!(open.heredoc_terminator(), Some("EOF"));
    assert_eq!(open.heredoc_flavor(), Some(HeredocFlavor::Heredoc));
    assert_eq!(open.kind(), BlockKind::String);

    let end = open.consume_to_end(&mut cursor);
    assert_eq!(end.lines, vec!["A\n", "B\n"]);
    assert!(end.well_terminated);
    assert!(cursor.at_end());
}

#[test]
fn nowdoc_with_semicolon_terminator() {
    let buf = buffer("<<<'TXT'\n$x\nTXT;\necho 1;");
    let mut cursor = buf.cursor();
    let open = LexicalBlock::Heredoc.begins_here(&mut cursor).unwrap();
    assert_eq!(open.heredoc_terminator(), Some("TXT"));
    assert_eq!(open.heredoc_flavor(), Some(HeredocFlavor::Nowdoc));
    let end = open.consume_to_end(&mut cursor);
    assert_eq!(end.lines, vec!["$x\n"]);
    assert_eq!(cursor.rest(), "echo 1;");
}

#[test]
fn heredoc_terminator_needs_own_line() {
    let (lines, ok, _) = run(&LexicalBlock::Heredoc, "<<<EOT\nEOTX\n EOT\nEOT");
    assert_eq!(lines, vec!["EOTX\n", " EOT\n"]);
    assert!(ok);
}

#[test]
fn heredoc_without_label_or_line_feed_does_not_match() {
    for source in ["<<< \nx", "<<<EOT", "<<<'EOT\nEOT\n", "<<<1x\n1x\n"] {
        let buf = buffer(source);
        let mut cursor = buf.cursor();
        assert!(LexicalBlock::Heredoc.begins_here(&mut cursor).is_none(), "{source:?}");
        assert_eq!(cursor.rest(), source);
    }
}

#[test]
fn heredoc_unterminated() {
    let (_, ok, _) = run(&LexicalBlock::Heredoc, "<<<EOT\nbody\n");
    assert!(!ok);
}

#[test]
fn heredoc_terminator_before_crlf() {
    let buf = buffer("<<<EOT\r\nbody\r\nEOT;\r\n$b = 1;\r\n");
    let mut cursor = buf.cursor();
    let open = LexicalBlock::Heredoc.begins_here(&mut cursor).unwrap();
    assert_eq!(open.heredoc_terminator(), Some("EOT"));
    let end = open.consume_to_end(&mut cursor);
    assert_eq!(end.lines, vec!["body\r\n"]);
    assert!(end.well_terminated);
    assert_eq!(cursor.rest(), "$b = 1;\r\n");

    let (lines, ok, _) = run(&LexicalBlock::Heredoc, "<<<'NOW'\r\nx\r\nNOW\r\n");
    assert_eq!(lines, vec!["x\r\n"]);
    assert!(ok);
}

// === TripleQuoteFence ===

fn nim_fence() -> LexicalBlock {
    LexicalBlock::TripleQuoteFence { fence: "\"\"\"" }
}

#[test]
fn fence_closes_before_line_end() {
    let (_, ok, rest) = run(&nim_fence(), "\"\"\"abc\"\"\"  \nx");
    assert!(ok);
    assert_eq!(rest, "x");
}

#[test]
fn fence_closes_at_end_of_buffer() {
    let (_, ok, _) = run(&nim_fence(), "\"\"\"abc\"\"\"");
    assert!(ok);
}

#[test]
fn fence_followed_by_text_is_content() {
    let (_, ok, rest) = run(&nim_fence(), "\"\"\"a\"\"\" & b\n\"\"\"\nrest");
    assert!(ok);
    assert_eq!(rest, "rest");
}

#[test]
fn four_quotes_close_on_last_three() {
    let (_, ok, rest) = run(&nim_fence(), "\"\"\"a\"\"\"\"\nz");
    assert!(ok);
    assert_eq!(rest, "z");
}

#[test]
fn fence_unterminated_when_never_at_line_end() {
    let (_, ok, _) = run(&nim_fence(), "\"\"\"a\"\"\"b");
    assert!(!ok);
}

// === RawString ===

#[test]
fn raw_string_accepts_either_opener() {
    let block = LexicalBlock::RawString {
        begins: &["r\"", "R\""],
        quote: "\"",
    };
    let (_, ok, rest) = run(&block, "R\"C:\\path\"\"x\" y");
    assert!(ok);
    assert_eq!(rest, " y");

    let (_, ok, rest) = run(&block, "r\"\\\" z");
    assert!(ok);
    assert_eq!(rest, " z");
}

use super::*;
use crate::ErrorCode;
use apidoc_lexer_core::{Origin, Position};
use pretty_assertions::assert_eq;

fn unterminated(origin: &str, line: u32, character: u32) -> Diagnostic {
    Diagnostic::warning(ErrorCode::E0002).at(Origin::new(origin), Position::new(line, character, 0))
}

#[test]
fn counts_by_severity() {
    let mut queue = DiagnosticQueue::new();
    queue.push(unterminated("a.c", 0, 0));
    queue.push(Diagnostic::error(ErrorCode::E0001).in_file(Origin::new("b.c")));
    queue.push(Diagnostic::error(ErrorCode::E0003).in_file(Origin::new("c.xyz")));

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.error_count(), 2);
    assert_eq!(queue.warning_count(), 1);
    assert!(queue.has_errors());
}

#[test]
fn exact_duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    queue.push(unterminated("a.c", 3, 0));
    queue.push(unterminated("a.c", 3, 0));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.warning_count(), 1);
}

#[test]
fn duplicates_dropped_across_many_files() {
    let mut queue = DiagnosticQueue::new();
    for round in 0..3 {
        for file in 0..500 {
            queue.push(unterminated(&format!("f{file}.c"), 1, 0));
        }
        assert_eq!(queue.len(), 500, "round {round}");
    }
    queue.push(unterminated("f0.c", 1, 1));
    assert_eq!(queue.len(), 501);
    assert_eq!(queue.warning_count(), 501);
}

#[test]
fn flush_forgets_seen_diagnostics() {
    let mut queue = DiagnosticQueue::new();
    queue.push(unterminated("a.c", 3, 0));
    assert_eq!(queue.flush().len(), 1);

    queue.push(unterminated("a.c", 3, 0));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.warning_count(), 1);
}

#[test]
fn flush_sorts_by_origin_then_position() {
    let mut queue = DiagnosticQueue::new();
    queue.extend([
        unterminated("b.c", 1, 0),
        unterminated("a.c", 9, 0),
        unterminated("a.c", 2, 5),
        unterminated("a.c", 2, 1),
        Diagnostic::error(ErrorCode::E0004),
    ]);

    let flushed = queue.flush();
    let keys: Vec<_> = flushed
        .iter()
        .map(|d| {
            d.location
                .as_ref()
                .map(|l| (l.origin.to_string(), l.position.line, l.position.character))
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            None,
            Some(("a.c".to_owned(), 2, 1)),
            Some(("a.c".to_owned(), 2, 5)),
            Some(("a.c".to_owned(), 9, 0)),
            Some(("b.c".to_owned(), 1, 0)),
        ]
    );
}

#[test]
fn flush_empties_queue() {
    let mut queue = DiagnosticQueue::new();
    queue.push(unterminated("a.c", 0, 0));
    assert_eq!(queue.flush().len(), 1);
    assert!(queue.is_empty());
    assert_eq!(queue.warning_count(), 0);
}

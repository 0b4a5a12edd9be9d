use super::*;
use crate::ErrorCode;
use apidoc_lexer_core::{Origin, Position};
use pretty_assertions::assert_eq;

fn warning(origin: &str, line: u32) -> Diagnostic {
    Diagnostic::warning(ErrorCode::E0002).at(Origin::new(origin), Position::new(line, 0, 0))
}

#[test]
fn collecting_sink_counts_and_takes() {
    let sink = CollectingSink::new();
    sink.emit(warning("a.go", 4));
    sink.emit(Diagnostic::error(ErrorCode::E0001).in_file(Origin::new("b.go")));
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.error_count(), 1);
    assert_eq!(sink.warning_count(), 1);

    let taken = sink.take();
    assert_eq!(taken.len(), 2);
    assert!(sink.is_empty());
}

#[test]
fn shared_sink_collects_from_threads() {
    let sink = Arc::new(CollectingSink::new());
    std::thread::scope(|scope| {
        for i in 0..4 {
            let sink = Arc::clone(&sink);
            scope.spawn(move || {
                for line in 0..10 {
                    sink.emit(warning(&format!("f{i}.c"), line));
                }
            });
        }
    });
    assert_eq!(sink.warning_count(), 40);
    let taken = sink.take();
    assert_eq!(taken.first().and_then(Diagnostic::origin).map(Origin::as_str), Some("f0.c"));
}

fn report(sink: impl DiagnosticSink) {
    sink.emit(warning("a.c", 0));
}

#[test]
fn sinks_accepted_by_reference_and_arc() {
    let sink = Arc::new(CollectingSink::new());
    report(&*sink);
    report(Arc::clone(&sink));
    let dyn_sink: Arc<dyn DiagnosticSink> = Arc::new(DiscardSink);
    report(dyn_sink);
    // Identical diagnostics collapse in the queue.
    assert_eq!(sink.len(), 1);
}

#[test]
fn discard_and_tracing_sinks_accept_everything() {
    DiscardSink.emit(warning("a.c", 0));
    TracingSink.emit(warning("a.c", 0));
    TracingSink.emit(Diagnostic::error(ErrorCode::E0004));
}

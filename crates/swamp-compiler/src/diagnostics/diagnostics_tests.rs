use swamp_core::{SourceId, SourceMap, Span};

use super::*;

fn memory_source(text: &str) -> (SourceMap, SourceId) {
    let mut sources = SourceMap::new();
    let id = sources.add_memory("memory://main.swamp", text);
    (sources, id)
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let (_, id) = memory_source("x");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ShapeMismatch, Span::new(id, 0..1))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.iter().next().unwrap().message, "type mismatch");
}

#[test]
fn report_with_detail_uses_template() {
    let (_, id) = memory_source("foo");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownIdentifier, Span::new(id, 0..3))
        .message("foo")
        .emit();
    diagnostics
        .report(DiagnosticKind::ShapeMismatch, Span::new(id, 0..3))
        .message("expected `Int`, found `Bool`")
        .emit();

    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    insta::assert_debug_snapshot!(messages, @r#"
    [
        "`foo` is not defined",
        "type mismatch: expected `Int`, found `Bool`",
    ]
    "#);
}

#[test]
fn warnings_are_not_errors() {
    let (_, id) = memory_source("x = 1");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnusedLocalDefinition, Span::new(id, 0..1))
        .message("x")
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn compile_errors_are_the_halting_subset() {
    assert!(DiagnosticKind::TokenizeError.is_compile_error());
    assert!(DiagnosticKind::ParseError.is_compile_error());
    assert!(DiagnosticKind::MissingFile.is_compile_error());
    assert!(!DiagnosticKind::ShapeMismatch.is_compile_error());
    assert!(!DiagnosticKind::CircularDependencyDetected.is_compile_error());
    assert!(!DiagnosticKind::UnusedImport.is_compile_error());
}

#[test]
fn kinds_are_ordered_by_priority() {
    assert!(DiagnosticKind::ParseError < DiagnosticKind::UnknownIdentifier);
    assert!(DiagnosticKind::UnknownIdentifier < DiagnosticKind::UnusedImport);
}

#[test]
fn extend_and_kinds() {
    let (_, id) = memory_source("a b");
    let mut first = Diagnostics::new();
    first
        .report(DiagnosticKind::ParseError, Span::new(id, 0..1))
        .emit();
    let mut second = Diagnostics::new();
    second
        .report(DiagnosticKind::UnknownType, Span::new(id, 2..3))
        .emit();

    first.extend(second);

    assert!(first.has_compile_errors());
    assert!(first.contains(DiagnosticKind::UnknownType));
    assert_eq!(
        first.kinds(),
        vec![DiagnosticKind::ParseError, DiagnosticKind::UnknownType]
    );
}

#[test]
fn plain_printer_uses_source_reference() {
    let (sources, id) = memory_source("first : Int -> Int\nfirst a = b\n");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownIdentifier, Span::new(id, 29..30))
        .message("b")
        .emit();

    let out = diagnostics.printer(&sources).snippets(false).render();
    insta::assert_snapshot!(out.trim_end(), @"memory://main.swamp:2:11: error: `b` is not defined");
}

#[test]
fn snippet_printer_shows_path_and_message() {
    let (sources, id) = memory_source("first a = b\n");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownIdentifier, Span::new(id, 10..11))
        .message("b")
        .related_to("parameter declared here", Span::new(id, 6..7))
        .hint("did you mean `a`?")
        .emit();

    let out = diagnostics.printer(&sources).render();
    assert!(out.contains("error"));
    assert!(out.contains("`b` is not defined"));
    assert!(out.contains("memory://main.swamp"));
    assert!(out.contains("parameter declared here"));
    assert!(out.ends_with("= hint: did you mean `a`?"));
}

#[test]
fn display_includes_related_and_hints() {
    let (_, id) = memory_source("abcdef");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateDefinition, Span::new(id, 0..3))
        .message("abc")
        .related_to("first defined here", Span::new(id, 3..6))
        .hint("rename one of them")
        .emit();

    let rendered = diagnostics.iter().next().unwrap().to_string();
    insta::assert_snapshot!(rendered, @"error at 0..3: `abc` is already defined (related: first defined here at 3..6) (hint: rename one of them)");
}

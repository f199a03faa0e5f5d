use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("lambda expressions are not allowed")
        .with_label(Span::new(0, 9), "here")
        .with_note("some context");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "lambda expressions are not allowed");
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(0, 9)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_primary_span_is_first_label() {
    let diag = Diagnostic::error(ErrorCode::E0001)
        .with_label(Span::new(10, 15), "unexpected")
        .with_label(Span::new(0, 1), "opened here");

    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
    assert!(diag.to_string().contains("--> 0..1: opened here"));
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E1001);
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("try something else");

    let output = diag.to_string();
    assert!(output.contains("error"));
    assert!(output.contains("E1001"));
    assert!(output.contains("test error"));
    assert!(output.contains("--> 0..5: here"));
    assert!(output.contains("= note: try something else"));
}

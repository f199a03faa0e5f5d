use super::*;

#[test]
fn test_first_line() {
    let source = "a - b\n";
    assert_eq!(offset_to_line_col(source, 0), (1, 1));
    assert_eq!(offset_to_line_col(source, 4), (1, 5));
}

#[test]
fn test_later_lines() {
    let source = "x = 1\n\ny = 2\n";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 4);
    assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
    assert_eq!(table.offset_to_line_col(source, 7), (3, 1));
    assert_eq!(table.offset_to_line_col(source, 11), (3, 5));
}

#[test]
fn test_column_counts_characters() {
    let source = "s = 'é' + x\n";
    // 'x' is at byte 11 but character 10
    assert_eq!(offset_to_line_col(source, 11), (1, 11));
}

#[test]
fn test_offset_past_end_clamps() {
    let source = "ab";
    assert_eq!(offset_to_line_col(source, 100), (1, 3));
}

#[test]
fn test_offset_inside_multibyte_char_does_not_panic() {
    let source = "é";
    let (line, _) = offset_to_line_col(source, 1);
    assert_eq!(line, 1);
}

#[test]
fn test_line_start_offset() {
    let table = LineOffsetTable::build("a\nbc\nd");
    assert_eq!(table.line_start_offset(0), None);
    assert_eq!(table.line_start_offset(1), Some(0));
    assert_eq!(table.line_start_offset(2), Some(2));
    assert_eq!(table.line_start_offset(3), Some(5));
    assert_eq!(table.line_start_offset(4), None);
}

#[test]
fn test_empty_source() {
    let table = LineOffsetTable::build("");
    assert_eq!(table.line_count(), 1);
    assert_eq!(table.offset_to_line_col("", 0), (1, 1));
}

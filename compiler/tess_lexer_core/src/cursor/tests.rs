use crate::decode_text;

// === Basic Navigation ===

#[test]
fn starts_at_first_content_cell() {
    let buf = decode_text("abc").unwrap();
    let cursor = buf.cursor();
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.current(), 'a');
}

#[test]
fn advance_moves_forward() {
    let buf = decode_text("abc").unwrap();
    let mut cursor = buf.cursor();
    cursor.advance();
    assert_eq!(cursor.current(), 'b');
    assert_eq!(cursor.pos(), 3);
    cursor.advance_n(2);
    assert!(cursor.is_eof());
}

#[test]
fn advance_stops_at_sentinel() {
    let buf = decode_text("x").unwrap();
    let mut cursor = buf.cursor();
    cursor.advance_n(10);
    assert_eq!(cursor.pos(), cursor.end());
    cursor.advance();
    assert_eq!(cursor.pos(), cursor.end());
    assert_eq!(cursor.current(), '\0');
}

// === Peek ===

#[test]
fn peek_past_end_is_nul() {
    let buf = decode_text("ab").unwrap();
    let mut cursor = buf.cursor();
    cursor.advance();
    assert_eq!(cursor.peek(), '\0');
    assert_eq!(cursor.peek_n(5), '\0');
}

#[test]
fn prev_reads_leading_sentinel() {
    let buf = decode_text("a").unwrap();
    let cursor = buf.cursor();
    assert_eq!(cursor.prev(), '\0');
}

// === EOF Detection ===

#[test]
fn interior_nul_is_not_eof() {
    let buf = decode_text("a\0b").unwrap();
    let mut cursor = buf.cursor();
    cursor.advance();
    assert_eq!(cursor.current(), '\0');
    assert!(!cursor.is_eof());
}

#[test]
fn empty_buffer_is_eof() {
    let buf = decode_text("").unwrap();
    assert!(buf.cursor().is_eof());
}

// === Scanning Helpers ===

#[test]
fn eat_while_and_slice() {
    let buf = decode_text("abc123").unwrap();
    let mut cursor = buf.cursor();
    let start = cursor.pos();
    cursor.eat_while(char::is_alphabetic);
    assert_eq!(cursor.slice_from(start), &['a', 'b', 'c']);
    assert_eq!(cursor.current(), '1');
}

#[test]
fn eat_while_stops_at_eof_for_nul_predicate() {
    let buf = decode_text("\0\0").unwrap();
    let mut cursor = buf.cursor();
    cursor.eat_while(|c| c == '\0');
    assert!(cursor.is_eof());
}

#[test]
fn eat_until_newline() {
    let buf = decode_text("# note\nx").unwrap();
    let mut cursor = buf.cursor();
    cursor.eat_until_newline_or_eof();
    assert_eq!(cursor.current(), '\n');

    let buf = decode_text("# note").unwrap();
    let mut cursor = buf.cursor();
    cursor.eat_until_newline_or_eof();
    assert!(cursor.is_eof());
}

#[test]
fn starts_with_respects_end() {
    let buf = decode_text("<=").unwrap();
    let cursor = buf.cursor();
    assert!(cursor.starts_with("<"));
    assert!(cursor.starts_with("<="));
    assert!(!cursor.starts_with("<=>"));
    assert!(!cursor.starts_with("<\0"));
}

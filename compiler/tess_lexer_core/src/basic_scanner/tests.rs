use pretty_assertions::assert_eq;
use tess_ir::{SourceLocation, TokenGrammar, TokenKind};

use super::*;
use crate::decode_text;

struct Kinds {
    ident: TokenKind,
    number: TokenKind,
    string: TokenKind,
    ws: TokenKind,
    comment: TokenKind,
    lt: TokenKind,
    le: TokenKind,
    shl: TokenKind,
    def: TokenKind,
}

fn grammar(track_indent: bool) -> (TokenGrammar, Kinds) {
    let mut b = TokenGrammar::builder("Test");
    let ident = b.symbol("Identifier");
    let number = b.plain("Number");
    let string = b.plain("String");
    let ws = b.trivia("Whitespace");
    let comment = b.trivia("Comment");
    let lt = b.literal("Lt", "<");
    let le = b.literal("Le", "<=");
    let shl = b.literal("Shl", "<<");
    let def = b.literal("Def", "def");
    b.identifiers(ident)
        .numbers(number)
        .strings(string)
        .whitespace(ws)
        .line_comments("#", comment)
        .track_indent(track_indent);
    let kinds = Kinds {
        ident,
        number,
        string,
        ws,
        comment,
        lt,
        le,
        shl,
        def,
    };
    (b.build().unwrap(), kinds)
}

fn scan(grammar: &TokenGrammar, text: &str, tab_stop: u8) -> Vec<RawToken> {
    let factory = BasicScannerFactory::new(grammar);
    let buffer = decode_text(text).unwrap();
    let mut scanner = factory.open(&buffer, ScanSettings { tab_stop });
    std::iter::from_fn(|| scanner.next_raw()).collect()
}

fn kinds_of(tokens: &[RawToken]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

// === Dispatch ===

#[test]
fn classifies_token_classes() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "def x1 42 \"s\" # c", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![
            k.def,
            k.ws,
            k.ident,
            k.ws,
            k.number,
            k.ws,
            k.string,
            k.ws,
            k.comment,
            TokenKind::TERMINATION,
        ]
    );
}

#[test]
fn punctuation_is_longest_match() {
    let (g, k) = grammar(false);
    // "<<", then "=" matches nothing, then "<"
    let tokens = scan(&g, "<<=<", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![k.shl, TokenKind::LEXING_FAILURE, k.lt, TokenKind::TERMINATION]
    );
}

#[test]
fn two_char_literal_beats_prefix() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "<=", 8);
    assert_eq!(kinds_of(&tokens), vec![k.le, TokenKind::TERMINATION]);
}

#[test]
fn unknown_code_point_is_lexing_failure() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "a$b", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![k.ident, TokenKind::LEXING_FAILURE, k.ident, TokenKind::TERMINATION]
    );
    assert_eq!(tokens[1].offset, 3);
    assert_eq!(tokens[1].length, 1);
}

#[test]
fn unterminated_string_fails() {
    let (g, _) = grammar(false);
    let tokens = scan(&g, "\"abc", 8);
    assert_eq!(tokens[0].kind, TokenKind::LEXING_FAILURE);
    assert_eq!(tokens[0].length, 4);
}

#[test]
fn string_escapes_quote() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, r#""a\"b""#, 8);
    assert_eq!(kinds_of(&tokens), vec![k.string, TokenKind::TERMINATION]);
    assert_eq!(tokens[0].length, 6);
}

#[test]
fn decimal_numbers() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "3.14 1.x", 8);
    assert_eq!(tokens[0].kind, k.number);
    assert_eq!(tokens[0].length, 4);
    // "1" then "." is not followed by a digit
    assert_eq!(tokens[2].kind, k.number);
    assert_eq!(tokens[2].length, 1);
}

// === Newlines ===

#[test]
fn newline_run_is_whitespace_without_indentation() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "a\n\n  b", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![k.ident, k.ws, k.ident, TokenKind::TERMINATION]
    );
    assert_eq!(tokens[1].length, 4);
}

#[test]
fn newline_run_is_newline_with_indentation() {
    let (g, k) = grammar(true);
    let tokens = scan(&g, "a\n\n  b", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![k.ident, TokenKind::NEWLINE, k.ident, TokenKind::TERMINATION]
    );
    assert_eq!(tokens[2].start, SourceLocation::new(3, 3));
}

#[test]
fn comment_stops_before_newline() {
    let (g, k) = grammar(true);
    let tokens = scan(&g, "# c\nx", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![k.comment, TokenKind::NEWLINE, k.ident, TokenKind::TERMINATION]
    );
}

// === Locations ===

#[test]
fn offsets_are_physical() {
    let (g, _) = grammar(false);
    let tokens = scan(&g, "ab cd", 8);
    assert_eq!(tokens[0].offset, 2);
    assert_eq!(tokens[0].length, 2);
    assert_eq!(tokens[2].offset, 5);
    let term = tokens.last().unwrap();
    assert_eq!(term.offset, 7);
    assert_eq!(term.length, 0);
}

#[test]
fn start_and_end_locations() {
    let (g, _) = grammar(false);
    let tokens = scan(&g, "ab\ncd", 8);
    assert_eq!(tokens[0].start, SourceLocation::new(1, 1));
    assert_eq!(tokens[0].end, SourceLocation::new(1, 3));
    assert_eq!(tokens[2].start, SourceLocation::new(2, 1));
    assert_eq!(tokens[3].start, SourceLocation::new(2, 3));
}

#[test]
fn tabs_advance_to_next_stop() {
    let (g, _) = grammar(true);
    let tokens = scan(&g, "\tx", 8);
    assert_eq!(tokens[1].start, SourceLocation::new(1, 9));

    let tokens = scan(&g, "ab\tx", 4);
    assert_eq!(tokens[2].start, SourceLocation::new(1, 5));
}

#[test]
fn columns_count_code_points() {
    let (g, k) = grammar(false);
    let tokens = scan(&g, "\u{3bb}\u{3bc} x", 8);
    assert_eq!(tokens[0].kind, k.ident);
    assert_eq!(tokens[0].length, 2);
    assert_eq!(tokens[2].start, SourceLocation::new(1, 4));
}

// === Termination ===

#[test]
fn empty_input_yields_only_termination() {
    let (g, _) = grammar(false);
    let tokens = scan(&g, "", 8);
    assert_eq!(kinds_of(&tokens), vec![TokenKind::TERMINATION]);
    assert_eq!(tokens[0].offset, 2);
}

#[test]
fn none_after_termination() {
    let (g, _) = grammar(false);
    let factory = BasicScannerFactory::new(&g);
    let buffer = decode_text("x").unwrap();
    let mut scanner = factory.open(&buffer, ScanSettings::default());
    assert!(scanner.next_raw().is_some());
    assert_eq!(scanner.next_raw().map(|t| t.kind), Some(TokenKind::TERMINATION));
    assert_eq!(scanner.next_raw(), None);
    assert_eq!(scanner.next_raw(), None);
}

#[test]
fn close_ends_stream() {
    let (g, _) = grammar(false);
    let factory = BasicScannerFactory::new(&g);
    let buffer = decode_text("x y").unwrap();
    let mut scanner = factory.open(&buffer, ScanSettings::default());
    scanner.close();
    assert_eq!(scanner.next_raw(), None);
}

// === Missing roles ===

#[test]
fn unset_roles_fall_through_to_failure() {
    let mut b = TokenGrammar::builder("Bare");
    let plus = b.literal("Plus", "+");
    let g = b.build().unwrap();
    let tokens = scan(&g, "+ 1", 8);
    assert_eq!(
        kinds_of(&tokens),
        vec![
            plus,
            TokenKind::LEXING_FAILURE,
            TokenKind::LEXING_FAILURE,
            TokenKind::TERMINATION
        ]
    );
}

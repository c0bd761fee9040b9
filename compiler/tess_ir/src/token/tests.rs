use super::*;
use crate::SourceLocation;

#[test]
fn index_sentinels() {
    assert!(!TokenIndex::NONE.is_valid());
    assert!(!TriviaIndex::NONE.is_valid());
    assert!(TokenIndex::from_raw(0).is_valid());
    assert_eq!(TriviaIndex::from_raw(7).index(), 7);
}

#[test]
fn empty_token_span() {
    let sloc = SlocRange::point(SourceLocation::new(1, 1));
    let tok = Token::empty_at(TokenKind::TERMINATION, 2, sloc);
    assert_eq!(tok.source_first, 2);
    assert_eq!(tok.source_last, 1);
    assert_eq!(tok.len(), 0);
    assert!(tok.is_empty());
}

#[test]
fn non_empty_lengths() {
    let sloc = SlocRange::NONE;
    let tok = Token {
        kind: TokenKind::from_raw(9),
        source_first: 2,
        source_last: 4,
        sloc_range: sloc,
        symbol: None,
    };
    assert_eq!(tok.len(), 3);

    let trivia = Trivia {
        kind: TokenKind::LEXING_FAILURE,
        source_first: 5,
        source_last: 5,
        sloc_range: sloc,
        has_next: false,
    };
    assert_eq!(trivia.len(), 1);
    assert!(!trivia.is_empty());
}

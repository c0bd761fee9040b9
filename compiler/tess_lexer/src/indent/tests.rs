use pretty_assertions::assert_eq;
use tess_ir::{SlocRange, SourceLocation, Token, TokenGrammar, TokenKind};

use super::IndentTracker;
use crate::LexError;

fn grammar() -> (TokenGrammar, TokenKind, TokenKind, TokenKind) {
    let mut b = TokenGrammar::builder("Layout");
    let word = b.plain("Word");
    let lpar = b.literal("L_Par", "(");
    let rpar = b.literal("R_Par", ")");
    b.ignore_layout(lpar, rpar).track_indent(true);
    (b.build().unwrap(), word, lpar, rpar)
}

fn tok(kind: TokenKind, line: u32, column: u16) -> Token {
    Token {
        kind,
        source_first: 2,
        source_last: 2,
        sloc_range: SlocRange::new(
            SourceLocation::new(line, column),
            SourceLocation::new(line, column + 1),
        ),
        symbol: None,
    }
}

fn term(line: u32) -> Token {
    Token::empty_at(
        TokenKind::TERMINATION,
        2,
        SlocRange::point(SourceLocation::new(line, 1)),
    )
}

fn run(tracker: &mut IndentTracker, grammar: &TokenGrammar, input: Vec<Token>) -> Vec<TokenKind> {
    let mut out = Vec::new();
    for token in input {
        tracker
            .feed(token, grammar, |t| out.push(t.kind))
            .unwrap();
    }
    out
}

const NL: TokenKind = TokenKind::NEWLINE;
const IN: TokenKind = TokenKind::INDENT;
const DE: TokenKind = TokenKind::DEDENT;
const END: TokenKind = TokenKind::TERMINATION;

// === Indent / Dedent ===

#[test]
fn indent_then_dedent() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(NL, 1, 2),
            tok(w, 2, 5),
            tok(NL, 2, 6),
            tok(w, 3, 1),
            term(3),
        ],
    );
    assert_eq!(out, vec![w, NL, IN, w, NL, DE, w, END]);
}

#[test]
fn same_column_emits_nothing() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![tok(w, 1, 3), tok(NL, 1, 4), tok(w, 2, 1), term(2)],
    );
    assert_eq!(out, vec![w, NL, w, END]);
}

#[test]
fn multiple_dedents_at_once() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(NL, 1, 2),
            tok(w, 2, 3),
            tok(NL, 2, 4),
            tok(w, 3, 5),
            tok(NL, 3, 6),
            tok(w, 4, 1),
            term(4),
        ],
    );
    assert_eq!(out, vec![w, NL, IN, w, NL, IN, w, NL, DE, DE, w, END]);
}

#[test]
fn dedent_to_unknown_column_opens_no_block() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(NL, 1, 2),
            tok(w, 2, 5),
            tok(NL, 2, 6),
            tok(w, 3, 3),
            term(3),
        ],
    );
    assert_eq!(out, vec![w, NL, IN, w, NL, DE, w, END]);
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn line_after_unknown_dedent_indents() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(NL, 1, 2),
            tok(w, 2, 5),
            tok(NL, 2, 6),
            tok(w, 3, 3),
            tok(NL, 3, 4),
            tok(w, 4, 3),
            term(4),
        ],
    );
    assert_eq!(out, vec![w, NL, IN, w, NL, DE, w, NL, IN, w, DE, END]);
}

#[test]
fn termination_drains_stack() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(NL, 1, 2),
            tok(w, 2, 3),
            tok(NL, 2, 4),
            tok(w, 3, 5),
            term(3),
        ],
    );
    assert_eq!(out, vec![w, NL, IN, w, NL, IN, w, DE, DE, END]);
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn first_line_indentation_is_ignored() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(&mut tracker, &g, vec![tok(w, 1, 5), term(1)]);
    assert_eq!(out, vec![w, END]);
}

// === Ignore-layout regions ===

#[test]
fn newline_suppressed_inside_parens() {
    let (g, w, lpar, rpar) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![
            tok(w, 1, 1),
            tok(lpar, 1, 2),
            tok(NL, 1, 3),
            tok(w, 2, 9),
            tok(NL, 2, 10),
            tok(rpar, 3, 1),
            tok(NL, 3, 2),
            tok(w, 4, 1),
            term(4),
        ],
    );
    assert_eq!(out, vec![w, lpar, w, rpar, NL, w, END]);
}

#[test]
fn unbalanced_closer_keeps_layout_active() {
    let (g, w, _, rpar) = grammar();
    let mut tracker = IndentTracker::new(8);
    let out = run(
        &mut tracker,
        &g,
        vec![tok(rpar, 1, 1), tok(NL, 1, 2), tok(w, 2, 3), term(2)],
    );
    assert_eq!(out, vec![rpar, NL, IN, w, DE, END]);
}

// === Depth limit ===

#[test]
fn exceeding_max_depth_is_fatal() {
    let (g, w, _, _) = grammar();
    let mut tracker = IndentTracker::new(1);
    let mut sink = |_: Token| {};
    tracker.feed(tok(w, 1, 1), &g, &mut sink).unwrap();
    tracker.feed(tok(NL, 1, 2), &g, &mut sink).unwrap();
    tracker.feed(tok(w, 2, 3), &g, &mut sink).unwrap();
    tracker.feed(tok(NL, 2, 4), &g, &mut sink).unwrap();
    let err = tracker.feed(tok(w, 3, 5), &g, &mut sink).unwrap_err();
    assert!(matches!(
        err,
        LexError::IndentDepthExceeded { depth: 1, line: 3 }
    ));
}

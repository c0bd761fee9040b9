//! Property-based tests for token stream construction.
//!
//! Random inputs over a small alphabet are lexed with the basic scanner and
//! checked for structural invariants:
//! 1. Exactly one termination token, last, at the end offset
//! 2. One trivia-map slot per token
//! 3. Tokens never overlap, and with trivia they tile the buffer
//! 4. Indentation tokens balance
//! 5. Lexing is deterministic, diagnostics included

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use tess_ir::{Diagnostic, TokenGrammar, TokenIndex, TokenKind};
use tess_lexer::{lex, BasicScannerFactory, Interning, LexInput, LexOptions, TokenDataHandler};

fn grammar(track_indent: bool) -> TokenGrammar {
    let mut b = TokenGrammar::builder("Prop");
    let ident = b.symbol("Identifier");
    let number = b.plain("Number");
    let ws = b.trivia("Whitespace");
    let comment = b.trivia("Comment");
    b.literal("Plus", "+");
    b.literal("Assign", "=");
    b.literal("Equal", "==");
    let lpar = b.literal("L_Par", "(");
    let rpar = b.literal("R_Par", ")");
    b.identifiers(ident)
        .numbers(number)
        .whitespace(ws)
        .line_comments("#", comment)
        .ignore_layout(lpar, rpar)
        .track_indent(track_indent);
    b.build().unwrap()
}

fn lex_text(text: &str, track_indent: bool) -> (TokenDataHandler, Vec<Diagnostic>) {
    let g = grammar(track_indent);
    let factory = BasicScannerFactory::new(&g);
    lex(
        LexInput::Text(text),
        &g,
        &factory,
        Interning::default(),
        &LexOptions::default(),
    )
    .unwrap()
}

fn run(text: &str, track_indent: bool) -> TokenDataHandler {
    lex_text(text, track_indent).0
}

// -- Strategies --

fn source_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c0-9 +=()#$\n\t]{0,80}").expect("valid regex")
}

/// Indented lines, which exercise the indentation stack.
fn layout_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((0usize..6, "[a-c]{1,3}"), 0..12).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, word)| format!("{}{word}", " ".repeat(indent)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

// -- Checks --

fn check_termination(h: &TokenDataHandler) {
    let tokens = h.tokens();
    let terminations = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::TERMINATION)
        .count();
    assert_eq!(terminations, 1);
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::TERMINATION);
    assert_eq!(last.source_first, h.buffer().end_offset());
    assert!(last.is_empty());
}

fn check_order(h: &TokenDataHandler) {
    let tokens = h.tokens();
    for pair in tokens.windows(2) {
        // Zero-length tokens end one before they start, so this also holds
        // for INDENT / DEDENT next to a real token.
        assert!(pair[0].source_last < pair[1].source_first);
        assert!(pair[0].sloc_range.start() <= pair[1].sloc_range.start());
    }
    for (i, token) in tokens.iter().enumerate() {
        assert!(token.sloc_range.start() <= token.sloc_range.end());
        let index = TokenIndex::from_raw(u32::try_from(i).unwrap());
        for (_, trivia) in h.leading_trivia(index) {
            assert!(trivia.source_last < token.source_first);
        }
    }
}

/// Non-empty tokens and trivia never overlap. With `gapless`, they also
/// cover every code point; suppressed newlines leave gaps otherwise.
fn check_tiling(h: &TokenDataHandler, gapless: bool) {
    let mut spans: Vec<(u32, u32)> = h
        .tokens()
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| (t.source_first, t.len()))
        .chain(h.trivia().iter().map(|t| (t.source_first, t.len())))
        .collect();
    spans.sort_unstable();

    let mut at = h.buffer().first();
    for (first, len) in spans {
        if gapless {
            assert_eq!(first, at);
        } else {
            assert!(first >= at);
        }
        assert!(len > 0);
        at = first + len;
    }
    if gapless {
        assert_eq!(at, h.buffer().end_offset());
    } else {
        assert!(at <= h.buffer().end_offset());
    }
}

fn count(h: &TokenDataHandler, kind: TokenKind) -> usize {
    h.tokens().iter().filter(|t| t.kind == kind).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn stream_shape(src in source_strategy()) {
        for track_indent in [false, true] {
            let h = run(&src, track_indent);
            check_termination(&h);
            check_order(&h);
        }
    }

    #[test]
    fn tokens_and_trivia_tile_the_buffer(src in source_strategy()) {
        check_tiling(&run(&src, false), true);
        check_tiling(&run(&src, true), false);
    }

    #[test]
    fn navigation_visits_everything(src in source_strategy()) {
        let h = run(&src, false);
        let mut visited = 0;
        let mut at = h.first_token();
        while let Some(r) = at {
            visited += 1;
            at = h.next(r, false);
        }
        prop_assert_eq!(visited, h.len() + h.trivia_count());
    }

    #[test]
    fn indentation_balances(src in layout_strategy()) {
        let h = run(&src, true);
        prop_assert_eq!(count(&h, TokenKind::INDENT), count(&h, TokenKind::DEDENT));
        check_termination(&h);
    }

    #[test]
    fn indentation_balances_on_noise(src in source_strategy()) {
        let h = run(&src, true);
        prop_assert_eq!(count(&h, TokenKind::INDENT), count(&h, TokenKind::DEDENT));
    }

    #[test]
    fn lexing_is_deterministic(src in source_strategy()) {
        let (a, a_diags) = lex_text(&src, true);
        let (b, b_diags) = lex_text(&src, true);
        // Fresh tables see the same insertion order, so symbols match too.
        prop_assert_eq!(a.tokens(), b.tokens());
        prop_assert_eq!(a.trivia(), b.trivia());
        prop_assert_eq!(a_diags, b_diags);
    }
}

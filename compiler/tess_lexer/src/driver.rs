//! Token classifier and stream builder.
//!
//! Drains a scanner and sorts its raw tokens into the final model:
//!
//! ```text
//! RawToken ─┬─ Trivia kind ──▶ trivia vector (linked runs) + token→trivia map
//!           └─ otherwise ───▶ [IndentTracker] ──▶ token vector
//! ```
//!
//! The token→trivia map always has one slot per token: a slot is opened
//! before the loop and after every appended token except termination, and
//! trivia seen while a slot is open become that slot's run.

use tess_ir::{
    Diagnostic, KindClass, SlocRange, SourceLocation, Token, TokenGrammar, TokenIndex, TokenKind,
    Trivia, TriviaIndex,
};
use tess_lexer_core::{DecodedBuffer, RawToken, Scanner, ScannerHandle};

use crate::indent::IndentTracker;
use crate::{Interning, LexError, LexOptions};

/// Everything a lex pass produces besides the buffer.
#[derive(Debug, Default)]
pub(crate) struct TokenStream {
    pub tokens: Vec<Token>,
    pub trivia: Vec<Trivia>,
    pub token_trivia: Vec<TriviaIndex>,
    /// Index of the token each trivia entry precedes.
    pub trivia_owner: Vec<TokenIndex>,
    pub diagnostics: Vec<Diagnostic>,
}

struct StreamBuilder<'a> {
    grammar: &'a TokenGrammar,
    buffer: &'a DecodedBuffer,
    interning: &'a Interning,
    with_trivia: bool,
    out: TokenStream,
    last_was_trivia: bool,
    /// End location of the last raw token seen.
    last_end: SourceLocation,
}

impl<'a> StreamBuilder<'a> {
    fn new(
        grammar: &'a TokenGrammar,
        buffer: &'a DecodedBuffer,
        interning: &'a Interning,
        with_trivia: bool,
    ) -> Self {
        let mut out = TokenStream::default();
        // Leading trivia of the first token.
        out.token_trivia.push(TriviaIndex::NONE);
        Self {
            grammar,
            buffer,
            interning,
            with_trivia,
            out,
            last_was_trivia: false,
            last_end: SourceLocation::new(1, 1),
        }
    }

    /// Turn a raw token into a [`Token`], or record it as trivia and return `None`.
    fn classify(&mut self, raw: RawToken) -> Option<Token> {
        self.last_end = raw.end;
        if raw.kind == TokenKind::TERMINATION {
            let end = self.buffer.end_offset();
            return Some(Token::empty_at(
                TokenKind::TERMINATION,
                end,
                SlocRange::point(raw.end),
            ));
        }

        let source_first = raw.offset;
        let source_last = (raw.offset + raw.length).wrapping_sub(1);
        let sloc_range = SlocRange::new(raw.start, raw.end);

        match self.grammar.class(raw.kind) {
            KindClass::Trivia => {
                if raw.kind == TokenKind::LEXING_FAILURE {
                    self.out.diagnostics.push(Diagnostic::invalid_token(sloc_range));
                }
                if self.with_trivia {
                    self.push_trivia(Trivia {
                        kind: raw.kind,
                        source_first,
                        source_last,
                        sloc_range,
                        has_next: false,
                    });
                }
                None
            }
            KindClass::Symbol => {
                let text: String = self.buffer.slice(source_first, source_last).iter().collect();
                let symbol = match self.interning.symbolize(&text) {
                    Ok(symbol) => Some(symbol),
                    Err(err) => {
                        self.out.diagnostics.push(Diagnostic::new(sloc_range, err.to_string()));
                        None
                    }
                };
                Some(Token {
                    kind: raw.kind,
                    source_first,
                    source_last,
                    sloc_range,
                    symbol,
                })
            }
            KindClass::Plain => Some(Token {
                kind: raw.kind,
                source_first,
                source_last,
                sloc_range,
                symbol: None,
            }),
        }
    }

    fn push_trivia(&mut self, trivia: Trivia) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "trivia count is bounded by the u32-indexed buffer length"
        )]
        let index = TriviaIndex::from_raw(self.out.trivia.len() as u32);
        if self.last_was_trivia {
            if let Some(prev) = self.out.trivia.last_mut() {
                prev.has_next = true;
            }
        } else if let Some(slot) = self.out.token_trivia.last_mut() {
            *slot = index;
        }
        self.out.trivia.push(trivia);
        self.out.trivia_owner.push(self.next_token_index());
        self.last_was_trivia = true;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "token count is bounded by the u32-indexed buffer length"
    )]
    fn next_token_index(&self) -> TokenIndex {
        TokenIndex::from_raw(self.out.tokens.len() as u32)
    }

    fn append(&mut self, token: Token) {
        let is_termination = token.kind == TokenKind::TERMINATION;
        self.out.tokens.push(token);
        self.last_was_trivia = false;
        if !is_termination {
            self.out.token_trivia.push(TriviaIndex::NONE);
        }
    }
}

/// Drain `scanner` into a token stream.
///
/// The scanner is closed by its handle, whether this returns normally,
/// with an error, or by unwinding.
pub(crate) fn build_stream<S: Scanner>(
    mut scanner: ScannerHandle<S>,
    buffer: &DecodedBuffer,
    grammar: &TokenGrammar,
    interning: &Interning,
    options: &LexOptions,
) -> Result<TokenStream, LexError> {
    let mut builder = StreamBuilder::new(grammar, buffer, interning, options.with_trivia);
    let mut indent = grammar
        .track_indent()
        .then(|| IndentTracker::new(options.max_indent_depth));

    let mut terminated = false;
    while let Some(raw) = scanner.next_raw() {
        terminated = raw.kind == TokenKind::TERMINATION;
        process(&mut builder, indent.as_mut(), raw)?;
        if terminated {
            break;
        }
    }
    if !terminated {
        tracing::debug!("scanner stopped without a termination token");
        let raw = RawToken {
            kind: TokenKind::TERMINATION,
            offset: buffer.end_offset(),
            length: 0,
            start: builder.last_end,
            end: builder.last_end,
        };
        process(&mut builder, indent.as_mut(), raw)?;
    }

    let out = builder.out;
    debug_assert_eq!(out.tokens.len(), out.token_trivia.len());
    tracing::debug!(
        tokens = out.tokens.len(),
        trivia = out.trivia.len(),
        diagnostics = out.diagnostics.len(),
        "built token stream"
    );
    Ok(out)
}

fn process(
    builder: &mut StreamBuilder<'_>,
    indent: Option<&mut IndentTracker>,
    raw: RawToken,
) -> Result<(), LexError> {
    let Some(token) = builder.classify(raw) else {
        return Ok(());
    };
    match indent {
        Some(tracker) => tracker.feed(token, builder.grammar, |t| builder.append(t)),
        None => {
            builder.append(token);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

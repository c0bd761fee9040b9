//! Indentation tracking for layout-sensitive grammars.
//!
//! Sits between the classifier and the token vector. Every non-trivia token
//! goes through [`IndentTracker::feed`], which may emit synthesized
//! `INDENT` / `DEDENT` tokens before it, or swallow it (a `NEWLINE` inside
//! an ignore-layout region such as a parenthesized expression).

use smallvec::SmallVec;
use tess_ir::{SlocRange, Token, TokenGrammar, TokenKind};

use crate::LexError;

/// Stack of open indentation columns, innermost last.
///
/// Column 1 is implicit: an empty stack means "at the left margin".
type IndentStack = SmallVec<[u16; 16]>;

pub(crate) struct IndentTracker {
    stack: IndentStack,
    /// Open ignore-layout regions. Can go negative on unbalanced closers.
    ignore_depth: i32,
    /// The last emitted token was a `NEWLINE`.
    after_newline: bool,
    max_depth: usize,
}

impl IndentTracker {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: IndentStack::new(),
            ignore_depth: 0,
            after_newline: false,
            max_depth,
        }
    }

    /// Column of the innermost open block.
    #[inline]
    fn current_column(&self) -> u16 {
        self.stack.last().copied().unwrap_or(1)
    }

    /// Route one non-trivia token, emitting it and any synthesized tokens.
    pub(crate) fn feed(
        &mut self,
        token: Token,
        grammar: &TokenGrammar,
        mut emit: impl FnMut(Token),
    ) -> Result<(), LexError> {
        let kind = token.kind;

        if kind == TokenKind::TERMINATION {
            let at = token.sloc_range;
            for _ in self.stack.drain(..) {
                tracing::trace!("dedent at end of input");
                emit(Token::empty_at(TokenKind::DEDENT, token.source_first, at));
            }
            emit(token);
            return Ok(());
        }

        if grammar.ends_layout_ignore(kind) {
            self.ignore_depth -= 1;
        }

        let is_newline = kind == TokenKind::NEWLINE;
        if self.ignore_depth <= 0 && self.after_newline && !is_newline {
            let column = token.sloc_range.start_column;
            let at = SlocRange::point(token.sloc_range.start());
            let current = self.current_column();
            if column < current {
                // Stop at the first enclosing column not past the token, even
                // if it is left of it: that line opens no block.
                while column < self.current_column() {
                    self.stack.pop();
                    tracing::trace!(line = at.start_line, column, "dedent");
                    emit(Token::empty_at(TokenKind::DEDENT, token.source_first, at));
                }
            } else if column > current {
                if self.stack.len() >= self.max_depth {
                    return Err(LexError::IndentDepthExceeded {
                        depth: self.max_depth,
                        line: at.start_line,
                    });
                }
                self.stack.push(column);
                tracing::trace!(line = at.start_line, column, "indent");
                emit(Token::empty_at(TokenKind::INDENT, token.source_first, at));
            }
        }

        if grammar.starts_layout_ignore(kind) {
            self.ignore_depth += 1;
        }

        if is_newline && self.ignore_depth > 0 {
            return Ok(());
        }

        self.after_newline = is_newline;
        emit(token);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;

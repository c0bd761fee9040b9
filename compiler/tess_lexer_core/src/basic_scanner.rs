//! Grammar-driven reference scanner.
//!
//! Dispatches on the current code point and produces the token classes a
//! [`TokenGrammar`] describes through its [`LexicalRoles`] and literal table:
//!
//! | Input                               | Kind                               |
//! |-------------------------------------|------------------------------------|
//! | `\n` followed by `[\r\n\t ]*`       | `NEWLINE` when tracking indentation, else whitespace |
//! | other whitespace runs               | whitespace role                    |
//! | line comment prefix up to `\n`      | line comment role                  |
//! | `[\p{Alphabetic}_][\p{Alphanumeric}_]*` | keyword literal, else identifier role |
//! | `[0-9][0-9_]*(\.[0-9][0-9_]*)?`      | number role                        |
//! | `"..."` with `\` escapes             | string role                        |
//! | longest punctuation literal         | that literal's kind                |
//! | anything else                       | `LEXING_FAILURE`, one code point   |
//!
//! A class whose role the grammar leaves unset falls through to
//! `LEXING_FAILURE`.
//!
//! [`LexicalRoles`]: tess_ir::LexicalRoles

use tess_ir::{SourceLocation, TokenGrammar, TokenKind};

use crate::{Cursor, DecodedBuffer, RawToken, Scanner, ScannerFactory, ScanSettings};

/// Builds [`BasicScanner`]s for one grammar.
///
/// Construction precomputes the punctuation table, so create the factory
/// once per grammar and reuse it across lex passes.
#[derive(Clone, Debug)]
pub struct BasicScannerFactory<'g> {
    grammar: &'g TokenGrammar,
    /// Non-word literals, longest first.
    punctuation: Vec<(Box<[char]>, TokenKind)>,
}

impl<'g> BasicScannerFactory<'g> {
    pub fn new(grammar: &'g TokenGrammar) -> Self {
        let mut punctuation: Vec<(Box<[char]>, TokenKind)> = grammar
            .literals()
            .filter(|(lit, _)| lit.chars().next().is_some_and(|c| !is_ident_start(c)))
            .map(|(lit, kind)| (lit.chars().collect(), kind))
            .collect();
        // Stable order among equal lengths keeps scanning deterministic.
        punctuation.sort_by(|(a, ka), (b, kb)| b.len().cmp(&a.len()).then(ka.cmp(kb)));
        Self {
            grammar,
            punctuation,
        }
    }

    pub fn grammar(&self) -> &'g TokenGrammar {
        self.grammar
    }
}

impl ScannerFactory for BasicScannerFactory<'_> {
    type Scanner<'buf>
        = BasicScanner<'buf>
    where
        Self: 'buf;

    fn open<'buf>(
        &'buf self,
        buffer: &'buf DecodedBuffer,
        settings: ScanSettings,
    ) -> BasicScanner<'buf> {
        BasicScanner {
            grammar: self.grammar,
            punctuation: &self.punctuation,
            cursor: buffer.cursor(),
            loc: SourceLocation::new(1, 1),
            tab_stop: u16::from(settings.tab_stop.max(1)),
            finished: false,
        }
    }
}

/// Scanner state over one decoded buffer.
pub struct BasicScanner<'buf> {
    grammar: &'buf TokenGrammar,
    punctuation: &'buf [(Box<[char]>, TokenKind)],
    cursor: Cursor<'buf>,
    /// Location of the cursor.
    loc: SourceLocation,
    tab_stop: u16,
    finished: bool,
}

impl BasicScanner<'_> {
    /// Advance one code point, keeping `loc` in sync.
    fn bump(&mut self) {
        let c = self.cursor.current();
        self.cursor.advance();
        match c {
            '\n' => {
                self.loc.line += 1;
                self.loc.column = 1;
            }
            '\t' => {
                let col = self.loc.column.saturating_sub(1);
                self.loc.column = (col / self.tab_stop + 1)
                    .saturating_mul(self.tab_stop)
                    .saturating_add(1);
            }
            _ => self.loc.column = self.loc.column.saturating_add(1),
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while !self.cursor.is_eof() && pred(self.cursor.current()) {
            self.bump();
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn scan_newline(&mut self) -> TokenKind {
        self.bump();
        self.bump_while(|c| matches!(c, '\r' | '\n' | '\t' | ' '));
        match self.grammar.roles().whitespace {
            Some(ws) if !self.grammar.track_indent() => ws,
            _ => TokenKind::NEWLINE,
        }
    }

    fn scan_word(&mut self, start: u32) -> TokenKind {
        self.bump_while(is_ident_continue);
        let text: String = self.cursor.slice_from(start).iter().collect();
        self.grammar
            .lookup_literal(&text)
            .or(self.grammar.roles().identifier)
            .unwrap_or(TokenKind::LEXING_FAILURE)
    }

    fn scan_number(&mut self, kind: TokenKind) -> TokenKind {
        let digits = |c: char| c.is_ascii_digit() || c == '_';
        self.bump_while(digits);
        if self.cursor.current() == '.' && self.cursor.peek().is_ascii_digit() {
            self.bump();
            self.bump_while(digits);
        }
        kind
    }

    fn scan_string(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        loop {
            if self.cursor.is_eof() {
                return TokenKind::LEXING_FAILURE;
            }
            match self.cursor.current() {
                '"' => {
                    self.bump();
                    return kind;
                }
                '\n' => return TokenKind::LEXING_FAILURE,
                '\\' => {
                    self.bump();
                    if !self.cursor.is_eof() && self.cursor.current() != '\n' {
                        self.bump();
                    }
                }
                _ => self.bump(),
            }
        }
    }

    fn scan_punctuation(&mut self) -> Option<TokenKind> {
        let cursor = self.cursor;
        let punctuation = self.punctuation;
        let (lit, kind) = punctuation.iter().find(|(lit, _)| {
            lit.iter()
                .enumerate()
                .all(|(i, &c)| !is_past_end(&cursor, i) && cursor.peek_n(offset(i)) == c)
        })?;
        self.bump_n(lit.len());
        Some(*kind)
    }
}

impl Scanner for BasicScanner<'_> {
    fn next_raw(&mut self) -> Option<RawToken> {
        if self.finished {
            return None;
        }

        let offset = self.cursor.pos();
        let start = self.loc;

        if self.cursor.is_eof() {
            self.finished = true;
            return Some(RawToken {
                kind: TokenKind::TERMINATION,
                offset,
                length: 0,
                start,
                end: start,
            });
        }

        let grammar = self.grammar;
        let roles = grammar.roles();
        let c = self.cursor.current();
        let kind = if c == '\n' {
            self.scan_newline()
        } else if let (true, Some(ws)) = (c.is_whitespace(), roles.whitespace) {
            self.bump_while(|c| c.is_whitespace() && c != '\n');
            ws
        } else if let Some((_, comment)) = roles
            .line_comment
            .as_ref()
            .filter(|(prefix, _)| self.cursor.starts_with(prefix))
        {
            self.bump_while(|c| c != '\n');
            *comment
        } else if is_ident_start(c) {
            self.scan_word(offset)
        } else if let (true, Some(number)) = (c.is_ascii_digit(), roles.number) {
            self.scan_number(number)
        } else if let (true, Some(string)) = (c == '"', roles.string) {
            self.scan_string(string)
        } else if let Some(kind) = self.scan_punctuation() {
            kind
        } else {
            self.bump();
            TokenKind::LEXING_FAILURE
        };

        Some(RawToken {
            kind,
            offset,
            length: self.cursor.pos() - offset,
            start,
            end: self.loc,
        })
    }

    fn close(&mut self) {
        self.finished = true;
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "literal lengths are tiny compared to u32"
)]
#[inline]
fn offset(i: usize) -> u32 {
    i as u32
}

#[inline]
fn is_past_end(cursor: &Cursor<'_>, i: usize) -> bool {
    cursor.pos() + offset(i) >= cursor.end()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;

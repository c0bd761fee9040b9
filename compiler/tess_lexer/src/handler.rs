//! Owner of one analysis unit's token data.
//!
//! A [`TokenDataHandler`] keeps the decoded buffer alive together with the
//! tokens, trivia and the token→trivia map that index into it. Tokens and
//! trivia can be walked as one interleaved sequence through [`TokenRef`]:
//!
//! ```text
//! trivia(run of token 0)... token 0, trivia(run of token 1)... token 1, ..., termination
//! ```

use std::fmt;

use tess_ir::{
    SourceLocation, SlocRange, Symbol, Token, TokenIndex, TokenKind, Trivia, TriviaIndex,
};
use tess_lexer_core::DecodedBuffer;

use crate::driver::TokenStream;
use crate::symbols::{Interning, SymbolCache, SymbolizeError};

/// Position in the interleaved token/trivia sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenRef {
    Token(TokenIndex),
    Trivia(TriviaIndex),
}

/// Token data of one analysis unit.
pub struct TokenDataHandler {
    buffer: DecodedBuffer,
    tokens: Vec<Token>,
    trivia: Vec<Trivia>,
    /// Head of the trivia run preceding each token.
    token_trivia: Vec<TriviaIndex>,
    /// Token following each trivia entry.
    trivia_owner: Vec<TokenIndex>,
    interning: Interning,
    lazy_symbols: SymbolCache,
}

impl TokenDataHandler {
    /// Empty handler interning through `interning`.
    pub fn new(interning: Interning) -> Self {
        Self {
            buffer: DecodedBuffer::empty(),
            tokens: Vec::new(),
            trivia: Vec::new(),
            token_trivia: Vec::new(),
            trivia_owner: Vec::new(),
            interning,
            lazy_symbols: SymbolCache::default(),
        }
    }

    /// Drop all token data. The symbol table is kept.
    pub fn reset(&mut self) {
        self.buffer = DecodedBuffer::empty();
        self.tokens = Vec::new();
        self.trivia = Vec::new();
        self.token_trivia = Vec::new();
        self.trivia_owner = Vec::new();
        self.lazy_symbols.clear();
    }

    pub(crate) fn install(&mut self, buffer: DecodedBuffer, stream: TokenStream) {
        self.buffer = buffer;
        self.tokens = stream.tokens;
        self.trivia = stream.trivia;
        self.token_trivia = stream.token_trivia;
        self.trivia_owner = stream.trivia_owner;
    }

    // === Raw access ===

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn token(&self, index: TokenIndex) -> Option<&Token> {
        self.tokens.get(index.index())
    }

    pub fn trivia_at(&self, index: TriviaIndex) -> Option<&Trivia> {
        self.trivia.get(index.index())
    }

    pub fn buffer(&self) -> &DecodedBuffer {
        &self.buffer
    }

    /// Decoded source content.
    pub fn text(&self) -> &[char] {
        self.buffer.text()
    }

    pub fn interning(&self) -> &Interning {
        &self.interning
    }

    /// Number of tokens, termination included. Zero before the first lex.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn trivia_count(&self) -> usize {
        self.trivia.len()
    }

    // === Text ===

    pub fn token_text(&self, index: TokenIndex) -> Option<String> {
        self.token(index)
            .map(|t| self.buffer.slice(t.source_first, t.source_last).iter().collect())
    }

    pub fn trivia_text(&self, index: TriviaIndex) -> Option<String> {
        self.trivia_at(index)
            .map(|t| self.buffer.slice(t.source_first, t.source_last).iter().collect())
    }

    pub fn text_of(&self, r: TokenRef) -> Option<String> {
        match r {
            TokenRef::Token(i) => self.token_text(i),
            TokenRef::Trivia(i) => self.trivia_text(i),
        }
    }

    pub fn kind_of(&self, r: TokenRef) -> Option<TokenKind> {
        match r {
            TokenRef::Token(i) => self.token(i).map(|t| t.kind),
            TokenRef::Trivia(i) => self.trivia_at(i).map(|t| t.kind),
        }
    }

    pub fn sloc_range_of(&self, r: TokenRef) -> Option<SlocRange> {
        match r {
            TokenRef::Token(i) => self.token(i).map(|t| t.sloc_range),
            TokenRef::Trivia(i) => self.trivia_at(i).map(|t| t.sloc_range),
        }
    }

    // === Trivia runs ===

    /// Trivia run preceding `index`, in source order.
    pub fn leading_trivia(&self, index: TokenIndex) -> LeadingTrivia<'_> {
        let head = self
            .token_trivia
            .get(index.index())
            .copied()
            .unwrap_or(TriviaIndex::NONE);
        LeadingTrivia {
            trivia: &self.trivia,
            next: head,
        }
    }

    fn run_tail(&self, head: TriviaIndex) -> TriviaIndex {
        let mut at = head.index();
        while self.trivia.get(at).is_some_and(|t| t.has_next) {
            at += 1;
        }
        trivia_index(at)
    }

    fn is_run_head(&self, index: TriviaIndex) -> bool {
        let i = index.index();
        i == 0 || !self.trivia.get(i - 1).is_some_and(|t| t.has_next)
    }

    // === Navigation ===

    /// First element of the interleaved sequence.
    pub fn first_token(&self) -> Option<TokenRef> {
        let head = *self.token_trivia.first()?;
        if head.is_valid() {
            Some(TokenRef::Trivia(head))
        } else {
            Some(TokenRef::Token(TokenIndex::from_raw(0)))
        }
    }

    /// The termination token.
    pub fn last_token(&self) -> Option<TokenRef> {
        let last = self.tokens.len().checked_sub(1)?;
        Some(TokenRef::Token(token_index(last)))
    }

    /// Element after `r`. With `exclude_trivia`, skips to the next token.
    pub fn next(&self, r: TokenRef, exclude_trivia: bool) -> Option<TokenRef> {
        match r {
            TokenRef::Token(i) => {
                let next = i.index() + 1;
                let head = *self.token_trivia.get(next)?;
                if !exclude_trivia && head.is_valid() {
                    Some(TokenRef::Trivia(head))
                } else {
                    Some(TokenRef::Token(token_index(next)))
                }
            }
            TokenRef::Trivia(i) => {
                let trivia = self.trivia.get(i.index())?;
                if !exclude_trivia && trivia.has_next {
                    Some(TokenRef::Trivia(trivia_index(i.index() + 1)))
                } else {
                    self.trivia_owner.get(i.index()).copied().map(TokenRef::Token)
                }
            }
        }
    }

    /// Element before `r`. With `exclude_trivia`, skips to the previous token.
    pub fn previous(&self, r: TokenRef, exclude_trivia: bool) -> Option<TokenRef> {
        let owner = match r {
            TokenRef::Token(i) => {
                let head = *self.token_trivia.get(i.index())?;
                if !exclude_trivia && head.is_valid() {
                    return Some(TokenRef::Trivia(self.run_tail(head)));
                }
                i
            }
            TokenRef::Trivia(i) => {
                let owner = *self.trivia_owner.get(i.index())?;
                if !exclude_trivia && !self.is_run_head(i) {
                    return Some(TokenRef::Trivia(trivia_index(i.index() - 1)));
                }
                owner
            }
        };
        let prev = owner.index().checked_sub(1)?;
        Some(TokenRef::Token(token_index(prev)))
    }

    /// Token or trivia whose location range contains `loc`.
    ///
    /// Falls back to the last token starting before `loc`, or to the first
    /// element when `loc` precedes everything.
    pub fn lookup_token(&self, loc: SourceLocation) -> Option<TokenRef> {
        if self.tokens.is_empty() {
            return None;
        }
        let after = self
            .tokens
            .partition_point(|t| t.sloc_range.start() <= loc);

        // Trivia preceding the first token starting after `loc`.
        let candidate = self
            .leading_trivia(token_index(after))
            .find(|(_, t)| t.sloc_range.contains(loc))
            .map(|(i, _)| TokenRef::Trivia(i));
        if candidate.is_some() {
            return candidate;
        }

        match after.checked_sub(1) {
            Some(k) => Some(TokenRef::Token(token_index(k))),
            None => self.first_token(),
        }
    }

    // === Symbols ===

    /// Symbol of a token, eager or lazily interned. Does not intern.
    pub fn symbol(&self, index: TokenIndex) -> Option<Symbol> {
        let token = self.token(index)?;
        token.symbol.or_else(|| self.lazy_symbols.get(index))
    }

    /// Symbol for the token's text, interning it if needed.
    ///
    /// Returns `None` if the text does not canonicalize.
    pub fn force_symbol(&self, index: TokenIndex) -> Option<Symbol> {
        self.try_force_symbol(index).ok()
    }

    /// Like [`force_symbol`](Self::force_symbol), reporting why it failed.
    pub fn try_force_symbol(&self, index: TokenIndex) -> Result<Symbol, SymbolizeError> {
        let token = self
            .token(index)
            .ok_or(SymbolizeError::NoSuchToken(index))?;
        if let Some(symbol) = token.symbol.or_else(|| self.lazy_symbols.get(index)) {
            return Ok(symbol);
        }
        let text: String = self
            .buffer
            .slice(token.source_first, token.source_last)
            .iter()
            .collect();
        let symbol = self.interning.symbolize(&text)?;
        self.lazy_symbols.insert(index, symbol);
        Ok(symbol)
    }
}

impl fmt::Debug for TokenDataHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDataHandler")
            .field("code_points", &self.buffer.len())
            .field("tokens", &self.tokens.len())
            .field("trivia", &self.trivia.len())
            .field("lazy_symbols", &self.lazy_symbols)
            .finish_non_exhaustive()
    }
}

/// Iterator over the trivia run preceding a token.
pub struct LeadingTrivia<'a> {
    trivia: &'a [Trivia],
    next: TriviaIndex,
}

impl<'a> Iterator for LeadingTrivia<'a> {
    type Item = (TriviaIndex, &'a Trivia);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let trivia = self.trivia.get(index.index())?;
        self.next = if trivia.has_next {
            trivia_index(index.index() + 1)
        } else {
            TriviaIndex::NONE
        };
        Some((index, trivia))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "token vectors are indexed by u32"
)]
#[inline]
fn token_index(i: usize) -> TokenIndex {
    TokenIndex::from_raw(i as u32)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "trivia vectors are indexed by u32"
)]
#[inline]
fn trivia_index(i: usize) -> TriviaIndex {
    TriviaIndex::from_raw(i as u32)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

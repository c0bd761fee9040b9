//! Token and trivia records produced by the lexer.
//!
//! Both records locate their text with `source_first`/`source_last`, which
//! are inclusive code-point offsets into the decoded buffer the lexer built.
//! A zero-length record (termination, synthesized indentation tokens) has
//! `source_last == source_first - 1`.

use crate::{SlocRange, Symbol, TokenKind};

/// Typed index into a token vector. `u32::MAX` means "no token".
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TokenIndex(u32);

impl TokenIndex {
    pub const NONE: TokenIndex = TokenIndex(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TokenIndex(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Typed index into a trivia vector. `u32::MAX` means "no trivia".
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TriviaIndex(u32);

impl TriviaIndex {
    pub const NONE: TriviaIndex = TriviaIndex(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TriviaIndex(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// A token of the main stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub source_first: u32,
    pub source_last: u32,
    pub sloc_range: SlocRange,
    /// Interned text, set for symbol-bearing kinds whose text canonicalized.
    pub symbol: Option<Symbol>,
}

impl Token {
    /// Zero-length token whose (empty) span starts at `offset`.
    pub fn empty_at(kind: TokenKind, offset: u32, sloc_range: SlocRange) -> Self {
        Token {
            kind,
            source_first: offset,
            source_last: offset.wrapping_sub(1),
            sloc_range,
            symbol: None,
        }
    }

    /// Number of code points covered.
    #[inline]
    pub fn len(&self) -> u32 {
        span_len(self.source_first, self.source_last)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A trivia record (whitespace, comment, lexing failure).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trivia {
    pub kind: TokenKind,
    pub source_first: u32,
    pub source_last: u32,
    pub sloc_range: SlocRange,
    /// The next trivia entry belongs to the same run.
    pub has_next: bool,
}

impl Trivia {
    #[inline]
    pub fn len(&self) -> u32 {
        span_len(self.source_first, self.source_last)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn span_len(first: u32, last: u32) -> u32 {
    last.wrapping_add(1).wrapping_sub(first)
}

#[cfg(test)]
mod tests;

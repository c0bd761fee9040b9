//! Tessera IR - token stream data model
//!
//! This crate contains the types shared by the lexer and the parsers
//! generated on top of it:
//! - Token kinds and per-language token grammar tables
//! - Token and trivia records with source locations
//! - Diagnostics
//! - The symbol table and symbol canonicalizers
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: canonical texts become `Symbol(u32)`
//! - **Index, don't point**: tokens and trivia refer to text by offsets into
//!   the decoded buffer and to each other by typed indices
//! - **Immutable tables**: a `TokenGrammar` is built once and shared freely

mod canonicalize;
mod diagnostic;
mod sloc;
mod symbol;
mod token;
mod token_kind;

pub use canonicalize::{CanonicalizeError, Canonicalizer, CaseFolding, Identity};
pub use diagnostic::Diagnostic;
pub use sloc::{Relative, SlocRange, SourceLocation};
pub use symbol::{SharedSymbolTable, Symbol, SymbolError, SymbolTable};
pub use token::{Token, TokenIndex, Trivia, TriviaIndex};
pub use token_kind::{
    GrammarError, KindClass, KindInfo, LayoutFlags, LexicalRoles, TokenGrammar,
    TokenGrammarBuilder, TokenKind,
};

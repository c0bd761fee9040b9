//! Symbol interning for symbol-bearing tokens.
//!
//! The driver interns eagerly and turns failures into diagnostics. Later
//! phases go through [`TokenDataHandler::force_symbol`], which interns on
//! demand and memoizes the result per token.
//!
//! [`TokenDataHandler::force_symbol`]: crate::TokenDataHandler::force_symbol

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tess_ir::{
    CanonicalizeError, Canonicalizer, CaseFolding, Identity, SharedSymbolTable, Symbol,
    SymbolError, TokenIndex,
};

/// A symbol table paired with the canonicalizer applied before interning.
#[derive(Clone)]
pub struct Interning {
    table: SharedSymbolTable,
    canonicalizer: Arc<dyn Canonicalizer>,
}

impl Interning {
    pub fn new(table: SharedSymbolTable, canonicalizer: Arc<dyn Canonicalizer>) -> Self {
        Self {
            table,
            canonicalizer,
        }
    }

    /// Intern lexemes as written.
    pub fn identity(table: SharedSymbolTable) -> Self {
        Self::new(table, Arc::new(Identity))
    }

    /// Intern lexemes case-insensitively, decoding bracket encodings.
    pub fn case_folding(table: SharedSymbolTable) -> Self {
        Self::new(table, Arc::new(CaseFolding))
    }

    pub fn table(&self) -> &SharedSymbolTable {
        &self.table
    }

    pub fn canonicalizer(&self) -> &dyn Canonicalizer {
        &*self.canonicalizer
    }

    /// Canonicalize `text` and intern the result.
    pub fn symbolize(&self, text: &str) -> Result<Symbol, SymbolizeError> {
        let canonical = self.canonicalizer.canonicalize(text)?;
        Ok(self.table.try_find_or_insert(&canonical)?)
    }
}

impl Default for Interning {
    fn default() -> Self {
        Self::identity(SharedSymbolTable::new())
    }
}

impl fmt::Debug for Interning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interning")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Why a token could not be turned into a symbol.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymbolizeError {
    #[error(transparent)]
    Canonicalize(#[from] CanonicalizeError),

    #[error(transparent)]
    Table(#[from] SymbolError),

    #[error("no token at index {}", .0.raw())]
    NoSuchToken(TokenIndex),
}

/// Memo of symbols interned lazily, keyed by token.
#[derive(Default)]
pub(crate) struct SymbolCache {
    entries: Mutex<FxHashMap<TokenIndex, Symbol>>,
}

impl SymbolCache {
    pub(crate) fn get(&self, index: TokenIndex) -> Option<Symbol> {
        self.entries.lock().get(&index).copied()
    }

    pub(crate) fn insert(&self, index: TokenIndex, symbol: Symbol) {
        self.entries.lock().insert(index, symbol);
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl fmt::Debug for SymbolCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

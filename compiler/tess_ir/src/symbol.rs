//! Sharded symbol table for canonicalized identifiers.
//!
//! Provides O(1) find-or-insert and lookup with thread-safe concurrent
//! access via per-shard locking. The same text always yields the same
//! [`Symbol`] for the lifetime of a table, which makes symbols comparable
//! with a single integer compare.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned, canonicalized identifier.
///
/// Layout: 32-bit index split into shard (4 bits) + local index (28 bits).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// Pre-interned empty string.
    pub const EMPTY: Symbol = Symbol(0);

    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards.
    pub const NUM_SHARDS: usize = 16;

    #[inline]
    const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Symbol((shard << 28) | local)
    }

    #[inline]
    const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol(shard={}, local={})", self.shard(), self.local())
    }
}

/// Error when inserting into a full shard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("symbol table shard {shard_idx} is full: {count} symbols, max is {max}", max = Symbol::MAX_LOCAL)]
    ShardOverflow { shard_idx: usize, count: usize },
}

/// Per-shard storage for interned strings.
struct SymbolShard {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl SymbolShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Find-or-insert table of canonical symbol texts.
///
/// # Thread Safety
/// Each shard sits behind its own `RwLock`, so concurrent lex passes can
/// intern into one table. Interned strings are leaked to obtain `'static`
/// lifetimes; a table is expected to live as long as the analysis context
/// that owns it.
pub struct SymbolTable {
    shards: [RwLock<SymbolShard>; Symbol::NUM_SHARDS],
    total_count: AtomicUsize,
}

impl SymbolTable {
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(SymbolShard::with_empty())
            } else {
                RwLock::new(SymbolShard::new())
            }
        });
        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Symbol::NUM_SHARDS
    }

    /// Find `text` or insert it, returning an error when its shard is full.
    pub fn try_find_or_insert(&self, text: &str) -> Result<Symbol, SymbolError> {
        let shard_idx = Self::shard_for(text);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(text) {
                return Ok(Symbol::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Another writer may have inserted it between the two locks.
        if let Some(&local) = guard.map.get(text) {
            return Ok(Symbol::new(shard_idx_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Symbol::MAX_LOCAL)
            .ok_or(SymbolError::ShardOverflow { shard_idx, count })?;

        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Symbol::new(shard_idx_u32, local))
    }

    /// Find `text` or insert it.
    ///
    /// # Panics
    /// Panics if a shard exceeds `Symbol::MAX_LOCAL` entries.
    #[inline]
    pub fn find_or_insert(&self, text: &str) -> Symbol {
        self.try_find_or_insert(text)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Find `text` without inserting it.
    pub fn find(&self, text: &str) -> Option<Symbol> {
        let shard_idx = Self::shard_for(text);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(text)
            .map(|&local| Symbol::new(shard_idx_u32, local))
    }

    /// Text of a symbol.
    pub fn lookup(&self, symbol: Symbol) -> &'static str {
        let guard = self.shards[symbol.shard()].read();
        guard.strings[symbol.local()]
    }

    /// Number of symbols, the pre-interned empty string included.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Symbol table shared by every unit of an analysis context.
///
/// Token data handlers keep a clone of this handle so that symbols can be
/// resolved and lazily interned long after the lex pass ended.
#[derive(Clone, Default, Debug)]
pub struct SharedSymbolTable(Arc<SymbolTable>);

impl SharedSymbolTable {
    pub fn new() -> Self {
        SharedSymbolTable(Arc::new(SymbolTable::new()))
    }

    /// Check whether two handles point to the same table.
    pub fn same_table(&self, other: &SharedSymbolTable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedSymbolTable {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

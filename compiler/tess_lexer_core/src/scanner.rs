//! Raw scanner contract.
//!
//! A scanner turns a [`DecodedBuffer`] into a stream of [`RawToken`]s. The
//! lexer driver owns the only scanner of a lex pass through a
//! [`ScannerHandle`], which closes it on every exit path.

use std::ops::{Deref, DerefMut};

use tess_ir::{SourceLocation, TokenKind};

use crate::DecodedBuffer;

/// One match reported by a scanner.
///
/// `offset` is a physical buffer offset (content starts at 2) and `length`
/// counts code points. `end` is the location just past the match.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RawToken {
    pub kind: TokenKind,
    pub offset: u32,
    pub length: u32,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

/// A scanner bound to one decoded buffer.
pub trait Scanner {
    /// Next raw token. Offsets never decrease. After the single
    /// `TERMINATION` token, returns `None` forever.
    fn next_raw(&mut self) -> Option<RawToken>;

    /// Release scanner state. Called exactly once by [`ScannerHandle`].
    fn close(&mut self) {}
}

/// Per-pass settings handed to a scanner when it is opened.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ScanSettings {
    /// Tabs advance the column to the next multiple of this, plus one.
    pub tab_stop: u8,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { tab_stop: 8 }
    }
}

/// Creates scanners for decoded buffers.
pub trait ScannerFactory {
    type Scanner<'buf>: Scanner
    where
        Self: 'buf;

    fn open<'buf>(
        &'buf self,
        buffer: &'buf DecodedBuffer,
        settings: ScanSettings,
    ) -> Self::Scanner<'buf>;
}

/// Owns a scanner and closes it when dropped.
pub struct ScannerHandle<S: Scanner> {
    scanner: S,
}

impl<S: Scanner> ScannerHandle<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }
}

impl<S: Scanner> Deref for ScannerHandle<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.scanner
    }
}

impl<S: Scanner> DerefMut for ScannerHandle<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.scanner
    }
}

impl<S: Scanner> Drop for ScannerHandle<S> {
    fn drop(&mut self) {
        tracing::trace!("closing scanner");
        self.scanner.close();
    }
}

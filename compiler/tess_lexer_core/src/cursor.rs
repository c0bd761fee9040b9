//! Cursor over a sentinel-padded code-point buffer.
//!
//! EOF is the trailing `'\0'` sentinel at `end`. Interior NUL code points
//! are distinguished from it by position, so `current() == '\0'` alone does
//! not mean EOF.

/// Cheap, [`Copy`] cursor over a [`DecodedBuffer`](crate::DecodedBuffer).
///
/// Positions are physical buffer offsets: the first content code point is
/// at offset 2.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Whole buffer, sentinels included.
    buf: &'a [char],
    pos: u32,
    /// Offset of the trailing sentinel.
    end: u32,
}

impl<'a> Cursor<'a> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "buffers are built with a u32-indexable length"
    )]
    pub(crate) fn new(buf: &'a [char], pos: u32) -> Self {
        debug_assert!(!buf.is_empty(), "buffer must hold its sentinels");
        debug_assert!(buf[buf.len() - 1] == '\0', "trailing sentinel must be NUL");
        let end = (buf.len() - 1) as u32;
        Self { buf, pos, end }
    }

    /// Code point at the current position; `'\0'` at EOF.
    #[inline]
    pub fn current(&self) -> char {
        self.at(self.pos)
    }

    /// Code point one ahead; `'\0'` past EOF.
    #[inline]
    pub fn peek(&self) -> char {
        self.at(self.pos + 1)
    }

    /// Code point `n` ahead; `'\0'` past EOF.
    #[inline]
    pub fn peek_n(&self, n: u32) -> char {
        self.at(self.pos.saturating_add(n))
    }

    /// Code point just before the current position.
    ///
    /// The leading sentinels make this valid at the start of content.
    #[inline]
    pub fn prev(&self) -> char {
        self.at(self.pos.wrapping_sub(1))
    }

    #[inline]
    fn at(&self, pos: u32) -> char {
        self.buf.get(pos as usize).copied().unwrap_or('\0')
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
        }
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.end);
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Current physical offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Offset of the trailing sentinel.
    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Code points in `[start, pos)`.
    pub fn slice_from(&self, start: u32) -> &'a [char] {
        debug_assert!(start <= self.pos, "slice start {start} exceeds position {}", self.pos);
        &self.buf[start as usize..self.pos as usize]
    }

    /// Does the content at the current position start with `text`?
    pub fn starts_with(&self, text: &str) -> bool {
        let mut pos = self.pos;
        for c in text.chars() {
            if pos >= self.end || self.at(pos) != c {
                return false;
            }
            pos += 1;
        }
        true
    }

    /// Advance while `pred` holds for the current code point. Stops at EOF.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `'\n'` or EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        self.eat_while(|c| c != '\n');
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;

//! Sentinel-padded buffer of decoded code points.
//!
//! # Layout
//!
//! ```text
//! ['\0', '\0', code points..., '\0']
//!   0     1    ^ first = 2      ^ last + 1
//! ```
//!
//! Offsets handed out by the scanner and stored in tokens index this
//! physical layout directly, so offset 2 is the first code point. The two
//! leading cells let look-behind read before the content without a bounds
//! check; the trailing cell is the end-of-input sentinel.

use std::fmt;

use crate::charset::{sniff_bom, Charset};
use crate::Cursor;

/// Number of sentinel cells before the content.
pub const LEADING_SENTINELS: usize = 2;

/// Index of the first content code point.
const FIRST: u32 = LEADING_SENTINELS as u32;

/// Errors that abort decoding. No buffer is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown charset: {name}")]
    UnknownCharset { name: String },

    #[error("could not decode source as {charset}: invalid input at byte {offset}")]
    InvalidInput { charset: Charset, offset: usize },

    /// Offsets are `u32`; inputs that cannot be indexed that way are refused.
    #[error("source of {len} bytes is too large to decode")]
    TooLarge { len: usize },
}

/// Owned, sentinel-padded code-point buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedBuffer {
    cells: Vec<char>,
}

impl DecodedBuffer {
    /// Buffer with no content: only the three sentinel cells.
    pub fn empty() -> Self {
        Self {
            cells: vec!['\0'; LEADING_SENTINELS + 1],
        }
    }

    /// Offset of the first content code point (always 2).
    #[inline]
    pub fn first(&self) -> u32 {
        FIRST
    }

    /// Offset of the last content code point; `first() - 1` when empty.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "decode refuses inputs whose cell count does not fit in u32"
    )]
    pub fn last(&self) -> u32 {
        (self.cells.len() - 2) as u32
    }

    /// Offset just past the content, where the termination token sits.
    #[inline]
    pub fn end_offset(&self) -> u32 {
        self.last() + 1
    }

    /// Number of content code points.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len() - LEADING_SENTINELS - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The content without sentinels.
    #[inline]
    pub fn text(&self) -> &[char] {
        &self.cells[LEADING_SENTINELS..self.cells.len() - 1]
    }

    /// The whole physical buffer, sentinels included.
    #[inline]
    pub fn as_sentinel_slice(&self) -> &[char] {
        &self.cells
    }

    /// Inclusive slice `[first, last]` in physical offsets.
    ///
    /// A zero-length range (`last == first - 1`) yields an empty slice.
    /// Ranges outside the buffer are clamped to it.
    pub fn slice(&self, first: u32, last: u32) -> &[char] {
        let start = (first as usize).min(self.cells.len());
        let end = (last as usize).wrapping_add(1).clamp(start, self.cells.len());
        &self.cells[start..end]
    }

    /// Cursor positioned at the first content code point.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.cells, FIRST)
    }

    /// Content as a `String`.
    pub fn contents(&self) -> String {
        self.text().iter().collect()
    }
}

impl Default for DecodedBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for DecodedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedBuffer")
            .field("len", &self.len())
            .field("text", &self.contents())
            .finish()
    }
}

/// Decode `bytes` into a sentinel-padded code-point buffer.
///
/// With `read_bom`, a recognized byte-order mark overrides `charset` and is
/// skipped. Empty input (after the mark) yields an empty buffer without
/// resolving `charset`.
#[tracing::instrument(level = "debug", skip_all, fields(len = bytes.len(), charset = charset))]
pub fn decode(bytes: &[u8], charset: &str, read_bom: bool) -> Result<DecodedBuffer, DecodeError> {
    let (bom_charset, skip) = if read_bom {
        sniff_bom(bytes).map_or((None, 0), |(cs, n)| (Some(cs), n))
    } else {
        (None, 0)
    };
    let input = &bytes[skip..];

    if input.is_empty() {
        return Ok(DecodedBuffer::empty());
    }

    let charset = match bom_charset {
        Some(cs) => {
            tracing::debug!(requested = charset, detected = %cs, "byte-order mark overrides charset");
            cs
        }
        None => Charset::from_name(charset).ok_or_else(|| DecodeError::UnknownCharset {
            name: charset.to_owned(),
        })?,
    };

    // One cell per byte is the worst case for every supported charset.
    let capacity = input.len() + LEADING_SENTINELS + 1;
    ensure_indexable(capacity, bytes.len())?;
    let mut cells = vec!['\0'; capacity];
    let mut written = LEADING_SENTINELS;

    let mut decoder = charset.decoder();
    for (i, &byte) in input.iter().enumerate() {
        match decoder.push(byte) {
            Ok(Some(c)) => {
                cells[written] = c;
                written += 1;
            }
            Ok(None) => {}
            Err(_) => {
                return Err(DecodeError::InvalidInput {
                    charset,
                    offset: skip + i,
                })
            }
        }
    }
    if decoder.finish().is_err() {
        return Err(DecodeError::InvalidInput {
            charset,
            offset: bytes.len(),
        });
    }

    cells.truncate(written + 1);
    cells[written] = '\0';
    tracing::debug!(code_points = written - LEADING_SENTINELS, %charset, "decoded source");
    Ok(DecodedBuffer { cells })
}

/// Build a buffer from text that is already decoded.
pub fn decode_text(text: &str) -> Result<DecodedBuffer, DecodeError> {
    let mut cells = Vec::with_capacity(text.len() + LEADING_SENTINELS + 1);
    cells.extend(['\0'; LEADING_SENTINELS]);
    cells.extend(text.chars());
    cells.push('\0');
    ensure_indexable(cells.len(), text.len())?;
    Ok(DecodedBuffer { cells })
}

/// Offsets are `u32`: refuse buffers of `cells` cells that do not fit.
fn ensure_indexable(cells: usize, len: usize) -> Result<(), DecodeError> {
    match u32::try_from(cells) {
        Ok(_) => Ok(()),
        Err(_) => Err(DecodeError::TooLarge { len }),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

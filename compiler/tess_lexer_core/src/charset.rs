//! Charset resolution, byte-order-mark sniffing and streaming decoders.
//!
//! Decoders are fed one byte at a time and yield a code point whenever a
//! complete, valid sequence has been seen. Any malformed sequence is a hard
//! failure: there is no replacement character.

use std::fmt;

/// A supported source encoding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Charset {
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Charset {
    /// Resolve a charset name. Matching ignores ASCII case, `-` and `_`.
    pub fn from_name(name: &str) -> Option<Charset> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let charset = match normalized.as_str() {
            "utf8" => Charset::Utf8,
            "ascii" | "usascii" => Charset::Ascii,
            "iso88591" | "latin1" => Charset::Latin1,
            "utf16le" => Charset::Utf16Le,
            "utf16be" | "utf16" => Charset::Utf16Be,
            "utf32le" => Charset::Utf32Le,
            "utf32be" | "utf32" => Charset::Utf32Be,
            _ => return None,
        };
        Some(charset)
    }

    /// Canonical name, as accepted by [`from_name`](Self::from_name).
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Ascii => "ascii",
            Charset::Latin1 => "iso-8859-1",
            Charset::Utf16Le => "utf-16le",
            Charset::Utf16Be => "utf-16be",
            Charset::Utf32Le => "utf-32le",
            Charset::Utf32Be => "utf-32be",
        }
    }

    /// Open a fresh streaming decoder for this charset.
    pub fn decoder(self) -> Box<dyn CodePointDecoder> {
        match self {
            Charset::Utf8 => Box::new(Utf8Decoder::default()),
            Charset::Ascii => Box::new(SingleByteDecoder { max: 0x7F }),
            Charset::Latin1 => Box::new(SingleByteDecoder { max: 0xFF }),
            Charset::Utf16Le => Box::new(Utf16Decoder::new(false)),
            Charset::Utf16Be => Box::new(Utf16Decoder::new(true)),
            Charset::Utf32Le => Box::new(Utf32Decoder::new(false)),
            Charset::Utf32Be => Box::new(Utf32Decoder::new(true)),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect a byte-order mark at the start of `bytes`.
///
/// Returns the charset it denotes and its length in bytes. UTF-32LE is
/// checked before UTF-16LE since its mark starts with the UTF-16LE one.
pub fn sniff_bom(bytes: &[u8]) -> Option<(Charset, usize)> {
    const MARKS: [(&[u8], Charset); 5] = [
        (&[0xEF, 0xBB, 0xBF], Charset::Utf8),
        (&[0xFF, 0xFE, 0x00, 0x00], Charset::Utf32Le),
        (&[0x00, 0x00, 0xFE, 0xFF], Charset::Utf32Be),
        (&[0xFF, 0xFE], Charset::Utf16Le),
        (&[0xFE, 0xFF], Charset::Utf16Be),
    ];
    MARKS
        .iter()
        .find(|(mark, _)| bytes.starts_with(mark))
        .map(|&(mark, charset)| (charset, mark.len()))
}

/// The byte sequence fed so far is not valid for the charset.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Malformed;

/// Streaming byte-to-code-point decoder.
pub trait CodePointDecoder {
    /// Feed one byte. Returns a code point once a sequence completes.
    fn push(&mut self, byte: u8) -> Result<Option<char>, Malformed>;

    /// Signal end of input. Fails if a sequence is incomplete.
    fn finish(&mut self) -> Result<(), Malformed>;
}

/// ASCII and ISO-8859-1: one byte per code point, up to `max`.
struct SingleByteDecoder {
    max: u8,
}

impl CodePointDecoder for SingleByteDecoder {
    #[inline]
    fn push(&mut self, byte: u8) -> Result<Option<char>, Malformed> {
        if byte > self.max {
            return Err(Malformed);
        }
        Ok(Some(char::from(byte)))
    }

    fn finish(&mut self) -> Result<(), Malformed> {
        Ok(())
    }
}

/// UTF-8 decoder rejecting overlong forms, surrogates and values past U+10FFFF.
///
/// Continuation bytes are range-checked against `lower..=upper`, which the
/// lead byte narrows for the sequences that could otherwise be overlong or
/// out of range.
#[derive(Default)]
struct Utf8Decoder {
    code_point: u32,
    needed: u8,
    seen: u8,
    lower: u8,
    upper: u8,
}

impl CodePointDecoder for Utf8Decoder {
    fn push(&mut self, byte: u8) -> Result<Option<char>, Malformed> {
        if self.needed == 0 {
            self.lower = 0x80;
            self.upper = 0xBF;
            match byte {
                0x00..=0x7F => return Ok(Some(char::from(byte))),
                0xC2..=0xDF => {
                    self.needed = 1;
                    self.code_point = u32::from(byte & 0x1F);
                }
                0xE0..=0xEF => {
                    if byte == 0xE0 {
                        self.lower = 0xA0;
                    } else if byte == 0xED {
                        self.upper = 0x9F;
                    }
                    self.needed = 2;
                    self.code_point = u32::from(byte & 0x0F);
                }
                0xF0..=0xF4 => {
                    if byte == 0xF0 {
                        self.lower = 0x90;
                    } else if byte == 0xF4 {
                        self.upper = 0x8F;
                    }
                    self.needed = 3;
                    self.code_point = u32::from(byte & 0x07);
                }
                _ => return Err(Malformed),
            }
            return Ok(None);
        }

        if !(self.lower..=self.upper).contains(&byte) {
            return Err(Malformed);
        }
        self.lower = 0x80;
        self.upper = 0xBF;
        self.code_point = (self.code_point << 6) | u32::from(byte & 0x3F);
        self.seen += 1;
        if self.seen < self.needed {
            return Ok(None);
        }

        let cp = self.code_point;
        self.code_point = 0;
        self.needed = 0;
        self.seen = 0;
        char::from_u32(cp).map(Some).ok_or(Malformed)
    }

    fn finish(&mut self) -> Result<(), Malformed> {
        if self.needed == 0 {
            Ok(())
        } else {
            Err(Malformed)
        }
    }
}

struct Utf16Decoder {
    big_endian: bool,
    lead_byte: Option<u8>,
    high_surrogate: Option<u16>,
}

impl Utf16Decoder {
    fn new(big_endian: bool) -> Self {
        Self {
            big_endian,
            lead_byte: None,
            high_surrogate: None,
        }
    }
}

impl CodePointDecoder for Utf16Decoder {
    fn push(&mut self, byte: u8) -> Result<Option<char>, Malformed> {
        let Some(lead) = self.lead_byte.take() else {
            self.lead_byte = Some(byte);
            return Ok(None);
        };
        let unit = if self.big_endian {
            u16::from_be_bytes([lead, byte])
        } else {
            u16::from_le_bytes([lead, byte])
        };

        match (self.high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let cp = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                char::from_u32(cp).map(Some).ok_or(Malformed)
            }
            (Some(_), _) | (None, 0xDC00..=0xDFFF) => Err(Malformed),
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(unit);
                Ok(None)
            }
            (None, _) => char::from_u32(u32::from(unit)).map(Some).ok_or(Malformed),
        }
    }

    fn finish(&mut self) -> Result<(), Malformed> {
        if self.lead_byte.is_some() || self.high_surrogate.is_some() {
            Err(Malformed)
        } else {
            Ok(())
        }
    }
}

struct Utf32Decoder {
    big_endian: bool,
    bytes: [u8; 4],
    filled: usize,
}

impl Utf32Decoder {
    fn new(big_endian: bool) -> Self {
        Self {
            big_endian,
            bytes: [0; 4],
            filled: 0,
        }
    }
}

impl CodePointDecoder for Utf32Decoder {
    fn push(&mut self, byte: u8) -> Result<Option<char>, Malformed> {
        self.bytes[self.filled] = byte;
        self.filled += 1;
        if self.filled < 4 {
            return Ok(None);
        }
        self.filled = 0;
        let cp = if self.big_endian {
            u32::from_be_bytes(self.bytes)
        } else {
            u32::from_le_bytes(self.bytes)
        };
        char::from_u32(cp).map(Some).ok_or(Malformed)
    }

    fn finish(&mut self) -> Result<(), Malformed> {
        if self.filled == 0 {
            Ok(())
        } else {
            Err(Malformed)
        }
    }
}

//! Symbol canonicalization.
//!
//! Before a lexeme is interned it is turned into its canonical spelling,
//! so that texts a language considers equal map to the same [`Symbol`].
//! Canonicalization may fail; the caller decides whether the failure is
//! diagnosed (eager interning during lexing) or silently ignored (lazy
//! interning from later phases).
//!
//! [`Symbol`]: crate::Symbol

use std::borrow::Cow;

/// Canonicalization failure, carrying a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CanonicalizeError {
    pub message: String,
}

impl CanonicalizeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Maps a lexeme to its canonical symbol text.
pub trait Canonicalizer: Send + Sync {
    fn canonicalize<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, CanonicalizeError>;
}

/// Canonical form is the text itself. Never fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl Canonicalizer for Identity {
    #[inline]
    fn canonicalize<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, CanonicalizeError> {
        Ok(Cow::Borrowed(text))
    }
}

/// Case-insensitive identifiers with wide-character bracket encodings.
///
/// Lowercases the text and decodes `["hh"]`, `["hhhh"]`, `["hhhhhh"]` and
/// `["hhhhhhhh"]` sequences (hexadecimal code points) into the character
/// they denote. A malformed or unterminated encoding is an error.
#[derive(Copy, Clone, Debug, Default)]
pub struct CaseFolding;

impl Canonicalizer for CaseFolding {
    fn canonicalize<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, CanonicalizeError> {
        if !text.contains("[\"") && !text.chars().any(char::is_uppercase) {
            return Ok(Cow::Borrowed(text));
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find("[\"") {
            push_lowercase(&mut out, &rest[..pos]);
            let encoded = &rest[pos + 2..];
            let Some(end) = encoded.find("\"]") else {
                return Err(CanonicalizeError::new(format!(
                    "unterminated brackets encoding in `{text}`"
                )));
            };
            let digits = &encoded[..end];
            let ch = decode_brackets(digits).ok_or_else(|| {
                CanonicalizeError::new(format!("invalid brackets encoding [\"{digits}\"]"))
            })?;
            out.extend(ch.to_lowercase());
            rest = &encoded[end + 2..];
        }
        push_lowercase(&mut out, rest);
        Ok(Cow::Owned(out))
    }
}

fn push_lowercase(out: &mut String, text: &str) {
    for ch in text.chars() {
        out.extend(ch.to_lowercase());
    }
}

fn decode_brackets(digits: &str) -> Option<char> {
    if !matches!(digits.len(), 2 | 4 | 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

//! Non-fatal lexing diagnostics.

use std::fmt;

use crate::SlocRange;

/// A located message produced while building a token stream.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub sloc_range: SlocRange,
    pub message: String,
}

impl Diagnostic {
    pub fn new(sloc_range: SlocRange, message: impl Into<String>) -> Self {
        Self {
            sloc_range,
            message: message.into(),
        }
    }

    /// Diagnostic reported for input the scanner could not match.
    pub fn invalid_token(sloc_range: SlocRange) -> Self {
        Self::new(sloc_range, "invalid token, ignored")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sloc_range == SlocRange::NONE {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.sloc_range, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceLocation;

    #[test]
    fn display_with_location() {
        let sloc = SlocRange::new(SourceLocation::new(2, 3), SourceLocation::new(2, 4));
        let diag = Diagnostic::invalid_token(sloc);
        assert_eq!(diag.to_string(), "2:3-2:4: invalid token, ignored");
    }

    #[test]
    fn display_without_location() {
        let diag = Diagnostic::new(SlocRange::NONE, "unit is empty");
        assert_eq!(diag.to_string(), "unit is empty");
    }
}

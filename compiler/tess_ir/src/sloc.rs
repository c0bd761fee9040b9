//! Line/column source locations.
//!
//! Lines and columns are 1-based. Columns count code points, with tabs
//! expanded by the scanner that produced them.

use std::cmp::Ordering;
use std::fmt;

/// A single line/column position in decoded source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    pub line: u32,
    pub column: u16,
}

impl SourceLocation {
    /// Sentinel for "no location" (line and column 0).
    pub const NONE: SourceLocation = SourceLocation { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u16) -> Self {
        SourceLocation { line, column }
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where a location sits relative to a [`SlocRange`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Relative {
    Before,
    Inside,
    After,
}

/// A source location range: start and end line/column pairs.
///
/// The end column is exclusive, so a zero-width range has
/// `start_column == end_column` on the same line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlocRange {
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u16,
    pub end_column: u16,
}

impl SlocRange {
    /// Range covering nothing, used for diagnostics without a location.
    pub const NONE: SlocRange = SlocRange {
        start_line: 0,
        end_line: 0,
        start_column: 0,
        end_column: 0,
    };

    #[inline]
    pub const fn new(start: SourceLocation, end: SourceLocation) -> Self {
        SlocRange {
            start_line: start.line,
            end_line: end.line,
            start_column: start.column,
            end_column: end.column,
        }
    }

    /// Zero-width range at `loc`.
    #[inline]
    pub const fn point(loc: SourceLocation) -> Self {
        Self::new(loc, loc)
    }

    #[inline]
    pub const fn start(&self) -> SourceLocation {
        SourceLocation::new(self.start_line, self.start_column)
    }

    #[inline]
    pub const fn end(&self) -> SourceLocation {
        SourceLocation::new(self.end_line, self.end_column)
    }

    /// Check if the range covers no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Classify `loc` against this range.
    ///
    /// The end bound is exclusive except for empty ranges, where a location
    /// equal to the start is considered inside.
    pub fn compare(&self, loc: SourceLocation) -> Relative {
        if loc < self.start() {
            return Relative::Before;
        }
        match loc.cmp(&self.end()) {
            Ordering::Less => Relative::Inside,
            Ordering::Equal if self.is_empty() => Relative::Inside,
            _ => Relative::After,
        }
    }

    #[inline]
    pub fn contains(&self, loc: SourceLocation) -> bool {
        self.compare(loc) == Relative::Inside
    }
}

impl fmt::Debug for SlocRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for SlocRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start(), self.end())
    }
}

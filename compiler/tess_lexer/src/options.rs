//! Per-pass lexing options.

use tess_lexer_core::ScanSettings;

/// Options controlling one lex pass.
///
/// ```
/// use tess_lexer::LexOptions;
///
/// let opts = LexOptions::default().with_charset("latin-1").with_trivia(false);
/// assert_eq!(opts.charset, "latin-1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LexOptions {
    /// Charset used when no byte-order mark overrides it.
    pub charset: String,
    /// Detect and honor a byte-order mark.
    pub read_bom: bool,
    /// Keep trivia (whitespace, comments, lexing failures) in the handler.
    pub with_trivia: bool,
    /// Deepest indentation stack accepted before the pass fails.
    pub max_indent_depth: usize,
    /// Tab stop used to compute columns.
    pub tab_stop: u8,
}

impl LexOptions {
    pub const DEFAULT_MAX_INDENT_DEPTH: usize = 256;

    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    #[must_use]
    pub fn with_read_bom(mut self, read_bom: bool) -> Self {
        self.read_bom = read_bom;
        self
    }

    #[must_use]
    pub fn with_trivia(mut self, with_trivia: bool) -> Self {
        self.with_trivia = with_trivia;
        self
    }

    #[must_use]
    pub fn with_max_indent_depth(mut self, depth: usize) -> Self {
        self.max_indent_depth = depth;
        self
    }

    #[must_use]
    pub fn with_tab_stop(mut self, tab_stop: u8) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    pub(crate) fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            tab_stop: self.tab_stop,
        }
    }
}

impl Default for LexOptions {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_owned(),
            read_bom: true,
            with_trivia: true,
            max_indent_depth: Self::DEFAULT_MAX_INDENT_DEPTH,
            tab_stop: ScanSettings::default().tab_stop,
        }
    }
}

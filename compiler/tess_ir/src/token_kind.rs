//! Token kinds and the per-language token grammar table.
//!
//! A [`TokenGrammar`] is built once per language (typically inside a
//! `LazyLock` static) and never mutated afterwards, so it can be shared by
//! every lex pass on every thread without synchronization.
//!
//! # Reserved kinds
//!
//! Every grammar starts with five kinds the lexing engine relies on:
//!
//! | id | kind              | class   |
//! |----|-------------------|---------|
//! | 0  | `TERMINATION`     | plain   |
//! | 1  | `LEXING_FAILURE`  | trivia  |
//! | 2  | `INDENT`          | plain   |
//! | 3  | `DEDENT`          | plain   |
//! | 4  | `NEWLINE`         | plain   |
//!
//! `INDENT`, `DEDENT` and `NEWLINE` only appear in token streams of grammars
//! that track indentation.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

/// Identifier of a token kind within a [`TokenGrammar`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TokenKind(u16);

impl TokenKind {
    /// End-of-input marker; always the last token of a stream.
    pub const TERMINATION: TokenKind = TokenKind(0);
    /// Input the scanner could not match.
    pub const LEXING_FAILURE: TokenKind = TokenKind(1);
    /// Synthesized when a line starts deeper than the enclosing block.
    pub const INDENT: TokenKind = TokenKind(2);
    /// Synthesized when a line closes one indentation level.
    pub const DEDENT: TokenKind = TokenKind(3);
    /// Line break, significant when indentation is tracked.
    pub const NEWLINE: TokenKind = TokenKind(4);

    /// Number of reserved kinds at the start of every grammar.
    pub const RESERVED_COUNT: u16 = 5;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        TokenKind(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenKind({})", self.0)
    }
}

/// How the stream builder treats tokens of a kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KindClass {
    /// Kept in the token stream with span and location only.
    #[default]
    Plain,
    /// Kept in the token stream; its text is canonicalized and interned.
    Symbol,
    /// Excluded from the token stream, stored as trivia.
    Trivia,
}

bitflags::bitflags! {
    /// Layout behavior attached to a token kind.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayoutFlags: u8 {
        /// Opens an ignore-layout region (e.g. `(`).
        const STARTS_IGNORE = 1 << 0;
        /// Closes an ignore-layout region (e.g. `)`).
        const ENDS_IGNORE = 1 << 1;
    }
}

/// Static description of one token kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindInfo {
    pub name: String,
    pub literal: Option<String>,
    pub class: KindClass,
    pub layout: LayoutFlags,
}

/// Kinds playing fixed roles for grammar-driven scanners.
///
/// Scanners backed by generated DFA tables ignore these; the reference
/// scanner in `tess_lexer_core` reads them to know what to produce.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexicalRoles {
    pub identifier: Option<TokenKind>,
    pub number: Option<TokenKind>,
    pub string: Option<TokenKind>,
    pub whitespace: Option<TokenKind>,
    pub line_comment: Option<(String, TokenKind)>,
}

/// Error raised while building a [`TokenGrammar`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("token kind name `{0}` is declared twice")]
    DuplicateName(String),
    #[error("literal `{literal}` is claimed by both `{first}` and `{second}`")]
    DuplicateLiteral {
        literal: String,
        first: String,
        second: String,
    },
    #[error("grammar declares {0} token kinds, more than fit in a u16")]
    TooManyKinds(usize),
    #[error("`{kind}` is used as the {role} role but is not a trivia kind")]
    RoleNotTrivia { kind: String, role: &'static str },
    #[error("line comment prefix must not be empty")]
    EmptyCommentPrefix,
}

/// Immutable token-kind table for one language.
#[derive(Clone, Debug)]
pub struct TokenGrammar {
    language: String,
    kinds: Vec<KindInfo>,
    literals: FxHashMap<String, TokenKind>,
    track_indent: bool,
    roles: LexicalRoles,
}

impl TokenGrammar {
    /// Start describing the token set of `language`.
    pub fn builder(language: impl Into<String>) -> TokenGrammarBuilder {
        TokenGrammarBuilder::new(language.into())
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether INDENT/DEDENT synthesis and NEWLINE tokens are enabled.
    pub fn track_indent(&self) -> bool {
        self.track_indent
    }

    pub fn roles(&self) -> &LexicalRoles {
        &self.roles
    }

    /// Number of declared kinds, reserved ones included.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always `false`: reserved kinds are present in every grammar.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        (0..self.kinds.len()).map(|i| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "build() rejects grammars with more than u16::MAX kinds"
            )]
            let raw = i as u16;
            TokenKind(raw)
        })
    }

    pub fn info(&self, kind: TokenKind) -> Option<&KindInfo> {
        self.kinds.get(kind.index())
    }

    /// Name of a kind, e.g. `"Identifier"`.
    pub fn kind_name(&self, kind: TokenKind) -> &str {
        self.info(kind).map_or("<invalid kind>", |info| info.name.as_str())
    }

    /// Fixed spelling of a kind, or `""` when it has none.
    pub fn kind_literal(&self, kind: TokenKind) -> &str {
        self.literal(kind).unwrap_or("")
    }

    pub fn literal(&self, kind: TokenKind) -> Option<&str> {
        self.info(kind).and_then(|info| info.literal.as_deref())
    }

    /// Rendering used in diagnostics: `'literal'` when the kind has a fixed
    /// spelling, its name otherwise.
    pub fn error_image(&self, kind: TokenKind) -> String {
        match self.literal(kind) {
            Some(lit) => format!("'{lit}'"),
            None => self.kind_name(kind).to_owned(),
        }
    }

    pub fn class(&self, kind: TokenKind) -> KindClass {
        self.info(kind).map_or(KindClass::Plain, |info| info.class)
    }

    #[inline]
    pub fn is_trivia(&self, kind: TokenKind) -> bool {
        self.class(kind) == KindClass::Trivia
    }

    #[inline]
    pub fn is_symbol_bearing(&self, kind: TokenKind) -> bool {
        self.class(kind) == KindClass::Symbol
    }

    fn layout(&self, kind: TokenKind) -> LayoutFlags {
        self.info(kind).map_or(LayoutFlags::empty(), |info| info.layout)
    }

    #[inline]
    pub fn starts_layout_ignore(&self, kind: TokenKind) -> bool {
        self.layout(kind).contains(LayoutFlags::STARTS_IGNORE)
    }

    #[inline]
    pub fn ends_layout_ignore(&self, kind: TokenKind) -> bool {
        self.layout(kind).contains(LayoutFlags::ENDS_IGNORE)
    }

    /// Find the kind whose fixed spelling is exactly `text`.
    pub fn lookup_literal(&self, text: &str) -> Option<TokenKind> {
        self.literals.get(text).copied()
    }

    /// All `(literal, kind)` pairs, in no particular order.
    pub fn literals(&self) -> impl Iterator<Item = (&str, TokenKind)> + '_ {
        self.literals.iter().map(|(lit, &kind)| (lit.as_str(), kind))
    }
}

/// Incremental description of a [`TokenGrammar`].
pub struct TokenGrammarBuilder {
    language: String,
    kinds: Vec<KindInfo>,
    track_indent: bool,
    roles: LexicalRoles,
}

impl TokenGrammarBuilder {
    fn new(language: String) -> Self {
        let reserved = [
            ("Termination", KindClass::Plain),
            ("Lexing_Failure", KindClass::Trivia),
            ("Indent", KindClass::Plain),
            ("Dedent", KindClass::Plain),
            ("Newline", KindClass::Plain),
        ];
        let kinds = reserved
            .into_iter()
            .map(|(name, class)| KindInfo {
                name: name.to_owned(),
                literal: None,
                class,
                layout: LayoutFlags::empty(),
            })
            .collect();
        Self {
            language,
            kinds,
            track_indent: false,
            roles: LexicalRoles::default(),
        }
    }

    /// Declare a kind and return its identifier.
    pub fn kind(
        &mut self,
        name: impl Into<String>,
        literal: Option<&str>,
        class: KindClass,
    ) -> TokenKind {
        let id = u16::try_from(self.kinds.len()).unwrap_or(u16::MAX);
        self.kinds.push(KindInfo {
            name: name.into(),
            literal: literal.map(str::to_owned),
            class,
            layout: LayoutFlags::empty(),
        });
        TokenKind(id)
    }

    /// Declare a plain kind without fixed spelling.
    pub fn plain(&mut self, name: impl Into<String>) -> TokenKind {
        self.kind(name, None, KindClass::Plain)
    }

    /// Declare a plain kind with a fixed spelling (keyword, punctuation).
    pub fn literal(&mut self, name: impl Into<String>, literal: &str) -> TokenKind {
        self.kind(name, Some(literal), KindClass::Plain)
    }

    /// Declare a symbol-bearing kind.
    pub fn symbol(&mut self, name: impl Into<String>) -> TokenKind {
        self.kind(name, None, KindClass::Symbol)
    }

    /// Declare a trivia kind.
    pub fn trivia(&mut self, name: impl Into<String>) -> TokenKind {
        self.kind(name, None, KindClass::Trivia)
    }

    /// Mark `open` as starting and `close` as ending an ignore-layout region.
    pub fn ignore_layout(&mut self, open: TokenKind, close: TokenKind) -> &mut Self {
        if let Some(info) = self.kinds.get_mut(open.index()) {
            info.layout |= LayoutFlags::STARTS_IGNORE;
        }
        if let Some(info) = self.kinds.get_mut(close.index()) {
            info.layout |= LayoutFlags::ENDS_IGNORE;
        }
        self
    }

    pub fn track_indent(&mut self, enabled: bool) -> &mut Self {
        self.track_indent = enabled;
        self
    }

    pub fn identifiers(&mut self, kind: TokenKind) -> &mut Self {
        self.roles.identifier = Some(kind);
        self
    }

    pub fn numbers(&mut self, kind: TokenKind) -> &mut Self {
        self.roles.number = Some(kind);
        self
    }

    pub fn strings(&mut self, kind: TokenKind) -> &mut Self {
        self.roles.string = Some(kind);
        self
    }

    pub fn whitespace(&mut self, kind: TokenKind) -> &mut Self {
        self.roles.whitespace = Some(kind);
        self
    }

    pub fn line_comments(&mut self, prefix: &str, kind: TokenKind) -> &mut Self {
        self.roles.line_comment = Some((prefix.to_owned(), kind));
        self
    }

    /// Validate and freeze the grammar.
    pub fn build(self) -> Result<TokenGrammar, GrammarError> {
        if self.kinds.len() > usize::from(u16::MAX) {
            return Err(GrammarError::TooManyKinds(self.kinds.len()));
        }

        let mut names: FxHashSet<&str> = FxHashSet::default();
        let mut literals: FxHashMap<String, TokenKind> = FxHashMap::default();
        for (i, info) in self.kinds.iter().enumerate() {
            if !names.insert(info.name.as_str()) {
                return Err(GrammarError::DuplicateName(info.name.clone()));
            }
            let Some(lit) = &info.literal else { continue };
            #[expect(
                clippy::cast_possible_truncation,
                reason = "kind count checked against u16::MAX above"
            )]
            let kind = TokenKind(i as u16);
            if let Some(prev) = literals.insert(lit.clone(), kind) {
                return Err(GrammarError::DuplicateLiteral {
                    literal: lit.clone(),
                    first: self.kinds[prev.index()].name.clone(),
                    second: info.name.clone(),
                });
            }
        }

        let class_of = |kind: TokenKind| {
            self.kinds
                .get(kind.index())
                .map_or(KindClass::Plain, |info| info.class)
        };
        let name_of = |kind: TokenKind| {
            self.kinds
                .get(kind.index())
                .map_or_else(String::new, |info| info.name.clone())
        };
        if let Some(ws) = self.roles.whitespace {
            if class_of(ws) != KindClass::Trivia {
                return Err(GrammarError::RoleNotTrivia {
                    kind: name_of(ws),
                    role: "whitespace",
                });
            }
        }
        if let Some((prefix, comment)) = &self.roles.line_comment {
            if prefix.is_empty() {
                return Err(GrammarError::EmptyCommentPrefix);
            }
            if class_of(*comment) != KindClass::Trivia {
                return Err(GrammarError::RoleNotTrivia {
                    kind: name_of(*comment),
                    role: "line comment",
                });
            }
        }

        Ok(TokenGrammar {
            language: self.language,
            kinds: self.kinds,
            literals,
            track_indent: self.track_indent,
            roles: self.roles,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

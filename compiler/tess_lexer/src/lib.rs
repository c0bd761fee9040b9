//! Token-stream construction for Tessera language front ends.
//!
//! # Architecture
//!
//! ```text
//! LexInput ─▶ decode ─▶ DecodedBuffer ─▶ Scanner ─▶ classifier ─▶ [indentation] ─▶ TokenDataHandler
//!                                                        └──────▶ Vec<Diagnostic>
//! ```
//!
//! - Decoding and raw scanning live in `tess_lexer_core`.
//! - The driver classifies raw tokens by their [`KindClass`]: trivia go to a
//!   side vector linked to the token they precede, symbol-bearing tokens are
//!   interned, and with indentation tracking on, `INDENT` / `DEDENT` tokens
//!   are synthesized from line-leading columns.
//! - Fatal problems (undecodable input, unreadable file, runaway
//!   indentation) are [`LexError`]s. Everything else is a [`Diagnostic`].
//!
//! # Example
//!
//! ```
//! use tess_ir::TokenGrammar;
//! use tess_lexer::{lex, BasicScannerFactory, Interning, LexInput, LexOptions};
//!
//! let mut b = TokenGrammar::builder("Calc");
//! let ident = b.symbol("Identifier");
//! let ws = b.trivia("Whitespace");
//! b.literal("Plus", "+");
//! b.identifiers(ident).whitespace(ws);
//! let grammar = b.build().unwrap();
//!
//! let factory = BasicScannerFactory::new(&grammar);
//! let (handler, diagnostics) = lex(
//!     LexInput::Text("a + b"),
//!     &grammar,
//!     &factory,
//!     Interning::default(),
//!     &LexOptions::default(),
//! )
//! .unwrap();
//! assert!(diagnostics.is_empty());
//! assert_eq!(handler.len(), 4);
//! ```
//!
//! [`KindClass`]: tess_ir::KindClass

mod driver;
mod error;
mod handler;
mod indent;
mod options;
mod symbols;

use std::path::Path;
use std::sync::Once;

use tess_ir::{Diagnostic, TokenGrammar, TokenKind};
use tess_lexer_core::{decode, decode_text, DecodedBuffer, ScannerFactory, ScannerHandle};

pub use error::LexError;
pub use handler::{LeadingTrivia, TokenDataHandler, TokenRef};
pub use options::LexOptions;
pub use symbols::{Interning, SymbolizeError};
pub use tess_lexer_core::{BasicScanner, BasicScannerFactory, DecodeError};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for lexer diagnostics.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Source of one analysis unit.
#[derive(Copy, Clone, Debug)]
pub enum LexInput<'a> {
    /// Encoded bytes, decoded with [`LexOptions::charset`].
    Bytes(&'a [u8]),
    /// Text that is already decoded. Charset and BOM options are ignored.
    Text(&'a str),
    /// File read whole, then decoded like [`LexInput::Bytes`].
    File(&'a Path),
}

impl LexInput<'_> {
    fn decode(self, options: &LexOptions) -> Result<DecodedBuffer, LexError> {
        match self {
            LexInput::Bytes(bytes) => Ok(decode(bytes, &options.charset, options.read_bom)?),
            LexInput::Text(text) => Ok(decode_text(text)?),
            LexInput::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| LexError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(decode(&bytes, &options.charset, options.read_bom)?)
            }
        }
    }
}

/// Lex one unit into a fresh handler.
pub fn lex<F: ScannerFactory>(
    input: LexInput<'_>,
    grammar: &TokenGrammar,
    scanner_factory: &F,
    interning: Interning,
    options: &LexOptions,
) -> Result<(TokenDataHandler, Vec<Diagnostic>), LexError> {
    let mut handler = TokenDataHandler::new(interning);
    let diagnostics = lex_into(&mut handler, input, grammar, scanner_factory, options)?;
    Ok((handler, diagnostics))
}

/// Re-lex a unit, replacing everything `handler` held.
///
/// On error the handler is left empty.
#[tracing::instrument(level = "debug", skip_all, fields(language = grammar.language()))]
pub fn lex_into<F: ScannerFactory>(
    handler: &mut TokenDataHandler,
    input: LexInput<'_>,
    grammar: &TokenGrammar,
    scanner_factory: &F,
    options: &LexOptions,
) -> Result<Vec<Diagnostic>, LexError> {
    handler.reset();

    let buffer = input.decode(options)?;
    let mut stream = {
        let scanner = ScannerHandle::new(scanner_factory.open(&buffer, options.scan_settings()));
        driver::build_stream(scanner, &buffer, grammar, handler.interning(), options)?
    };
    let diagnostics = std::mem::take(&mut stream.diagnostics);
    handler.install(buffer, stream);
    Ok(diagnostics)
}

/// Name of `kind` in `grammar`.
pub fn token_kind_name(grammar: &TokenGrammar, kind: TokenKind) -> &str {
    grammar.kind_name(kind)
}

/// Fixed spelling of `kind`, or `""` when it has none.
pub fn token_kind_literal(grammar: &TokenGrammar, kind: TokenKind) -> &str {
    grammar.kind_literal(kind)
}

/// Text naming `kind` in error messages: `'literal'` or the kind name.
pub fn token_error_image(grammar: &TokenGrammar, kind: TokenKind) -> String {
    grammar.error_image(kind)
}

//! Fatal lexing errors.
//!
//! Anything that still allows a token stream to be built is reported as a
//! [`Diagnostic`](tess_ir::Diagnostic) instead.

use std::io;
use std::path::PathBuf;

use tess_lexer_core::DecodeError;

/// Error that aborts a lex pass. No token stream is produced.
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("indentation deeper than {depth} levels at line {line}")]
    IndentDepthExceeded { depth: usize, line: u32 },
}

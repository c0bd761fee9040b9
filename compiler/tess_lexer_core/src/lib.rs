//! Source decoding and raw scanning for the Tessera lexer.
//!
//! # Architecture
//!
//! ```text
//! bytes ──decode──▶ DecodedBuffer ──ScannerFactory::open──▶ Scanner ──▶ RawToken*
//! ```
//!
//! - [`decode`] resolves the charset (a byte-order mark wins over the
//!   requested name) and builds a sentinel-padded code-point buffer.
//! - [`Scanner`] / [`ScannerFactory`] are the contract the lexer driver
//!   consumes. Any scanner that honors it can be plugged in.
//! - [`BasicScanner`] is the grammar-driven reference implementation.

mod basic_scanner;
mod charset;
mod cursor;
mod decoded_buffer;
mod scanner;

pub use basic_scanner::{BasicScanner, BasicScannerFactory};
pub use charset::{sniff_bom, Charset, CodePointDecoder, Malformed};
pub use cursor::Cursor;
pub use decoded_buffer::{decode, decode_text, DecodeError, DecodedBuffer, LEADING_SENTINELS};
pub use scanner::{RawToken, ScanSettings, Scanner, ScannerFactory, ScannerHandle};

//! Error types for TER decoding and import.

use thiserror::Error;

/// Errors produced while reading or decoding a TER file.
///
/// Decoding never returns a partial record: any of these aborts the whole
/// decode.
#[derive(Debug, Error)]
pub enum TerError {
    /// The byte stream ended before a mandatory field was fully read.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Length-prefixed text held a byte with no Windows-1252 mapping.
    #[error("byte 0x{byte:02X} at offset {offset} is not valid Windows-1252 text")]
    TextDecode { offset: usize, byte: u8 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TerResult<T> = Result<T, TerError>;

//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("memory allocation failed")]
    AllocationFailure,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wrong file format: {0}")]
    Format(String),

    #[error("encoded data is too short")]
    Truncated,

    #[error("input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("input changed between passes: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("can't find node in Huffman tree with byte {0}")]
    MissingSymbol(u8),

    #[error("configuration error: {0}")]
    Config(String),
}

impl HuffError {
    /// Maps an unexpected end of stream to [`HuffError::Truncated`], leaving
    /// every other I/O failure as is.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            HuffError::Truncated
        } else {
            HuffError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;

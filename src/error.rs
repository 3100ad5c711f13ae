//! The error module defines the single error type used by every stage of blockhuff.
//!
//! All of these are unrecoverable for the current call. Nothing is retried, and no partial
//! output is written when one of them surfaces.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HcError {
    /// The text or compressed artifact to read does not exist.
    #[error("Source not found: {0}")]
    MissingSource(String),

    /// Empty text, fewer than two distinct symbols, or a parameter out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The serialized tree is truncated, malformed, or holds an undecodable leaf payload.
    #[error("Corrupt tree: {0}")]
    CorruptTree(String),

    /// The payload ran out of bits in the middle of a code word.
    #[error("Bitstream underflow: {0}")]
    BitstreamUnderflow(String),

    /// Self-check failure. Decoded output differs from the original.
    #[error("Round trip mismatch at byte {position}")]
    RoundTripMismatch { position: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HcError>;

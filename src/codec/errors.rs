//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Record codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A field is too long for its 16-bit length prefix.
    ///
    /// Nothing is written when this is returned; the caller must shorten
    /// the field rather than rely on truncation.
    #[error("{field} is {len} bytes, exceeding the 16-bit length limit of 65535")]
    FieldTooLarge {
        /// Which field overflowed ("name" or "password")
        field: &'static str,
        /// Actual byte length of the offending field
        len: usize,
    },

    /// A stored buffer failed structural validation during decode.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

//! # Entry Store Errors

use thiserror::Error;

use super::entry::AccountId;
use crate::codec::CodecError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Entry store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted account has no table row at all.
    ///
    /// Distinct from the non-fatal "name not found in an existing account"
    /// outcome, which lookup operations report through their return value.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// A record buffer failed to encode or decode
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Table I/O failure
    #[error("table I/O error: {0}")]
    Io(String),

    /// A record or row is too large for the table format's u32 framing
    /// fields. Unreachable through the entry store, whose codec caps record
    /// sizes far lower, but the table trait accepts arbitrary rows.
    #[error("{0} bytes exceeds the table's u32 framing limit")]
    FrameTooLarge(usize),

    /// The table file failed structural or checksum validation at load.
    ///
    /// Corruption is never ignored: the open aborts rather than serving a
    /// partially readable table.
    #[error("table corrupted: {0}")]
    Corrupted(String),
}

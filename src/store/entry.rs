//! Account table row type

/// A 64-bit account identifier, the primary key of the entry table
pub type AccountId = u64;

/// One table row: an account and its ordered record sequence.
///
/// Created on the first `add` for an account and never removed as a whole;
/// deleting the last record leaves the row present with an empty sequence.
/// Record buffers are immutable once appended (updates are modeled as
/// append, never in-place edits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    /// Owning account (primary key, unique per table)
    pub account_id: AccountId,
    /// Encoded record buffers in insertion order
    pub records: Vec<Vec<u8>>,
}

impl AccountEntry {
    /// Create an empty row for an account
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            records: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_empty() {
        let entry = AccountEntry::new(7);
        assert_eq!(entry.account_id, 7);
        assert!(entry.records.is_empty());
    }
}

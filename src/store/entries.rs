//! Entry store operations
//!
//! The four operations over a per-account record sequence: add, find, delete,
//! list. The host that invokes them is responsible for authenticating the
//! caller as the account owner and for wrapping each call in whatever
//! transaction its table implementation needs; the logic here is purely
//! sequential with no partial mutation on failure.
//!
//! Duplicate names are allowed by `add` and resolved to the first match in
//! sequence order by every lookup. This mirrors the historical table
//! contents: a sequence may legitimately hold several records under one
//! name, and only the earliest is reachable until it is deleted.

use tracing::{debug, info};

use super::entry::{AccountEntry, AccountId};
use super::errors::{StoreError, StoreResult};
use super::table::EntryTable;
use crate::codec::{peek_name, PasswordRecord};

/// Outcome of a `delete` call on an existing account.
///
/// `NotFound` is a query result, not an error: the account row exists but
/// holds no record under the requested name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The first matching record was removed
    Deleted,
    /// No record matched the name; nothing changed
    NotFound,
}

/// CRUD operations over per-account record sequences.
///
/// Owns its table handle exclusively; no other component mutates rows.
#[derive(Debug)]
pub struct EntryStore {
    table: Box<dyn EntryTable>,
}

impl EntryStore {
    /// Create a store over the given table
    pub fn new(table: Box<dyn EntryTable>) -> Self {
        Self { table }
    }

    /// Append a (name, password) record to an account's sequence.
    ///
    /// Creates the account row on first use. Performs no duplicate-name
    /// check; see the module docs for the first-match rule.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if either field exceeds the 16-bit
    /// length limit. Nothing is written on failure.
    pub fn add(&self, account_id: AccountId, name: &[u8], password: &[u8]) -> StoreResult<()> {
        let buf = PasswordRecord::new(name, password).encode()?;

        let mut entry = match self.table.get(account_id)? {
            Some(entry) => {
                debug!(account_id, "appending to existing account row");
                entry
            }
            None => {
                debug!(account_id, "creating account row");
                AccountEntry::new(account_id)
            }
        };
        entry.records.push(buf);
        self.table.put(&entry)?;
        info!(account_id, record_count = entry.records.len(), "record added");
        Ok(())
    }

    /// Find the first record whose name matches, in sequence order.
    ///
    /// Returns `Ok(None)` when the account exists but holds no matching
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountNotFound` if the account has no row at
    /// all, and `StoreError::Codec` if a stored buffer is malformed.
    pub fn find_by_name(
        &self,
        account_id: AccountId,
        name: &[u8],
    ) -> StoreResult<Option<PasswordRecord>> {
        let entry = self.require_entry(account_id)?;
        for buf in &entry.records {
            if peek_name(buf)? == name {
                return Ok(Some(PasswordRecord::decode(buf)?));
            }
        }
        Ok(None)
    }

    /// Remove the first record whose name matches, preserving the relative
    /// order of the remaining records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountNotFound` if the account has no row.
    pub fn delete(&self, account_id: AccountId, name: &[u8]) -> StoreResult<DeleteOutcome> {
        let mut entry = self.require_entry(account_id)?;

        let mut matched = None;
        for (pos, buf) in entry.records.iter().enumerate() {
            if peek_name(buf)? == name {
                matched = Some(pos);
                break;
            }
        }

        match matched {
            Some(pos) => {
                entry.records.remove(pos);
                self.table.put(&entry)?;
                info!(account_id, position = pos, "record deleted");
                Ok(DeleteOutcome::Deleted)
            }
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    /// Decode every record for an account, in stored order.
    ///
    /// An account whose records have all been deleted still lists
    /// successfully, as an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountNotFound` if the account has no row.
    pub fn list(&self, account_id: AccountId) -> StoreResult<Vec<PasswordRecord>> {
        let entry = self.require_entry(account_id)?;
        entry
            .records
            .iter()
            .map(|buf| PasswordRecord::decode(buf).map_err(StoreError::from))
            .collect()
    }

    /// Fetch an account row or fail with `AccountNotFound`
    fn require_entry(&self, account_id: AccountId) -> StoreResult<AccountEntry> {
        self.table
            .get(account_id)?
            .ok_or(StoreError::AccountNotFound(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::table::MemoryTable;

    fn store() -> EntryStore {
        EntryStore::new(Box::new(MemoryTable::new()))
    }

    #[test]
    fn test_add_creates_row_on_first_use() {
        let store = store();
        store.add(1, b"site", b"pw").unwrap();
        assert_eq!(store.list(1).unwrap().len(), 1);
    }

    #[test]
    fn test_find_on_missing_account_fails() {
        let store = store();
        let err = store.find_by_name(99, b"site").unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound(99)));
    }

    #[test]
    fn test_find_missing_name_is_none_not_error() {
        let store = store();
        store.add(1, b"site", b"pw").unwrap();
        assert!(store.find_by_name(1, b"other").unwrap().is_none());
    }

    #[test]
    fn test_oversized_field_adds_nothing() {
        let store = store();
        store.add(1, b"site", b"pw").unwrap();
        let big = vec![b'x'; 70_000];
        let err = store.add(1, b"site2", &big).unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
        assert_eq!(store.list(1).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_name_is_outcome_not_error() {
        let store = store();
        store.add(1, b"site", b"pw").unwrap();
        assert_eq!(store.delete(1, b"other").unwrap(), DeleteOutcome::NotFound);
        assert_eq!(store.list(1).unwrap().len(), 1);
    }
}

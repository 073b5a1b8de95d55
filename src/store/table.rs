//! # Entry Table Trait
//!
//! The keyed repository behind the entry store: account_id → table row.
//! The store owns exactly one table handle; all persistence goes through
//! this seam so tests can run on an in-memory map while production uses
//! the durable file table.

use std::collections::HashMap;
use std::sync::RwLock;

use super::entry::{AccountEntry, AccountId};
use super::errors::StoreResult;

/// Trait for keyed account-entry storage
pub trait EntryTable: Send + Sync + std::fmt::Debug {
    /// Fetch the row for an account, if one exists
    fn get(&self, account_id: AccountId) -> StoreResult<Option<AccountEntry>>;

    /// Insert or replace the row for `entry.account_id`
    fn put(&self, entry: &AccountEntry) -> StoreResult<()>;

    /// List every account that has a row, in unspecified order
    fn account_ids(&self) -> StoreResult<Vec<AccountId>>;
}

/// In-memory entry table for tests and ephemeral use
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: RwLock<HashMap<AccountId, AccountEntry>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryTable for MemoryTable {
    fn get(&self, account_id: AccountId) -> StoreResult<Option<AccountEntry>> {
        Ok(self.rows.read().unwrap().get(&account_id).cloned())
    }

    fn put(&self, entry: &AccountEntry) -> StoreResult<()> {
        self.rows
            .write()
            .unwrap()
            .insert(entry.account_id, entry.clone());
        Ok(())
    }

    fn account_ids(&self) -> StoreResult<Vec<AccountId>> {
        Ok(self.rows.read().unwrap().keys().copied().collect())
    }
}

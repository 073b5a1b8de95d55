//! Entry Store subsystem for passbook
//!
//! Maps each account to its ordered sequence of encoded password records
//! and exposes the add / find / delete / list operations over it.
//!
//! # Design Principles
//!
//! - One table row per account, keyed by the 64-bit account id
//! - Record sequences are append-only; deletion is positional removal
//! - First match in sequence order wins for every lookup
//! - Rows outlive their last record (empty sequences persist)
//! - All persistence goes through the `EntryTable` seam
//!
//! Caller authentication and transactional atomicity belong to the host
//! driving the store, not to this module.

mod checksum;
mod entries;
mod entry;
mod errors;
mod file_table;
mod table;

pub use entries::{DeleteOutcome, EntryStore};
pub use entry::{AccountEntry, AccountId};
pub use errors::{StoreError, StoreResult};
pub use file_table::FileTable;
pub use table::{EntryTable, MemoryTable};

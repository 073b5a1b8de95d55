//! passbook - a per-account password-entry store
//!
//! Each account owns an ordered list of (name, password) records, packed
//! into a length-prefixed binary format and kept in a keyed table.

pub mod cli;
pub mod codec;
pub mod store;

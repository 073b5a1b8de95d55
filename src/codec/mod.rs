//! Record Codec for passbook
//!
//! Packs one (name, password) pair into a self-describing byte buffer and
//! back. The wire format is fixed (see `record`) and must stay
//! byte-compatible with previously persisted data.
//!
//! # Design Principles
//!
//! - Every length prefix is bounds-checked before slicing
//! - Oversized fields are rejected, never truncated
//! - Decoding produces owned values; no references escape into the buffer
//!   except through the explicit `peek_name` scan helper

mod errors;
mod record;

pub use errors::{CodecError, CodecResult};
pub use record::{peek_name, PasswordRecord};

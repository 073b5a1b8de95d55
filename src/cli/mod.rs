//! CLI module for passbook
//!
//! The local harness driving the entry store:
//! - add: store a new entry under an account
//! - get: look up the first entry matching a name
//! - del: delete the first entry matching a name
//! - list: print every entry stored under an account

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command, EXIT_NOT_FOUND, EXIT_OK};
pub use errors::{CliError, CliResult};

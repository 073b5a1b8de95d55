//! CLI argument definitions using clap
//!
//! Commands:
//! - passbook add <account_id> <name> <password>
//! - passbook get <account_id> <name>
//! - passbook del <account_id> <name>
//! - passbook list <account_id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// passbook - a per-account password-entry store
#[derive(Parser, Debug)]
#[command(name = "passbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the entry table file
    #[arg(long, default_value = "./passbook.tbl")]
    pub table: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a new entry under an account
    Add {
        /// Owning account identifier
        account_id: u64,
        /// Entry name
        name: String,
        /// Password value
        password: String,
    },

    /// Look up the first entry matching a name
    Get {
        /// Owning account identifier
        account_id: u64,
        /// Entry name
        name: String,
        /// Emit the entry as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Delete the first entry matching a name
    Del {
        /// Owning account identifier
        account_id: u64,
        /// Entry name
        name: String,
    },

    /// List every entry stored under an account
    List {
        /// Owning account identifier
        account_id: u64,
        /// Emit entries as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

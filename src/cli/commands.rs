//! CLI command implementations
//!
//! Each command opens the durable table, runs one entry-store operation,
//! and prints the result. Not-found outcomes are reported on stdout and
//! through the exit code; only genuine failures go through `CliError`.
//!
//! In the deployed system the host runtime authenticates the caller as the
//! account owner before an operation runs. A local CLI has no such layer:
//! whoever can read the table file is the owner.

use serde::Serialize;

use crate::codec::PasswordRecord;
use crate::store::{DeleteOutcome, EntryStore, FileTable};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Exit code for a clean run
pub const EXIT_OK: i32 = 0;
/// Exit code for a non-fatal not-found outcome
pub const EXIT_NOT_FOUND: i32 = 2;

/// JSON shape of one rendered entry
#[derive(Debug, Serialize)]
struct RenderedEntry {
    name: String,
    password: String,
}

impl From<&PasswordRecord> for RenderedEntry {
    fn from(record: &PasswordRecord) -> Self {
        Self {
            name: render_bytes(&record.name),
            password: render_bytes(&record.password),
        }
    }
}

/// Parse arguments, set up logging, and run the requested command.
///
/// Returns the process exit code on success; hard failures surface as
/// `CliError` and are printed by `main`.
pub fn run() -> CliResult<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let table = FileTable::open(&cli.table)?;
    let store = EntryStore::new(Box::new(table));
    run_command(&store, &cli.command)
}

/// Dispatch one command against an already-opened store
pub fn run_command(store: &EntryStore, command: &Command) -> CliResult<i32> {
    match command {
        Command::Add {
            account_id,
            name,
            password,
        } => {
            store.add(*account_id, name.as_bytes(), password.as_bytes())?;
            println!("Stored \"{}\"", name);
            Ok(EXIT_OK)
        }

        Command::Get {
            account_id,
            name,
            json,
        } => match store.find_by_name(*account_id, name.as_bytes())? {
            Some(record) => {
                print_records(std::slice::from_ref(&record), *json)?;
                Ok(EXIT_OK)
            }
            None => {
                println!("Entry not found: \"{}\"", name);
                Ok(EXIT_NOT_FOUND)
            }
        },

        Command::Del { account_id, name } => {
            match store.delete(*account_id, name.as_bytes())? {
                DeleteOutcome::Deleted => {
                    println!("Deleted \"{}\"", name);
                    Ok(EXIT_OK)
                }
                DeleteOutcome::NotFound => {
                    println!("Entry not found: \"{}\"", name);
                    Ok(EXIT_NOT_FOUND)
                }
            }
        }

        Command::List { account_id, json } => {
            let records = store.list(*account_id)?;
            print_records(&records, *json)?;
            Ok(EXIT_OK)
        }
    }
}

/// Print records as plain text or as a JSON array
fn print_records(records: &[PasswordRecord], json: bool) -> CliResult<()> {
    if json {
        let rendered: Vec<RenderedEntry> = records.iter().map(RenderedEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for record in records {
            println!(
                "Name: {}, Password: {}",
                render_bytes(&record.name),
                render_bytes(&record.password)
            );
        }
    }
    Ok(())
}

/// Render field bytes as UTF-8 when possible, hex otherwise.
///
/// Field content is arbitrary bytes; lookups compare raw bytes, so this
/// is display-only and lossless round-trips are not required here.
fn render_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
    }
}

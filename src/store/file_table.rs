//! Durable single-file entry table
//!
//! One row per account, the whole table rewritten atomically on every
//! mutation (write to a temp file, fsync, rename). The table is small by
//! nature, so a full snapshot beats the bookkeeping of an append log.
//!
//! File layout:
//!
//! ```text
//! +------------------+
//! | Magic            | (u32 LE = 0x50574254, "TBWP")
//! +------------------+
//! | Format Version   | (u16 LE = 1)
//! +------------------+
//! | Row*             |
//! +------------------+
//!
//! Row:
//! +------------------+
//! | Row Length       | (u32 LE, bytes after this field)
//! +------------------+
//! | Account ID       | (u64 LE)
//! +------------------+
//! | Record Count     | (u32 LE)
//! +------------------+
//! | Record*          | (u32 LE length + bytes, wire format per codec)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over Account ID .. last record byte)
//! +------------------+
//! ```
//!
//! The record buffers inside a row are the codec's length-prefixed wire
//! format, stored verbatim for compatibility with previously written data.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::checksum::{compute_checksum, verify_checksum};
use super::entry::{AccountEntry, AccountId};
use super::errors::{StoreError, StoreResult};
use super::table::EntryTable;

const TABLE_MAGIC: u32 = 0x5057_4254;
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2;

/// Minimum row body: account_id + record_count + checksum
const MIN_ROW_LEN: usize = 8 + 4 + 4;

/// Durable entry table backed by a single snapshot file.
///
/// The full table is loaded at open and held in memory; every `put`
/// rewrites the file. A missing file opens as an empty table.
#[derive(Debug)]
pub struct FileTable {
    path: PathBuf,
    rows: RwLock<HashMap<AccountId, AccountEntry>>,
}

impl FileTable {
    /// Open the table file at `path`, creating an empty table if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on filesystem failure and
    /// `StoreError::Corrupted` if the file fails structural or checksum
    /// validation. A corrupted table is never partially served.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = match fs::read(&path) {
            Ok(data) => parse_table(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "failed to read table file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            path,
            rows: RwLock::new(rows),
        })
    }

    /// Serialize the current rows and atomically replace the table file.
    fn persist(&self, rows: &HashMap<AccountId, AccountEntry>) -> StoreResult<()> {
        let mut ids: Vec<AccountId> = rows.keys().copied().collect();
        ids.sort_unstable();

        let mut data = Vec::with_capacity(HEADER_LEN);
        data.extend_from_slice(&TABLE_MAGIC.to_le_bytes());
        data.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        for id in ids {
            serialize_row(&rows[&id], &mut data)?;
        }

        let tmp_path = self.path.with_extension("tbl.tmp");
        let io_err = |what: &str, e: std::io::Error| {
            StoreError::Io(format!("{} {}: {}", what, tmp_path.display(), e))
        };

        fs::write(&tmp_path, &data).map_err(|e| io_err("failed to write", e))?;
        let tmp = fs::File::open(&tmp_path).map_err(|e| io_err("failed to reopen", e))?;
        tmp.sync_all().map_err(|e| io_err("failed to sync", e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            StoreError::Io(format!(
                "failed to rename {} to {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            ))
        })
    }
}

impl EntryTable for FileTable {
    fn get(&self, account_id: AccountId) -> StoreResult<Option<AccountEntry>> {
        Ok(self.rows.read().unwrap().get(&account_id).cloned())
    }

    fn put(&self, entry: &AccountEntry) -> StoreResult<()> {
        let mut rows = self.rows.write().unwrap();
        let previous = rows.insert(entry.account_id, entry.clone());
        if let Err(e) = self.persist(&rows) {
            // A failed write must not leave this handle serving rows the
            // file never received.
            match previous {
                Some(prev) => rows.insert(entry.account_id, prev),
                None => rows.remove(&entry.account_id),
            };
            return Err(e);
        }
        Ok(())
    }

    fn account_ids(&self) -> StoreResult<Vec<AccountId>> {
        Ok(self.rows.read().unwrap().keys().copied().collect())
    }
}

/// Serialize one row into `out`
fn serialize_row(entry: &AccountEntry, out: &mut Vec<u8>) -> StoreResult<()> {
    let mut body = Vec::with_capacity(MIN_ROW_LEN);
    body.extend_from_slice(&entry.account_id.to_le_bytes());
    body.extend_from_slice(&framed_len(entry.records.len())?.to_le_bytes());
    for record in &entry.records {
        body.extend_from_slice(&framed_len(record.len())?.to_le_bytes());
        body.extend_from_slice(record);
    }
    let checksum = compute_checksum(&body);
    body.extend_from_slice(&checksum.to_le_bytes());

    out.extend_from_slice(&framed_len(body.len())?.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(())
}

/// Check a length against the row format's u32 framing fields.
///
/// Records arriving through the entry store are capped far below this by
/// the codec's 16-bit prefixes, but `put` accepts arbitrary rows; a plain
/// cast would wrap and write a frame that parses as garbage.
fn framed_len(len: usize) -> StoreResult<u32> {
    u32::try_from(len).map_err(|_| StoreError::FrameTooLarge(len))
}

/// Parse and validate a complete table file
fn parse_table(data: &[u8]) -> StoreResult<HashMap<AccountId, AccountEntry>> {
    if data.len() < HEADER_LEN {
        return Err(StoreError::Corrupted(format!(
            "file shorter than {}-byte header",
            HEADER_LEN
        )));
    }
    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != TABLE_MAGIC {
        return Err(StoreError::Corrupted(format!(
            "bad magic {:08x}, expected {:08x}",
            magic, TABLE_MAGIC
        )));
    }
    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != FORMAT_VERSION {
        return Err(StoreError::Corrupted(format!(
            "unsupported format version {}",
            version
        )));
    }

    let mut rows = HashMap::new();
    let mut cursor = HEADER_LEN;
    while cursor < data.len() {
        let (entry, consumed) = parse_row(&data[cursor..], cursor)?;
        if rows.insert(entry.account_id, entry).is_some() {
            return Err(StoreError::Corrupted(format!(
                "duplicate row at offset {}",
                cursor
            )));
        }
        cursor += consumed;
    }
    Ok(rows)
}

/// Parse one row; returns the entry and the bytes consumed.
///
/// `offset` is the row's position in the file, for error context only.
fn parse_row(data: &[u8], offset: usize) -> StoreResult<(AccountEntry, usize)> {
    let corrupt =
        |reason: String| StoreError::Corrupted(format!("row at offset {}: {}", offset, reason));

    if data.len() < 4 {
        return Err(corrupt("truncated row length".into()));
    }
    let row_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if row_len < MIN_ROW_LEN {
        return Err(corrupt(format!("row length {} below minimum", row_len)));
    }
    if data.len() < 4 + row_len {
        return Err(corrupt(format!(
            "row length {} overruns file ({} bytes remain)",
            row_len,
            data.len() - 4
        )));
    }

    let body = &data[4..4 + row_len];
    let checksum_offset = row_len - 4;
    let stored_checksum = u32::from_le_bytes([
        body[checksum_offset],
        body[checksum_offset + 1],
        body[checksum_offset + 2],
        body[checksum_offset + 3],
    ]);
    let checked = &body[..checksum_offset];
    if !verify_checksum(checked, stored_checksum) {
        return Err(corrupt(format!(
            "checksum mismatch: computed {:08x}, stored {:08x}",
            compute_checksum(checked),
            stored_checksum
        )));
    }

    let account_id = u64::from_le_bytes([
        body[0], body[1], body[2], body[3], body[4], body[5], body[6], body[7],
    ]);
    let record_count =
        u32::from_le_bytes([body[8], body[9], body[10], body[11]]) as usize;

    let mut records = Vec::with_capacity(record_count);
    let mut pos = 12;
    for i in 0..record_count {
        if checked.len() < pos + 4 {
            return Err(corrupt(format!("truncated length prefix of record {}", i)));
        }
        let len = u32::from_le_bytes([
            checked[pos],
            checked[pos + 1],
            checked[pos + 2],
            checked[pos + 3],
        ]) as usize;
        pos += 4;
        if checked.len() < pos + len {
            return Err(corrupt(format!(
                "record {} length {} overruns row",
                i, len
            )));
        }
        records.push(checked[pos..pos + len].to_vec());
        pos += len;
    }
    if pos != checked.len() {
        return Err(corrupt(format!(
            "{} stray bytes after last record",
            checked.len() - pos
        )));
    }

    Ok((
        AccountEntry {
            account_id,
            records,
        },
        4 + row_len,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_path(dir: &TempDir) -> PathBuf {
        dir.path().join("passbook.tbl")
    }

    fn sample_entry(account_id: AccountId) -> AccountEntry {
        let mut entry = AccountEntry::new(account_id);
        entry.records.push(vec![0, 1, b'a', 0, 2, b'p', b'w']);
        entry.records.push(vec![0, 1, b'b', 0, 0]);
        entry
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let table = FileTable::open(table_path(&dir)).unwrap();
        assert!(table.account_ids().unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_across_reopen() {
        let dir = TempDir::new().unwrap();
        let entry = sample_entry(42);
        {
            let table = FileTable::open(table_path(&dir)).unwrap();
            table.put(&entry).unwrap();
        }
        let table = FileTable::open(table_path(&dir)).unwrap();
        assert_eq!(table.get(42).unwrap().unwrap(), entry);
    }

    #[test]
    fn test_empty_row_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let table = FileTable::open(table_path(&dir)).unwrap();
            table.put(&AccountEntry::new(7)).unwrap();
        }
        let table = FileTable::open(table_path(&dir)).unwrap();
        let row = table.get(7).unwrap().unwrap();
        assert!(row.records.is_empty());
    }

    #[test]
    fn test_multiple_rows_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let table = FileTable::open(table_path(&dir)).unwrap();
            table.put(&sample_entry(1)).unwrap();
            table.put(&sample_entry(2)).unwrap();
            table.put(&AccountEntry::new(3)).unwrap();
        }
        let table = FileTable::open(table_path(&dir)).unwrap();
        let mut ids = table.account_ids().unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_corruption_detected_at_open() {
        let dir = TempDir::new().unwrap();
        let path = table_path(&dir);
        {
            let table = FileTable::open(&path).unwrap();
            table.put(&sample_entry(42)).unwrap();
        }

        let mut contents = fs::read(&path).unwrap();
        let mid = HEADER_LEN + (contents.len() - HEADER_LEN) / 2;
        contents[mid] ^= 0xFF;
        fs::write(&path, contents).unwrap();

        let err = FileTable::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)), "got {:?}", err);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = TempDir::new().unwrap();
        let path = table_path(&dir);
        fs::write(&path, [0xDE, 0xAD, 0xBE, 0xEF, 1, 0]).unwrap();
        let err = FileTable::open(&path).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = table_path(&dir);
        {
            let table = FileTable::open(&path).unwrap();
            table.put(&sample_entry(42)).unwrap();
        }

        let contents = fs::read(&path).unwrap();
        fs::write(&path, &contents[..contents.len() - 3]).unwrap();

        let err = FileTable::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }

    #[test]
    fn test_failed_persist_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let table = FileTable::open(sub.join("passbook.tbl")).unwrap();
        table.put(&sample_entry(1)).unwrap();

        // Every write from here on fails
        fs::remove_dir_all(&sub).unwrap();

        let err = table.put(&sample_entry(9)).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)), "got {:?}", err);
        // The row the file never received is not served from memory either
        assert!(table.get(9).unwrap().is_none());

        // A failed update keeps the previously persisted row
        let mut changed = sample_entry(1);
        changed.records.push(vec![0, 1, b'c', 0, 0]);
        assert!(table.put(&changed).is_err());
        assert_eq!(table.get(1).unwrap().unwrap(), sample_entry(1));
    }

    #[test]
    fn test_oversized_frame_rejected_not_truncated() {
        let too_big = u32::MAX as usize + 1;
        assert!(matches!(
            framed_len(too_big),
            Err(StoreError::FrameTooLarge(_))
        ));
        assert_eq!(framed_len(7).unwrap(), 7);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let table = FileTable::open(table_path(&dir)).unwrap();
        table.put(&sample_entry(1)).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files remain: {:?}", leftovers);
    }
}

//! Journal writer with fsync after every append
//!
//! Appends happen BEFORE the in-memory apply: once a record is durable
//! the mutation is committed; if the append fails, memory was never
//! touched and the torn bytes are truncated on the next open.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{JournalError, JournalResult};
use super::record::JournalOp;

/// Name of the journal file inside the data directory.
const JOURNAL_DIR: &str = "journal";
const JOURNAL_FILE: &str = "site_ops.log";

/// Resolves the journal path under a data directory.
pub fn journal_path(data_dir: &Path) -> PathBuf {
    data_dir.join(JOURNAL_DIR).join(JOURNAL_FILE)
}

/// Append-only journal writer.
#[derive(Debug)]
pub struct JournalWriter {
    path: PathBuf,
    file: File,
}

impl JournalWriter {
    /// Opens (creating directories and file as needed) the journal
    /// under `data_dir`, truncating to `valid_len` first when a prior
    /// replay found a torn tail.
    pub fn open(data_dir: &Path, valid_len: u64) -> JournalResult<Self> {
        let path = journal_path(data_dir);
        let dir = path.parent().expect("journal path has a parent");
        fs::create_dir_all(dir)
            .map_err(|e| JournalError::io(format!("create {}", dir.display()), e))?;

        if path.exists() {
            let current = fs::metadata(&path)
                .map_err(|e| JournalError::io("journal metadata", e))?
                .len();
            if current > valid_len {
                let file = OpenOptions::new()
                    .write(true)
                    .open(&path)
                    .map_err(|e| JournalError::io("open journal for truncate", e))?;
                file.set_len(valid_len)
                    .map_err(|e| JournalError::io("truncate torn tail", e))?;
                file.sync_data()
                    .map_err(|e| JournalError::io("sync after truncate", e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| JournalError::io(format!("open {}", path.display()), e))?;

        Ok(Self { path, file })
    }

    /// Appends one operation and fsyncs it.
    pub fn append(&mut self, op: &JournalOp) -> JournalResult<()> {
        let record = op.encode()?;
        self.file
            .write_all(&record)
            .map_err(|e| JournalError::io("append record", e))?;
        self.file
            .sync_data()
            .map_err(|e| JournalError::io("fsync journal", e))?;
        Ok(())
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

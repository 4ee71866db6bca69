//! Journal replay
//!
//! Replays records in append order. A torn or corrupt tail (short
//! read, checksum mismatch, undecodable body) stops replay at the last
//! intact record: a record that never finished writing was never
//! applied in memory either, so cutting it loses nothing. The reader
//! reports how far the intact prefix reaches; the writer truncates to
//! that point before appending again.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::checksum::checksum;
use super::errors::{JournalError, JournalResult};
use super::record::JournalOp;

/// Outcome of replaying a journal file.
#[derive(Debug)]
pub struct Replay {
    /// The intact operations, in append order.
    pub ops: Vec<JournalOp>,
    /// Length of the intact prefix in bytes.
    pub valid_len: u64,
    /// True if bytes beyond the intact prefix exist (torn tail).
    pub truncate_needed: bool,
}

/// Replays the journal at `path`. A missing file is an empty journal.
pub fn replay(path: &Path) -> JournalResult<Replay> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Replay {
                ops: Vec::new(),
                valid_len: 0,
                truncate_needed: false,
            })
        }
        Err(e) => return Err(JournalError::io("open journal", e)),
    };
    let file_len = file
        .metadata()
        .map_err(|e| JournalError::io("journal metadata", e))?
        .len();

    let mut reader = BufReader::new(file);
    let mut ops = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let Some(len_bytes) = read_chunk::<4>(&mut reader)? else {
            break;
        };
        let body_len = u32::from_le_bytes(len_bytes) as u64;

        // A length that cannot fit in the remaining file is a torn
        // length prefix; stop here.
        if offset + 4 + body_len + 4 > file_len {
            break;
        }

        let mut body = vec![0u8; body_len as usize];
        if !read_exact_or_eof(&mut reader, &mut body)? {
            break;
        }
        let Some(crc_bytes) = read_chunk::<4>(&mut reader)? else {
            break;
        };

        if u32::from_le_bytes(crc_bytes) != checksum(&body) {
            break;
        }
        let Ok(op) = JournalOp::decode(&body, offset) else {
            break;
        };

        ops.push(op);
        offset += 4 + body_len + 4;
    }

    Ok(Replay {
        ops,
        valid_len: offset,
        truncate_needed: offset < file_len,
    })
}

/// Reads exactly N bytes; `None` on clean EOF or a short tail.
fn read_chunk<const N: usize>(reader: &mut impl Read) -> JournalResult<Option<[u8; N]>> {
    let mut buf = [0u8; N];
    if read_exact_or_eof(reader, &mut buf)? {
        Ok(Some(buf))
    } else {
        Ok(None)
    }
}

/// Fills `buf`, returning false if EOF arrives first.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> JournalResult<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader
            .read(&mut buf[filled..])
            .map_err(|e| JournalError::io("read journal", e))?;
        if n == 0 {
            return Ok(false);
        }
        filled += n;
    }
    Ok(true)
}

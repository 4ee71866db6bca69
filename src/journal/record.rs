//! Journal record format
//!
//! One record per logical mutation, so multi-step mutations (the
//! tombstone cascade, the four rollback steps) are atomic on disk by
//! construction: replay re-derives the dependent writes through the
//! same deterministic apply path.
//!
//! On-disk layout of one record:
//!
//! ```text
//! +-----------------+
//! | Record Length   | (u32 LE, covers type + payload)
//! +-----------------+
//! | Record Type     | (u8)
//! +-----------------+
//! | Payload         | (JSON of the typed payload)
//! +-----------------+
//! | Checksum        | (u32 LE, CRC32 over type + payload)
//! +-----------------+
//! ```
//!
//! Payloads carry keys in sentinel form (`"*"` / `0`); the tagged
//! `Scope` form exists only in memory.

use serde::{Deserialize, Serialize};

use crate::fact::WireKey;
use crate::ledger::{SiteId, VersionId};

use super::checksum::checksum;
use super::errors::{JournalError, JournalResult};

/// Record type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Site registration.
    Register = 0,
    /// A store into the site's draft (value or fill).
    Store = 1,
    /// Publish transition.
    Publish = 2,
    /// Rollback to a prior published version.
    Rollback = 3,
}

impl RecordType {
    /// Converts from the on-disk tag; `None` for unknown tags.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecordType::Register),
            1 => Some(RecordType::Store),
            2 => Some(RecordType::Publish),
            3 => Some(RecordType::Rollback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub site: SiteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePayload {
    pub site: SiteId,
    #[serde(flatten)]
    pub scope: WireKey,
    pub on_site: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishPayload {
    pub site: SiteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackPayload {
    pub site: SiteId,
    pub target: VersionId,
}

/// One logical mutation, as journaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalOp {
    Register(RegisterPayload),
    Store(StorePayload),
    Publish(PublishPayload),
    Rollback(RollbackPayload),
}

impl JournalOp {
    /// The record type tag of this operation.
    pub fn record_type(&self) -> RecordType {
        match self {
            JournalOp::Register(_) => RecordType::Register,
            JournalOp::Store(_) => RecordType::Store,
            JournalOp::Publish(_) => RecordType::Publish,
            JournalOp::Rollback(_) => RecordType::Rollback,
        }
    }

    /// Encodes the full on-disk record: length, type, payload, checksum.
    pub fn encode(&self) -> JournalResult<Vec<u8>> {
        let payload = match self {
            JournalOp::Register(p) => serde_json::to_vec(p)?,
            JournalOp::Store(p) => serde_json::to_vec(p)?,
            JournalOp::Publish(p) => serde_json::to_vec(p)?,
            JournalOp::Rollback(p) => serde_json::to_vec(p)?,
        };

        let mut body = Vec::with_capacity(1 + payload.len());
        body.push(self.record_type() as u8);
        body.extend_from_slice(&payload);

        let mut record = Vec::with_capacity(8 + body.len());
        record.extend_from_slice(&(body.len() as u32).to_le_bytes());
        record.extend_from_slice(&body);
        record.extend_from_slice(&checksum(&body).to_le_bytes());
        Ok(record)
    }

    /// Decodes a record body (type byte + payload).
    ///
    /// `offset` is the record's position in the file, for diagnostics.
    pub fn decode(body: &[u8], offset: u64) -> JournalResult<Self> {
        let (&tag, payload) = body.split_first().ok_or(JournalError::Corruption {
            offset,
            reason: "empty record body".to_string(),
        })?;
        let record_type = RecordType::from_u8(tag).ok_or_else(|| JournalError::Corruption {
            offset,
            reason: format!("unknown record type {}", tag),
        })?;
        Ok(match record_type {
            RecordType::Register => JournalOp::Register(serde_json::from_slice(payload)?),
            RecordType::Store => JournalOp::Store(serde_json::from_slice(payload)?),
            RecordType::Publish => JournalOp::Publish(serde_json::from_slice(payload)?),
            RecordType::Rollback => JournalOp::Rollback(serde_json::from_slice(payload)?),
        })
    }
}

//! Persistence collaborator - The durable operation journal
//!
//! Durability is an append-only log of LOGICAL operations (register,
//! store, publish, rollback), one checksummed record each, replayed
//! through the engine's deterministic apply path on open. Derived
//! writes (cascade tombstones, rollback reconstruction) are never
//! journaled; replay re-derives them, so one record is one atomic
//! mutation no matter how many facts it fans out to.
//!
//! This module provides:
//! - `JournalOp` and the typed payloads - the record vocabulary
//! - `JournalWriter` - append + fsync, torn-tail truncation on open
//! - `replay` - ordered replay with intact-prefix reporting
//! - `JournalError` - the storage failure taxonomy

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use errors::{JournalError, JournalResult};
pub use reader::{replay, Replay};
pub use record::{
    JournalOp, PublishPayload, RecordType, RegisterPayload, RollbackPayload, StorePayload,
};
pub use writer::{journal_path, JournalWriter};

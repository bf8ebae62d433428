//! Broadcast log for single-producer, many-consumer fan-out
//!
//! The log is an append-only, versioned list of records. The producer side
//! appends batches and clears the log when a new producer connects; every
//! consumer owns a [`Cursor`] and pulls from the log at its own pace.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<BroadcastLog>
//!                 ┌──────────────────────────────┐
//!                 │ Mutex<LogState {             │
//!                 │   records: Vec<Record>,      │
//!                 │   version: u64,              │
//!                 │ }>                           │
//!                 │ changed: Notify              │
//!                 └──────────────┬───────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        │                       │                       │
//!        ▼                       ▼                       ▼
//!   [Ingestion]           [Subscription]          [Subscription]
//!   clear() / append()    read_from(&mut c1)      read_from(&mut c2)
//! ```
//!
//! # Versions
//!
//! `clear()` empties the records and bumps the version in one step. A reader
//! whose cursor still carries the old version gets [`ReadResult::Reset`]
//! before any record of the new version, even if the new version already has
//! data.

pub mod cursor;
pub mod record;
pub mod store;

pub use cursor::Cursor;
pub use record::{ReadResult, Record};
pub use store::{BroadcastLog, LogSnapshot};

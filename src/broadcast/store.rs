//! Broadcast log implementation
//!
//! One mutex guards the records and the version; one `Notify` wakes every
//! waiting reader after each mutation. Readers register with the `Notify`
//! before inspecting state, so a mutation that lands between the check and
//! the await is never missed.

use parking_lot::Mutex;
use tokio::sync::Notify;

use super::cursor::Cursor;
use super::record::{ReadResult, Record};

#[derive(Debug, Default)]
struct LogState {
    records: Vec<Record>,
    version: u64,
}

/// Point-in-time view of the log, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LogSnapshot {
    /// Current version (number of clears so far)
    pub version: u64,
    /// Number of records in the current version
    pub len: usize,
}

/// Append-only, versioned record log shared by the producer and all consumers
///
/// Created once by the server and handed out as `Arc<BroadcastLog>`.
#[derive(Debug, Default)]
pub struct BroadcastLog {
    state: Mutex<LogState>,
    changed: Notify,
}

impl BroadcastLog {
    /// Create an empty log at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of records
    ///
    /// The whole batch becomes visible at once. Does nothing for an empty
    /// batch. Returns the log length after the append.
    pub fn append(&self, records: Vec<Record>) -> usize {
        let len = {
            let mut state = self.state.lock();
            if records.is_empty() {
                return state.records.len();
            }
            state.records.extend(records);
            state.records.len()
        };

        self.changed.notify_waiters();
        len
    }

    /// Drop every record and start a new version
    ///
    /// Returns the new version.
    pub fn clear(&self) -> u64 {
        let version = {
            let mut state = self.state.lock();
            state.records = Vec::new();
            state.version += 1;
            state.version
        };

        self.changed.notify_waiters();
        tracing::debug!(version, "Broadcast log cleared");
        version
    }

    /// Create a cursor at the start of the current version
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.state.lock().version)
    }

    /// Read without waiting
    ///
    /// Returns `None` when the cursor is up to date with its version.
    pub fn try_read(&self, cursor: &mut Cursor) -> Option<ReadResult> {
        let state = self.state.lock();

        // A version change wins over pending data, otherwise a reader could
        // be handed records of the new version on an old-version cursor.
        if state.version != cursor.version() {
            cursor.reset_to(state.version);
            return Some(ReadResult::Reset {
                version: state.version,
            });
        }

        let len = state.records.len();
        if len > cursor.index() {
            let batch = state.records[cursor.index()..].to_vec();
            cursor.advance_to(len);
            return Some(ReadResult::Data(batch));
        }

        None
    }

    /// Wait until there are new records or a new version
    ///
    /// Dropping the returned future abandons the wait without side effects.
    pub async fn read_from(&self, cursor: &mut Cursor) -> ReadResult {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(result) = self.try_read(cursor) {
                return result;
            }

            notified.await;
        }
    }

    /// Get the current version and length
    pub fn snapshot(&self) -> LogSnapshot {
        let state = self.state.lock();
        LogSnapshot {
            version: state.version,
            len: state.records.len(),
        }
    }
}

//! Statistics for the relay

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::broadcast::LogSnapshot;

/// Relay-wide counters
///
/// Updated with relaxed atomics from every connection task; read through
/// [`RelayStats::snapshot`].
#[derive(Debug)]
pub struct RelayStats {
    started_at: Instant,
    producers_admitted: AtomicU64,
    producers_rejected: AtomicU64,
    bytes_received: AtomicU64,
    records_appended: AtomicU64,
    decode_anomalies: AtomicU64,
    active_subscribers: AtomicU64,
    total_subscribers: AtomicU64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            producers_admitted: AtomicU64::new(0),
            producers_rejected: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            records_appended: AtomicU64::new(0),
            decode_anomalies: AtomicU64::new(0),
            active_subscribers: AtomicU64::new(0),
            total_subscribers: AtomicU64::new(0),
        }
    }

    pub fn producer_admitted(&self) {
        self.producers_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn producer_rejected(&self) {
        self.producers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one decoded chunk
    pub fn chunk_ingested(&self, bytes: usize, records: usize, anomalies: usize) {
        self.bytes_received
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.records_appended
            .fetch_add(records as u64, Ordering::Relaxed);
        if anomalies > 0 {
            self.decode_anomalies
                .fetch_add(anomalies as u64, Ordering::Relaxed);
        }
    }

    pub fn subscriber_attached(&self) {
        self.active_subscribers.fetch_add(1, Ordering::Relaxed);
        self.total_subscribers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscriber_detached(&self) {
        self.active_subscribers.fetch_sub(1, Ordering::Relaxed);
    }

    /// Number of consumer streams currently attached
    pub fn active_subscribers(&self) -> u64 {
        self.active_subscribers.load(Ordering::Relaxed)
    }

    /// Get uptime
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self, log: LogSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.uptime().as_secs(),
            producers_admitted: self.producers_admitted.load(Ordering::Relaxed),
            producers_rejected: self.producers_rejected.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            decode_anomalies: self.decode_anomalies.load(Ordering::Relaxed),
            active_subscribers: self.active_subscribers.load(Ordering::Relaxed),
            total_subscribers: self.total_subscribers.load(Ordering::Relaxed),
            log_version: log.version,
            log_len: log.len,
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable copy of [`RelayStats`] plus the log's position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    /// Producer sessions that got the slot
    pub producers_admitted: u64,
    /// Producer connections turned away by the gate
    pub producers_rejected: u64,
    pub bytes_received: u64,
    pub records_appended: u64,
    /// Lines dropped as malformed
    pub decode_anomalies: u64,
    pub active_subscribers: u64,
    pub total_subscribers: u64,
    /// Current log version (one per producer session)
    pub log_version: u64,
    /// Records in the current version
    pub log_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = RelayStats::new();
        let snapshot = stats.snapshot(LogSnapshot { version: 0, len: 0 });

        assert_eq!(snapshot.producers_admitted, 0);
        assert_eq!(snapshot.producers_rejected, 0);
        assert_eq!(snapshot.bytes_received, 0);
        assert_eq!(snapshot.records_appended, 0);
        assert_eq!(snapshot.active_subscribers, 0);
    }

    #[test]
    fn test_chunk_ingested() {
        let stats = RelayStats::new();
        stats.chunk_ingested(12, 3, 0);
        stats.chunk_ingested(5, 1, 2);

        let snapshot = stats.snapshot(LogSnapshot { version: 1, len: 4 });
        assert_eq!(snapshot.bytes_received, 17);
        assert_eq!(snapshot.records_appended, 4);
        assert_eq!(snapshot.decode_anomalies, 2);
        assert_eq!(snapshot.log_version, 1);
        assert_eq!(snapshot.log_len, 4);
    }

    #[test]
    fn test_subscriber_tracking() {
        let stats = RelayStats::new();
        stats.subscriber_attached();
        stats.subscriber_attached();
        stats.subscriber_detached();

        assert_eq!(stats.active_subscribers(), 1);
        let snapshot = stats.snapshot(LogSnapshot { version: 0, len: 0 });
        assert_eq!(snapshot.total_subscribers, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = StatsSnapshot {
            producers_admitted: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["producers_admitted"], 2);
        assert_eq!(json["log_len"], 0);
    }
}

//! Shared relay state
//!
//! Built once by [`RelayServer`](super::RelayServer) and cloned into every
//! connection task. Nothing here is a process-wide global, so each server
//! (and each test) gets its own log, gate and counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::broadcast::BroadcastLog;
use crate::ingest::AdmissionGate;
use crate::stats::RelayStats;

use super::config::ServerConfig;

/// Handles shared by the producer listener and the HTTP routes
#[derive(Debug, Clone)]
pub struct RelayState {
    pub config: Arc<ServerConfig>,
    pub log: Arc<BroadcastLog>,
    pub gate: Arc<AdmissionGate>,
    pub stats: Arc<RelayStats>,
    /// Cancelled to stop both listeners and end every consumer stream
    pub shutdown: CancellationToken,
    next_connection_id: Arc<AtomicU64>,
}

impl RelayState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            log: Arc::new(BroadcastLog::new()),
            gate: Arc::new(AdmissionGate::new()),
            stats: Arc::new(RelayStats::new()),
            shutdown: CancellationToken::new(),
            next_connection_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Allocate an ID for a producer or consumer connection
    pub fn next_connection_id(&self) -> u64 {
        self.next_connection_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_handles() {
        let state = RelayState::new(ServerConfig::default());
        let other = state.clone();

        assert!(Arc::ptr_eq(&state.log, &other.log));
        assert!(Arc::ptr_eq(&state.gate, &other.gate));
        assert_eq!(state.next_connection_id(), 1);
        assert_eq!(other.next_connection_id(), 2);

        other.shutdown.cancel();
        assert!(state.shutdown.is_cancelled());
    }
}

//! Producer session lifecycle
//!
//! A session exists only after the admission gate let it in. It clears the
//! log, then appends each chunk's records as one batch until the producer
//! goes away. The producer slot is released when the session is dropped,
//! whichever way `run` ends.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::broadcast::BroadcastLog;
use crate::error::{Error, Result};
use crate::stats::RelayStats;

use super::decoder::RecordDecoder;
use super::gate::ProducerPermit;

/// Totals for one finished producer session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Log version this session wrote into
    pub version: u64,
    pub bytes_received: u64,
    pub records_appended: u64,
    pub anomalies: u64,
    /// Unterminated bytes discarded at end of input
    pub dropped_tail: usize,
}

/// One admitted producer connection
pub struct IngestionSession {
    id: u64,
    peer_addr: Option<SocketAddr>,
    log: Arc<BroadcastLog>,
    stats: Arc<RelayStats>,
    decoder: RecordDecoder,
    read_buffer_size: usize,
    _permit: ProducerPermit,
}

impl IngestionSession {
    /// Create a session for an admitted producer
    pub fn new(
        id: u64,
        permit: ProducerPermit,
        log: Arc<BroadcastLog>,
        stats: Arc<RelayStats>,
        read_buffer_size: usize,
        max_record_len: usize,
    ) -> Self {
        Self {
            id,
            peer_addr: None,
            log,
            stats,
            decoder: RecordDecoder::new(max_record_len),
            read_buffer_size: read_buffer_size.max(1),
            _permit: permit,
        }
    }

    /// Attach the remote address for logging
    pub fn with_peer(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }

    /// Session ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ingest until end of input
    ///
    /// Returns the session totals on EOF, or `Error::ProducerIo` if a read
    /// fails. Records appended before a failure stay in the log.
    pub async fn run<R>(mut self, mut reader: R) -> Result<SessionSummary>
    where
        R: AsyncRead + Unpin,
    {
        let version = self.log.clear();
        self.stats.producer_admitted();

        tracing::info!(
            session_id = self.id,
            peer = ?self.peer_addr,
            version,
            "Producer admitted, log cleared"
        );

        let mut summary = SessionSummary {
            version,
            ..Default::default()
        };
        let mut buf = vec![0u8; self.read_buffer_size];

        loop {
            let n = reader.read(&mut buf).await.map_err(Error::ProducerIo)?;
            if n == 0 {
                break;
            }

            let decoded = self.decoder.decode(&buf[..n]);
            for anomaly in &decoded.anomalies {
                tracing::warn!(
                    session_id = self.id,
                    anomaly = %anomaly,
                    "Dropped malformed producer input"
                );
            }

            let records = decoded.records.len();
            self.stats
                .chunk_ingested(n, records, decoded.anomalies.len());
            summary.bytes_received += n as u64;
            summary.records_appended += records as u64;

            if records > 0 {
                let len = self.log.append(decoded.records);
                tracing::trace!(
                    session_id = self.id,
                    bytes = n,
                    records,
                    log_len = len,
                    "Chunk appended"
                );
            }
        }

        summary.anomalies = self.decoder.anomalies();
        summary.dropped_tail = self.decoder.finish();
        if summary.dropped_tail > 0 {
            tracing::debug!(
                session_id = self.id,
                bytes = summary.dropped_tail,
                "Discarded unterminated trailing record"
            );
        }

        Ok(summary)
    }
}

//! Producer listener
//!
//! Handles the TCP accept loop for producers and spawns one task per
//! connection attempt. Attempts that find the producer slot taken are closed
//! straight away, before a single byte is read.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use crate::error::{Error, Result};
use crate::ingest::IngestionSession;
use crate::server::state::RelayState;

/// TCP endpoint accepting the single producer
pub struct ProducerListener {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: RelayState,
}

impl ProducerListener {
    /// Bind the producer endpoint from `state.config.data_addr`
    pub async fn bind(state: RelayState) -> Result<Self> {
        let listener = TcpListener::bind(state.config.data_addr).await?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// Get the bound address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept producers until the shutdown token is cancelled
    pub async fn run(self) -> Result<()> {
        tracing::info!(addr = %self.local_addr, "Producer endpoint listening");

        let shutdown = self.state.shutdown.clone();
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Producer listener stopped");
                Ok(())
            }
            result = self.accept_loop() => result,
        }
    }

    async fn accept_loop(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept producer connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        let session_id = self.state.next_connection_id();
        let state = self.state.clone();

        tokio::spawn(async move {
            let Some(permit) = state.gate.try_permit() else {
                state.stats.producer_rejected();
                tracing::warn!(
                    session_id,
                    peer = %peer_addr,
                    error = %Error::AdmissionDenied,
                    "Producer rejected"
                );
                return;
            };

            if state.config.tcp_nodelay {
                if let Err(e) = socket.set_nodelay(true) {
                    tracing::debug!(session_id, error = %e, "Failed to set TCP_NODELAY");
                }
            }

            let session = IngestionSession::new(
                session_id,
                permit,
                Arc::clone(&state.log),
                Arc::clone(&state.stats),
                state.config.read_buffer_size,
                state.config.max_record_len,
            )
            .with_peer(peer_addr);

            tokio::select! {
                result = session.run(socket) => match result {
                    Ok(summary) => tracing::info!(
                        session_id,
                        peer = %peer_addr,
                        records = summary.records_appended,
                        bytes = summary.bytes_received,
                        "Producer disconnected"
                    ),
                    Err(e) => tracing::warn!(
                        session_id,
                        peer = %peer_addr,
                        error = %e,
                        "Producer connection failed"
                    ),
                },
                _ = state.shutdown.cancelled() => {
                    tracing::debug!(session_id, "Producer session cancelled by shutdown");
                }
            }
        });
    }
}

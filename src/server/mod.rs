//! Relay server
//!
//! Runs the producer TCP endpoint and the consumer HTTP endpoint over one
//! shared [`RelayState`].
//!
//! ```text
//!   producer ──TCP──► ProducerListener ──► IngestionSession ──► BroadcastLog
//!                                                                   │
//!   consumer ◄──SSE── GET /events ◄── SubscriptionStream ◄──────────┘
//! ```

pub mod config;
pub mod http;
pub mod listener;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub use config::ServerConfig;
pub use listener::ProducerListener;
pub use state::RelayState;

/// Relay server, before binding
pub struct RelayServer {
    state: RelayState,
}

impl RelayServer {
    /// Create a server after validating `config`
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: RelayState::new(config),
        })
    }

    /// Get the shared state
    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Token that stops the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    /// Bind both endpoints
    pub async fn bind(self) -> Result<BoundServer> {
        let producer = ProducerListener::bind(self.state.clone()).await?;
        let web = TcpListener::bind(self.state.config.web_addr).await?;
        let web_addr = web.local_addr()?;

        Ok(BoundServer {
            state: self.state,
            producer,
            web,
            web_addr,
        })
    }
}

/// Relay server with both endpoints bound
pub struct BoundServer {
    state: RelayState,
    producer: ProducerListener,
    web: TcpListener,
    web_addr: SocketAddr,
}

impl BoundServer {
    /// Address of the consumer HTTP endpoint
    pub fn web_addr(&self) -> SocketAddr {
        self.web_addr
    }

    /// Address of the producer TCP endpoint
    pub fn data_addr(&self) -> SocketAddr {
        self.producer.local_addr()
    }

    /// Get the shared state
    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Serve until the shutdown token is cancelled
    pub async fn run(self) -> Result<()> {
        let shutdown = self.state.shutdown.clone();
        let producer = tokio::spawn(self.producer.run());

        tracing::info!(addr = %self.web_addr, "Consumer endpoint listening");
        let router = http::router(self.state.clone());
        let served = axum::serve(self.web, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

        // A failed HTTP server takes the producer side down with it
        self.state.shutdown.cancel();

        match producer.await {
            Ok(result) => result?,
            Err(e) => tracing::error!(error = %e, "Producer listener task failed"),
        }

        served?;
        tracing::info!("Relay server stopped");
        Ok(())
    }

    /// Serve until `signal` completes or the shutdown token is cancelled
    pub async fn run_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.state.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal => {
                    tracing::info!("Shutdown signal received");
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });

        self.run().await
    }
}

//! linecast - relay newline-delimited records from one producer to many
//! Server-Sent Events consumers
//!
//! A single producer connects over TCP and writes text lines. Every line is
//! appended to a shared [`BroadcastLog`]; every consumer attached to
//! `GET /events` receives those lines in order, batched as JSON arrays. When a
//! new producer connects the log is cleared and each consumer is sent a
//! `reset` event before any of the new producer's data.
//!
//! # Example
//!
//! ```no_run
//! use linecast::{RelayServer, ServerConfig};
//!
//! # async fn example() -> linecast::Result<()> {
//! let server = RelayServer::new(ServerConfig::default())?.bind().await?;
//! server.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await
//! # }
//! ```

pub mod broadcast;
pub mod error;
pub mod ingest;
pub mod server;
pub mod stats;
pub mod subscription;

pub use broadcast::{BroadcastLog, Cursor, ReadResult, Record};
pub use error::{DecodeAnomaly, Error, Result};
pub use ingest::{AdmissionGate, IngestionSession, RecordDecoder};
pub use server::{BoundServer, RelayServer, RelayState, ServerConfig};
pub use stats::{RelayStats, StatsSnapshot};
pub use subscription::{StreamEvent, SubscriptionStream};

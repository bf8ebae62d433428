//! Producer-side ingestion
//!
//! - [`AdmissionGate`] lets at most one producer in at a time
//! - [`RecordDecoder`] frames the producer's bytes into line records
//! - [`IngestionSession`] clears the log on admission and appends records
//!   chunk by chunk until the producer disconnects

pub mod decoder;
pub mod gate;
pub mod session;

pub use decoder::{DecodedChunk, RecordDecoder};
pub use gate::{AdmissionGate, ProducerPermit};
pub use session::{IngestionSession, SessionSummary};

//! Error types for the relay
//!
//! Every error here is contained to the connection that produced it. None of
//! them is fatal to the process; the listeners log and move on.

use std::io;

use thiserror::Error;

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relay operations
#[derive(Error, Debug)]
pub enum Error {
    /// Listener I/O error (bind, accept, serve)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A producer tried to connect while another one holds the slot
    #[error("producer slot already occupied")]
    AdmissionDenied,

    /// Reading from the producer connection failed
    #[error("producer connection failed: {0}")]
    ProducerIo(#[source] io::Error),

    /// Malformed input from the producer
    #[error("decode anomaly: {0}")]
    Decode(#[from] DecodeAnomaly),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Malformed producer input that gets dropped instead of ending the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeAnomaly {
    /// A complete line was not valid UTF-8
    #[error("line of {len} bytes is not valid UTF-8")]
    InvalidUtf8 { len: usize },

    /// A line grew past the configured limit before its newline arrived
    #[error("line exceeds {limit} bytes")]
    RecordTooLong { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::AdmissionDenied.to_string(),
            "producer slot already occupied"
        );
        assert_eq!(
            Error::from(DecodeAnomaly::RecordTooLong { limit: 16 }).to_string(),
            "decode anomaly: line exceeds 16 bytes"
        );
    }

    #[test]
    fn test_producer_io_keeps_source() {
        use std::error::Error as _;

        let err = Error::ProducerIo(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("reset"));
    }
}

//! Events delivered to consumers

use crate::broadcast::Record;

/// Payload a consumer receives for a reset
pub const RESET_PAYLOAD: &str = "reset";

/// One event on a consumer stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The epoch changed; drop everything received so far
    Reset,
    /// Records appended since the previous event, in order
    Data(Vec<Record>),
}

impl StreamEvent {
    /// Check if this is a reset
    pub fn is_reset(&self) -> bool {
        matches!(self, StreamEvent::Reset)
    }

    /// Encode the event body
    ///
    /// A reset is the bare word `reset`; a batch is a JSON array of strings.
    pub fn payload(&self) -> serde_json::Result<String> {
        match self {
            StreamEvent::Reset => Ok(RESET_PAYLOAD.to_string()),
            StreamEvent::Data(batch) => serde_json::to_string(batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload() {
        assert_eq!(StreamEvent::Reset.payload().unwrap(), "reset");

        let data = StreamEvent::Data(vec![Record::from("a"), Record::from("b")]);
        assert_eq!(data.payload().unwrap(), r#"["a","b"]"#);
        assert!(!data.is_reset());
    }
}

//! Record and read-result types
//!
//! A record is one line of producer text. Records are shared between the
//! log and every batch handed to consumers, so cloning one only bumps a
//! reference count.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// One line of ingested text, without its trailing newline
///
/// Never empty when produced by the record decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(Arc<str>);

impl Record {
    /// Create a record from text
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Get the record text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Record {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Outcome of a cursor read against the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// Records appended since the cursor's last read, in append order
    Data(Vec<Record>),
    /// The log was cleared; the cursor now points at the start of `version`
    Reset { version: u64 },
}

impl ReadResult {
    /// Check if this is a reset
    pub fn is_reset(&self) -> bool {
        matches!(self, ReadResult::Reset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_as_string() {
        let batch = vec![Record::from("1.5"), Record::from("say \"hi\"")];
        let json = serde_json::to_string(&batch).unwrap();
        assert_eq!(json, r#"["1.5","say \"hi\""]"#);
    }

    #[test]
    fn test_record_clone_shares_text() {
        let record = Record::from(String::from("abc"));
        let copy = record.clone();
        assert!(std::ptr::eq(record.as_str(), copy.as_str()));
        assert_eq!(&*copy, "abc");
    }
}

//! Newline framing for the producer byte stream
//!
//! Bytes are buffered until a `\n` arrives; each complete line (newline
//! stripped) becomes one record. Empty lines are skipped. UTF-8 is checked
//! per complete line, so a multi-byte character split across two reads is
//! decoded correctly.
//!
//! Malformed input never fails the stream. A line that is not UTF-8 is
//! dropped. A line that grows past `max_record_len` is dropped together
//! with everything up to its newline.

use bytes::BytesMut;

use crate::broadcast::Record;
use crate::error::DecodeAnomaly;

/// Records and anomalies produced from one chunk
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DecodedChunk {
    /// Complete records, in stream order
    pub records: Vec<Record>,
    /// Fragments dropped while decoding this chunk
    pub anomalies: Vec<DecodeAnomaly>,
}

/// Incremental line decoder
#[derive(Debug)]
pub struct RecordDecoder {
    /// Unterminated trailing fragment
    pending: BytesMut,
    max_record_len: usize,
    /// Dropping bytes until the next newline
    discarding: bool,
    anomalies: u64,
}

impl RecordDecoder {
    /// Create a decoder that drops lines longer than `max_record_len` bytes
    pub fn new(max_record_len: usize) -> Self {
        Self {
            pending: BytesMut::new(),
            max_record_len,
            discarding: false,
            anomalies: 0,
        }
    }

    /// Feed one chunk of bytes
    pub fn decode(&mut self, chunk: &[u8]) -> DecodedChunk {
        let mut out = DecodedChunk::default();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let line = &rest[..pos];
            rest = &rest[pos + 1..];

            if self.discarding {
                self.discarding = false;
                continue;
            }

            self.pending.extend_from_slice(line);
            match self.take_line() {
                Ok(Some(record)) => out.records.push(record),
                Ok(None) => {}
                Err(anomaly) => self.note(anomaly, &mut out),
            }
        }

        if !self.discarding && !rest.is_empty() {
            self.pending.extend_from_slice(rest);
            if self.pending.len() > self.max_record_len {
                self.pending.clear();
                self.discarding = true;
                self.note(
                    DecodeAnomaly::RecordTooLong {
                        limit: self.max_record_len,
                    },
                    &mut out,
                );
            }
        }

        out
    }

    /// Discard the unterminated fragment at end of input
    ///
    /// Returns the number of bytes dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.discarding = false;
        dropped
    }

    /// Length of the buffered, unterminated fragment
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total anomalies seen by this decoder
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    fn take_line(&mut self) -> Result<Option<Record>, DecodeAnomaly> {
        let line = self.pending.split();

        if line.is_empty() {
            return Ok(None);
        }
        if line.len() > self.max_record_len {
            return Err(DecodeAnomaly::RecordTooLong {
                limit: self.max_record_len,
            });
        }

        match std::str::from_utf8(&line) {
            Ok(text) => Ok(Some(Record::from(text))),
            Err(_) => Err(DecodeAnomaly::InvalidUtf8 { len: line.len() }),
        }
    }

    fn note(&mut self, anomaly: DecodeAnomaly, out: &mut DecodedChunk) {
        self.anomalies += 1;
        out.anomalies.push(anomaly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunk: &DecodedChunk) -> Vec<&str> {
        chunk.records.iter().map(|r| r.as_str()).collect()
    }

    #[test]
    fn test_complete_lines() {
        let mut decoder = RecordDecoder::new(1024);
        let out = decoder.decode(b"a\nb\nc\n");

        assert_eq!(texts(&out), vec!["a", "b", "c"]);
        assert!(out.anomalies.is_empty());
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_fragment_carried_across_chunks() {
        let mut decoder = RecordDecoder::new(1024);

        let first = decoder.decode(b"x\ny");
        assert_eq!(texts(&first), vec!["x"]);
        assert_eq!(decoder.pending_len(), 1);

        let second = decoder.decode(b"z\n");
        assert_eq!(texts(&second), vec!["yz"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut decoder = RecordDecoder::new(1024);
        let out = decoder.decode(b"\n\na\n\n\nb\n");

        assert_eq!(texts(&out), vec!["a", "b"]);
        assert!(out.anomalies.is_empty());
    }

    #[test]
    fn test_split_multibyte_character() {
        let mut decoder = RecordDecoder::new(1024);
        let bytes = "温度\n".as_bytes();

        assert!(decoder.decode(&bytes[..2]).records.is_empty());
        let out = decoder.decode(&bytes[2..]);
        assert_eq!(texts(&out), vec!["温度"]);
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let mut decoder = RecordDecoder::new(1024);
        let out = decoder.decode(b"ok\n\xff\xfe\nfine\n");

        assert_eq!(texts(&out), vec!["ok", "fine"]);
        assert_eq!(out.anomalies, vec![DecodeAnomaly::InvalidUtf8 { len: 2 }]);
        assert_eq!(decoder.anomalies(), 1);
    }

    #[test]
    fn test_overlong_fragment_discarded_until_newline() {
        let mut decoder = RecordDecoder::new(4);

        let first = decoder.decode(b"abcdef");
        assert!(first.records.is_empty());
        assert_eq!(
            first.anomalies,
            vec![DecodeAnomaly::RecordTooLong { limit: 4 }]
        );
        assert_eq!(decoder.pending_len(), 0);

        // Tail of the overlong line is dropped, next line survives
        let second = decoder.decode(b"ghij\nok\n");
        assert_eq!(texts(&second), vec!["ok"]);
        assert!(second.anomalies.is_empty());
    }

    #[test]
    fn test_overlong_complete_line_dropped() {
        let mut decoder = RecordDecoder::new(3);
        let out = decoder.decode(b"abcd\nabc\n");

        assert_eq!(texts(&out), vec!["abc"]);
        assert_eq!(out.anomalies.len(), 1);
    }

    #[test]
    fn test_finish_drops_fragment() {
        let mut decoder = RecordDecoder::new(1024);
        decoder.decode(b"a\ntail");

        assert_eq!(decoder.finish(), 4);
        assert_eq!(decoder.pending_len(), 0);
    }
}

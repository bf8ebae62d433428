//! Consumer read position

/// A consumer's private position in the log
///
/// Holds the version it last observed and how many records of that version
/// it has consumed. Owned by exactly one subscription; never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    version: u64,
    index: usize,
}

impl Cursor {
    pub(super) fn new(version: u64) -> Self {
        Self { version, index: 0 }
    }

    /// Version this cursor last observed
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of records of `version` already consumed
    pub fn index(&self) -> usize {
        self.index
    }

    pub(super) fn advance_to(&mut self, len: usize) {
        self.index = len;
    }

    pub(super) fn reset_to(&mut self, version: u64) {
        self.version = version;
        self.index = 0;
    }
}

//! Single-producer admission
//!
//! The gate holds one "occupied" flag. Only one ingestion session may hold
//! it at a time; everyone else is turned away without touching the log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mutual exclusion for producer connections
#[derive(Debug, Default)]
pub struct AdmissionGate {
    occupied: AtomicBool,
}

impl AdmissionGate {
    /// Create an open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the producer slot
    ///
    /// Returns false, leaving the gate untouched, if the slot is taken.
    pub fn try_acquire(&self) -> bool {
        self.occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Free the producer slot
    ///
    /// Safe to call on an already free gate.
    pub fn release(&self) {
        self.occupied.store(false, Ordering::Release);
    }

    /// Check if a producer holds the slot
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }

    /// Take the slot as a guard that frees it on drop
    pub fn try_permit(self: &Arc<Self>) -> Option<ProducerPermit> {
        if self.try_acquire() {
            Some(ProducerPermit {
                gate: Arc::clone(self),
            })
        } else {
            None
        }
    }
}

/// Proof of holding the producer slot
///
/// Releases the slot when dropped, on every exit path of the session.
#[derive(Debug)]
pub struct ProducerPermit {
    gate: Arc<AdmissionGate>,
}

impl Drop for ProducerPermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    #[test]
    fn test_acquire_release() {
        let gate = AdmissionGate::new();

        assert!(gate.try_acquire());
        assert!(gate.is_occupied());
        assert!(!gate.try_acquire());

        gate.release();
        assert!(!gate.is_occupied());
        assert!(gate.try_acquire());
    }

    #[test]
    fn test_release_is_idempotent() {
        let gate = AdmissionGate::new();
        assert!(gate.try_acquire());

        gate.release();
        gate.release();
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[test]
    fn test_permit_releases_on_drop() {
        let gate = Arc::new(AdmissionGate::new());

        let permit = gate.try_permit().unwrap();
        assert!(gate.try_permit().is_none());

        drop(permit);
        assert!(!gate.is_occupied());
        assert!(gate.try_permit().is_some());
    }

    #[test]
    fn test_concurrent_acquire_single_winner() {
        const CONTENDERS: usize = 16;

        for _ in 0..50 {
            let gate = Arc::new(AdmissionGate::new());
            let barrier = Arc::new(Barrier::new(CONTENDERS));

            let handles: Vec<_> = (0..CONTENDERS)
                .map(|_| {
                    let gate = Arc::clone(&gate);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        gate.try_acquire()
                    })
                })
                .collect();

            let winners = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count();
            assert_eq!(winners, 1);
        }
    }
}

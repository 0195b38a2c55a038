//! Per-tick sampling of the hot counters.
//!
//! Only `inflight` and `limit` change fast enough to matter; the other three
//! counters keep the value read when the registry was created.

use tracing::debug;

use super::attribute::AttributeStore;
use super::queue::TransmitQueue;

/// Scaled values of one queue for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub inflight: u64,
    pub limit: u64,
}

/// Re-reads `inflight` and `limit` and counts failed reads.
#[derive(Debug, Default)]
pub struct Sampler {
    reads: u64,
    failures: u64,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples one queue. Never fails: a counter that cannot be read keeps its previous value.
    pub fn sample(&mut self, queue: &mut TransmitQueue) -> Sample {
        let index = queue.index();
        let inflight = self.refresh(index, &mut queue.attrs.inflight);
        let limit = self.refresh(index, &mut queue.attrs.limit);
        Sample { inflight, limit }
    }

    fn refresh(&mut self, queue: usize, store: &mut AttributeStore) -> u64 {
        self.reads += 1;
        match store.reread() {
            Ok(value) => value,
            Err(e) => {
                self.failures += 1;
                debug!(queue, attr = %store.attr(), error = %e, "counter read failed, keeping last value");
                store.value()
            }
        }
    }

    /// Total counter reads attempted.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Counter reads that failed and fell back to the cached value.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

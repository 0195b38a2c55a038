//! Per-queue Byte Queue Limits counters.
//!
//! - `attribute` - one counter file, opened once and re-read each tick
//! - `queue` - the five counters of a transmit queue and the registry of all queues
//! - `sampler` - the per-tick read of `inflight` and `limit`

pub mod attribute;
pub mod queue;
pub mod sampler;

pub use attribute::{AttributeError, AttributeStore, BqlAttribute, scale};
pub use queue::{InitError, QueueAttributes, QueueRegistry, TransmitQueue};
pub use sampler::{Sample, Sampler};

//! Byte Queue Limits collector for Linux.
//!
//! This module reads per-queue BQL counters from
//! `/sys/class/net/<iface>/queues/tx-<n>/byte_queue_limits/`, with support
//! for an in-memory filesystem so everything can be tested off Linux.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      QueueRegistry                       │
//! │   TransmitQueue × Q  ──►  QueueAttributes (5 stores)     │
//! │        ▲                        │                        │
//! │        │ Sampler (inflight,     │ AttributeStore          │
//! │        │          limit)        │ (open once, reread)     │
//! └────────┼────────────────────────┼────────────────────────┘
//!          │                 ┌──────▼──────┐
//!   InterfaceProbe ─────────►│  FileSystem │ (trait)
//!                            └──────┬──────┘
//!                     ┌─────────────┴─────────────┐
//!              ┌──────▼──────┐             ┌──────▼──────┐
//!              │   RealFs    │             │   MockFs    │
//!              │  (Linux)    │             │  (Testing)  │
//!              └─────────────┘             └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use bqlmon::collector::{InterfaceProbe, MockFs, QueueRegistry, Sampler};
//!
//! let fs = MockFs::bql_interface("eth0", 4);
//! let info = InterfaceProbe::new(fs.clone(), "/sys", "/proc").probe("eth0").unwrap();
//! let mut registry = QueueRegistry::create(&fs, "/sys", &info.name, info.queue_count).unwrap();
//! let mut sampler = Sampler::new();
//! let sample = sampler.sample(registry.queue_mut(0).unwrap());
//! assert!(sample.limit > 0);
//! ```

pub mod bql;
pub mod iface;
pub mod mock;
pub mod traits;

pub use bql::{
    AttributeError, AttributeStore, BqlAttribute, InitError, QueueAttributes, QueueRegistry,
    Sample, Sampler, TransmitQueue,
};
pub use iface::{DriverInfo, InterfaceInfo, InterfaceProbe, ProbeError};
pub use mock::MockFs;
pub use traits::{CounterHandle, FileSystem, RealFs};

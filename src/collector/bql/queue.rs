//! Transmit queues and the registry that owns them.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::collector::traits::FileSystem;

use super::attribute::{AttributeError, AttributeStore, BqlAttribute};

/// The five BQL counters of one transmit queue.
#[derive(Debug)]
pub struct QueueAttributes {
    pub hold_time: AttributeStore,
    pub inflight: AttributeStore,
    pub limit: AttributeStore,
    pub limit_max: AttributeStore,
    pub limit_min: AttributeStore,
}

impl QueueAttributes {
    /// Opens all five counters under `dir`. Fails on the first one that cannot be opened.
    fn open<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> Result<Self, AttributeError> {
        Ok(Self {
            hold_time: AttributeStore::open(fs, dir, BqlAttribute::HoldTime)?,
            inflight: AttributeStore::open(fs, dir, BqlAttribute::Inflight)?,
            limit: AttributeStore::open(fs, dir, BqlAttribute::Limit)?,
            limit_max: AttributeStore::open(fs, dir, BqlAttribute::LimitMax)?,
            limit_min: AttributeStore::open(fs, dir, BqlAttribute::LimitMin)?,
        })
    }

    pub fn get(&self, attr: BqlAttribute) -> &AttributeStore {
        match attr {
            BqlAttribute::HoldTime => &self.hold_time,
            BqlAttribute::Inflight => &self.inflight,
            BqlAttribute::Limit => &self.limit,
            BqlAttribute::LimitMax => &self.limit_max,
            BqlAttribute::LimitMin => &self.limit_min,
        }
    }

    pub fn get_mut(&mut self, attr: BqlAttribute) -> &mut AttributeStore {
        match attr {
            BqlAttribute::HoldTime => &mut self.hold_time,
            BqlAttribute::Inflight => &mut self.inflight,
            BqlAttribute::Limit => &mut self.limit,
            BqlAttribute::LimitMax => &mut self.limit_max,
            BqlAttribute::LimitMin => &mut self.limit_min,
        }
    }

    fn close(&mut self) {
        for attr in BqlAttribute::ALL {
            self.get_mut(attr).close();
        }
    }
}

/// One transmit queue (`tx-<index>`).
#[derive(Debug)]
pub struct TransmitQueue {
    index: usize,
    pub attrs: QueueAttributes,
}

impl TransmitQueue {
    /// Opens the queue's counters and reads each of them once.
    ///
    /// A counter that opens but cannot be read yet stays at 0 until the next
    /// successful read.
    fn open<F: FileSystem + ?Sized>(
        fs: &F,
        sys_path: &Path,
        iface: &str,
        index: usize,
    ) -> Result<Self, AttributeError> {
        let dir = queue_dir(sys_path, iface, index);
        let mut attrs = QueueAttributes::open(fs, &dir)?;

        for attr in BqlAttribute::ALL {
            if let Err(e) = attrs.get_mut(attr).reread() {
                warn!(queue = index, attr = %attr, error = %e, "initial read failed");
            }
        }

        Ok(Self { index, attrs })
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Returns `<sys>/class/net/<iface>/queues/tx-<index>/byte_queue_limits`.
pub fn queue_dir(sys_path: &Path, iface: &str, index: usize) -> PathBuf {
    sys_path
        .join("class/net")
        .join(iface)
        .join("queues")
        .join(format!("tx-{}", index))
        .join("byte_queue_limits")
}

/// Registry construction failure.
#[derive(Debug)]
pub enum InitError {
    /// A counter of the given queue could not be opened.
    Queue { index: usize, source: AttributeError },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Queue { index, source } => {
                write!(f, "failed to initialize queue {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Queue { source, .. } => Some(source),
        }
    }
}

/// All transmit queues of one interface, created once at startup.
///
/// Handles are released by [`QueueRegistry::close`] or on drop.
#[derive(Debug)]
pub struct QueueRegistry {
    interface: String,
    queues: Vec<TransmitQueue>,
    closed: bool,
}

impl QueueRegistry {
    /// Opens queues `0..queue_count` of `iface`.
    ///
    /// Any queue failing to open aborts the whole registry; queues opened so
    /// far are released.
    pub fn create<F: FileSystem + ?Sized>(
        fs: &F,
        sys_path: impl AsRef<Path>,
        iface: &str,
        queue_count: usize,
    ) -> Result<Self, InitError> {
        let sys_path = sys_path.as_ref();
        let mut queues = Vec::with_capacity(queue_count);
        for index in 0..queue_count {
            let queue = TransmitQueue::open(fs, sys_path, iface, index)
                .map_err(|source| InitError::Queue { index, source })?;
            queues.push(queue);
        }
        debug!(interface = iface, queues = queue_count, "queue registry created");
        Ok(Self {
            interface: iface.to_string(),
            queues,
            closed: false,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn queue(&self, index: usize) -> Option<&TransmitQueue> {
        self.queues.get(index)
    }

    pub fn queue_mut(&mut self, index: usize) -> Option<&mut TransmitQueue> {
        self.queues.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransmitQueue> {
        self.queues.iter()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases every counter handle exactly once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for queue in &mut self.queues {
            queue.attrs.close();
        }
        self.closed = true;
        debug!(interface = %self.interface, "queue registry closed");
    }
}

impl Drop for QueueRegistry {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_queue_dir() {
        assert_eq!(
            queue_dir(Path::new("/sys"), "eth0", 3),
            PathBuf::from("/sys/class/net/eth0/queues/tx-3/byte_queue_limits")
        );
    }

    #[test]
    fn test_create_reads_all_attributes() {
        let fs = MockFs::bql_interface("eth0", 3);
        let registry = QueueRegistry::create(&fs, "/sys", "eth0", 3).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert_eq!(registry.interface(), "eth0");

        let q = registry.queue(2).unwrap();
        assert_eq!(q.index(), 2);
        assert_eq!(q.attrs.inflight.value(), 8);
        assert_eq!(q.attrs.limit.value(), 30);
        assert_eq!(q.attrs.limit_max.value(), 1_835_008);
        assert_eq!(q.attrs.limit_min.value(), 0);
        assert_eq!(q.attrs.hold_time.value(), 0);
        assert_eq!(q.attrs.get(BqlAttribute::Limit).raw(), 30720);
    }

    #[test]
    fn test_missing_attribute_fails_whole_registry() {
        let fs = MockFs::bql_interface("eth0", 3);
        fs.break_counter("eth0", 1, "limit_max");

        let err = QueueRegistry::create(&fs, "/sys", "eth0", 3).unwrap_err();
        let InitError::Queue { index, source } = &err;
        assert_eq!(*index, 1);
        assert!(matches!(source, AttributeError::Open { .. }));
        assert!(err.to_string().starts_with("failed to initialize queue 1"));
    }

    #[test]
    fn test_more_queues_than_present_fails() {
        let fs = MockFs::bql_interface("eth0", 2);
        assert!(QueueRegistry::create(&fs, "/sys", "eth0", 3).is_err());
    }

    #[test]
    fn test_unreadable_initial_value_is_not_fatal() {
        let fs = MockFs::bql_interface("eth0", 1);
        fs.set_counter("eth0", 0, "limit", 4096);
        fs.set_file(
            "/sys/class/net/eth0/queues/tx-0/byte_queue_limits/inflight",
            "garbage",
        );
        let registry = QueueRegistry::create(&fs, "/sys", "eth0", 1).unwrap();
        let q = registry.queue(0).unwrap();
        assert_eq!(q.attrs.inflight.value(), 0);
        assert_eq!(q.attrs.limit.value(), 4);
    }

    #[test]
    fn test_close_releases_every_handle_once() {
        let fs = MockFs::bql_interface("eth0", 2);
        let mut registry = QueueRegistry::create(&fs, "/sys", "eth0", 2).unwrap();
        registry.close();
        assert!(registry.is_closed());
        for q in registry.iter() {
            for attr in BqlAttribute::ALL {
                assert!(!q.attrs.get(attr).is_open());
            }
        }
        registry.close();
        assert!(registry.is_closed());
    }
}

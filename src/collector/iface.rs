//! Network interface probing.
//!
//! Checks that the host can expose BQL at all, counts the transmit queues of
//! an interface and looks up its driver for the dashboard header.

use std::fmt;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::collector::traits::FileSystem;

/// Oldest kernel with Byte Queue Limits.
const MIN_KERNEL: (u32, u32) = (3, 3);

/// Driver bound to the interface's device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: String,
    pub version: Option<String>,
}

impl fmt::Display for DriverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// What the dashboard needs to know about the interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub queue_count: usize,
    pub driver: Option<DriverInfo>,
}

/// Probing failures. All of them are fatal at startup.
#[derive(Debug)]
pub enum ProbeError {
    /// Not running on Linux (value is the detected OS type, if any).
    UnsupportedPlatform(String),
    /// Kernel release predates BQL.
    KernelTooOld(String),
    /// `/sys/class/net/<iface>/queues` does not exist.
    NoSuchInterface(String),
    /// The interface has no transmit queues.
    NoQueues(String),
    /// Listing the queue directory failed for another reason.
    Io(io::Error),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::UnsupportedPlatform(os) => write!(f, "unsupported OS: {}", os),
            ProbeError::KernelTooOld(release) => {
                write!(f, "kernel {} too old, requires 3.3 for BQL", release)
            }
            ProbeError::NoSuchInterface(iface) => write!(f, "no such network device: {}", iface),
            ProbeError::NoQueues(iface) => {
                write!(f, "{} has no transmit queues (kernel too old?)", iface)
            }
            ProbeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        ProbeError::Io(e)
    }
}

/// Probes interfaces through a [`FileSystem`].
pub struct InterfaceProbe<F: FileSystem> {
    fs: F,
    sys_path: PathBuf,
    proc_path: PathBuf,
}

impl<F: FileSystem> InterfaceProbe<F> {
    /// Creates a new probe.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sys_path` - Base path to sysfs (usually "/sys")
    /// * `proc_path` - Base path to procfs (usually "/proc")
    pub fn new(fs: F, sys_path: impl Into<PathBuf>, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
            proc_path: proc_path.into(),
        }
    }

    /// Runs all checks for `iface`.
    pub fn probe(&self, iface: &str) -> Result<InterfaceInfo, ProbeError> {
        self.check_platform()?;
        let queue_count = self.count_tx_queues(iface)?;
        let driver = self.driver_info(iface);
        Ok(InterfaceInfo {
            name: iface.to_string(),
            queue_count,
            driver,
        })
    }

    /// Requires a Linux kernel of at least 3.3.
    pub fn check_platform(&self) -> Result<(), ProbeError> {
        let kernel = self.proc_path.join("sys/kernel");
        let ostype = self
            .fs
            .read_to_string(&kernel.join("ostype"))
            .map(|s| s.trim().to_string())
            .map_err(|_| ProbeError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;
        if ostype != "Linux" {
            return Err(ProbeError::UnsupportedPlatform(ostype));
        }

        let release = self
            .fs
            .read_to_string(&kernel.join("osrelease"))
            .map(|s| s.trim().to_string())
            .map_err(|_| ProbeError::KernelTooOld("unknown".to_string()))?;
        match parse_kernel_version(&release) {
            Some(version) if version >= MIN_KERNEL => Ok(()),
            _ => Err(ProbeError::KernelTooOld(release)),
        }
    }

    /// Counts `tx-*` entries under the interface's `queues` directory.
    pub fn count_tx_queues(&self, iface: &str) -> Result<usize, ProbeError> {
        let dir = self.iface_dir(iface).join("queues");
        let entries = self.fs.read_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ProbeError::NoSuchInterface(iface.to_string()),
            _ => ProbeError::Io(e),
        })?;

        let count = entries
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter(|name| name.starts_with("tx-"))
            .count();

        if count == 0 {
            return Err(ProbeError::NoQueues(iface.to_string()));
        }
        Ok(count)
    }

    /// Looks up the driver name and version. Missing information is not an error.
    pub fn driver_info(&self, iface: &str) -> Option<DriverInfo> {
        let link = self.iface_dir(iface).join("device/driver");
        let target = match self.fs.read_link(&link) {
            Ok(target) => target,
            Err(e) => {
                debug!(interface = iface, error = %e, "no driver information");
                return None;
            }
        };
        let name = target.file_name()?.to_str()?.to_string();
        let version = self
            .fs
            .read_to_string(&self.sys_path.join("module").join(&name).join("version"))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Some(DriverInfo { name, version })
    }

    fn iface_dir(&self, iface: &str) -> PathBuf {
        self.sys_path.join("class/net").join(iface)
    }
}

/// Parses the `major.minor` prefix of a kernel release like `6.1.0-18-amd64`.
fn parse_kernel_version(release: &str) -> Option<(u32, u32)> {
    let mut parts = release.split(|c: char| !c.is_ascii_digit());
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

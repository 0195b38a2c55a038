//! A single BQL counter file.
//!
//! The kernel exposes each counter as a short decimal string. The file is
//! opened once and every sample rewinds the same descriptor and reads it
//! again. A failed read or unparsable content leaves the cached value
//! untouched, so callers only ever see stale values, never garbage.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::{CounterHandle, FileSystem};

/// Divisor applied to every raw counter before display.
pub const SCALE_DIVISOR: u64 = 1024;

/// Scales a raw counter for display (truncating division by 1024).
///
/// Applied to all five attributes, including `hold_time` which is a time
/// value rather than a byte count. The dashboard has always shown it this way.
pub fn scale(raw: u64) -> u64 {
    raw / SCALE_DIVISOR
}

/// The five counters under `byte_queue_limits/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BqlAttribute {
    HoldTime,
    Inflight,
    Limit,
    LimitMax,
    LimitMin,
}

impl BqlAttribute {
    /// All attributes in sysfs listing order.
    pub const ALL: [BqlAttribute; 5] = [
        BqlAttribute::HoldTime,
        BqlAttribute::Inflight,
        BqlAttribute::Limit,
        BqlAttribute::LimitMax,
        BqlAttribute::LimitMin,
    ];

    /// File name inside the `byte_queue_limits` directory.
    pub fn file_name(self) -> &'static str {
        match self {
            BqlAttribute::HoldTime => "hold_time",
            BqlAttribute::Inflight => "inflight",
            BqlAttribute::Limit => "limit",
            BqlAttribute::LimitMax => "limit_max",
            BqlAttribute::LimitMin => "limit_min",
        }
    }
}

impl fmt::Display for BqlAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Errors from opening or reading a counter.
#[derive(Debug)]
pub enum AttributeError {
    /// The counter file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// Rewinding or reading the open file failed.
    Read { path: PathBuf, source: io::Error },
    /// The file did not contain an unsigned integer.
    Parse { path: PathBuf, content: String },
    /// The handle was already released.
    Closed { path: PathBuf },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::Open { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
            AttributeError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            AttributeError::Parse { path, content } => {
                write!(f, "invalid counter in {}: {:?}", path.display(), content)
            }
            AttributeError::Closed { path } => write!(f, "{} is closed", path.display()),
        }
    }
}

impl std::error::Error for AttributeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttributeError::Open { source, .. } | AttributeError::Read { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// One open counter plus its last good value.
pub struct AttributeStore {
    attr: BqlAttribute,
    path: PathBuf,
    handle: Option<Box<dyn CounterHandle>>,
    buf: String,
    raw: u64,
    value: u64,
}

impl fmt::Debug for AttributeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeStore")
            .field("attr", &self.attr)
            .field("path", &self.path)
            .field("open", &self.handle.is_some())
            .field("raw", &self.raw)
            .field("value", &self.value)
            .finish()
    }
}

impl AttributeStore {
    /// Opens `<queue_dir>/<attr>`. The cached value starts at 0.
    pub fn open<F: FileSystem + ?Sized>(
        fs: &F,
        queue_dir: &Path,
        attr: BqlAttribute,
    ) -> Result<Self, AttributeError> {
        let path = queue_dir.join(attr.file_name());
        let handle = fs.open(&path).map_err(|source| AttributeError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            attr,
            path,
            handle: Some(handle),
            buf: String::new(),
            raw: 0,
            value: 0,
        })
    }

    /// Reads the counter again from offset zero and returns the scaled value.
    ///
    /// On any error the previous raw and scaled values are kept.
    pub fn reread(&mut self) -> Result<u64, AttributeError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(AttributeError::Closed {
                path: self.path.clone(),
            });
        };

        handle
            .reread(&mut self.buf)
            .map_err(|source| AttributeError::Read {
                path: self.path.clone(),
                source,
            })?;

        let raw = parse_counter(&self.buf).ok_or_else(|| AttributeError::Parse {
            path: self.path.clone(),
            content: self.buf.trim().to_string(),
        })?;

        self.raw = raw;
        self.value = scale(raw);
        Ok(self.value)
    }

    /// Releases the underlying handle. Safe to call more than once.
    pub fn close(&mut self) {
        self.handle = None;
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn attr(&self) -> BqlAttribute {
        self.attr
    }

    /// Last successfully read raw value.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Last successfully read value, scaled by [`scale`].
    pub fn value(&self) -> u64 {
        self.value
    }
}

fn parse_counter(content: &str) -> Option<u64> {
    content.trim().parse::<u64>().ok()
}

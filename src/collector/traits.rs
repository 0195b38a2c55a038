//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the collector to work with both the real
//! sysfs tree on Linux and mock implementations for testing on macOS or in CI.
//! Counter files are opened once and then re-read through a `CounterHandle`.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Upper bound for a single counter read. Sysfs counters are a few bytes.
pub const MAX_COUNTER_LEN: u64 = 512;

/// A counter file that stays open and is re-read from offset zero.
pub trait CounterHandle: Send {
    /// Rewinds to the start of the resource and reads its whole content into `buf`.
    ///
    /// `buf` is cleared first.
    fn reread(&mut self, buf: &mut String) -> io::Result<()>;
}

/// Abstraction for filesystem operations.
///
/// This trait allows collectors to read from the real filesystem or from
/// a mock implementation for testing purposes.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Returns the target of a symbolic link.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Opens a counter file for repeated reads.
    fn open(&self, path: &Path) -> io::Result<Box<dyn CounterHandle>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/sys` and `/proc` trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

/// Open file descriptor behind a sysfs counter.
#[derive(Debug)]
pub struct FileHandle {
    file: File,
}

impl CounterHandle for FileHandle {
    fn reread(&mut self, buf: &mut String) -> io::Result<()> {
        buf.clear();
        self.file.seek(SeekFrom::Start(0))?;
        (&mut self.file).take(MAX_COUNTER_LEN).read_to_string(buf)?;
        Ok(())
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn CounterHandle>> {
        let file = File::open(path)?;
        Ok(Box::new(FileHandle { file }))
    }
}

//! In-memory mock filesystem for testing collectors without real `/sys`.
//!
//! This module provides `MockFs` which simulates a filesystem in memory,
//! allowing tests to run on macOS and in CI environments without Linux.
//!
//! Clones share the same underlying tree, so a test can keep one clone,
//! hand another to the code under test, and then change or remove files
//! to simulate counters moving or reads failing.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::collector::traits::{CounterHandle, FileSystem};

#[derive(Debug, Default)]
struct Tree {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
    /// Symbolic links and their targets.
    links: HashMap<PathBuf, PathBuf>,
}

impl Tree {
    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    tree: Arc<Mutex<Tree>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.set_file(path, content);
    }

    /// Replaces the content of a file, creating it if needed.
    ///
    /// Handles that are already open observe the new content on their next read.
    pub fn set_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.tree();
        tree.add_parents(&path);
        tree.files.insert(path, content.into());
    }

    /// Removes a file. Open handles fail their next read.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.tree().files.remove(path.as_ref());
    }

    /// Adds a symbolic link pointing at `target`.
    pub fn add_link(&mut self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.tree();
        tree.add_parents(&path);
        tree.links.insert(path, target.as_ref().to_path_buf());
    }
}

fn not_found(kind: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found: {:?}", kind, path),
    )
}

/// Handle onto a mock file; every read looks the path up again.
#[derive(Debug)]
struct MockHandle {
    tree: Arc<Mutex<Tree>>,
    path: PathBuf,
}

impl CounterHandle for MockHandle {
    fn reread(&mut self, buf: &mut String) -> io::Result<()> {
        buf.clear();
        let tree = self.tree.lock().unwrap_or_else(|e| e.into_inner());
        let content = tree
            .files
            .get(&self.path)
            .ok_or_else(|| not_found("file", &self.path))?;
        buf.push_str(content);
        Ok(())
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.tree()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("file", path))
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.tree();
        tree.files.contains_key(path)
            || tree.directories.contains(path)
            || tree.links.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let tree = self.tree();
        if !tree.directories.contains(path) {
            return Err(not_found("directory", path));
        }

        let mut entries = HashSet::new();

        // Find all files, links and directories that are direct children
        for child in tree.files.keys().chain(tree.links.keys()) {
            if child.parent().is_some_and(|parent| parent == path) {
                entries.insert(child.clone());
            }
        }

        for dir_path in &tree.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        let mut entries: Vec<PathBuf> = entries.into_iter().collect();
        entries.sort();
        Ok(entries)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.tree()
            .links
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("link", path))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn CounterHandle>> {
        if !self.tree().files.contains_key(path) {
            return Err(not_found("file", path));
        }
        Ok(Box::new(MockHandle {
            tree: Arc::clone(&self.tree),
            path: path.to_path_buf(),
        }))
    }
}

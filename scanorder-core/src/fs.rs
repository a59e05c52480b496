//! Filesystem capabilities the core needs from its host.
//!
//! The renamer only ever talks to a [`FileSystem`], so the same code runs
//! against the real disk and against in-memory fakes in tests.

use crate::path_util::{basename, dirname};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use ts_rs::TS;

/// A directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Entry {
    pub name: String,
    pub is_file: bool,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_file: true,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_file: false,
        }
    }
}

pub trait FileSystem {
    /// List the immediate children of `path`.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<Entry>>;

    /// Move `old_path` to `new_path`.
    fn rename(&mut self, old_path: &str, new_path: &str) -> io::Result<()>;

    /// Copy the contents of `from` to `to`, leaving `from` in place.
    fn copy(&mut self, from: &str, to: &str) -> io::Result<()>;

    /// Whether anything currently exists at `path`.
    fn exists(&self, path: &str) -> bool;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Follow symlinks so a linked image still counts as a file
            let is_file = fs::metadata(entry.path()).map_or(false, |m| m.is_file());
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_file,
            });
        }
        Ok(entries)
    }

    fn rename(&mut self, old_path: &str, new_path: &str) -> io::Result<()> {
        fs::rename(old_path, new_path)
    }

    fn copy(&mut self, from: &str, to: &str) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn exists(&self, path: &str) -> bool {
        // symlink_metadata so a dangling link still blocks an overwrite
        fs::symlink_metadata(path).is_ok()
    }
}

/// In-memory [`FileSystem`] used to simulate a batch before running it.
///
/// Paths are plain strings, so a simulation seeded from a Windows listing
/// behaves the same on any host. Renames of paths registered with
/// [`MemoryFs::fail_on`] return an error, which lets a simulation model a
/// locked file.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
    failing: HashSet<String>,
    failing_targets: HashSet<String>,
    renames: usize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with files, registering each parent as a directory
    pub fn with_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fs = Self::new();
        for path in paths {
            fs.add_file(path);
        }
        fs
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.dirs.insert(dirname(&path));
        self.files.insert(path);
    }

    pub fn remove_file(&mut self, path: &str) -> bool {
        self.files.remove(path)
    }

    /// Make every rename touching `path` fail
    pub fn fail_on(&mut self, path: impl Into<String>) {
        self.failing.insert(path.into());
    }

    /// Make renames whose destination is `path` fail
    pub fn fail_renames_into(&mut self, path: impl Into<String>) {
        self.failing_targets.insert(path.into());
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Number of renames that reached the filesystem
    pub fn rename_calls(&self) -> usize {
        self.renames
    }
}

impl FileSystem for MemoryFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<Entry>> {
        let dir = path.to_string_lossy();
        if !self.dirs.contains(dir.as_ref()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir),
            ));
        }
        Ok(self
            .files
            .iter()
            .filter(|file| dirname(file) == dir)
            .map(|file| Entry::file(basename(file)))
            .collect())
    }

    fn rename(&mut self, old_path: &str, new_path: &str) -> io::Result<()> {
        self.renames += 1;
        if self.failing.contains(old_path)
            || self.failing.contains(new_path)
            || self.failing_targets.contains(new_path)
        {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("simulated failure renaming {}", old_path),
            ));
        }
        if !self.files.remove(old_path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", old_path),
            ));
        }
        self.files.insert(new_path.to_string());
        Ok(())
    }

    fn copy(&mut self, from: &str, to: &str) -> io::Result<()> {
        if self.failing.contains(from)
            || self.failing.contains(to)
            || self.failing_targets.contains(to)
        {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("simulated failure copying {}", from),
            ));
        }
        if !self.files.contains(from) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", from),
            ));
        }
        self.add_file(to);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains(path) || self.dirs.contains(path)
    }
}

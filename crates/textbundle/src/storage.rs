//! Minimal file tree used by the bundle algorithms.
//!
//! Both backends expose their root through [`Storage`]: paths are relative,
//! `/`-separated and already checked by [`crate::path::resolve`] where they
//! come from callers.

use crate::path;
use crate::{AssetLoader, BundleResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Dir,
    File,
}

/// A directory or regular file below the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
}

pub(crate) trait Storage {
    /// Human readable root, used in error messages.
    fn root_display(&self) -> String;

    fn is_file(&self, path: &str) -> bool;

    /// Read a file, `None` when it does not exist.
    fn read(&self, path: &str) -> BundleResult<Option<Vec<u8>>>;

    /// Write a file, creating parent directories and replacing existing content.
    fn write(&mut self, path: &str, bytes: &[u8]) -> BundleResult<()>;

    /// Remove a file, returning whether it existed.
    fn remove(&mut self, path: &str) -> BundleResult<bool>;

    /// Direct children of a directory sorted by path. A missing directory, or a
    /// file where the directory should be, is empty.
    fn list_dir(&self, path: &str) -> BundleResult<Vec<TreeEntry>>;

    /// Deferred reader for a file.
    fn loader(&self, path: &str) -> AssetLoader;
}

/// Pre-order walk below `dir`: every directory comes before its contents.
pub(crate) fn walk<S: Storage + ?Sized>(storage: &S, dir: &str) -> BundleResult<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    walk_into(storage, dir, &mut entries)?;
    Ok(entries)
}

fn walk_into<S: Storage + ?Sized>(
    storage: &S,
    dir: &str,
    entries: &mut Vec<TreeEntry>,
) -> BundleResult<()> {
    for entry in storage.list_dir(dir)? {
        let is_dir = entry.kind == EntryKind::Dir;
        let child = entry.path.clone();
        entries.push(entry);
        if is_dir {
            walk_into(storage, &child, entries)?;
        }
    }
    Ok(())
}

/// Storage rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub(crate) struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl Storage for DiskStorage {
    fn root_display(&self) -> String {
        self.root.display().to_string()
    }

    fn is_file(&self, path: &str) -> bool {
        self.full_path(path).is_file()
    }

    fn read(&self, path: &str) -> BundleResult<Option<Vec<u8>>> {
        match fs::read(self.full_path(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> BundleResult<()> {
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, bytes)?;
        Ok(())
    }

    fn remove(&mut self, path: &str) -> BundleResult<bool> {
        match fs::remove_file(self.full_path(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_dir(&self, dir: &str) -> BundleResult<Vec<TreeEntry>> {
        let read_dir = match fs::read_dir(self.full_path(dir)) {
            Ok(read_dir) => read_dir,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            // Symlinks and special files are not part of a bundle
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(TreeEntry {
                path: path::join(dir, &name),
                kind,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn loader(&self, path: &str) -> AssetLoader {
        let full_path = self.full_path(path);
        Arc::new(move || -> BundleResult<Vec<u8>> { Ok(fs::read(&full_path)?) })
    }
}

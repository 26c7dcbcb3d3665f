//! Bundles stored as a plain directory.
//!
//! The [`DirectoryBundle`] maps the bundle layout directly onto a directory
//! (usually named `*.textbundle`) and can pack itself into a `.textpack`.

use crate::layout::Layout;
use crate::storage::{DiskStorage, EntryKind, walk};
use crate::{
    ArchiveOptions, Asset, BundleContent, BundleResult, BundleStore, INFO_FILE, Metadata,
};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use zip::ZipWriter;

/// A bundle backed by a directory on the local filesystem.
///
/// # Example
///
/// ```no_run
/// use textbundle::{BundleStore, DirectoryBundle};
///
/// let bundle = DirectoryBundle::open("notes.textbundle")?;
/// let content = bundle.read_content()?;
/// println!("{}", content.text());
/// bundle.close()?;
/// # Ok::<(), textbundle::BundleError>(())
/// ```
#[derive(Debug)]
pub struct DirectoryBundle {
    layout: Layout<DiskStorage>,
}

impl DirectoryBundle {
    /// Open a bundle directory, creating it if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        let root = normalize(&std::path::absolute(path.as_ref())?);
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }

        tracing::debug!("Opened bundle directory {}", root.display());
        Ok(Self {
            layout: Layout::new(DiskStorage::new(root)),
        })
    }

    /// Check whether `path` is a directory holding a bundle (`info.json`).
    #[must_use]
    pub fn is_bundle_dir<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        path.is_dir() && path.join(INFO_FILE).is_file()
    }

    /// Pack the directory into a zip archive at `target` with default options.
    ///
    /// See [`DirectoryBundle::pack_to_with`].
    pub fn pack_to<P: AsRef<Path>>(&self, target: P) -> BundleResult<()> {
        self.pack_to_with(target, &ArchiveOptions::default())
    }

    /// Pack the directory into a zip archive at `target`.
    ///
    /// An existing file at `target` is replaced and missing parent
    /// directories are created. Entries are written at the archive root,
    /// each directory before its contents, with file bytes copied unchanged.
    /// A failure part way through leaves a partial archive behind.
    pub fn pack_to_with<P: AsRef<Path>>(
        &self,
        target: P,
        options: &ArchiveOptions,
    ) -> BundleResult<()> {
        let target = target.as_ref();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if target.exists() {
            fs::remove_file(target)?;
        }

        let storage = self.layout.storage();
        let entries = walk(storage, "")?;
        let mut zip = ZipWriter::new(File::create(target)?);
        let mut files = 0usize;

        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    zip.add_directory(entry.path.as_str(), options.dir_options())?;
                }
                EntryKind::File => {
                    let bytes = fs::read(storage.root().join(&entry.path))?;
                    zip.start_file(entry.path.as_str(), options.file_options())?;
                    zip.write_all(&bytes)?;
                    files += 1;
                }
            }
            tracing::debug!("Packed {}", entry.path);
        }

        zip.finish()?;

        tracing::info!(
            "Packed {} into {} ({files} files)",
            storage.root().display(),
            target.display()
        );
        Ok(())
    }
}

impl BundleStore for DirectoryBundle {
    fn read_metadata(&self) -> BundleResult<Metadata> {
        self.layout.read_metadata()
    }

    fn write_metadata(&mut self, metadata: &Metadata) -> BundleResult<&mut Self> {
        self.layout.write_metadata(metadata)?;
        Ok(self)
    }

    fn read_assets(&self) -> BundleResult<HashSet<Asset>> {
        self.layout.read_assets()
    }

    fn write_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self> {
        self.layout.write_asset(asset)?;
        Ok(self)
    }

    fn remove_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self> {
        self.layout.remove_asset(asset)?;
        Ok(self)
    }

    fn read_content(&self) -> BundleResult<BundleContent> {
        self.layout.read_content()
    }

    fn write_content(&mut self, content: &BundleContent) -> BundleResult<&mut Self> {
        self.layout.write_content(content)?;
        Ok(self)
    }

    fn root(&self) -> &Path {
        self.layout.storage().root()
    }

    fn close(self) -> BundleResult<()> {
        Ok(())
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

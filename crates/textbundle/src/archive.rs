//! Bundles stored as a single zip archive.
//!
//! The [`ArchiveBundle`] reads and writes a `.textpack` file. Archives made
//! by other tools either keep the bundle layout at the archive root or wrap
//! it in one `<name>.textbundle/` directory; the location actually used is
//! the *inner root*, resolved once when the archive is opened:
//!
//! 1. a top-level `info.json` (exact name) selects the archive root;
//! 2. otherwise a single top-level `*.textbundle` directory is used;
//! 3. otherwise a directory named after the archive file (`notes.textpack`
//!    gives `notes.textbundle/`, a name without extension gets a random one)
//!    becomes the inner root.
//!
//! Changes are kept in memory and written back when the bundle is closed.

mod zip_storage;

use crate::layout::Layout;
use crate::storage::{EntryKind, Storage, walk};
use crate::{
    ArchiveOptions, Asset, BUNDLE_EXTENSION, BundleContent, BundleResult, BundleStore, INFO_FILE,
    Metadata,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use zip_storage::{ZipStorage, open_storage};

/// A bundle backed by a zip archive file.
///
/// Writes become visible in the file when the bundle is closed (or flushed).
/// Dropping an unclosed bundle flushes on a best-effort basis and only logs
/// failures, so call [`BundleStore::close`] to observe errors.
///
/// # Example
///
/// ```no_run
/// use textbundle::{ArchiveBundle, Asset, BundleStore};
///
/// let mut pack = ArchiveBundle::open("notes.textpack")?;
/// pack.write_asset(&Asset::new("img.png", vec![1, 2, 3]))?;
/// pack.unpack_to("notes.textbundle")?;
/// pack.close()?;
/// # Ok::<(), textbundle::BundleError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveBundle {
    path: PathBuf,
    options: ArchiveOptions,
    layout: Layout<ZipStorage>,
    closed: bool,
}

impl ArchiveBundle {
    /// Open an archive with default options, creating it if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        Self::open_with(path, ArchiveOptions::default())
    }

    /// Open an archive, creating it if it does not exist.
    ///
    /// `options` apply whenever the archive is written back.
    pub fn open_with<P: AsRef<Path>>(path: P, options: ArchiveOptions) -> BundleResult<Self> {
        let path = std::path::absolute(path.as_ref())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut storage = open_storage(&path)?;
        let inner_root = resolve_inner_root(&mut storage, &path)?;
        tracing::debug!(
            "Opened archive {} with inner root '{inner_root}'",
            path.display()
        );
        storage.set_prefix(inner_root);

        Ok(Self {
            path,
            options,
            layout: Layout::new(storage),
            closed: false,
        })
    }

    /// Path inside the archive where the bundle starts (`""` for the archive root).
    #[must_use]
    pub fn inner_root(&self) -> &str {
        self.layout.storage().prefix()
    }

    /// Options used when the archive is written.
    #[must_use]
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Whether there are changes not yet written to the archive file.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.layout.storage().is_dirty()
    }

    /// Write pending changes to the archive file.
    ///
    /// The archive is rewritten into a temporary file next to it which then
    /// replaces the original, so readers never see a half-written archive.
    pub fn flush(&mut self) -> BundleResult<()> {
        let storage = self.layout.storage();
        if !storage.is_dirty() {
            return Ok(());
        }

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        storage.write_archive(temp.as_file_mut(), &self.options)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        self.layout.storage_mut().mark_clean();
        tracing::info!("Wrote archive {}", self.path.display());
        Ok(())
    }

    /// Recreate the bundle as a directory at `target`.
    ///
    /// `target` is created if needed. Everything below the inner root is
    /// copied, each directory before its contents, replacing files that
    /// already exist. Pending (unflushed) changes are included. A failure
    /// part way through leaves a partially written directory behind.
    pub fn unpack_to<P: AsRef<Path>>(&self, target: P) -> BundleResult<()> {
        let target = target.as_ref();
        fs::create_dir_all(target)?;

        let storage = self.layout.storage();
        let mut files = 0usize;
        for entry in walk(storage, "")? {
            let destination = target.join(&entry.path);
            match entry.kind {
                EntryKind::Dir => fs::create_dir_all(&destination)?,
                EntryKind::File => {
                    if let Some(bytes) = storage.read(&entry.path)? {
                        fs::write(&destination, bytes)?;
                        files += 1;
                    }
                }
            }
            tracing::debug!("Unpacked {}", entry.path);
        }

        tracing::info!(
            "Unpacked {} into {} ({files} files)",
            self.path.display(),
            target.display()
        );
        Ok(())
    }
}

impl BundleStore for ArchiveBundle {
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
        &self.path
    }

    fn close(mut self) -> BundleResult<()> {
        self.closed = true;
        self.flush()
    }
}

impl Drop for ArchiveBundle {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to write archive {}: {e}", self.path.display());
        }
    }
}

/// Pick the directory inside the archive that holds the bundle.
fn resolve_inner_root(storage: &mut ZipStorage, archive_path: &Path) -> BundleResult<String> {
    let top_level = storage.top_level();

    let has_info = top_level
        .iter()
        .any(|(name, kind)| *kind == EntryKind::File && name == INFO_FILE);
    if has_info {
        return Ok(String::new());
    }

    let suffix = format!(".{BUNDLE_EXTENSION}");
    let candidates: Vec<&String> = top_level
        .iter()
        .filter(|(name, kind)| *kind == EntryKind::Dir && name.to_lowercase().ends_with(&suffix))
        .map(|(name, _)| name)
        .collect();
    if let [single] = candidates.as_slice() {
        return Ok((*single).clone());
    }

    let name = derived_inner_name(archive_path);
    if top_level.is_empty() || storage.is_dirty() {
        storage.create_top_level_dir(&name)?;
    }
    Ok(name)
}

/// `<stem>.textbundle` for an archive named `<stem>.<ext>`, a random name otherwise.
fn derived_inner_name(archive_path: &Path) -> String {
    let file_name = archive_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{BUNDLE_EXTENSION}", &file_name[..dot]),
        _ => format!("{}.{BUNDLE_EXTENSION}", uuid::Uuid::new_v4()),
    }
}

#[cfg(test)]
#[path = "archive/archive_tests.rs"]
mod archive_tests;

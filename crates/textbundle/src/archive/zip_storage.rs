//! In-memory view of a zip archive.
//!
//! The archive's entry list is read once at open. File bytes that came from
//! the archive stay compressed on disk until they are read; written files are
//! held in memory until the archive is persisted.

use crate::path;
use crate::storage::{EntryKind, Storage, TreeEntry};
use crate::{ArchiveOptions, AssetLoader, BundleError, BundleResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;
use zip::{ZipArchive, ZipWriter};

type SharedArchive = Arc<Mutex<ZipArchive<File>>>;

#[derive(Debug, Clone)]
enum ZipEntry {
    Dir,
    /// File stored in the source archive at this index.
    Archived(usize),
    /// File written since the archive was opened.
    Written(Arc<Vec<u8>>),
}

impl ZipEntry {
    fn kind(&self) -> EntryKind {
        match self {
            Self::Dir => EntryKind::Dir,
            Self::Archived(_) | Self::Written(_) => EntryKind::File,
        }
    }
}

/// Entry tree of one archive, addressed relative to a prefix (the inner root).
pub(crate) struct ZipStorage {
    display: String,
    prefix: String,
    entries: BTreeMap<String, ZipEntry>,
    source: Option<SharedArchive>,
    dirty: bool,
}

impl ZipStorage {
    /// Storage for an archive that does not exist yet.
    pub(crate) fn empty(display: String) -> Self {
        Self {
            display,
            prefix: String::new(),
            entries: BTreeMap::new(),
            source: None,
            dirty: true,
        }
    }

    /// Read the entry list of an existing archive.
    ///
    /// Entry names that are absolute or climb out of the archive are skipped.
    pub(crate) fn load(display: String, file: File) -> BundleResult<Self> {
        let archive = ZipArchive::new(file)?;
        let mut entries = BTreeMap::new();

        for index in 0..archive.len() {
            let Some(raw_name) = archive.name_for_index(index) else {
                continue;
            };
            let is_dir = raw_name.ends_with('/');
            let name = match path::resolve(raw_name, &display) {
                Ok(name) => name,
                Err(_) => {
                    tracing::warn!("Skipping archive entry outside the archive root: {raw_name}");
                    continue;
                }
            };

            add_parents(&mut entries, &name);
            if is_dir {
                entries.entry(name).or_insert(ZipEntry::Dir);
            } else {
                entries.insert(name, ZipEntry::Archived(index));
            }
        }

        Ok(Self {
            display,
            prefix: String::new(),
            entries,
            source: Some(Arc::new(Mutex::new(archive))),
            dirty: false,
        })
    }

    /// Names of the entries at the archive root with their kinds.
    pub(crate) fn top_level(&self) -> Vec<(String, EntryKind)> {
        self.entries
            .iter()
            .filter(|(name, _)| !name.contains('/'))
            .map(|(name, entry)| (name.clone(), entry.kind()))
            .collect()
    }

    /// Make `prefix` the root for all [`Storage`] calls.
    pub(crate) fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Create a top-level directory, failing if a file has that name.
    pub(crate) fn create_top_level_dir(&mut self, name: &str) -> BundleResult<()> {
        match self.entries.get(name) {
            Some(ZipEntry::Dir) => Ok(()),
            Some(_) => Err(BundleError::InvalidArchive(format!(
                "{name} is a file in {}",
                self.display
            ))),
            None => {
                self.entries.insert(name.to_string(), ZipEntry::Dir);
                self.dirty = true;
                Ok(())
            }
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write every entry into `writer` as a complete zip archive.
    ///
    /// Entries are written in path order, so directories precede their
    /// contents.
    pub(crate) fn write_archive<W: Write + Seek>(
        &self,
        writer: W,
        options: &ArchiveOptions,
    ) -> BundleResult<W> {
        let mut zip = ZipWriter::new(writer);

        for (name, entry) in &self.entries {
            match entry {
                ZipEntry::Dir => {
                    zip.add_directory(name.as_str(), options.dir_options())?;
                }
                ZipEntry::Archived(index) => {
                    let bytes = self.read_archived(*index)?;
                    zip.start_file(name.as_str(), options.file_options())?;
                    zip.write_all(&bytes)?;
                }
                ZipEntry::Written(bytes) => {
                    zip.start_file(name.as_str(), options.file_options())?;
                    zip.write_all(bytes)?;
                }
            }
        }

        Ok(zip.finish()?)
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn read_archived(&self, index: usize) -> BundleResult<Vec<u8>> {
        match &self.source {
            Some(source) => read_index(source, index),
            None => Err(BundleError::InvalidArchive(format!(
                "no source archive for entry {index} in {}",
                self.display
            ))),
        }
    }

    fn full_path(&self, path: &str) -> String {
        path::join(&self.prefix, path)
    }
}

fn read_index(source: &SharedArchive, index: usize) -> BundleResult<Vec<u8>> {
    let mut archive = source.lock();
    let mut file = archive.by_index(index)?;
    let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Insert directory entries for every ancestor of `name`.
fn add_parents(entries: &mut BTreeMap<String, ZipEntry>, name: &str) {
    let mut end = 0;
    while let Some(offset) = name[end..].find('/') {
        end += offset;
        entries
            .entry(name[..end].to_string())
            .or_insert(ZipEntry::Dir);
        end += 1;
    }
}

impl Storage for ZipStorage {
    fn root_display(&self) -> String {
        if self.prefix.is_empty() {
            self.display.clone()
        } else {
            format!("{}!/{}", self.display, self.prefix)
        }
    }

    fn is_file(&self, path: &str) -> bool {
        self.entries
            .get(&self.full_path(path))
            .is_some_and(|entry| entry.kind() == EntryKind::File)
    }

    fn read(&self, path: &str) -> BundleResult<Option<Vec<u8>>> {
        match self.entries.get(&self.full_path(path)) {
            Some(ZipEntry::Archived(index)) => self.read_archived(*index).map(Some),
            Some(ZipEntry::Written(bytes)) => Ok(Some(bytes.as_ref().clone())),
            Some(ZipEntry::Dir) | None => Ok(None),
        }
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> BundleResult<()> {
        let full_path = self.full_path(path);

        let mut end = 0;
        while let Some(offset) = full_path[end..].find('/') {
            end += offset;
            let parent = &full_path[..end];
            if let Some(ZipEntry::Archived(_) | ZipEntry::Written(_)) = self.entries.get(parent) {
                return Err(BundleError::InvalidArchive(format!(
                    "{parent} is a file in {}",
                    self.display
                )));
            }
            end += 1;
        }
        if let Some(ZipEntry::Dir) = self.entries.get(&full_path) {
            return Err(BundleError::InvalidArchive(format!(
                "{full_path} is a directory in {}",
                self.display
            )));
        }

        add_parents(&mut self.entries, &full_path);
        self.entries
            .insert(full_path, ZipEntry::Written(Arc::new(bytes.to_vec())));
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self, path: &str) -> BundleResult<bool> {
        let full_path = self.full_path(path);
        match self.entries.get(&full_path) {
            Some(ZipEntry::Archived(_) | ZipEntry::Written(_)) => {
                self.entries.remove(&full_path);
                self.dirty = true;
                Ok(true)
            }
            Some(ZipEntry::Dir) | None => Ok(false),
        }
    }

    fn list_dir(&self, dir: &str) -> BundleResult<Vec<TreeEntry>> {
        let full_dir = self.full_path(dir);
        if !full_dir.is_empty() && !matches!(self.entries.get(&full_dir), Some(ZipEntry::Dir)) {
            return Ok(Vec::new());
        }

        let child_prefix = if full_dir.is_empty() {
            String::new()
        } else {
            format!("{full_dir}/")
        };

        let entries = self
            .entries
            .range(child_prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&child_prefix))
            .filter_map(|(name, entry)| {
                let child = &name[child_prefix.len()..];
                (!child.is_empty() && !child.contains('/')).then(|| TreeEntry {
                    path: path::join(dir, child),
                    kind: entry.kind(),
                })
            })
            .collect();
        Ok(entries)
    }

    fn loader(&self, path: &str) -> AssetLoader {
        let full_path = self.full_path(path);
        match (self.entries.get(&full_path), &self.source) {
            (Some(ZipEntry::Archived(index)), Some(source)) => {
                let source = Arc::clone(source);
                let index = *index;
                Arc::new(move || read_index(&source, index))
            }
            (Some(ZipEntry::Written(bytes)), _) => {
                let bytes = Arc::clone(bytes);
                Arc::new(move || -> BundleResult<Vec<u8>> { Ok(bytes.as_ref().clone()) })
            }
            _ => Arc::new(move || -> BundleResult<Vec<u8>> {
                Err(BundleError::MissingFile(full_path.clone()))
            }),
        }
    }
}

impl std::fmt::Debug for ZipStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipStorage")
            .field("archive", &self.display)
            .field("prefix", &self.prefix)
            .field("entries", &self.entries.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Open an archive file, or start an empty one when it is missing or empty.
pub(crate) fn open_storage(path: &Path) -> BundleResult<ZipStorage> {
    let display = path.display().to_string();
    if path.is_dir() {
        return Err(BundleError::InvalidArchive(format!(
            "{display} is a directory"
        )));
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => ZipStorage::load(display, File::open(path)?),
        Ok(_) => Ok(ZipStorage::empty(display)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ZipStorage::empty(display)),
        Err(e) => Err(e.into()),
    }
}

//! Bundle layout rules shared by both backends.
//!
//! [`Layout`] knows where `info.json`, the primary content file and the
//! `assets/` tree live relative to a [`Storage`] root and enforces the
//! layout invariants: paths stay inside the root, a metadata record exists
//! after any content or asset write, and there is a single primary content
//! file.

use crate::path;
use crate::storage::{EntryKind, Storage, walk};
use crate::{
    ASSETS_DIR, Asset, BundleContent, BundleError, BundleResult, CONTENT_PREFIX, ContentType,
    INFO_FILE, Metadata,
};
use std::collections::HashSet;

#[derive(Debug)]
pub(crate) struct Layout<S> {
    storage: S,
}

impl<S: Storage> Layout<S> {
    pub(crate) fn new(storage: S) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub(crate) fn read_metadata(&self) -> BundleResult<Metadata> {
        match self.storage.read(INFO_FILE)? {
            Some(bytes) => Metadata::from_json(&bytes),
            None => Ok(Metadata::default()),
        }
    }

    pub(crate) fn write_metadata(&mut self, metadata: &Metadata) -> BundleResult<()> {
        let json = metadata.to_json()?;
        self.storage.write(INFO_FILE, json.as_bytes())
    }

    fn ensure_metadata(&mut self) -> BundleResult<()> {
        if !self.storage.is_file(INFO_FILE) {
            tracing::debug!(
                "Creating default {INFO_FILE} in {}",
                self.storage.root_display()
            );
            self.write_metadata(&Metadata::default())?;
        }
        Ok(())
    }

    pub(crate) fn read_assets(&self) -> BundleResult<HashSet<Asset>> {
        let assets = walk(&self.storage, ASSETS_DIR)?
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| {
                let loader = self.storage.loader(&entry.path);
                Asset::with_loader(entry.path, loader)
            })
            .collect();
        Ok(assets)
    }

    pub(crate) fn write_asset(&mut self, asset: &Asset) -> BundleResult<()> {
        let target = path::resolve(asset.path(), &self.storage.root_display())?;
        let bytes = asset.read_content()?;

        self.ensure_metadata()?;
        self.storage.write(&target, bytes)?;

        tracing::debug!("Wrote asset {target} ({} bytes)", bytes.len());
        Ok(())
    }

    pub(crate) fn remove_asset(&mut self, asset: &Asset) -> BundleResult<()> {
        let target = path::resolve(asset.path(), &self.storage.root_display())?;
        if self.storage.remove(&target)? {
            tracing::debug!("Removed asset {target}");
        }
        Ok(())
    }

    /// Primary content files directly under the root, sorted by name.
    fn content_files(&self) -> BundleResult<Vec<String>> {
        let files = self
            .storage
            .list_dir("")?
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.path)
            .filter(|name| name.to_lowercase().starts_with(CONTENT_PREFIX))
            .collect();
        Ok(files)
    }

    pub(crate) fn read_content(&self) -> BundleResult<BundleContent> {
        let file_name = self
            .content_files()?
            .into_iter()
            .next()
            .unwrap_or_else(|| ContentType::default().file_name());

        let content_type = ContentType::find_by_file_name(&file_name)
            .ok_or_else(|| BundleError::UnsupportedContentType(file_name.clone()))?;

        let bytes = self
            .storage
            .read(&file_name)?
            .ok_or_else(|| BundleError::MissingFile(file_name.clone()))?;

        Ok(BundleContent::new(content_type, bytes))
    }

    pub(crate) fn write_content(&mut self, content: &BundleContent) -> BundleResult<()> {
        self.ensure_metadata()?;

        let target = content.file_name();
        for stale in self.content_files()? {
            if stale != target {
                tracing::debug!("Removing stale primary content {stale}");
                self.storage.remove(&stale)?;
            }
        }

        self.storage.write(&target, content.bytes())
    }
}

//! The common bundle contract.
//!
//! [`BundleStore`] is implemented by [`DirectoryBundle`], [`ArchiveBundle`]
//! and the [`Bundle`] enum that picks one of them at open time. Callers read
//! and write metadata, content and assets without knowing which backend holds
//! the bytes.
//!
//! Every implementation upholds the same rules:
//!
//! - an asset path that resolves outside the bundle root is rejected with
//!   [`BundleError::PathTraversal`] before anything is written or removed;
//! - writing content or an asset creates a default `info.json` when the
//!   bundle has none;
//! - there is at most one `text.*` primary content file at the root;
//! - an asset's relative path survives a write/read round trip unchanged.
//!
//! [`DirectoryBundle`]: crate::DirectoryBundle
//! [`ArchiveBundle`]: crate::ArchiveBundle
//! [`Bundle`]: crate::Bundle
//! [`BundleError::PathTraversal`]: crate::BundleError::PathTraversal

use crate::{Asset, BundleContent, BundleResult, Metadata};
use std::collections::HashSet;
use std::path::Path;

/// Uniform read/write access to a bundle.
///
/// Mutating methods return the store so calls can be chained:
///
/// ```no_run
/// use textbundle::{Asset, BundleContent, BundleStore, ContentType, DirectoryBundle};
///
/// let mut bundle = DirectoryBundle::open("/tmp/b.textbundle")?;
/// bundle
///     .write_content(&BundleContent::from_text(ContentType::Markdown, "Hello"))?
///     .write_asset(&Asset::new("img.png", vec![0x01, 0x02]))?;
/// bundle.close()?;
/// # Ok::<(), textbundle::BundleError>(())
/// ```
pub trait BundleStore {
    /// Read `info.json`, or a default record when the bundle has none.
    ///
    /// Fails with [`crate::BundleError::MalformedMetadata`] when the record
    /// exists but cannot be decoded.
    fn read_metadata(&self) -> BundleResult<Metadata>;

    /// Replace `info.json` with `metadata`.
    fn write_metadata(&mut self, metadata: &Metadata) -> BundleResult<&mut Self>;

    /// List every regular file under `assets/`.
    ///
    /// Returned assets load their bytes on first [`Asset::read_content`].
    fn read_assets(&self) -> BundleResult<HashSet<Asset>>;

    /// Write an asset, replacing any file at the same path.
    fn write_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self>;

    /// Remove an asset. Removing an asset that does not exist is a no-op.
    fn remove_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self>;

    /// Read the primary content.
    ///
    /// Fails with [`crate::BundleError::MissingFile`] when the bundle has no
    /// primary content file and with
    /// [`crate::BundleError::UnsupportedContentType`] when its extension is
    /// not registered.
    fn read_content(&self) -> BundleResult<BundleContent>;

    /// Write the primary content as `text.<ext>`, replacing the previous one.
    fn write_content(&mut self, content: &BundleContent) -> BundleResult<&mut Self>;

    /// Path this store was opened on (directory or archive file).
    fn root(&self) -> &Path;

    /// Release the store, persisting pending archive changes.
    fn close(self) -> BundleResult<()>
    where
        Self: Sized;

    /// Remove assets the primary content does not mention.
    ///
    /// Returns the relative paths of the removed assets. See
    /// [`crate::optimize()`].
    fn optimize(&mut self) -> BundleResult<Vec<String>>
    where
        Self: Sized,
    {
        crate::optimize::optimize(self)
    }
}

//! Bundle assets.
//!
//! An [`Asset`] names a file under the bundle's `assets/` directory and knows
//! where its bytes come from. Assets created by callers carry their bytes
//! inline; assets discovered by [`BundleStore::read_assets`] defer the read
//! until [`Asset::read_content`] is first called and cache the result.
//!
//! [`BundleStore::read_assets`]: crate::BundleStore::read_assets

use crate::{ASSETS_DIR, BundleResult};
use once_cell::sync::OnceCell;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

/// Deferred reader for an asset's bytes.
pub type AssetLoader = Arc<dyn Fn() -> BundleResult<Vec<u8>> + Send + Sync>;

/// Where an asset's bytes come from.
#[derive(Clone)]
pub enum AssetSource {
    /// Bytes held in memory.
    Inline(Vec<u8>),
    /// Bytes read by `loader` on first access, then kept in `cache`.
    Lazy {
        loader: AssetLoader,
        cache: OnceCell<Vec<u8>>,
    },
}

/// A binary file stored under `assets/`.
///
/// Two assets are equal when their relative paths are equal, regardless of
/// content.
#[derive(Clone)]
pub struct Asset {
    relative_path: String,
    source: AssetSource,
}

impl Asset {
    /// Create an asset named `file_name` holding `bytes`.
    ///
    /// `file_name` is relative to `assets/` and may contain subdirectories.
    #[must_use]
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            relative_path: asset_path(file_name),
            source: AssetSource::Inline(bytes),
        }
    }

    /// Create an asset named `file_name` from the contents of `source_path`.
    ///
    /// The file is read immediately.
    pub fn from_file<P: AsRef<Path>>(file_name: &str, source_path: P) -> BundleResult<Self> {
        let bytes = fs::read(source_path.as_ref())?;
        Ok(Self::new(file_name, bytes))
    }

    /// Create an asset at `relative_path` whose bytes are produced by `loader`.
    ///
    /// `relative_path` is relative to the bundle root (`assets/...`).
    #[must_use]
    pub fn with_loader(relative_path: impl Into<String>, loader: AssetLoader) -> Self {
        Self {
            relative_path: relative_path.into().replace('\\', "/"),
            source: AssetSource::Lazy {
                loader,
                cache: OnceCell::new(),
            },
        }
    }

    /// Path relative to the bundle root, e.g. `assets/image.png`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.relative_path
    }

    /// Path relative to `assets/`, e.g. `image.png`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative_path
            .strip_prefix(ASSETS_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.relative_path)
    }

    /// Get the asset's bytes, loading them on first call if needed.
    pub fn read_content(&self) -> BundleResult<&[u8]> {
        match &self.source {
            AssetSource::Inline(bytes) => Ok(bytes),
            AssetSource::Lazy { loader, cache } => {
                cache.get_or_try_init(|| loader()).map(Vec::as_slice)
            }
        }
    }

    /// Whether the bytes are already in memory.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        match &self.source {
            AssetSource::Inline(_) => true,
            AssetSource::Lazy { cache, .. } => cache.get().is_some(),
        }
    }

    /// Get the source state of this asset.
    #[must_use]
    pub fn source(&self) -> &AssetSource {
        &self.source
    }
}

fn asset_path(file_name: &str) -> String {
    format!("{ASSETS_DIR}/{}", file_name.replace('\\', "/"))
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.relative_path == other.relative_path
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.relative_path.hash(state);
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("relative_path", &self.relative_path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

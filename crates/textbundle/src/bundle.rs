//! Backend selection at open time.
//!
//! [`Bundle`] wraps either backend so callers that accept both a
//! `.textbundle` directory and a `.textpack` archive can hold one type.

use crate::{
    ArchiveBundle, ArchiveOptions, Asset, BundleContent, BundleResult, BundleStore,
    DirectoryBundle, Metadata,
};
use std::collections::HashSet;
use std::path::Path;

/// A bundle of either kind, chosen from what exists at the path.
///
/// An existing directory opens as a [`DirectoryBundle`]; anything else (an
/// existing file or a path that does not exist yet) opens as an
/// [`ArchiveBundle`].
#[derive(Debug)]
pub enum Bundle {
    /// A bundle stored as a directory.
    Directory(DirectoryBundle),
    /// A bundle stored as a zip archive.
    Archive(ArchiveBundle),
}

impl Bundle {
    /// Open the bundle at `path` with default archive options.
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        Self::open_with(path, ArchiveOptions::default())
    }

    /// Open the bundle at `path`; `options` only apply to archives.
    pub fn open_with<P: AsRef<Path>>(path: P, options: ArchiveOptions) -> BundleResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Ok(Self::Directory(DirectoryBundle::open(path)?))
        } else {
            Ok(Self::Archive(ArchiveBundle::open_with(path, options)?))
        }
    }

    /// Whether the directory backend was selected.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Whether the archive backend was selected.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}

impl BundleStore for Bundle {
    fn read_metadata(&self) -> BundleResult<Metadata> {
        match self {
            Self::Directory(bundle) => bundle.read_metadata(),
            Self::Archive(bundle) => bundle.read_metadata(),
        }
    }

    fn write_metadata(&mut self, metadata: &Metadata) -> BundleResult<&mut Self> {
        match self {
            Self::Directory(bundle) => {
                bundle.write_metadata(metadata)?;
            }
            Self::Archive(bundle) => {
                bundle.write_metadata(metadata)?;
            }
        }
        Ok(self)
    }

    fn read_assets(&self) -> BundleResult<HashSet<Asset>> {
        match self {
            Self::Directory(bundle) => bundle.read_assets(),
            Self::Archive(bundle) => bundle.read_assets(),
        }
    }

    fn write_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self> {
        match self {
            Self::Directory(bundle) => {
                bundle.write_asset(asset)?;
            }
            Self::Archive(bundle) => {
                bundle.write_asset(asset)?;
            }
        }
        Ok(self)
    }

    fn remove_asset(&mut self, asset: &Asset) -> BundleResult<&mut Self> {
        match self {
            Self::Directory(bundle) => {
                bundle.remove_asset(asset)?;
            }
            Self::Archive(bundle) => {
                bundle.remove_asset(asset)?;
            }
        }
        Ok(self)
    }

    fn read_content(&self) -> BundleResult<BundleContent> {
        match self {
            Self::Directory(bundle) => bundle.read_content(),
            Self::Archive(bundle) => bundle.read_content(),
        }
    }

    fn write_content(&mut self, content: &BundleContent) -> BundleResult<&mut Self> {
        match self {
            Self::Directory(bundle) => {
                bundle.write_content(content)?;
            }
            Self::Archive(bundle) => {
                bundle.write_content(content)?;
            }
        }
        Ok(self)
    }

    fn root(&self) -> &Path {
        match self {
            Self::Directory(bundle) => bundle.root(),
            Self::Archive(bundle) => bundle.root(),
        }
    }

    fn close(self) -> BundleResult<()> {
        match self {
            Self::Directory(bundle) => bundle.close(),
            Self::Archive(bundle) => bundle.close(),
        }
    }
}

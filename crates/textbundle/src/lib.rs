//! TextBundle storage for directories and zip archives
//!
//! This crate reads and writes TextBundles: one primary text document, an
//! `info.json` metadata record and a tree of binary assets. The same bundle
//! can live as a loose directory (`.textbundle`) or as a single zip file
//! (`.textpack`), and both are driven through the [`BundleStore`] trait.
//!
//! # Bundle Structure
//!
//! ```text
//! notes.textbundle
//! ├── info.json              # metadata record
//! ├── text.markdown          # primary content
//! └── assets/
//!     ├── diagram.png
//!     └── audio/
//!         └── memo.m4a
//! ```
//!
//! A `.textpack` archive holds the same layout either at the archive root or
//! one level down inside a single `<name>.textbundle/` directory.
//!
//! # Example
//!
//! ```no_run
//! use textbundle::{Asset, BundleContent, BundleStore, ContentType, DirectoryBundle};
//!
//! let mut bundle = DirectoryBundle::open("notes.textbundle")?;
//! bundle
//!     .write_content(&BundleContent::from_text(ContentType::Markdown, "![](assets/img.png)"))?
//!     .write_asset(&Asset::new("img.png", vec![0x89, 0x50]))?;
//!
//! bundle.pack_to("notes.textpack")?;
//! bundle.close()?;
//! # Ok::<(), textbundle::BundleError>(())
//! ```

mod asset;
mod bundle;
mod config;
mod content;
mod content_type;
mod error;
mod layout;
mod metadata;
mod path;
mod storage;

pub mod archive;
pub mod directory;
pub mod optimize;
pub mod store;

pub use archive::ArchiveBundle;
pub use asset::{Asset, AssetLoader, AssetSource};
pub use bundle::Bundle;
pub use config::{ArchiveOptions, Compression};
pub use content::BundleContent;
pub use content_type::ContentType;
pub use directory::DirectoryBundle;
pub use error::BundleError;
pub use metadata::Metadata;
pub use optimize::optimize;
pub use store::BundleStore;

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Extension of a bundle stored as a directory.
pub const BUNDLE_EXTENSION: &str = "textbundle";

/// Extension of a bundle stored as a zip archive.
pub const PACK_EXTENSION: &str = "textpack";

/// Metadata record file name within the bundle.
pub const INFO_FILE: &str = "info.json";

/// Directory holding the bundle's assets.
pub const ASSETS_DIR: &str = "assets";

/// File name prefix of the primary content file.
pub const CONTENT_PREFIX: &str = "text.";

/// Metadata format version written into new records.
pub const METADATA_VERSION: i32 = 2;

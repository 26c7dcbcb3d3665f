//! Archive writing options

use serde::{Deserialize, Serialize};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Compression applied to files written into an archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Deflate every file (the format's usual choice)
    #[default]
    Deflated,
    /// Store files uncompressed
    Stored,
}

/// Options used whenever a `.textpack` archive is written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOptions {
    /// Compression method for archive entries
    #[serde(default)]
    pub compression: Compression,

    /// Compression level handed to the zip writer (method default when unset)
    #[serde(default)]
    pub compression_level: Option<i64>,
}

impl ArchiveOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Zip writer options for file entries
    pub(crate) fn file_options(&self) -> SimpleFileOptions {
        let method = match self.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        let level = match self.compression {
            Compression::Deflated => self.compression_level,
            Compression::Stored => None,
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level)
    }

    /// Zip writer options for directory entries
    pub(crate) fn dir_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
    }
}

//! Error types for bundle operations.

use thiserror::Error;

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The persisted metadata record could not be decoded.
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(#[source] serde_json::Error),

    /// Primary content file has an extension outside the registry.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// A path resolved outside of the bundle root.
    #[error("Invalid asset path {path} - expected to be in {root}")]
    PathTraversal { path: String, root: String },

    /// Missing required file in bundle.
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Archive layout that cannot be used as a bundle.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),
}

//! Primary content of a bundle.

use crate::ContentType;
use std::borrow::Cow;

/// The primary document of a bundle: its content type plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleContent {
    content_type: ContentType,
    bytes: Vec<u8>,
}

impl BundleContent {
    /// Create content from raw bytes.
    #[must_use]
    pub fn new(content_type: ContentType, bytes: Vec<u8>) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    /// Create content from text, stored as UTF-8.
    #[must_use]
    pub fn from_text(content_type: ContentType, text: impl Into<String>) -> Self {
        Self::new(content_type, text.into().into_bytes())
    }

    /// Get the content type.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Get the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the bytes as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Consume the content, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Canonical file name for this content (`text.<ext>`).
    #[must_use]
    pub fn file_name(&self) -> String {
        self.content_type.file_name()
    }
}

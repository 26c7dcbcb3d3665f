//! Registry of primary content types.

use crate::CONTENT_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported primary content types.
///
/// The set of variants is the registry: it is fixed at compile time and
/// looked up by file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown text stored as `text.markdown`.
    #[default]
    Markdown,
}

impl ContentType {
    /// Get the file extension registered for this type (e.g., "markdown").
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
        }
    }

    /// Canonical primary content file name for this type.
    ///
    /// # Example
    ///
    /// ```
    /// use textbundle::ContentType;
    ///
    /// assert_eq!(ContentType::Markdown.file_name(), "text.markdown");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{CONTENT_PREFIX}{}", self.extension())
    }

    /// Parse a content type from its extension.
    #[must_use]
    pub fn parse(extension: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.extension() == extension)
    }

    /// Find the content type of a file by suffix match, ignoring case.
    #[must_use]
    pub fn find_by_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| lower.ends_with(t.extension()))
    }

    /// Get all registered content types.
    #[must_use]
    pub fn all() -> &'static [ContentType] {
        &[Self::Markdown]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

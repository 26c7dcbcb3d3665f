//! Metadata record for bundles.
//!
//! This corresponds to the `info.json` file in the bundle root. Field names
//! follow the TextBundle format, so several of them are camel case on disk.

use crate::{BundleError, BundleResult, METADATA_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Bundle metadata - the contents of `info.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Format version (currently 2).
    #[serde(default = "default_version")]
    pub version: i32,

    /// Uniform type identifier of the bundle.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,

    /// Whether the bundle is only a short-lived exchange container.
    #[serde(rename = "transient", default, skip_serializing_if = "Option::is_none")]
    pub is_transient: Option<bool>,

    /// URL of the application that created the bundle.
    #[serde(rename = "creatorURL", default, skip_serializing_if = "Option::is_none")]
    pub creator_url: Option<String>,

    /// Bundle identifier of the creating application.
    #[serde(
        rename = "creatorIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_identifier: Option<String>,

    /// URL of the original document.
    #[serde(rename = "sourceURL", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Application specific content.
    #[serde(
        rename = "applicationContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_content: Option<Map<String, Value>>,

    /// Top-level keys written by other applications, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_version() -> i32 {
    METADATA_VERSION
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: default_version(),
            bundle_type: None,
            is_transient: None,
            creator_url: None,
            creator_identifier: None,
            source_url: None,
            application_content: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Metadata {
    /// Create a record with the current version and nothing else set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> BundleResult<Self> {
        serde_json::from_slice(bytes).map_err(BundleError::MalformedMetadata)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use serde_json::json;

    #[test]
    fn Metadata___new___has_version_two_and_nothing_else() {
        let metadata = Metadata::new();

        assert_eq!(metadata.version, 2);
        assert!(metadata.bundle_type.is_none());
        assert!(metadata.is_transient.is_none());
        assert!(metadata.application_content.is_none());
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn Metadata___to_json___omits_unset_fields() {
        let json = Metadata::new().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value, json!({ "version": 2 }));
    }

    #[test]
    fn Metadata___to_json___uses_format_field_names() {
        let metadata = Metadata {
            bundle_type: Some("net.daringfireball.markdown".to_string()),
            is_transient: Some(true),
            creator_url: Some("file:///Applications/Editor.app".to_string()),
            creator_identifier: Some("com.example.editor".to_string()),
            source_url: Some("file:///Users/me/notes.md".to_string()),
            ..Metadata::default()
        };

        let value: Value = serde_json::from_str(&metadata.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "net.daringfireball.markdown");
        assert_eq!(value["transient"], true);
        assert_eq!(value["creatorURL"], "file:///Applications/Editor.app");
        assert_eq!(value["creatorIdentifier"], "com.example.editor");
        assert_eq!(value["sourceURL"], "file:///Users/me/notes.md");
    }

    #[test]
    fn Metadata___from_json___defaults_missing_version() {
        let metadata = Metadata::from_json(br#"{"transient": false}"#).unwrap();

        assert_eq!(metadata.version, 2);
        assert_eq!(metadata.is_transient, Some(false));
    }

    #[test]
    fn Metadata___from_json___keeps_unknown_keys() {
        let json = br#"{"version": 2, "com.example.editor": {"theme": "dark"}}"#;

        let metadata = Metadata::from_json(json).unwrap();
        let written: Value = serde_json::from_str(&metadata.to_json().unwrap()).unwrap();

        assert_eq!(
            metadata.extra.get("com.example.editor"),
            Some(&json!({ "theme": "dark" }))
        );
        assert_eq!(written["com.example.editor"]["theme"], "dark");
    }

    #[test]
    fn Metadata___from_json___reads_application_content() {
        let json = br#"{"version": 2, "applicationContent": {"wordCount": 12}}"#;

        let metadata = Metadata::from_json(json).unwrap();

        let content = metadata.application_content.unwrap();
        assert_eq!(content.get("wordCount"), Some(&json!(12)));
    }

    #[test]
    fn Metadata___from_json___rejects_malformed_record() {
        let result = Metadata::from_json(b"{ not json");

        assert!(matches!(result, Err(BundleError::MalformedMetadata(_))));
    }

    #[test]
    fn Metadata___json_roundtrip___is_structurally_equal() {
        let mut application_content = Map::new();
        application_content.insert("cursor".to_string(), json!(42));
        let metadata = Metadata {
            version: 3,
            is_transient: Some(true),
            creator_identifier: Some("com.example.editor".to_string()),
            application_content: Some(application_content),
            ..Metadata::default()
        };

        let parsed = Metadata::from_json(metadata.to_json().unwrap().as_bytes()).unwrap();

        assert_eq!(parsed, metadata);
    }
}

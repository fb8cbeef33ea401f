//! Shared types passed between the catalog and the IIIF engine.
//!
//! The engine never sees catalog rows. The catalog flattens each collection
//! entry into an [`ImageDescriptor`] and the manifest builder consumes those.

use serde::{Deserialize, Serialize};

/// A single `{label, value}` metadata entry shown by IIIF viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPair {
    pub label: String,
    pub value: String,
}

impl MetadataPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Flat description of one image in a collection, ready for manifest assembly.
///
/// Field mapping:
/// - `id`: source resource id; canvases derive their id from it
/// - `is_iiif`: true when our image server hosts the file; false for external links
/// - `url`: IIIF image service base for hosted files, the raw link otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Vec<MetadataPair>,
    pub is_iiif: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

//! IIIF Presentation API 2.0 document assembly.
//!
//! A manifest is a small tree, built top-down from a flat list of
//! [`ImageDescriptor`](crate::types::ImageDescriptor)s:
//!
//! ```text
//! Manifest            @id  manifest/{manifest_id}
//! └── Sequence "1"    @id  manifest/{manifest_id}/sequence/1
//!     ├── Canvas      @id  manifest/{manifest_id}/canvas/{image_id}.{index}
//!     │   └── Annotation → ImageResource
//!     └── Canvas
//!         └── Annotation → ImageResource
//! ```
//!
//! | Module | Node |
//! |--------|------|
//! | [`manifest`] | [`ManifestBuilder`]: entry point, owns the single sequence |
//! | [`sequence`] | [`Sequence`]: ordered canvases, assigns unique canvas ids |
//! | [`canvas`] | [`Canvas`]: one displayable image with label and metadata |
//! | [`resource`] | [`ImageResource`]: IIIF image service or external link |
//! | [`collection`] | [`CollectionListing`]: `sc:Collection` documents |
//!
//! Nodes hold no parent pointers. Each one carries a cloned
//! [`ManifestContext`] (manifest id + shared [`UrlBuilder`]) and computes its
//! own `@id` from it. Serialization is a depth-first walk through
//! [`IiifObject::to_value`].

pub mod canvas;
pub mod collection;
pub mod manifest;
pub mod resource;
pub mod sequence;

pub use canvas::Canvas;
pub use collection::{CollectionListing, MemberKind};
pub use manifest::ManifestBuilder;
pub use resource::ImageResource;
pub use sequence::Sequence;

use crate::urls::{Route, UrlBuilder};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// JSON-LD context of every top-level Presentation API 2.0 document.
pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

/// Conformance profile advertised by image services.
pub const IMAGE_API_LEVEL1_PROFILE: &str = "http://iiif.io/api/image/2/level1.json";

/// A node of a IIIF document.
pub trait IiifObject {
    /// Absolute URL of this node, its `@id` in most cases.
    fn url(&self) -> String;

    /// This node and all of its children as JSON.
    fn to_value(&self) -> Value;

    /// Serialize [`to_value`](Self::to_value), optionally pretty-printed.
    fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        to_json(&self.to_value(), pretty)
    }
}

/// Serialize a JSON value compactly, or with 4-space indentation and sorted
/// keys when `pretty` is set.
pub fn to_json(value: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    if !pretty {
        return serde_json::to_string(value);
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sorted(value).serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| {
        serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Copy of `value` with every object's keys in sorted order.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// What every node needs to build its own URLs.
#[derive(Clone)]
pub struct ManifestContext {
    manifest_id: Arc<str>,
    urls: Arc<dyn UrlBuilder>,
}

impl ManifestContext {
    pub fn new(manifest_id: &str, urls: Arc<dyn UrlBuilder>) -> Self {
        Self {
            manifest_id: Arc::from(manifest_id),
            urls,
        }
    }

    pub fn manifest_id(&self) -> &str {
        &self.manifest_id
    }

    pub fn url(&self, route: &Route<'_>) -> String {
        self.urls.absolute_url(route)
    }
}

impl fmt::Debug for ManifestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestContext")
            .field("manifest_id", &self.manifest_id)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown IIIF object type: {0}")]
pub struct UnknownObjectKind(pub String);

/// Kinds of node addressable inside a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Manifest,
    Sequence,
    Canvas,
    /// Annotations share their canvas's id, so lookups resolve to the canvas.
    Annotation,
    Resource,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Manifest => "manifest",
            ObjectKind::Sequence => "sequence",
            ObjectKind::Canvas => "canvas",
            ObjectKind::Annotation => "annotation",
            ObjectKind::Resource => "resource",
        }
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(ObjectKind::Manifest),
            "sequence" => Ok(ObjectKind::Sequence),
            "canvas" => Ok(ObjectKind::Canvas),
            "annotation" => Ok(ObjectKind::Annotation),
            "resource" => Ok(ObjectKind::Resource),
            other => Err(UnknownObjectKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node located by [`ManifestBuilder::find_object`].
#[derive(Debug, Clone, Copy)]
pub enum FoundObject<'a> {
    Manifest(&'a ManifestBuilder),
    Sequence(&'a Sequence),
    Canvas(&'a Canvas),
    Resource(&'a ImageResource),
}

impl IiifObject for FoundObject<'_> {
    fn url(&self) -> String {
        match self {
            FoundObject::Manifest(m) => m.url(),
            FoundObject::Sequence(s) => s.url(),
            FoundObject::Canvas(c) => c.url(),
            FoundObject::Resource(r) => r.url(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            FoundObject::Manifest(m) => m.to_value(),
            FoundObject::Sequence(s) => s.to_value(),
            FoundObject::Canvas(c) => c.to_value(),
            FoundObject::Resource(r) => r.to_value(),
        }
    }
}

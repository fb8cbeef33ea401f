//! Route table and absolute URL construction.
//!
//! Every IIIF object is addressable, so each node needs to turn a logical
//! route into a fully-qualified URL. That capability is the [`UrlBuilder`]
//! trait. The stock implementation, [`RouteUrls`], resolves routes under the
//! configured `server.base_url`:
//!
//! | Route | Path |
//! |-------|------|
//! | `root` | `/` |
//! | `collections` | `/collections` |
//! | `collection` | `/collection/{course_id}` |
//! | `manifest` | `/manifest/{manifest_id}` |
//! | `sequence` | `/manifest/{manifest_id}/sequence/{sequence_id}` |
//! | `canvas` | `/manifest/{manifest_id}/canvas/{canvas_id}` |
//! | `annotation` | `/manifest/{manifest_id}/annotation/{canvas_id}` |
//! | `resource` | `/manifest/{manifest_id}/resource/{resource_id}` |
//!
//! An optional format suffix (e.g. `.json`) is appended to every path except
//! the root, so statically exported files resolve under the same URLs.

use crate::config::ServerConfig;

/// A logical route plus its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Collections,
    Collection { course_id: &'a str },
    Manifest { manifest_id: &'a str },
    Sequence { manifest_id: &'a str, sequence_id: &'a str },
    Canvas { manifest_id: &'a str, canvas_id: &'a str },
    Annotation { manifest_id: &'a str, canvas_id: &'a str },
    Resource { manifest_id: &'a str, resource_id: &'a str },
}

impl Route<'_> {
    /// Route name as used in logs and the route table.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Collections => "collections",
            Route::Collection { .. } => "collection",
            Route::Manifest { .. } => "manifest",
            Route::Sequence { .. } => "sequence",
            Route::Canvas { .. } => "canvas",
            Route::Annotation { .. } => "annotation",
            Route::Resource { .. } => "resource",
        }
    }

    /// Path relative to the service root, without leading slash or suffix.
    pub fn path(&self) -> String {
        match self {
            Route::Root => String::new(),
            Route::Collections => "collections".to_string(),
            Route::Collection { course_id } => format!("collection/{course_id}"),
            Route::Manifest { manifest_id } => format!("manifest/{manifest_id}"),
            Route::Sequence {
                manifest_id,
                sequence_id: object_id,
            }
            | Route::Canvas {
                manifest_id,
                canvas_id: object_id,
            }
            | Route::Annotation {
                manifest_id,
                canvas_id: object_id,
            }
            | Route::Resource {
                manifest_id,
                resource_id: object_id,
            } => format!("manifest/{manifest_id}/{}/{object_id}", self.name()),
        }
    }
}

/// Turns a logical route into an absolute URL.
///
/// Shared by every node of a manifest tree and, during export, across rayon
/// workers, hence the `Send + Sync` bound.
pub trait UrlBuilder: Send + Sync {
    fn absolute_url(&self, route: &Route<'_>) -> String;
}

impl<F> UrlBuilder for F
where
    F: Fn(&Route<'_>) -> String + Send + Sync,
{
    fn absolute_url(&self, route: &Route<'_>) -> String {
        self(route)
    }
}

/// Resolves routes under a fixed base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUrls {
    base_url: String,
    format_suffix: String,
}

impl RouteUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            format_suffix: String::new(),
        }
    }

    /// Append `suffix` (e.g. `.json`) to every non-root path.
    pub fn with_format_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.format_suffix = suffix.into();
        self
    }

    pub fn from_config(server: &ServerConfig) -> Self {
        Self::new(&server.base_url).with_format_suffix(&server.format_suffix)
    }
}

impl UrlBuilder for RouteUrls {
    fn absolute_url(&self, route: &Route<'_>) -> String {
        match route {
            Route::Root => format!("{}/", self.base_url),
            _ => format!("{}/{}{}", self.base_url, route.path(), self.format_suffix),
        }
    }
}

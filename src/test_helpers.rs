//! Shared test utilities for the media-iiif test suite.
//!
//! Provides URL/context builders, image descriptor fixtures, and a small
//! in-memory catalog that the engine, catalog, service, and export tests
//! all share.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = ManifestBuilder::new(test_urls(), "1", "Week 1", "", &sample_images());
//! assert_eq!(canvas_ids(&manifest), vec!["1.0", "2.1", "4.2"]);
//!
//! let service = IiifService::new(sample_catalog(), test_config());
//! ```

use std::sync::Arc;

use crate::catalog::{Catalog, Collection, CollectionResource, Course, MediaStore, Resource};
use crate::config::ServiceConfig;
use crate::iiif::{ManifestBuilder, ManifestContext};
use crate::types::{ImageDescriptor, MetadataPair};
use crate::urls::{RouteUrls, UrlBuilder};

/// Base URL every test-built `@id` starts with.
pub const TEST_BASE_URL: &str = "http://iiif.test";

// =========================================================================
// URL building
// =========================================================================

pub fn test_urls() -> Arc<dyn UrlBuilder> {
    Arc::new(RouteUrls::new(TEST_BASE_URL))
}

/// Context of manifest `manifest_id` resolving against [`TEST_BASE_URL`].
pub fn context(manifest_id: &str) -> ManifestContext {
    ManifestContext::new(manifest_id, test_urls())
}

/// Default config with the server rooted at [`TEST_BASE_URL`].
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.server.base_url = TEST_BASE_URL.to_string();
    config
}

// =========================================================================
// Image descriptors
// =========================================================================

/// IIIF-capable image `{id}.jpg` served from a fake image server.
pub fn descriptor(id: &str, width: u32, height: u32) -> ImageDescriptor {
    ImageDescriptor {
        id: id.to_string(),
        label: format!("{id}.jpg"),
        description: String::new(),
        metadata: vec![],
        is_iiif: true,
        width: Some(width),
        height: Some(height),
        url: format!("http://loris.test/iiif/{id}.jpg"),
        format: Some("jpg".to_string()),
    }
}

/// External link with nothing known about it.
pub fn external_descriptor(id: &str, url: &str) -> ImageDescriptor {
    ImageDescriptor {
        id: id.to_string(),
        label: url.rsplit('/').next().unwrap_or(url).to_string(),
        description: String::new(),
        metadata: vec![],
        is_iiif: false,
        width: None,
        height: None,
        url: url.to_string(),
        format: None,
    }
}

/// Mixed collection: `1`, `2` hosted, `3` a link, `4` hosted with metadata.
pub fn sample_images() -> Vec<ImageDescriptor> {
    let mut foo = descriptor("1", 500, 400);
    foo.label = "foo.jpg".to_string();

    let mut bar = descriptor("2", 640, 480);
    bar.label = "bar.jpg".to_string();

    let link = external_descriptor("3", "http://my.link/image.jpg");

    let mut foo_bar = descriptor("4", 1600, 1200);
    foo_bar.label = "foo_bar_foo.png".to_string();
    foo_bar.format = Some("png".to_string());
    foo_bar.description = "Foo Bar with Foo Again".to_string();
    foo_bar.metadata = vec![
        MetadataPair::new("Date", "Once upon a time..."),
        MetadataPair::new("Location", "In a galaxy far far away..."),
    ];

    vec![foo, bar, link, foo_bar]
}

/// Canvas ids of the default sequence, in order.
pub fn canvas_ids(manifest: &ManifestBuilder) -> Vec<&str> {
    manifest
        .sequence()
        .canvases()
        .iter()
        .map(|c| c.id())
        .collect()
}

// =========================================================================
// Catalog fixtures
// =========================================================================

/// Uploaded resource whose media-store record shares the resource id.
pub fn uploaded_resource(
    id: u64,
    title: &str,
    file_name: &str,
    dims: Option<(u32, u32)>,
) -> Resource {
    Resource {
        id,
        course_id: 1,
        title: title.to_string(),
        description: String::new(),
        metadata: vec![],
        media_store: Some(MediaStore {
            id,
            file_name: file_name.to_string(),
            file_type: "jpg".to_string(),
            img_width: dims.map(|(w, _)| w),
            img_height: dims.map(|(_, h)| h),
            source: None,
        }),
        img_type: None,
        img_url: None,
        img_width: None,
        img_height: None,
        thumb_url: None,
        thumb_width: None,
        thumb_height: None,
    }
}

/// Linked resource pointing at `url`, 800x600.
pub fn linked_resource(id: u64, title: &str, url: &str) -> Resource {
    Resource {
        id,
        course_id: 1,
        title: title.to_string(),
        description: String::new(),
        metadata: vec![],
        media_store: None,
        img_type: Some("jpg".to_string()),
        img_url: Some(url.to_string()),
        img_width: Some(800),
        img_height: Some(600),
        thumb_url: Some(url.to_string()),
        thumb_width: Some(267),
        thumb_height: Some(200),
    }
}

fn entry(resource_id: u64, sort_order: u32) -> CollectionResource {
    CollectionResource {
        resource_id,
        sort_order,
    }
}

/// Two courses; course 1 has "Week 2" (id 10) listed before "Week 1" (id 9).
///
/// Collection 9 resolves to resources `[1, 2, 3, 1]`, with the entries
/// stored out of order. Collection 10 holds resource 2 only.
pub fn sample_catalog() -> Catalog {
    Catalog {
        courses: vec![
            Course {
                id: 1,
                title: "Art 101".to_string(),
            },
            Course {
                id: 2,
                title: "History 12".to_string(),
            },
        ],
        collections: vec![
            Collection {
                id: 10,
                course_id: 1,
                title: "Week 2".to_string(),
                description: String::new(),
                sort_order: 2,
                resources: vec![entry(2, 1)],
            },
            Collection {
                id: 9,
                course_id: 1,
                title: "Week 1".to_string(),
                description: "First week readings".to_string(),
                sort_order: 1,
                resources: vec![entry(3, 3), entry(1, 1), entry(1, 4), entry(2, 2)],
            },
        ],
        resources: vec![
            uploaded_resource(1, "foo.jpg", "foo.jpg", Some((500, 400))),
            uploaded_resource(2, "bar.jpg", "bar.jpg", Some((640, 480))),
            linked_resource(3, "image.jpg", "http://my.link/image.jpg"),
        ],
    }
}

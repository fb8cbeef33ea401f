//! Read-only catalog of courses, collections, and image resources.
//!
//! The catalog is a JSON export of the media library's records. It is the
//! only data source of this crate: the IIIF engine never reads it directly,
//! it receives the flat [`ImageDescriptor`] list produced by
//! [`describe_collection_images`].
//!
//! ## File Format
//!
//! ```json
//! {
//!   "courses": [{"id": 1, "title": "Art 101"}],
//!   "collections": [{
//!     "id": 9, "course_id": 1, "title": "Week 1", "description": "",
//!     "sort_order": 1,
//!     "resources": [{"resource_id": 3, "sort_order": 1}]
//!   }],
//!   "resources": [{
//!     "id": 3, "course_id": 1, "title": "Dawn", "description": "",
//!     "metadata": [{"label": "Date", "value": "1890"}],
//!     "media_store": {"id": 12, "file_name": "dawn.jpg", "file_type": "jpg",
//!                     "img_width": 3000, "img_height": 2000}
//!   }]
//! }
//! ```
//!
//! ## Two kinds of resource
//!
//! - **Uploaded**: has a `media_store`. The file sits in the image server's
//!   bucket, so it is IIIF-capable and its URLs are computed.
//! - **Linked**: no `media_store`. The stored `img_*`/`thumb_*` fields are
//!   passed through untouched.
//!
//! Uploaded files whose dimensions were never recorded can name a local
//! `source` file; [`Catalog::resolve_dimensions`] probes those in parallel.

use crate::config::{ImageServerConfig, ServiceConfig};
use crate::image_api::{ImageRequest, ImageSize, encode_identifier, thumbnail_size};
use crate::types::{ImageDescriptor, MetadataPair};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Course not found: {0}")]
    MissingCourse(u64),
    #[error("Collection not found: {0}")]
    MissingCollection(u64),
    #[error("Collection {collection} references missing resource {resource}")]
    MissingResource { collection: u64, resource: u64 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub course_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: u32,
    /// Entries in the collection. The same resource may appear more than once.
    #[serde(default)]
    pub resources: Vec<CollectionResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResource {
    pub resource_id: u64,
    #[serde(default)]
    pub sort_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: u64,
    pub course_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Vec<MetadataPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_store: Option<MediaStore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_height: Option<u32>,
}

/// An uploaded file stored in the image server's bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaStore {
    pub id: u64,
    pub file_name: String,
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_height: Option<u32>,
    /// Local copy of the file, relative to the catalog, for dimension probing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl MediaStore {
    /// Bucket key of the file, unencoded: `{bucket}/{prefix}/images/{id}/{file}`.
    pub fn identifier(&self, server: &ImageServerConfig) -> String {
        format!(
            "{}/{}/images/{}/{}",
            server.bucket, server.key_prefix, self.id, self.file_name
        )
    }

    /// Image service base URL: server URL plus the encoded identifier.
    pub fn iiif_base_url(&self, server: &ImageServerConfig) -> String {
        format!("{}{}", server.url, encode_identifier(&self.identifier(server)))
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.img_width.zip(self.img_height)
    }
}

/// How a resource is displayed: full image, thumbnail, and image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Representation {
    pub image_type: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub image_url: Option<String>,
    pub thumb_width: Option<u32>,
    pub thumb_height: Option<u32>,
    pub thumb_url: Option<String>,
    pub iiif_base_url: Option<String>,
}

impl Resource {
    pub fn is_iiif(&self) -> bool {
        self.media_store.is_some()
    }

    /// Compute display URLs and sizes for this resource.
    pub fn representation(
        &self,
        server: &ImageServerConfig,
        thumb_max_height: u32,
    ) -> Representation {
        let Some(store) = &self.media_store else {
            return Representation {
                image_type: self.img_type.clone(),
                image_width: self.img_width,
                image_height: self.img_height,
                image_url: self.img_url.clone(),
                thumb_width: self.thumb_width,
                thumb_height: self.thumb_height,
                thumb_url: self.thumb_url.clone(),
                iiif_base_url: None,
            };
        };

        let base_url = store.iiif_base_url(server);
        let full_url = ImageRequest::jpeg(&base_url, ImageSize::Full).url();
        let (thumb_width, thumb_height, thumb_url) = match store.dimensions() {
            Some(dims) => {
                let (w, h) = thumbnail_size(dims, thumb_max_height);
                let url = ImageRequest::jpeg(&base_url, ImageSize::Exact(w, h)).url();
                (Some(w), Some(h), Some(url))
            }
            None => (None, None, None),
        };

        Representation {
            image_type: Some(store.file_type.clone()),
            image_width: store.img_width,
            image_height: store.img_height,
            image_url: Some(full_url),
            thumb_width,
            thumb_height,
            thumb_url,
            iiif_base_url: Some(base_url),
        }
    }

    /// Flatten into the descriptor the manifest builder consumes.
    pub fn descriptor(&self, config: &ServiceConfig) -> ImageDescriptor {
        let rep = self.representation(&config.image_server, config.thumbnails.max_height);
        let url = rep
            .iiif_base_url
            .or(rep.image_url)
            .unwrap_or_default();
        ImageDescriptor {
            id: self.id.to_string(),
            label: self.title.clone(),
            description: self.description.clone(),
            metadata: self.metadata.clone(),
            is_iiif: self.is_iiif(),
            width: rep.image_width,
            height: rep.image_height,
            url,
            format: rep.image_type,
        }
    }
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    Ok(catalog)
}

impl Catalog {
    pub fn course(&self, id: u64) -> Result<&Course, CatalogError> {
        self.courses
            .iter()
            .find(|c| c.id == id)
            .ok_or(CatalogError::MissingCourse(id))
    }

    pub fn collection(&self, id: u64) -> Result<&Collection, CatalogError> {
        self.collections
            .iter()
            .find(|c| c.id == id)
            .ok_or(CatalogError::MissingCollection(id))
    }

    pub fn resource(&self, id: u64) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Collections of a course, by `sort_order` (ties keep file order).
    pub fn course_collections(&self, course_id: u64) -> Vec<&Collection> {
        let mut collections: Vec<&Collection> = self
            .collections
            .iter()
            .filter(|c| c.course_id == course_id)
            .collect();
        collections.sort_by_key(|c| c.sort_order);
        collections
    }

    /// Resources of a collection, by entry `sort_order`, duplicates kept.
    pub fn collection_resources(
        &self,
        collection: &Collection,
    ) -> Result<Vec<&Resource>, CatalogError> {
        let mut entries: Vec<&CollectionResource> = collection.resources.iter().collect();
        entries.sort_by_key(|e| e.sort_order);
        entries
            .into_iter()
            .map(|entry| {
                self.resource(entry.resource_id)
                    .ok_or(CatalogError::MissingResource {
                        collection: collection.id,
                        resource: entry.resource_id,
                    })
            })
            .collect()
    }

    /// Fill in missing media-store dimensions by probing local source files.
    ///
    /// `root` is the directory relative source paths resolve against. Files
    /// that cannot be read are logged and left without dimensions; a manifest
    /// then falls back to placeholder canvas dimensions for them.
    pub fn resolve_dimensions(&mut self, root: &Path) -> usize {
        self.resources
            .par_iter_mut()
            .filter_map(|r| r.media_store.as_mut())
            .filter(|store| store.dimensions().is_none())
            .filter_map(|store| {
                let path = root.join(store.source.as_ref()?);
                match image::image_dimensions(&path) {
                    Ok((w, h)) => {
                        store.img_width = Some(w);
                        store.img_height = Some(h);
                        Some(())
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to read image dimensions"
                        );
                        None
                    }
                }
            })
            .count()
    }
}

/// Describe every image of a collection, in collection order.
pub fn describe_collection_images(
    catalog: &Catalog,
    collection: &Collection,
    config: &ServiceConfig,
) -> Result<Vec<ImageDescriptor>, CatalogError> {
    Ok(catalog
        .collection_resources(collection)?
        .into_iter()
        .map(|resource| resource.descriptor(config))
        .collect())
}

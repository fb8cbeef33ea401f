//! The IIIF service: catalog records in, IIIF documents out.
//!
//! [`IiifService`] answers the same questions the HTTP routes do:
//!
//! | Route | Method |
//! |-------|--------|
//! | `/` | [`IiifService::index`] |
//! | `/collections` | [`IiifService::collections`] |
//! | `/collection/{course_id}` | [`IiifService::course_collection`] |
//! | `/manifest/{id}` | [`IiifService::load`] with no object |
//! | `/manifest/{id}/{type}/{object_id}` | [`IiifService::load`] with an object |
//!
//! A manifest is rebuilt from the catalog on every call; nothing is cached.

use crate::catalog::{Catalog, CatalogError, describe_collection_images};
use crate::config::ServiceConfig;
use crate::iiif::collection::service_index;
use crate::iiif::{CollectionListing, IiifObject, ManifestBuilder, ObjectKind};
use crate::urls::{RouteUrls, UrlBuilder};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct IiifService {
    catalog: Catalog,
    config: ServiceConfig,
    urls: Arc<dyn UrlBuilder>,
}

impl IiifService {
    /// Service resolving URLs with the configured [`RouteUrls`].
    pub fn new(catalog: Catalog, config: ServiceConfig) -> Self {
        let urls = Arc::new(RouteUrls::from_config(&config.server));
        Self::with_urls(catalog, config, urls)
    }

    pub fn with_urls(catalog: Catalog, config: ServiceConfig, urls: Arc<dyn UrlBuilder>) -> Self {
        Self {
            catalog,
            config,
            urls,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the manifest of a collection.
    pub fn manifest(&self, collection_id: u64) -> Result<ManifestBuilder, ServiceError> {
        let collection = self.catalog.collection(collection_id)?;
        let images = describe_collection_images(&self.catalog, collection, &self.config)?;
        Ok(ManifestBuilder::new(
            Arc::clone(&self.urls),
            &collection.id.to_string(),
            &collection.title,
            &collection.description,
            &images,
        ))
    }

    /// The whole manifest, or one object inside it.
    ///
    /// `object` is an `(object_type, object_id)` pair as it appears in the
    /// route. Unknown types and ids give `Ok(None)`, the not-found answer.
    pub fn load(
        &self,
        collection_id: u64,
        object: Option<(&str, &str)>,
    ) -> Result<Option<Value>, ServiceError> {
        let manifest = self.manifest(collection_id)?;
        let Some((object_type, object_id)) = object else {
            return Ok(Some(manifest.to_value()));
        };
        let Ok(kind) = object_type.parse::<ObjectKind>() else {
            tracing::debug!(object_type, "Unknown IIIF object type requested");
            return Ok(None);
        };
        Ok(manifest
            .find_object(kind, object_id)
            .map(|found| found.to_value()))
    }

    pub fn index(&self) -> Value {
        service_index(self.urls.as_ref())
    }

    /// Listing of every course.
    pub fn collections(&self) -> CollectionListing {
        let courses: Vec<(String, &str)> = self
            .catalog
            .courses
            .iter()
            .map(|c| (c.id.to_string(), c.title.as_str()))
            .collect();
        CollectionListing::top_level(
            self.urls.as_ref(),
            courses.iter().map(|(id, title)| (id.as_str(), *title)),
        )
    }

    /// Listing of one course's collections.
    pub fn course_collection(&self, course_id: u64) -> Result<CollectionListing, ServiceError> {
        let course = self.catalog.course(course_id)?;
        let collections: Vec<(String, &str)> = self
            .catalog
            .course_collections(course_id)
            .into_iter()
            .map(|c| (c.id.to_string(), c.title.as_str()))
            .collect();
        Ok(CollectionListing::course(
            self.urls.as_ref(),
            &course.id.to_string(),
            &course.title,
            collections.iter().map(|(id, title)| (id.as_str(), *title)),
        ))
    }
}

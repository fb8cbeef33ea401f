//! Static export of every IIIF document.
//!
//! Writes the documents the service would serve into a directory tree that
//! any static file server can host:
//!
//! ```text
//! dist/
//! ├── index.json                 # service index
//! ├── collections.json           # all courses
//! ├── collection/
//! │   └── 1.json                 # one course's collections
//! └── manifest/
//!     ├── 9.json                 # one manifest per collection
//!     └── 10.json
//! ```
//!
//! File names are the route paths plus `.json`, so setting
//! `server.format_suffix = ".json"` makes every `@id` resolve to its file.
//!
//! ## Parallel Export
//!
//! Manifests are independent of each other and are built and written in
//! parallel with [rayon](https://docs.rs/rayon).

use crate::iiif::IiifObject;
use crate::service::{IiifService, ServiceError};
use crate::urls::Route;
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// One written manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedManifest {
    pub collection_id: u64,
    pub title: String,
    pub canvases: usize,
    /// Path relative to the export root.
    pub path: PathBuf,
}

/// What an export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Listing documents (index, collections, per-course), relative paths.
    pub listings: Vec<PathBuf>,
    /// Manifests in catalog order.
    pub manifests: Vec<ExportedManifest>,
}

fn route_file(route: &Route<'_>) -> PathBuf {
    match route {
        Route::Root => PathBuf::from("index.json"),
        _ => PathBuf::from(format!("{}.json", route.path())),
    }
}

fn write_document(
    out_dir: &Path,
    relative: &Path,
    value: &Value,
    pretty: bool,
) -> Result<(), ExportError> {
    let path = out_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, crate::iiif::to_json(value, pretty)?)?;
    Ok(())
}

/// Export every document of `service` into `out_dir`.
pub fn export(
    service: &IiifService,
    out_dir: &Path,
    pretty: bool,
) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(out_dir)?;
    let catalog = service.catalog();
    let mut summary = ExportSummary::default();

    let index = route_file(&Route::Root);
    write_document(out_dir, &index, &service.index(), pretty)?;
    summary.listings.push(index);

    let collections = route_file(&Route::Collections);
    write_document(out_dir, &collections, &service.collections().to_value(), pretty)?;
    summary.listings.push(collections);

    for course in &catalog.courses {
        let course_id = course.id.to_string();
        let path = route_file(&Route::Collection {
            course_id: &course_id,
        });
        let listing = service.course_collection(course.id)?;
        write_document(out_dir, &path, &listing.to_value(), pretty)?;
        summary.listings.push(path);
    }
    tracing::info!(count = summary.listings.len(), "Exported collection listings");

    summary.manifests = catalog
        .collections
        .par_iter()
        .map(|collection| {
            let manifest = service.manifest(collection.id)?;
            let path = route_file(&Route::Manifest {
                manifest_id: manifest.id(),
            });
            write_document(out_dir, &path, &manifest.to_value(), pretty)?;
            Ok(ExportedManifest {
                collection_id: collection.id,
                title: collection.title.clone(),
                canvases: manifest.sequence().canvases().len(),
                path,
            })
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    tracing::info!(count = summary.manifests.len(), "Exported manifests");

    Ok(summary)
}

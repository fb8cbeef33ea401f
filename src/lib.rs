//! # Media IIIF
//!
//! Publishes a course media library as IIIF Presentation API 2.0 documents,
//! so any IIIF viewer (Mirador, Universal Viewer) can display a collection of
//! images with deep zoom.
//!
//! # Architecture: Catalog → Descriptors → Manifest
//!
//! ```text
//! 1. Catalog    catalog.json  →  Collection, Resource      (library records)
//! 2. Describe   Resource      →  ImageDescriptor            (URLs + sizes resolved)
//! 3. Assemble   descriptors   →  Manifest/Sequence/Canvas   (IIIF tree → JSON)
//! ```
//!
//! The IIIF engine in [`iiif`] only sees the flat descriptor list of step 2,
//! never catalog records. It can be driven from any other data source by
//! building [`types::ImageDescriptor`]s directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`iiif`] | Manifest, sequence, canvas, and image resource assembly; collection listings |
//! | [`catalog`] | JSON catalog loading, ordering, image representation, dimension probing |
//! | [`service`] | One method per IIIF route: manifest, sub-object, collections |
//! | [`export`] | Writes every document to a static directory tree, in parallel |
//! | [`urls`] | Route table and the [`urls::UrlBuilder`] seam for absolute `@id`s |
//! | [`image_api`] | IIIF Image API request URLs, identifier encoding, thumbnail sizes |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`types`] | Shared descriptor types between the catalog and the engine |
//! | [`output`] | CLI output formatting for the human-readable commands |
//!
//! # Design Decisions
//!
//! ## Unique Canvas Ids
//!
//! A collection may list the same image more than once. Viewers key their
//! state by canvas URI, so each canvas id carries its position in the
//! sequence: `{image_id}.{index}`. See [`iiif::Sequence::add_canvas`].
//!
//! ## External Links Are Not Painted
//!
//! Resources that are plain links to third-party images have no image
//! service behind them. They are left out of the sequence entirely; the
//! resource serializer still knows how to render them.
//!
//! ## Injected URL Building
//!
//! Nodes never know the host they are served from. A shared
//! [`urls::UrlBuilder`] turns a [`urls::Route`] into an absolute URL, so the
//! same tree serializes for a live server or a static export.

pub mod catalog;
pub mod config;
pub mod export;
pub mod iiif;
pub mod image_api;
pub mod output;
pub mod service;
pub mod types;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;

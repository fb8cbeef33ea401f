//! CLI output formatting for the human-readable commands.
//!
//! JSON documents go to stdout untouched; everything in this module is for
//! people reading a terminal.
//!
//! # Entity Display Contract
//!
//! Every entity follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + title (+ optional count)
//! 2. **Context lines**: indented `Manifest:`, `Image:`, `Description:`, etc.
//!
//! # Output Format
//!
//! ## Show
//!
//! ```text
//! Week 1 → http://localhost:8000/api/iiif/manifest/9
//!     Description: First week readings
//! Sequence 1 (3 canvases)
//!     001 foo.jpg [1.0] 500x400
//!         Image: http://localhost:8000/loris/.../full/full/0/default.jpg
//! ```
//!
//! ## Check
//!
//! ```text
//! Courses
//! 001 Art 101 (2 collections)
//!     001 Week 1 (4 images, 1 link)
//!         Manifest: http://localhost:8000/api/iiif/manifest/9
//!
//! Catalog is valid: 2 courses, 2 collections, 3 resources
//! ```
//!
//! ## Export
//!
//! ```text
//! index.json
//! collections.json
//! 9 Week 1 (3 canvases) → manifest/9.json
//!
//! Exported 3 listings, 1 manifest → dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::catalog::{Catalog, CatalogError};
use crate::export::ExportSummary;
use crate::iiif::{IiifObject, ManifestBuilder};
use crate::urls::{Route, UrlBuilder};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `n thing` or `n things`.
fn plural(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

fn canvas_count(n: usize) -> String {
    if n == 1 {
        "1 canvas".to_string()
    } else {
        format!("{n} canvases")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

// ============================================================================
// Show: manifest tree
// ============================================================================

/// Format a manifest as a tree of canvases.
pub fn format_manifest_tree(manifest: &ManifestBuilder) -> Vec<String> {
    let mut lines = vec![format!("{} \u{2192} {}", manifest.label(), manifest.url())];
    if !manifest.description().is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(manifest.description(), 60)
        ));
    }

    for sequence in manifest.sequences() {
        lines.push(format!(
            "Sequence {} ({})",
            sequence.id(),
            canvas_count(sequence.canvases().len())
        ));
        for (i, canvas) in sequence.canvases().iter().enumerate() {
            let size = match canvas.dimensions() {
                (Some(w), Some(h)) => format!(" {w}x{h}"),
                _ => String::new(),
            };
            lines.push(format!(
                "{}{} {} [{}]{}",
                indent(1),
                format_index(i + 1),
                canvas.label(),
                canvas.id(),
                size
            ));
            if let Some(resource) = canvas.resource() {
                lines.push(format!("{}Image: {}", indent(2), resource.rendering_url()));
            }
            if !canvas.description().is_empty() {
                lines.push(format!(
                    "{}Description: {}",
                    indent(2),
                    truncate_desc(canvas.description(), 60)
                ));
            }
            for pair in canvas.metadata() {
                lines.push(format!("{}{}: {}", indent(2), pair.label, pair.value));
            }
        }
    }

    lines
}

pub fn print_manifest_tree(manifest: &ManifestBuilder) {
    for line in format_manifest_tree(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Check: catalog inventory
// ============================================================================

/// Format the catalog as courses and their collections.
///
/// Fails on the first collection that references a missing resource.
pub fn format_catalog_output(
    catalog: &Catalog,
    urls: &dyn UrlBuilder,
) -> Result<Vec<String>, CatalogError> {
    let mut lines = vec!["Courses".to_string()];

    for (i, course) in catalog.courses.iter().enumerate() {
        let collections = catalog.course_collections(course.id);
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            course.title,
            plural(collections.len(), "collection")
        ));
        for (j, collection) in collections.iter().enumerate() {
            let resources = catalog.collection_resources(collection)?;
            let links = resources.iter().filter(|r| !r.is_iiif()).count();
            let detail = if links > 0 {
                format!("{}, {}", plural(resources.len(), "image"), plural(links, "link"))
            } else {
                plural(resources.len(), "image")
            };
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(j + 1),
                collection.title,
                detail
            ));
            let manifest_id = collection.id.to_string();
            lines.push(format!(
                "{}Manifest: {}",
                indent(2),
                urls.absolute_url(&Route::Manifest {
                    manifest_id: &manifest_id
                })
            ));
        }
    }

    let mut orphans = Vec::new();
    for collection in catalog
        .collections
        .iter()
        .filter(|c| catalog.course(c.course_id).is_err())
    {
        catalog.collection_resources(collection)?;
        orphans.push(format!(
            "{}{} (course {} missing)",
            indent(1),
            collection.title,
            collection.course_id
        ));
    }
    if !orphans.is_empty() {
        lines.push(String::new());
        lines.push("Unlisted collections".to_string());
        lines.extend(orphans);
    }

    lines.push(String::new());
    lines.push(format!(
        "Catalog is valid: {}, {}, {}",
        plural(catalog.courses.len(), "course"),
        plural(catalog.collections.len(), "collection"),
        plural(catalog.resources.len(), "resource")
    ));
    Ok(lines)
}

pub fn print_catalog_output(
    catalog: &Catalog,
    urls: &dyn UrlBuilder,
) -> Result<(), CatalogError> {
    for line in format_catalog_output(catalog, urls)? {
        println!("{}", line);
    }
    Ok(())
}

// ============================================================================
// Export summary
// ============================================================================

/// Format what an export wrote, relative to `out_dir`.
pub fn format_export_output(summary: &ExportSummary, out_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .listings
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    for manifest in &summary.manifests {
        lines.push(format!(
            "{} {} ({}) \u{2192} {}",
            manifest.collection_id,
            manifest.title,
            canvas_count(manifest.canvases),
            manifest.path.display()
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Exported {}, {} \u{2192} {}",
        plural(summary.listings.len(), "listing"),
        plural(summary.manifests.len(), "manifest"),
        out_dir.display()
    ));
    lines
}

pub fn print_export_output(summary: &ExportSummary, out_dir: &Path) {
    for line in format_export_output(summary, out_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

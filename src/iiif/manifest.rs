//! Manifest assembly: the entry point of the IIIF engine.
//!
//! ## Identifiers
//!
//! Every object maps to a URL, so every object needs a stable id:
//!
//! - the manifest is identified by the collection it was built from;
//! - there is exactly one sequence, always `"1"`;
//! - a canvas is `{image_id}.{position}` (see [`Sequence::add_canvas`]);
//! - an image resource shares the id of its canvas (canvas:resource is 1:1).
//!
//! ## External links
//!
//! Descriptors that are not IIIF-capable produce no canvas. The resource
//! serializer can render them, but the build skips them, matching what
//! deployed viewers have always received.
//!
//! ## Usage
//!
//! ```
//! # use std::sync::Arc;
//! # use media_iiif::iiif::{IiifObject, ManifestBuilder};
//! # use media_iiif::types::ImageDescriptor;
//! # use media_iiif::urls::RouteUrls;
//! let images = vec![ImageDescriptor {
//!     id: "1".into(),
//!     label: "foo.jpg".into(),
//!     description: String::new(),
//!     metadata: vec![],
//!     is_iiif: true,
//!     width: Some(500),
//!     height: Some(400),
//!     url: "http://localhost:8000/loris/foo.jpg".into(),
//!     format: Some("jpg".into()),
//! }];
//! let urls = Arc::new(RouteUrls::new("http://localhost:8000/api/iiif"));
//! let manifest = ManifestBuilder::new(urls, "1", "Week 1", "", &images);
//! assert_eq!(manifest.sequence().canvases()[0].id(), "1.0");
//! let json = manifest.to_json(false).unwrap();
//! assert!(json.contains("sc:Manifest"));
//! ```

use super::{
    Canvas, FoundObject, IiifObject, ImageResource, ManifestContext, ObjectKind,
    PRESENTATION_CONTEXT, Sequence,
};
use crate::types::ImageDescriptor;
use crate::urls::{Route, UrlBuilder};
use serde_json::{Value, json};
use std::sync::Arc;

/// Id of the single sequence every manifest has.
pub const DEFAULT_SEQUENCE_ID: &str = "1";

#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    ctx: ManifestContext,
    label: String,
    description: String,
    sequences: Vec<Sequence>,
}

impl ManifestBuilder {
    /// Build the whole manifest tree for `images`, in input order.
    pub fn new(
        urls: Arc<dyn UrlBuilder>,
        manifest_id: &str,
        label: &str,
        description: &str,
        images: &[ImageDescriptor],
    ) -> Self {
        let ctx = ManifestContext::new(manifest_id, urls);
        let mut sequence = Sequence::new(ctx.clone(), DEFAULT_SEQUENCE_ID);
        for image in images.iter().filter(|img| img.is_iiif) {
            sequence
                .add_canvas(&image.id)
                .set_label(&image.label)
                .set_description(&image.description)
                .set_metadata(&image.metadata)
                .add_image(image);
        }

        tracing::debug!(
            manifest_id,
            canvases = sequence.canvases().len(),
            skipped_links = images.len() - sequence.canvases().len(),
            "Built IIIF manifest"
        );

        Self {
            ctx,
            label: label.to_string(),
            description: description.to_string(),
            sequences: vec![sequence],
        }
    }

    pub fn id(&self) -> &str {
        self.ctx.manifest_id()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// The default (and only) sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequences[0]
    }

    /// Locate a node by kind and id. `None` is the ordinary not-found answer.
    pub fn find_object(&self, kind: ObjectKind, object_id: &str) -> Option<FoundObject<'_>> {
        match kind {
            ObjectKind::Manifest => (object_id == self.id()).then_some(FoundObject::Manifest(self)),
            ObjectKind::Sequence => self
                .sequences
                .iter()
                .find(|s| s.id() == object_id)
                .map(FoundObject::Sequence),
            ObjectKind::Canvas | ObjectKind::Annotation => {
                self.find_canvas(object_id).map(FoundObject::Canvas)
            }
            ObjectKind::Resource => self.find_resource(object_id).map(FoundObject::Resource),
        }
    }

    fn find_canvas(&self, canvas_id: &str) -> Option<&Canvas> {
        self.sequence().canvases().iter().find(|c| c.id() == canvas_id)
    }

    fn find_resource(&self, resource_id: &str) -> Option<&ImageResource> {
        self.sequence()
            .canvases()
            .iter()
            .filter_map(Canvas::resource)
            .find(|r| r.id() == resource_id)
    }
}

impl IiifObject for ManifestBuilder {
    fn url(&self) -> String {
        self.ctx.url(&Route::Manifest {
            manifest_id: self.id(),
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "@context": PRESENTATION_CONTEXT,
            "@type": "sc:Manifest",
            "@id": self.url(),
            "label": self.label,
            "description": self.description,
            "sequences": self.sequences.iter().map(Sequence::to_value).collect::<Vec<_>>(),
        })
    }
}

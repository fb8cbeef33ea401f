//! A canvas: one virtual page with exactly one image painted on it.

use super::{IiifObject, ImageResource, ManifestContext};
use crate::types::{ImageDescriptor, MetadataPair};
use crate::urls::Route;
use serde_json::{Map, Value, json};

/// Placeholder for "dimensions unknown" until an image supplies real ones.
const DEFAULT_DIMENSION: u32 = 100;

#[derive(Debug, Clone)]
pub struct Canvas {
    ctx: ManifestContext,
    id: String,
    label: String,
    description: String,
    metadata: Vec<MetadataPair>,
    width: Option<u32>,
    height: Option<u32>,
    resource: Option<ImageResource>,
}

impl Canvas {
    pub(crate) fn new(ctx: ManifestContext, id: String) -> Self {
        Self {
            ctx,
            id,
            label: "Image".to_string(),
            description: String::new(),
            metadata: Vec::new(),
            width: Some(DEFAULT_DIMENSION),
            height: Some(DEFAULT_DIMENSION),
            resource: None,
        }
    }

    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.label = label.to_string();
        self
    }

    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = description.to_string();
        self
    }

    pub fn set_metadata(&mut self, metadata: &[MetadataPair]) -> &mut Self {
        self.metadata = metadata.to_vec();
        self
    }

    /// Paint `image` onto this canvas.
    ///
    /// Known image dimensions replace the placeholder canvas dimensions.
    pub fn add_image(&mut self, image: &ImageDescriptor) -> &mut Self {
        self.resource = Some(ImageResource::new(self.ctx.clone(), &self.id, image));
        if image.width.is_some() {
            self.width = image.width;
        }
        if image.height.is_some() {
            self.height = image.height;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &[MetadataPair] {
        &self.metadata
    }

    pub fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        (self.width, self.height)
    }

    pub fn resource(&self) -> Option<&ImageResource> {
        self.resource.as_ref()
    }

    /// URL of the painting annotation binding the resource to this canvas.
    pub fn annotation_url(&self) -> String {
        self.ctx.url(&Route::Annotation {
            manifest_id: self.ctx.manifest_id(),
            canvas_id: &self.id,
        })
    }
}

impl IiifObject for Canvas {
    fn url(&self) -> String {
        self.ctx.url(&Route::Canvas {
            manifest_id: self.ctx.manifest_id(),
            canvas_id: &self.id,
        })
    }

    fn to_value(&self) -> Value {
        let canvas_url = self.url();
        let images: Vec<Value> = self
            .resource
            .iter()
            .map(|resource| {
                json!({
                    "@id": self.annotation_url(),
                    "@type": "oa:Annotation",
                    "motivation": "sc:painting",
                    "resource": resource.to_value(),
                    "on": canvas_url,
                })
            })
            .collect();

        let mut canvas = Map::new();
        canvas.insert("@id".into(), Value::String(canvas_url.clone()));
        canvas.insert("@type".into(), json!("sc:Canvas"));
        canvas.insert("label".into(), json!(self.label));
        canvas.insert("images".into(), Value::Array(images));
        // Viewers choke on empty or null fields, so leave them out entirely
        if !self.description.is_empty() {
            canvas.insert("description".into(), json!(self.description));
        }
        if !self.metadata.is_empty() {
            canvas.insert("metadata".into(), json!(self.metadata));
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            canvas.insert("width".into(), json!(width));
            canvas.insert("height".into(), json!(height));
        }
        Value::Object(canvas)
    }
}

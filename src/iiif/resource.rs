//! The image painted onto a canvas.
//!
//! Two origins, and serialization branches strictly on which one:
//!
//! - **IIIF-capable** (`is_iiif`): the image lives on our IIIF image server.
//!   `@id` is a level-1 image request for the default rendering, capped at
//!   [`MAX_RENDER_WIDTH`](crate::image_api::MAX_RENDER_WIDTH) pixels wide, and
//!   a `service` block points viewers at the image service for deep zoom.
//! - **External link**: `@id` is the link itself, no `service` block.

use super::{IMAGE_API_LEVEL1_PROFILE, IiifObject, ManifestContext};
use crate::image_api::{ImageRequest, ImageSize};
use crate::types::ImageDescriptor;
use crate::urls::Route;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone)]
pub struct ImageResource {
    ctx: ManifestContext,
    id: String,
    image_url: String,
    format: Option<String>,
    is_iiif: bool,
    width: Option<u32>,
    height: Option<u32>,
}

impl ImageResource {
    /// Resource for `image`, identified by the id of the canvas it belongs to.
    pub fn new(ctx: ManifestContext, id: &str, image: &ImageDescriptor) -> Self {
        Self {
            ctx,
            id: id.to_string(),
            image_url: image.url.clone(),
            format: image.format.clone(),
            is_iiif: image.is_iiif,
            width: image.width,
            height: image.height,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn is_iiif(&self) -> bool {
        self.is_iiif
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        (self.width, self.height)
    }

    /// URL a viewer fetches to display the image.
    pub fn rendering_url(&self) -> String {
        if self.is_iiif {
            ImageRequest::jpeg(&self.image_url, ImageSize::capped(self.width)).url()
        } else {
            self.image_url.clone()
        }
    }
}

impl IiifObject for ImageResource {
    fn url(&self) -> String {
        self.ctx.url(&Route::Resource {
            manifest_id: self.ctx.manifest_id(),
            resource_id: &self.id,
        })
    }

    fn to_value(&self) -> Value {
        let mut resource = Map::new();
        resource.insert("@id".into(), Value::String(self.rendering_url()));
        resource.insert("@type".into(), json!("dctypes:Image"));
        if self.is_iiif {
            resource.insert(
                "service".into(),
                json!({
                    "@id": self.image_url,
                    "profile": IMAGE_API_LEVEL1_PROFILE,
                }),
            );
        }
        if let Some(format) = &self.format {
            resource.insert("format".into(), json!(format));
        }
        // Dimensions only as a pair, and only when both are known
        if let (Some(width), Some(height)) = (self.width, self.height) {
            if width > 0 && height > 0 {
                resource.insert("width".into(), json!(width));
                resource.insert("height".into(), json!(height));
            }
        }
        Value::Object(resource)
    }
}

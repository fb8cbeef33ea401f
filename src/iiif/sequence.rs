//! The ordered list of canvases in a manifest.

use super::{Canvas, IiifObject, ManifestContext};
use crate::urls::Route;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Sequence {
    ctx: ManifestContext,
    id: String,
    canvases: Vec<Canvas>,
}

impl Sequence {
    pub(crate) fn new(ctx: ManifestContext, id: &str) -> Self {
        Self {
            ctx,
            id: id.to_string(),
            canvases: Vec::new(),
        }
    }

    /// Append a canvas for the image `source_id` and return it for setup.
    ///
    /// The canvas id is `{source_id}.{position}`, so the same image added
    /// several times still yields distinct canvas URIs. Viewers such as
    /// Mirador key their state by canvas URI and break on duplicates.
    pub fn add_canvas(&mut self, source_id: &str) -> &mut Canvas {
        let canvas_id = format!("{}.{}", source_id, self.canvases.len());
        self.canvases.push(Canvas::new(self.ctx.clone(), canvas_id));
        let last = self.canvases.len() - 1;
        &mut self.canvases[last]
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }
}

impl IiifObject for Sequence {
    fn url(&self) -> String {
        self.ctx.url(&Route::Sequence {
            manifest_id: self.ctx.manifest_id(),
            sequence_id: &self.id,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "@id": self.url(),
            "@type": "sc:Sequence",
            "label": "Default order",
            "canvases": self.canvases.iter().map(Canvas::to_value).collect::<Vec<_>>(),
        })
    }
}

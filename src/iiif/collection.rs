//! `sc:Collection` documents: the browsable index above manifests.
//!
//! Two levels are published:
//!
//! ```text
//! collections             "Top-level collection"        → one sc:Collection per course
//! collection/{course_id}  "Top-level collection: Title" → one sc:Manifest per collection
//! ```

use super::{IiifObject, PRESENTATION_CONTEXT};
use crate::urls::{Route, UrlBuilder};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Collection,
    Manifest,
}

impl MemberKind {
    fn iiif_type(self) -> &'static str {
        match self {
            MemberKind::Collection => "sc:Collection",
            MemberKind::Manifest => "sc:Manifest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: MemberKind,
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionListing {
    url: String,
    label: String,
    members: Vec<Member>,
}

impl CollectionListing {
    /// Listing of all courses, given as `(course_id, title)` pairs.
    pub fn top_level<'a>(
        urls: &dyn UrlBuilder,
        courses: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let members = courses
            .into_iter()
            .map(|(course_id, title)| Member {
                kind: MemberKind::Collection,
                url: urls.absolute_url(&Route::Collection { course_id }),
                label: title.to_string(),
            })
            .collect();
        Self {
            url: urls.absolute_url(&Route::Collections),
            label: "Top-level collection".to_string(),
            members,
        }
    }

    /// Listing of one course's collections, given as `(collection_id, title)` pairs.
    pub fn course<'a>(
        urls: &dyn UrlBuilder,
        course_id: &str,
        course_title: &str,
        collections: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let members = collections
            .into_iter()
            .map(|(manifest_id, title)| Member {
                kind: MemberKind::Manifest,
                url: urls.absolute_url(&Route::Manifest { manifest_id }),
                label: title.to_string(),
            })
            .collect();
        Self {
            url: urls.absolute_url(&Route::Collection { course_id }),
            label: format!("Top-level collection: {course_title}"),
            members,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl IiifObject for CollectionListing {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn to_value(&self) -> Value {
        let members: Vec<Value> = self
            .members
            .iter()
            .map(|m| {
                json!({
                    "@type": m.kind.iiif_type(),
                    "@id": m.url,
                    "label": m.label,
                })
            })
            .collect();
        json!({
            "@context": PRESENTATION_CONTEXT,
            "@type": "sc:Collection",
            "@id": self.url,
            "label": self.label,
            "members": members,
        })
    }
}

/// Entry document of the IIIF routes, pointing at the collection listing.
pub fn service_index(urls: &dyn UrlBuilder) -> Value {
    json!({ "collections": urls.absolute_url(&Route::Collections) })
}

//! IIIF Image API request URLs and size calculations.
//!
//! An image request has the shape
//! `{server}{identifier}/{region}/{size}/{rotation}/{quality}.{format}`.
//! Only the parts of the level-1 syntax this service emits are modelled:
//! full-region requests at full size, a capped width, or exact dimensions.
//!
//! All functions here are pure; nothing performs I/O.

use std::fmt;

/// Maximum width of the default rendering linked from a canvas.
pub const MAX_RENDER_WIDTH: u32 = 1024;

/// The `size` segment of an image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// `full`: the image at its native size.
    Full,
    /// `w,`: scale to width `w`, height follows the aspect ratio.
    Width(u32),
    /// `w,h`: scale to exactly `w` × `h`.
    Exact(u32, u32),
}

impl ImageSize {
    /// Size for the default rendering of an image `width` pixels wide.
    ///
    /// Unknown widths render at full size.
    pub fn capped(width: Option<u32>) -> Self {
        match width {
            Some(w) if w > MAX_RENDER_WIDTH => ImageSize::Width(MAX_RENDER_WIDTH),
            _ => ImageSize::Full,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Full => f.write_str("full"),
            ImageSize::Width(w) => write!(f, "{w},"),
            ImageSize::Exact(w, h) => write!(f, "{w},{h}"),
        }
    }
}

/// A full-region, unrotated image request against an image service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest<'a> {
    /// Image service base: server URL plus encoded identifier.
    pub service: &'a str,
    pub size: ImageSize,
    pub format: &'a str,
}

impl<'a> ImageRequest<'a> {
    /// Default-quality JPEG at `size`.
    pub fn jpeg(service: &'a str, size: ImageSize) -> Self {
        Self {
            service,
            size,
            format: "jpg",
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{}/full/{}/0/default.{}",
            self.service,
            self.size,
            self.format
        )
    }
}

/// Percent-encode an image identifier for use as a single path segment.
///
/// Everything outside the RFC 3986 unreserved set is encoded, including `/`,
/// so a bucket key like `bucket/media/images/1/a.jpg` stays one segment.
pub fn encode_identifier(identifier: &str) -> String {
    urlencoding::encode(identifier).into_owned()
}

/// Calculate thumbnail dimensions, capping the height at `max_height`.
///
/// Images already within the cap keep their size. Taller images are scaled
/// down so the height equals the cap; the width follows the aspect ratio and
/// is truncated, not rounded.
///
/// ```
/// # use media_iiif::image_api::thumbnail_size;
/// assert_eq!(thumbnail_size((1000, 400), 200), (500, 200));
/// assert_eq!(thumbnail_size((150, 100), 200), (150, 100));
/// ```
pub fn thumbnail_size(dimensions: (u32, u32), max_height: u32) -> (u32, u32) {
    let (w, h) = dimensions;
    if h > max_height {
        let thumb_w = (w as f64 / h as f64 * max_height as f64) as u32;
        (thumb_w, max_height)
    } else {
        (w, h)
    }
}

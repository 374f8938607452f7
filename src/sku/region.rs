use anyhow::Result;
use image::DynamicImage;
use tracing::warn;

use crate::sku::{IdentifierSet, SkuMatcher, detect_table_header};

/// Placement of an image on a page, in page coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Expand outward by `margin` in every direction, clipped to the
    /// page bounds. Nearby tables usually sit just outside the image
    /// rectangle itself.
    pub fn expanded(&self, margin: f32, page_width: f32, page_height: f32) -> Self {
        Self {
            x0: (self.x0 - margin).max(0.0),
            y0: (self.y0 - margin).max(0.0),
            x1: (self.x1 + margin).min(page_width),
            y1: (self.y1 + margin).min(page_height),
        }
    }
}

/// Text access for a rectangular clip of a page. Implemented by the PDF
/// collaborator; stubbed in tests.
pub trait RegionTextSource {
    fn text_in_region(&self, region: &BoundingBox) -> Result<String>;
}

/// Optional recognition of text printed inside a raster image, for
/// identifiers baked into product photos.
pub trait ImageTextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Fuse the identifier sources for one image into a single set.
///
/// Three sources are unioned: table-header detection over the text near
/// the image, a direct matcher scan of the same text, and (when a
/// recognizer is supplied) a matcher scan of text recognized inside the
/// raster. A failing source contributes an empty set; association
/// degrades gracefully and never aborts image processing.
pub fn identifiers_for_image(
    matcher: &SkuMatcher,
    text_source: &dyn RegionTextSource,
    bounding_box: &BoundingBox,
    page_width: f32,
    page_height: f32,
    expand_margin: f32,
    recognizer: Option<(&dyn ImageTextRecognizer, &DynamicImage)>,
) -> IdentifierSet {
    let region = bounding_box.expanded(expand_margin, page_width, page_height);

    let nearby_text = match text_source.text_in_region(&region) {
        Ok(text) => text,
        Err(error) => {
            warn!(error = %error, "region text extraction failed, continuing without nearby text");
            String::new()
        }
    };

    let mut identifiers = detect_table_header(matcher, &nearby_text);
    identifiers.union(matcher.match_text(&nearby_text));

    if let Some((recognizer, image)) = recognizer {
        match recognizer.recognize(image) {
            Ok(recognized) => identifiers.union(matcher.match_text(&recognized)),
            Err(error) => {
                warn!(error = %error, "in-image recognition failed, continuing without it");
            }
        }
    }

    identifiers
}

use anyhow::{Result, anyhow};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::warn;

use crate::sku::{BoundingBox, RegionTextSource};

/// Bind to the pdfium library, preferring a bundled copy next to the
/// binary before falling back to the system installation.
pub fn create_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|error| anyhow!("failed to load the pdfium library: {error:?}"))?;

    Ok(Pdfium::new(bindings))
}

/// One embedded image object of a page, in document order. Decoding is
/// attempted per image; a failure is carried here so the caller can skip
/// that image alone.
pub struct PageImage {
    pub index: u32,
    pub bounds: BoundingBox,
    pub raster: Result<DynamicImage>,
}

/// Enumerate the embedded raster images of a page with their placement
/// rectangles. An image whose bounds cannot be read falls back to the
/// full page rectangle, matching how an unplaced image is best-effort
/// associated with the whole page's text.
pub fn list_embedded_images(page: &PdfPage) -> Vec<PageImage> {
    let page_width = page.width().value;
    let page_height = page.height().value;

    let mut images = Vec::new();
    let mut index = 0_u32;

    for object in page.objects().iter() {
        let Some(image_object) = object.as_image_object() else {
            continue;
        };

        let bounds = match object.bounds() {
            Ok(quad) => {
                let rect = quad.to_rect();
                BoundingBox::new(
                    rect.left().value,
                    rect.bottom().value,
                    rect.right().value,
                    rect.top().value,
                )
            }
            Err(error) => {
                warn!(index, error = %error, "image bounds unavailable, using full page");
                BoundingBox::new(0.0, 0.0, page_width, page_height)
            }
        };

        let raster = image_object
            .get_raw_image()
            .map_err(|error| anyhow!("failed to decode embedded image {index}: {error:?}"));

        images.push(PageImage {
            index,
            bounds,
            raster,
        });
        index += 1;
    }

    images
}

/// Region text access over a page's text layer. When the text layer
/// cannot be loaded at all, every region reads as empty and association
/// proceeds on the remaining sources.
pub struct PageTextSource<'a> {
    text: Option<PdfPageText<'a>>,
}

impl<'a> PageTextSource<'a> {
    pub fn new(page: &'a PdfPage) -> Self {
        let text = match page.text() {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(error = %error, "page text layer unavailable");
                None
            }
        };

        Self { text }
    }
}

impl RegionTextSource for PageTextSource<'_> {
    fn text_in_region(&self, region: &BoundingBox) -> Result<String> {
        let Some(text) = &self.text else {
            return Ok(String::new());
        };

        let rect = PdfRect::new(
            PdfPoints::new(region.y0),
            PdfPoints::new(region.x0),
            PdfPoints::new(region.y1),
            PdfPoints::new(region.x1),
        );

        Ok(text.inside_rect(rect))
    }
}

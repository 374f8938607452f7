use std::path::Path;
use std::time::Instant;

use anyhow::{Result, anyhow};
use pdfium_render::prelude::*;
use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::model::CatalogReport;
use crate::sku::{
    CatalogIndexBuilder, ImageTextRecognizer, SkuMatcher, build_key, identifiers_for_image,
};
use crate::util::{ensure_directory, write_json_pretty};

use super::ocr::TesseractRecognizer;
use super::pdf_source::{PageTextSource, list_embedded_images};
use super::persist::persist_jpeg;

const INDEX_FILENAME: &str = "sku_to_image_mapping.json";

/// How processing one embedded image ended. Skips are explicit branches
/// rather than swallowed errors, so the accounting is testable.
pub enum ImageOutcome {
    Saved { bytes: u64 },
    SkippedSmall,
    SkippedDecode,
    SkippedEncode,
}

#[derive(Debug, Default)]
pub struct ExtractCounters {
    pub scanned: usize,
    pub saved: usize,
    pub skipped_small: usize,
    pub skipped_decode: usize,
    pub skipped_encode: usize,
    pub bytes_written: u64,
}

impl ExtractCounters {
    pub fn record(&mut self, outcome: &ImageOutcome) {
        self.scanned += 1;
        match outcome {
            ImageOutcome::Saved { bytes } => {
                self.saved += 1;
                self.bytes_written += bytes;
            }
            ImageOutcome::SkippedSmall => self.skipped_small += 1,
            ImageOutcome::SkippedDecode => self.skipped_decode += 1,
            ImageOutcome::SkippedEncode => self.skipped_encode += 1,
        }
    }
}

/// Process one catalog PDF to completion: extract qualifying images,
/// associate identifiers, persist JPEGs, and write the per-catalog index.
///
/// Failure to open the document is catalog-fatal (the caller records the
/// catalog as failed); everything below that degrades per page or per
/// image without aborting the catalog.
#[allow(clippy::too_many_arguments)]
pub fn process_catalog(
    pdfium: &Pdfium,
    pdf_path: &Path,
    catalog: &str,
    output_dir: &Path,
    config: &ExtractConfig,
    matcher: &SkuMatcher,
    recognizer: Option<&TesseractRecognizer>,
    max_pages_per_doc: Option<usize>,
) -> Result<CatalogReport> {
    let started = Instant::now();

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|error| anyhow!("failed to open {}: {error:?}", pdf_path.display()))?;
    ensure_directory(output_dir)?;

    let page_count = document.pages().len() as usize;
    let pages_to_process = max_pages_per_doc
        .map(|max| max.min(page_count))
        .unwrap_or(page_count);

    info!(catalog, pages = page_count, "opened catalog");

    let mut counters = ExtractCounters::default();
    let mut index_builder = CatalogIndexBuilder::new(catalog);

    for (page_index, page) in document.pages().iter().enumerate().take(pages_to_process) {
        let page_number = (page_index + 1) as u32;

        if page_number % 10 == 0 {
            info!(
                catalog,
                page = page_number,
                total = pages_to_process,
                saved = counters.saved,
                "progress"
            );
        }

        process_page(
            &page,
            page_number,
            output_dir,
            config,
            matcher,
            recognizer,
            &mut counters,
            &mut index_builder,
        );
    }

    let unique_skus = index_builder.unique_sku_count();
    let index = index_builder.build();
    write_json_pretty(&output_dir.join(INDEX_FILENAME), &index)?;

    Ok(CatalogReport {
        catalog: catalog.to_string(),
        pdf_name: pdf_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(catalog)
            .to_string(),
        pages: pages_to_process,
        images_scanned: counters.scanned,
        images_saved: counters.saved,
        skipped_small: counters.skipped_small,
        skipped_decode: counters.skipped_decode,
        skipped_encode: counters.skipped_encode,
        unique_skus,
        bytes_written: counters.bytes_written,
        processing_secs: started.elapsed().as_secs_f64(),
    })
}

#[allow(clippy::too_many_arguments)]
fn process_page(
    page: &PdfPage,
    page_number: u32,
    output_dir: &Path,
    config: &ExtractConfig,
    matcher: &SkuMatcher,
    recognizer: Option<&TesseractRecognizer>,
    counters: &mut ExtractCounters,
    index_builder: &mut CatalogIndexBuilder,
) {
    let page_width = page.width().value;
    let page_height = page.height().value;
    let text_source = PageTextSource::new(page);

    for embedded in list_embedded_images(page) {
        let raster = match embedded.raster {
            Ok(raster) => raster,
            Err(error) => {
                warn!(
                    page = page_number,
                    index = embedded.index,
                    error = %error,
                    "skipping undecodable image"
                );
                counters.record(&ImageOutcome::SkippedDecode);
                continue;
            }
        };

        if !meets_minimum_size(raster.width(), raster.height(), config.min_image_size) {
            counters.record(&ImageOutcome::SkippedSmall);
            continue;
        }

        let identifiers = identifiers_for_image(
            matcher,
            &text_source,
            &embedded.bounds,
            page_width,
            page_height,
            config.expand_margin,
            recognizer.map(|r| (r as &dyn ImageTextRecognizer, &raster)),
        );

        let key = build_key(
            &identifiers,
            page_number,
            embedded.index,
            config.max_skus_in_key,
        );
        let filename = format!("{key}.jpg");

        match persist_jpeg(&raster, &output_dir.join(&filename), config.jpeg_quality) {
            Ok(bytes) => {
                index_builder.record(&filename, page_number, &identifiers);
                counters.record(&ImageOutcome::Saved { bytes });
            }
            Err(error) => {
                warn!(
                    page = page_number,
                    index = embedded.index,
                    error = %error,
                    "failed to persist image"
                );
                counters.record(&ImageOutcome::SkippedEncode);
            }
        }
    }
}

/// Images below the minimum in either dimension are icons or page
/// decoration, not product photos.
fn meets_minimum_size(width: u32, height: u32, min_image_size: u32) -> bool {
    width >= min_image_size && height >= min_image_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_each_outcome_separately() {
        let mut counters = ExtractCounters::default();
        counters.record(&ImageOutcome::Saved { bytes: 1000 });
        counters.record(&ImageOutcome::Saved { bytes: 500 });
        counters.record(&ImageOutcome::SkippedSmall);
        counters.record(&ImageOutcome::SkippedDecode);
        counters.record(&ImageOutcome::SkippedEncode);

        assert_eq!(counters.scanned, 5);
        assert_eq!(counters.saved, 2);
        assert_eq!(counters.skipped_small, 1);
        assert_eq!(counters.skipped_decode, 1);
        assert_eq!(counters.skipped_encode, 1);
        assert_eq!(counters.bytes_written, 1500);
    }

    #[test]
    fn minimum_size_requires_both_dimensions() {
        assert!(!meets_minimum_size(50, 50, 100));
        assert!(!meets_minimum_size(150, 50, 100));
        assert!(!meets_minimum_size(50, 150, 100));
        assert!(meets_minimum_size(100, 100, 100));
    }
}

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::{ExtractArgs, MatchProfile};
use crate::commands::inventory::{catalog_name, discover_pdfs};
use crate::config::{ExtractConfig, MatcherConfig};
use crate::model::BatchSummary;
use crate::sku::SkuMatcher;
use crate::util::{ensure_directory, now_utc_string, write_json_pretty};

use super::catalog::process_catalog;
use super::ocr::TesseractRecognizer;
use super::pdf_source::create_pdfium;

const BATCH_SUMMARY_FILENAME: &str = "_batch_summary.json";

pub fn run(args: ExtractArgs) -> Result<()> {
    let config = build_config(&args);
    let matcher = SkuMatcher::new(&config.matcher)?;

    let mut pdf_paths = discover_pdfs(&args.input_dir)?;
    pdf_paths.sort();
    if !args.catalogs.is_empty() {
        pdf_paths.retain(|path| {
            catalog_name(path)
                .map(|name| args.catalogs.contains(&name))
                .unwrap_or(false)
        });
    }

    if pdf_paths.is_empty() {
        bail!("no catalog PDFs found in {}", args.input_dir.display());
    }

    info!(
        catalogs = pdf_paths.len(),
        profile = args.profile.as_str(),
        input = %args.input_dir.display(),
        output = %args.output_dir.display(),
        "starting batch extraction"
    );

    let pdfium = create_pdfium()?;
    let recognizer = if config.ocr_enabled {
        if TesseractRecognizer::available() {
            Some(TesseractRecognizer::new(&config.ocr_lang))
        } else {
            warn!("tesseract unavailable, continuing without in-image recognition");
            None
        }
    } else {
        None
    };

    ensure_directory(&args.output_dir)?;

    let mut reports = Vec::new();
    let mut errors = Vec::new();

    for (position, pdf_path) in pdf_paths.iter().enumerate() {
        let catalog = catalog_name(pdf_path).unwrap_or_else(|| format!("catalog-{position}"));
        let catalog_dir = args.output_dir.join(&catalog);

        info!(
            catalog = %catalog,
            position = position + 1,
            total = pdf_paths.len(),
            "processing catalog"
        );

        match process_catalog(
            &pdfium,
            pdf_path,
            &catalog,
            &catalog_dir,
            &config,
            &matcher,
            recognizer.as_ref(),
            args.max_pages_per_doc,
        ) {
            Ok(report) => {
                info!(
                    catalog = %catalog,
                    saved = report.images_saved,
                    skipped_small = report.skipped_small,
                    unique_skus = report.unique_skus,
                    bytes = report.bytes_written,
                    secs = format!("{:.1}", report.processing_secs),
                    "catalog completed"
                );
                reports.push(report);
            }
            Err(error) => {
                warn!(catalog = %catalog, error = %error, "catalog failed");
                errors.push(catalog);
            }
        }
    }

    let summary = BatchSummary {
        generated: now_utc_string(),
        total_catalogs: pdf_paths.len(),
        successful: reports.len(),
        failed: errors.len(),
        total_images: reports.iter().map(|report| report.images_saved).sum(),
        total_skus: reports.iter().map(|report| report.unique_skus).sum(),
        catalogs: reports,
        errors,
    };

    let summary_path: PathBuf = args.output_dir.join(BATCH_SUMMARY_FILENAME);
    write_json_pretty(&summary_path, &summary)?;

    info!(
        successful = summary.successful,
        failed = summary.failed,
        total_images = summary.total_images,
        total_skus = summary.total_skus,
        summary = %summary_path.display(),
        "batch extraction complete"
    );

    Ok(())
}

fn build_config(args: &ExtractArgs) -> ExtractConfig {
    let matcher = match args.profile {
        MatchProfile::Broad => MatcherConfig::broad(),
        MatchProfile::Strict => MatcherConfig::strict(),
    };

    let mut config = ExtractConfig::new(matcher);
    config.min_image_size = args.min_image_size;
    config.jpeg_quality = args.quality;
    config.max_skus_in_key = args.max_skus_in_key;
    config.expand_margin = args.expand_margin;
    config.ocr_enabled = args.ocr;
    config.ocr_lang = args.ocr_lang.clone();
    config
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args() -> ExtractArgs {
        ExtractArgs {
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            catalogs: Vec::new(),
            profile: MatchProfile::Strict,
            min_image_size: 120,
            quality: 70,
            max_skus_in_key: 10,
            expand_margin: 20.0,
            max_pages_per_doc: None,
            ocr: true,
            ocr_lang: "nld".to_string(),
        }
    }

    #[test]
    fn cli_overrides_flow_into_the_config() {
        let config = build_config(&args());

        assert_eq!(config.min_image_size, 120);
        assert_eq!(config.jpeg_quality, 70);
        assert_eq!(config.max_skus_in_key, 10);
        assert_eq!(config.expand_margin, 20.0);
        assert!(config.ocr_enabled);
        assert_eq!(config.ocr_lang, "nld");
        assert_eq!(config.matcher.min_numeric_len, 5);
    }
}

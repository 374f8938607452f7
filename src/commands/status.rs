use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{BatchSummary, CatalogIndex};

pub fn run(args: StatusArgs) -> Result<()> {
    let summary_path = args.output_dir.join("_batch_summary.json");

    info!(output_dir = %args.output_dir.display(), "status requested");

    if summary_path.exists() {
        let raw = fs::read(&summary_path)
            .with_context(|| format!("failed to read {}", summary_path.display()))?;
        let summary: BatchSummary = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", summary_path.display()))?;

        info!(
            generated = %summary.generated,
            total_catalogs = summary.total_catalogs,
            successful = summary.successful,
            failed = summary.failed,
            total_images = summary.total_images,
            total_skus = summary.total_skus,
            "loaded batch summary"
        );

        for failed in &summary.errors {
            warn!(catalog = %failed, "catalog recorded as failed");
        }
    } else {
        warn!(path = %summary_path.display(), "batch summary missing");
    }

    let mut indexed_catalogs = 0_usize;
    if args.output_dir.exists() {
        let entries = fs::read_dir(&args.output_dir)
            .with_context(|| format!("failed to read {}", args.output_dir.display()))?;

        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read entry in {}", args.output_dir.display()))?;
            let index_path = entry.path().join("sku_to_image_mapping.json");
            if !index_path.exists() {
                continue;
            }

            let raw = fs::read(&index_path)
                .with_context(|| format!("failed to read {}", index_path.display()))?;
            let index: CatalogIndex = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", index_path.display()))?;

            info!(
                catalog = %index.catalog,
                generated = %index.generated,
                total_skus = index.total_skus,
                total_images = index.total_images,
                "catalog index"
            );
            indexed_catalogs += 1;
        }
    } else {
        warn!(path = %args.output_dir.display(), "output directory missing");
    }

    info!(indexed_catalogs, "status complete");

    Ok(())
}

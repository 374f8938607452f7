use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfEntry {
    pub filename: String,
    pub catalog: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub pdf_count: usize,
    pub pdfs: Vec<PdfEntry>,
}

/// One image a SKU was found with: the persisted filename, the source
/// page, and every SKU that image carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuOccurrence {
    pub filename: String,
    pub page: u32,
    pub all_skus: Vec<String>,
}

/// The per-catalog SKU-to-image lookup table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub catalog: String,
    pub generated: String,
    pub total_skus: usize,
    pub total_images: usize,
    pub mapping: BTreeMap<String, Vec<SkuOccurrence>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    pub catalog: String,
    pub pdf_name: String,
    pub pages: usize,
    pub images_scanned: usize,
    pub images_saved: usize,
    pub skipped_small: usize,
    pub skipped_decode: usize,
    pub skipped_encode: usize,
    pub unique_skus: usize,
    pub bytes_written: u64,
    pub processing_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub generated: String,
    pub total_catalogs: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_images: usize,
    pub total_skus: usize,
    pub catalogs: Vec<CatalogReport>,
    pub errors: Vec<String>,
}

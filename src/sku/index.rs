use std::collections::BTreeMap;

use crate::model::{CatalogIndex, SkuOccurrence};
use crate::sku::IdentifierSet;
use crate::util::now_utc_string;

/// Inverts the per-image identifier sets of one catalog into an
/// identifier-to-occurrences mapping.
///
/// Occurrence lists preserve the order in which images were processed.
/// An identifier can legitimately appear under many images (shared parts
/// across SKUs) and one image under many identifiers; nothing is ever
/// dropped.
pub struct CatalogIndexBuilder {
    catalog: String,
    mapping: BTreeMap<String, Vec<SkuOccurrence>>,
    total_images: usize,
}

impl CatalogIndexBuilder {
    pub fn new(catalog: &str) -> Self {
        Self {
            catalog: catalog.to_string(),
            mapping: BTreeMap::new(),
            total_images: 0,
        }
    }

    /// Record one persisted image under every identifier it carries.
    pub fn record(&mut self, filename: &str, page: u32, identifiers: &IdentifierSet) {
        self.total_images += 1;

        let all_skus = identifiers.sorted();
        for sku in identifiers.iter() {
            self.mapping
                .entry(sku.to_string())
                .or_default()
                .push(SkuOccurrence {
                    filename: filename.to_string(),
                    page,
                    all_skus: all_skus.clone(),
                });
        }
    }

    pub fn unique_sku_count(&self) -> usize {
        self.mapping.len()
    }

    pub fn build(self) -> CatalogIndex {
        CatalogIndex {
            catalog: self.catalog,
            generated: now_utc_string(),
            total_skus: self.mapping.len(),
            total_images: self.total_images,
            mapping: self.mapping,
        }
    }
}

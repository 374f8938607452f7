//! SKU association core: pattern matching, table-header detection,
//! region aggregation, key generation, and catalog index building.

use std::collections::BTreeMap;

pub mod index;
pub mod key;
pub mod matcher;
pub mod region;
pub mod table;

pub use index::CatalogIndexBuilder;
pub use key::build_key;
pub use matcher::SkuMatcher;
pub use region::{BoundingBox, ImageTextRecognizer, RegionTextSource, identifiers_for_image};
pub use table::detect_table_header;

/// The identifiers associated with one extracted image.
///
/// Uniqueness is judged on the uppercased token; the first-seen original
/// casing is kept for output. Iteration order is deterministic (uppercase
/// key order), and [`IdentifierSet::sorted`] is used wherever the set is
/// serialized into a name or artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    entries: BTreeMap<String, String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &str) {
        self.entries
            .entry(token.to_uppercase())
            .or_insert_with(|| token.to_string());
    }

    pub fn union(&mut self, other: IdentifierSet) {
        for (key, original) in other.entries {
            self.entries.entry(key).or_insert(original);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&token.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Original-casing tokens in lexicographic order.
    pub fn sorted(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.entries.values().cloned().collect();
        tokens.sort();
        tokens
    }
}

impl FromIterator<String> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(&token);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates_case_insensitively_keeping_first_casing() {
        let mut set = IdentifierSet::new();
        set.insert("dhp484");
        set.insert("DHP484");

        assert_eq!(set.len(), 1);
        assert!(set.contains("DHP484"));
        assert_eq!(set.sorted(), vec!["dhp484".to_string()]);
    }

    #[test]
    fn union_keeps_existing_entries_on_collision() {
        let mut left = IdentifierSet::new();
        left.insert("BL1860B");

        let mut right = IdentifierSet::new();
        right.insert("bl1860b");
        right.insert("DC18RC");

        left.union(right);
        assert_eq!(left.sorted(), vec!["BL1860B", "DC18RC"]);
    }

    #[test]
    fn sorted_is_lexicographic_over_original_casing() {
        let set: IdentifierSet = ["19171-8", "DHP484", "DC18RC"]
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(set.sorted(), vec!["19171-8", "DC18RC", "DHP484"]);
    }
}

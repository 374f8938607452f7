use anyhow::{Context, Result};
use regex::Regex;

use crate::config::MatcherConfig;
use crate::sku::IdentifierSet;

/// Applies the configured token patterns to a text blob and filters the
/// union down to plausible SKU-like tokens.
///
/// Identifier shapes vary by catalog vendor (letter+digit SKUs, pure
/// numeric part numbers, hyphenated codes), so matching is a best-effort
/// union of shape heuristics with a filter layer to suppress the most
/// common noise: page numbers, unit labels, small counts.
pub struct SkuMatcher {
    patterns: Vec<Regex>,
    min_numeric_len: usize,
    min_alpha_len: Option<usize>,
    stoplist: Vec<String>,
}

impl SkuMatcher {
    pub fn new(config: &MatcherConfig) -> Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){pattern}"))
                    .with_context(|| format!("failed to compile SKU pattern: {pattern}"))
            })
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self {
            patterns,
            min_numeric_len: config.min_numeric_len,
            min_alpha_len: config.min_alpha_len,
            stoplist: config.stoplist.iter().map(|word| word.to_uppercase()).collect(),
        })
    }

    /// Never fails; unmatched input yields an empty set.
    pub fn match_text(&self, text: &str) -> IdentifierSet {
        let mut identifiers = IdentifierSet::new();

        for pattern in &self.patterns {
            for token in pattern.find_iter(text) {
                let token = token.as_str();
                if self.accepts(token) {
                    identifiers.insert(token);
                }
            }
        }

        identifiers
    }

    fn accepts(&self, token: &str) -> bool {
        if token.chars().all(|c| c.is_ascii_digit()) {
            return token.len() >= self.min_numeric_len;
        }

        if token.chars().all(char::is_alphabetic) {
            match self.min_alpha_len {
                Some(min_len) => {
                    if token.chars().count() < min_len {
                        return false;
                    }
                }
                None => return false,
            }
        }

        !self.stoplist.contains(&token.to_uppercase())
    }
}

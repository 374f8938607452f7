use crate::sku::IdentifierSet;
use crate::util::short_content_hash;

/// Characters that cannot appear in filenames on common filesystems.
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Keys longer than this are truncated and hash-suffixed to stay inside
/// path-length limits.
const MAX_KEY_LEN: usize = 150;
const TRUNCATED_PREFIX_LEN: usize = 140;

/// Build the filename stem for a persisted image.
///
/// The sorted identifiers are joined with `+`, capped at `max_in_key`
/// with a `+{N}more` overflow marker, and suffixed with the page and
/// image index so two images sharing an identifier set never collide.
/// The result is a pure function of its inputs: re-runs over the same
/// document produce identical keys.
pub fn build_key(identifiers: &IdentifierSet, page: u32, index: u32, max_in_key: usize) -> String {
    if identifiers.is_empty() {
        return format!("page{page:03}_img{index:02}");
    }

    let sorted = identifiers.sorted();
    let joined = if sorted.len() > max_in_key {
        format!(
            "{}+{}more",
            sorted[..max_in_key].join("+"),
            sorted.len() - max_in_key
        )
    } else {
        sorted.join("+")
    };

    let key = format!("{joined}_p{page:03}_i{index:02}");
    let key: String = key
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();

    if key.len() > MAX_KEY_LEN {
        let prefix = truncate_at_char_boundary(&key, TRUNCATED_PREFIX_LEN);
        format!("{prefix}_{}", short_content_hash(&key))
    } else {
        key
    }
}

fn truncate_at_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }

    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(tokens: &[&str]) -> IdentifierSet {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn single_identifier_key_carries_positional_suffix() {
        let key = build_key(&set_of(&["DHP484"]), 3, 0, 8);
        assert_eq!(key, "DHP484_p003_i00");
    }

    #[test]
    fn empty_set_falls_back_to_page_and_index() {
        let key = build_key(&IdentifierSet::new(), 12, 5, 8);
        assert_eq!(key, "page012_img05");
    }

    #[test]
    fn identifiers_are_sorted_before_joining() {
        let key = build_key(&set_of(&["DHP484", "19171-8", "DC18RC"]), 1, 2, 8);
        assert_eq!(key, "19171-8+DC18RC+DHP484_p001_i02");
    }

    #[test]
    fn overflow_beyond_the_cap_appends_more_marker() {
        let tokens: Vec<String> = (0..12).map(|n| format!("CODE{n:02}")).collect();
        let set: IdentifierSet = tokens.into_iter().collect();

        let key = build_key(&set, 7, 3, 8);
        assert!(key.contains("+4more_p007_i03"));
        assert_eq!(key.matches('+').count(), 8);
    }

    #[test]
    fn illegal_filesystem_characters_are_replaced() {
        let key = build_key(&set_of(&["A/B:C?1234"]), 1, 0, 8);
        assert!(!key.contains(['/', ':', '?']));
        assert_eq!(key, "A_B_C_1234_p001_i00");
    }

    #[test]
    fn long_keys_are_truncated_with_a_hash_suffix() {
        let tokens: Vec<String> = (0..10).map(|n| format!("LONGCODE{n:011}")).collect();
        let set: IdentifierSet = tokens.into_iter().collect();

        let key = build_key(&set, 1, 0, 10);
        assert!(key.len() <= MAX_KEY_LEN);

        let (prefix, hash) = key.rsplit_once('_').unwrap();
        assert_eq!(prefix.len(), TRUNCATED_PREFIX_LEN);
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn truncated_keys_remain_deterministic() {
        let tokens: Vec<String> = (0..10).map(|n| format!("LONGCODE{n:011}")).collect();
        let set: IdentifierSet = tokens.clone().into_iter().collect();
        let again: IdentifierSet = tokens.into_iter().collect();

        assert_eq!(build_key(&set, 1, 0, 10), build_key(&again, 1, 0, 10));
    }

    #[test]
    fn same_identifiers_on_different_positions_yield_different_keys() {
        let set = set_of(&["DHP484", "DC18RC"]);
        let first = build_key(&set, 3, 0, 8);
        let second = build_key(&set, 3, 1, 8);
        let third = build_key(&set, 4, 0, 8);

        assert_ne!(first, second);
        assert_ne!(first, third);
        assert_ne!(second, third);
    }
}

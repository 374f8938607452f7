use crate::sku::{IdentifierSet, SkuMatcher};

/// Header candidates are confined to the first lines of the region text.
const HEADER_CANDIDATE_LINES: usize = 5;
/// Rows examined below an accepted header for wrapped or secondary codes.
const FOLLOW_UP_LINES: usize = 3;

/// Decide whether the region text looks like a catalog table and, if so,
/// harvest identifiers from the header row and a few following rows.
///
/// Catalog tables place the row of SKUs as column headers with coded
/// property rows beneath. A line among the first five that yields two or
/// more identifiers is treated as a header row; its identifiers are
/// accepted along with any found in up to three lines below it (headers
/// sometimes wrap, or secondary codes sit just under the header).
/// Scanning only near the top avoids false matches from deep body text.
///
/// This is a heuristic, not a layout parser: line position and identifier
/// density are the only cues.
pub fn detect_table_header(matcher: &SkuMatcher, text: &str) -> IdentifierSet {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut identifiers = IdentifierSet::new();

    for (position, line) in lines.iter().take(HEADER_CANDIDATE_LINES).enumerate() {
        let line_identifiers = matcher.match_text(line);
        if line_identifiers.len() < 2 {
            continue;
        }

        identifiers.union(line_identifiers);

        for follow_up in lines.iter().skip(position + 1).take(FOLLOW_UP_LINES) {
            identifiers.union(matcher.match_text(follow_up));
        }
    }

    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatcherConfig;

    fn matcher() -> SkuMatcher {
        SkuMatcher::new(&MatcherConfig::broad()).unwrap()
    }

    #[test]
    fn header_row_with_multiple_skus_is_accepted() {
        let found = detect_table_header(&matcher(), "DHP484  DC18RC  BL1860B\nspec spec spec");

        assert_eq!(found.len(), 3);
        assert!(found.contains("DHP484"));
        assert!(found.contains("DC18RC"));
        assert!(found.contains("BL1860B"));
    }

    #[test]
    fn single_sku_lines_do_not_trigger_header_detection() {
        let found = detect_table_header(&matcher(), "DHP484\ngewicht 1,5 kg\nlengte 179 mm");
        assert!(found.is_empty());
    }

    #[test]
    fn follow_up_rows_below_a_header_are_harvested() {
        let text =
            "DHP484  DHP486\ncapaciteit 196953\nkoppel 54 Nm\naccu BL1860B\ngewicht 1,5 kg\nbereik 19171-8";
        let found = detect_table_header(&matcher(), text);

        assert!(found.contains("DHP484"));
        assert!(found.contains("DHP486"));
        assert!(found.contains("196953"));
        assert!(found.contains("BL1860B"));
        // Fifth line below the header is outside both the candidate and
        // follow-up windows.
        assert!(!found.contains("19171-8"));
    }

    #[test]
    fn headers_below_the_candidate_window_are_ignored() {
        let text = "intro\nregel twee\nregel drie\nregel vier\nregel vijf\nDHP484  DC18RC";
        let found = detect_table_header(&matcher(), text);
        assert!(found.is_empty());
    }

    #[test]
    fn blank_and_padded_lines_are_dropped_before_windowing() {
        let text = "\n   \n  DHP484  DC18RC  \nspec";
        let found = detect_table_header(&matcher(), text);
        assert!(found.contains("DHP484"));
        assert!(found.contains("DC18RC"));
    }
}

/// Pattern and filter settings for the identifier matcher.
///
/// Two deployed profiles exist. The broad profile carries every pattern
/// shape seen across vendor catalogs and tolerates alphabetic codes of
/// four characters or more; the strict profile keeps only the three
/// high-precision shapes and rejects alphabetic tokens outright.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Ordered regex pattern list, applied case-insensitively.
    pub patterns: Vec<String>,
    /// Purely numeric tokens shorter than this are rejected.
    pub min_numeric_len: usize,
    /// Purely alphabetic tokens shorter than this are rejected;
    /// `None` rejects alphabetic tokens entirely.
    pub min_alpha_len: Option<usize>,
    /// Known false-positive words, compared uppercased.
    pub stoplist: Vec<String>,
}

/// Letter-prefixed alphanumeric codes: DHP484, BL1860B, DC18RC.
const PATTERN_LETTER_PREFIXED: &str = r"\b[A-Z]{2,}\d{2,}[A-Z]*\d*\b";
/// Six-digit numeric codes.
const PATTERN_SIX_DIGIT: &str = r"\b\d{6}\b";
/// Hyphenated codes: 19171-8.
const PATTERN_HYPHENATED: &str = r"\b\d{5}-\d\b";
/// Bare 4-5 digit codes.
const PATTERN_SHORT_NUMERIC: &str = r"\b\d{4,5}\b";
/// Short letter+digit codes with optional whitespace: L 11, L11.
const PATTERN_LETTER_DIGIT: &str = r"\b[A-Z]{1,2}\s?\d{2,4}\b";
/// Numeric range codes: 0-41.
const PATTERN_NUMERIC_RANGE: &str = r"\b\d+-\d+\b";

const STOPLIST: [&str; 4] = ["PAGE", "VOLT", "WATT", "TYPE"];

impl MatcherConfig {
    pub fn broad() -> Self {
        Self {
            patterns: vec![
                PATTERN_LETTER_PREFIXED.to_string(),
                PATTERN_SIX_DIGIT.to_string(),
                PATTERN_HYPHENATED.to_string(),
                PATTERN_SHORT_NUMERIC.to_string(),
                PATTERN_LETTER_DIGIT.to_string(),
                PATTERN_NUMERIC_RANGE.to_string(),
            ],
            min_numeric_len: 4,
            min_alpha_len: Some(4),
            stoplist: STOPLIST.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn strict() -> Self {
        Self {
            patterns: vec![
                PATTERN_LETTER_PREFIXED.to_string(),
                PATTERN_SIX_DIGIT.to_string(),
                PATTERN_HYPHENATED.to_string(),
            ],
            min_numeric_len: 5,
            min_alpha_len: None,
            stoplist: STOPLIST.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Per-run extraction settings. Constructed once from CLI arguments and
/// passed by reference into each component; nothing reads global state.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Images with either dimension below this are skipped as decoration.
    pub min_image_size: u32,
    /// JPEG encoding quality, 1-100.
    pub jpeg_quality: u8,
    /// Maximum number of identifiers joined into a key before the
    /// `+{N}more` overflow marker takes over.
    pub max_skus_in_key: usize,
    /// Outward expansion of an image's bounding box, in page units,
    /// when gathering nearby text.
    pub expand_margin: f32,
    /// Run identifier recognition over the raster itself.
    pub ocr_enabled: bool,
    /// Language passed to the OCR engine.
    pub ocr_lang: String,
    pub matcher: MatcherConfig,
}

impl ExtractConfig {
    pub fn new(matcher: MatcherConfig) -> Self {
        Self {
            min_image_size: 100,
            jpeg_quality: 85,
            max_skus_in_key: 8,
            expand_margin: 50.0,
            ocr_enabled: false,
            ocr_lang: "eng".to_string(),
            matcher,
        }
    }
}

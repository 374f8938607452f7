use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "skumap",
    version,
    about = "Catalog image extraction and SKU mapping tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Extract(ExtractArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    /// Directory holding the catalog PDFs.
    #[arg(long, default_value = "documents/catalogs")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Directory holding the catalog PDFs.
    #[arg(long, default_value = "documents/catalogs")]
    pub input_dir: PathBuf,

    /// Root directory for per-catalog output folders.
    #[arg(long, default_value = "extracted-catalogs")]
    pub output_dir: PathBuf,

    /// Process only catalogs whose name (file stem) matches.
    #[arg(long = "catalog")]
    pub catalogs: Vec<String>,

    /// Identifier pattern/filter profile.
    #[arg(long, value_enum, default_value_t = MatchProfile::Broad)]
    pub profile: MatchProfile,

    /// Skip images with either dimension below this many pixels.
    #[arg(long, default_value_t = 100)]
    pub min_image_size: u32,

    /// JPEG encoding quality, 1-100.
    #[arg(long, default_value_t = 85)]
    pub quality: u8,

    /// Maximum identifiers joined into a filename before +Nmore.
    #[arg(
        long,
        default_value_t = 8,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(8..=10)
    )]
    pub max_skus_in_key: usize,

    /// Bounding-box expansion for the nearby-text pass, in page units.
    #[arg(long, default_value_t = 50.0)]
    pub expand_margin: f32,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    /// Recognize identifiers printed inside the images themselves.
    #[arg(long, default_value_t = false)]
    pub ocr: bool,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MatchProfile {
    Broad,
    Strict,
}

impl MatchProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broad => "broad",
            Self::Strict => "strict",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "extracted-catalogs")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_cap_below_the_valid_range_is_rejected() {
        let result = Cli::try_parse_from(["skumap", "extract", "--max-skus-in-key", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn key_cap_above_the_valid_range_is_rejected() {
        let result = Cli::try_parse_from(["skumap", "extract", "--max-skus-in-key", "11"]);
        assert!(result.is_err());
    }

    #[test]
    fn key_cap_within_the_valid_range_parses() {
        let cli = Cli::try_parse_from(["skumap", "extract", "--max-skus-in-key", "10"]).unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected the extract subcommand");
        };
        assert_eq!(args.max_skus_in_key, 10);
    }

    #[test]
    fn key_cap_defaults_to_eight() {
        let cli = Cli::try_parse_from(["skumap", "extract"]).unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected the extract subcommand");
        };
        assert_eq!(args.max_skus_in_key, 8);
    }
}

use std::fs;
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use image::DynamicImage;

use crate::sku::ImageTextRecognizer;

/// Recognizes text printed inside a raster image by shelling out to
/// tesseract, for identifiers baked into product photos.
pub struct TesseractRecognizer {
    lang: String,
}

impl TesseractRecognizer {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
        }
    }

    pub fn available() -> bool {
        command_available("tesseract")
    }
}

impl ImageTextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let png_path = std::env::temp_dir().join(format!(
            "skumap_ocr_{}_{}.png",
            std::process::id(),
            stamp
        ));

        image
            .save_with_format(&png_path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write OCR input: {}", png_path.display()))?;

        let output = Command::new("tesseract")
            .arg(&png_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to execute tesseract for {}", png_path.display()));

        let _ = fs::remove_file(&png_path);
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "tesseract returned non-zero exit status: {}",
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .replace('\u{0000}', "")
            .trim()
            .to_string())
    }
}

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("--version").output().is_ok()
}

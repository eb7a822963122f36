//! Pure-Rust AVIF encoding through the `image` crate's rav1e-backed encoder.

use std::path::Path;

use image::codecs::avif::AvifEncoder;
use image::{DynamicImage, ImageReader, ImageResult};
use tracing::debug;

use crate::processing::AvifTranscoder;
use crate::utils::{OptimizerError, OptimizerResult};

/// rav1e speed preset, 1 (slowest) to 10 (fastest).
const AVIF_SPEED: u8 = 6;

/// Transcoder that needs no system libraries.
#[derive(Debug, Clone, Copy)]
pub struct RavifTranscoder {
    speed: u8,
}

impl Default for RavifTranscoder {
    fn default() -> Self {
        Self { speed: AVIF_SPEED }
    }
}

impl RavifTranscoder {
    pub fn with_speed(speed: u8) -> Self {
        Self { speed: speed.clamp(1, 10) }
    }
}

impl AvifTranscoder for RavifTranscoder {
    fn name(&self) -> &'static str {
        "rav1e"
    }

    fn transcode(&self, input: &Path, output: &Path, quality: u8) -> OptimizerResult<()> {
        let load_error = |e: &dyn std::fmt::Display| {
            OptimizerError::processing(format!("Failed to load '{}': {e}", input.display()))
        };

        // Sniff the magic bytes; the extension is only a fallback.
        let image = ImageReader::open(input)
            .map_err(|e| load_error(&e))?
            .with_guessed_format()
            .map_err(|e| load_error(&e))?
            .decode()
            .map_err(|e| load_error(&e))?;

        debug!(
            "Loaded '{}': {}×{}",
            input.display(),
            image.width(),
            image.height()
        );

        // The AVIF encoder only takes 8-bit RGB(A) reliably; alpha is kept.
        let image = if image.color().has_alpha() {
            DynamicImage::ImageRgba8(image.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let speed = self.speed;
        encode_then_write(output, |buf| {
            let encoder = AvifEncoder::new_with_speed_quality(buf, speed, quality.clamp(1, 100));
            image.write_with_encoder(encoder)
        })
    }
}

/// Encodes into memory and only touches `output` once encoding succeeded,
/// so a failed attempt leaves the previous attempt's file in place.
fn encode_then_write(
    output: &Path,
    encode: impl FnOnce(&mut Vec<u8>) -> ImageResult<()>,
) -> OptimizerResult<()> {
    let mut encoded = Vec::new();
    encode(&mut encoded)
        .map_err(|e| OptimizerError::processing(format!("AVIF save failed: {e}")))?;

    std::fs::write(output, &encoded).map_err(|e| {
        OptimizerError::io(format!("Cannot write '{}': {e}", output.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn encodes_a_small_png() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("gradient.png");
        let output = tmp.path().join("gradient.avif");
        RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]))
            .save(&input)
            .unwrap();

        RavifTranscoder::with_speed(10).transcode(&input, &output, 60).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(!bytes.is_empty());
        // ISO-BMFF: box size then "ftyp", with the avif brand right after
        assert_eq!(&bytes[4..8], b"ftyp");
        assert_eq!(&bytes[8..12], b"avif");
    }

    #[test]
    fn decodes_by_content_when_extension_lies() {
        let tmp = TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        let misnamed = tmp.path().join("download.jpg");
        let output = tmp.path().join("download.avif");
        RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, 64, (y * 16) as u8]))
            .save(&png)
            .unwrap();
        std::fs::copy(&png, &misnamed).unwrap();

        RavifTranscoder::with_speed(10).transcode(&misnamed, &output, 60).unwrap();

        assert_eq!(&std::fs::read(&output).unwrap()[4..8], b"ftyp");
    }

    #[test]
    fn failed_encode_keeps_the_previous_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("photo.avif");
        std::fs::write(&output, b"previous attempt").unwrap();

        let err = encode_then_write(&output, |buf| {
            buf.extend_from_slice(b"half an image");
            Err(image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::InsufficientMemory,
            )))
        })
        .unwrap_err();

        assert!(matches!(err, OptimizerError::Processing(_)));
        assert_eq!(std::fs::read(&output).unwrap(), b"previous attempt");
    }

    #[test]
    fn successful_encode_replaces_the_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("photo.avif");
        std::fs::write(&output, b"a much longer previous attempt").unwrap();

        encode_then_write(&output, |buf| {
            buf.extend_from_slice(b"new");
            Ok(())
        })
        .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"new");
    }

    #[test]
    fn corrupt_input_is_a_processing_error() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("broken.jpg");
        std::fs::write(&input, b"definitely not a jpeg").unwrap();

        let err = RavifTranscoder::default()
            .transcode(&input, &tmp.path().join("broken.avif"), 60)
            .unwrap_err();
        assert!(matches!(err, OptimizerError::Processing(_)));
    }
}

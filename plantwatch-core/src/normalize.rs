//! Upload image normalization.
//!
//! Every upload is fully decoded before anything else happens, so truncated or
//! mislabelled files are rejected at the pipeline entrance. JPEG and PNG are
//! passed through byte-for-byte; every other decodable format is flattened to
//! RGB and re-encoded as JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

use crate::error::{PlantwatchError, Result};

/// Encodings forwarded to the identification service without re-encoding.
pub const ACCEPTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// Quality used when re-encoding a non-accepted upload as JPEG.
pub const JPEG_QUALITY: u8 = 90;

/// An image guaranteed to be encoded in one of [`ACCEPTED_FORMATS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    reencoded: bool,
}

impl NormalizedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type matching [`Self::format`], e.g. `image/png`.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Canonical file extension for [`Self::format`], e.g. `jpg`.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }

    /// Upload file name advertised to the identification service.
    pub fn file_name(&self) -> String {
        format!("capture.{}", self.extension())
    }

    /// Whether the upload had to be converted.
    pub fn was_reencoded(&self) -> bool {
        self.reencoded
    }
}

/// Validate `bytes` as an image and bring it into an accepted encoding.
#[instrument(level = "debug", skip_all, fields(input_bytes = bytes.len()))]
pub fn normalize(bytes: Vec<u8>) -> Result<NormalizedImage> {
    if bytes.is_empty() {
        return Err(PlantwatchError::InvalidImage("upload is empty".into()));
    }

    let format = image::guess_format(&bytes).map_err(|e| {
        PlantwatchError::InvalidImage(format!("unrecognized image format: {e}"))
    })?;

    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
        PlantwatchError::InvalidImage(format!("failed to decode {format:?} image: {e}"))
    })?;

    if ACCEPTED_FORMATS.contains(&format) {
        debug!(format = ?format, "Image already in an accepted encoding");
        return Ok(NormalizedImage {
            bytes,
            format,
            reencoded: false,
        });
    }

    let jpeg = encode_jpeg(decoded)?;
    debug!(
        source_format = ?format,
        output_bytes = jpeg.len(),
        "Re-encoded image as JPEG"
    );

    Ok(NormalizedImage {
        bytes: jpeg,
        format: ImageFormat::Jpeg,
        reencoded: true,
    })
}

// JPEG has no alpha channel, so the pixels are flattened to RGB first.
fn encode_jpeg(image: DynamicImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PlantwatchError::InvalidImage(format!("failed to re-encode as JPEG: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    const LEAF_GREEN: [u8; 3] = [46, 139, 87];

    fn solid_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(LEAF_GREEN)))
    }

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_rejects_empty_upload() {
        let err = normalize(Vec::new()).unwrap_err();
        assert!(matches!(err, PlantwatchError::InvalidImage(_)));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = normalize(b"definitely not a picture".to_vec()).unwrap_err();
        assert!(matches!(err, PlantwatchError::InvalidImage(_)));
    }

    #[test]
    fn test_rejects_truncated_png() {
        let png = encode(&solid_rgb(8, 8), ImageFormat::Png);
        let truncated = png[..png.len() / 2].to_vec();
        let err = normalize(truncated).unwrap_err();
        assert!(matches!(err, PlantwatchError::InvalidImage(_)));
    }

    #[test]
    fn test_png_passes_through_unchanged() {
        let png = encode(&solid_rgb(8, 8), ImageFormat::Png);
        let normalized = normalize(png.clone()).unwrap();
        assert_eq!(normalized.bytes(), png.as_slice());
        assert_eq!(normalized.format(), ImageFormat::Png);
        assert_eq!(normalized.mime_type(), "image/png");
        assert!(!normalized.was_reencoded());
    }

    #[test]
    fn test_jpeg_passes_through_unchanged() {
        let jpeg = encode(&solid_rgb(8, 8), ImageFormat::Jpeg);
        let normalized = normalize(jpeg.clone()).unwrap();
        assert_eq!(normalized.into_bytes(), jpeg);
    }

    #[test]
    fn test_bmp_is_reencoded_as_jpeg() {
        let bmp = encode(&solid_rgb(16, 12), ImageFormat::Bmp);
        let normalized = normalize(bmp).unwrap();

        assert!(normalized.was_reencoded());
        assert_eq!(normalized.format(), ImageFormat::Jpeg);
        assert_eq!(normalized.file_name(), "capture.jpg");
        assert_eq!(
            image::guess_format(normalized.bytes()).unwrap(),
            ImageFormat::Jpeg
        );

        let decoded = image::load_from_memory(normalized.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (16, 12));
        let pixel = decoded.to_rgb8().get_pixel(8, 6).0;
        for (actual, expected) in pixel.iter().zip(LEAF_GREEN) {
            assert!(
                actual.abs_diff(expected) <= 8,
                "pixel drifted too far: {pixel:?} vs {LEAF_GREEN:?}"
            );
        }
    }

    #[test]
    fn test_transparent_image_is_flattened() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0])));
        let gif = encode(&rgba, ImageFormat::Gif);

        let normalized = normalize(gif).unwrap();
        assert_eq!(normalized.format(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(normalized.bytes()).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.dimensions(), (4, 4));
    }
}

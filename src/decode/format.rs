//! Image format detection from leading signature bytes

use crate::workbook::constants::signatures::{BMP, GIF87A, GIF89A, JPEG_SOI, PNG, RIFF, WEBP};
use crate::workbook::types::ImageFormat;

/// Detect an image format from its signature
///
/// Returns `None` when no supported signature matches.
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(&PNG) {
        Some(ImageFormat::Png)
    } else if data.starts_with(&JPEG_SOI[..2]) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(&GIF87A) || data.starts_with(&GIF89A) {
        Some(ImageFormat::Gif)
    } else if data.len() >= 12 && data.starts_with(&RIFF) && data[8..12] == WEBP {
        Some(ImageFormat::Webp)
    } else if data.starts_with(&BMP) && data.len() >= 14 {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// Confirm a provisional format against the bytes
///
/// The signature wins over the provisional tag; bytes matching no signature
/// are reported as PNG.
pub fn confirm_format(data: &[u8], provisional: ImageFormat) -> ImageFormat {
    match detect_format(data) {
        Some(detected) => detected,
        None => {
            log::debug!("No signature matched for provisional {}, reporting png", provisional);
            ImageFormat::Png
        }
    }
}

//! Optional re-encoding into a canonical output format

use std::io::Cursor;

use image::DynamicImage;

use crate::workbook::errors::ExtractResult;
use crate::workbook::types::ImageFormat;

/// Decode `data` and encode it again as `target`
pub fn reencode(data: &[u8], target: ImageFormat) -> ExtractResult<Vec<u8>> {
    let decoded = image::load_from_memory(data)?;

    // JPEG has no alpha channel; the other encoders accept RGBA
    let prepared = match target {
        ImageFormat::Png => decoded,
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut output = Cursor::new(Vec::new());
    prepared.write_to(&mut output, target.to_codec())?;
    Ok(output.into_inner())
}

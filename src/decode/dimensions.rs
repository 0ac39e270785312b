//! Pixel dimension decoding through the image codec

use std::io::Cursor;

use image::ImageReader;

use crate::workbook::errors::ExtractResult;
use crate::workbook::types::ImageFormat;

/// Decode width and height from an image header
///
/// Only the header is parsed; pixel data is not decoded.
pub fn decode_dimensions(data: &[u8], format: ImageFormat) -> ExtractResult<(u32, u32)> {
    let reader = ImageReader::with_format(Cursor::new(data), format.to_codec());
    Ok(reader.into_dimensions()?)
}

//! Record assembly
//!
//! Turns decoded images into the externally visible `ImageRecord`s with
//! sequential zero-based indices.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::decode::DecodedImage;
use crate::workbook::types::ImageFormat;

/// One extracted image, as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// 0-based position in the output, contiguous per extraction
    pub index: usize,
    pub sheet: Option<String>,
    pub cell: Option<String>,
    pub format: ImageFormat,
    pub mime_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Length of the payload before base64 encoding
    pub size_bytes: usize,
    pub base64: String,
    pub data_uri: String,
}

impl ImageRecord {
    /// Decode the base64 payload back into image bytes
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }
}

/// Builds records from decoded images
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordAssembler;

impl RecordAssembler {
    pub fn new() -> Self {
        RecordAssembler
    }

    /// Assemble records in input order
    pub fn assemble<'a, I>(&self, images: I) -> Vec<ImageRecord>
    where
        I: IntoIterator<Item = DecodedImage<'a>>,
    {
        images
            .into_iter()
            .enumerate()
            .map(|(index, image)| self.record(index, image))
            .collect()
    }

    fn record(&self, index: usize, image: DecodedImage<'_>) -> ImageRecord {
        let mime_type = image.format.mime_type();
        let base64 = STANDARD.encode(&image.data);
        let data_uri = format!("data:{};base64,{}", mime_type, base64);

        ImageRecord {
            index,
            sheet: image.anchor.sheet,
            cell: image.anchor.cell,
            format: image.format,
            mime_type,
            width: image.width,
            height: image.height,
            size_bytes: image.data.len(),
            base64,
            data_uri,
        }
    }
}

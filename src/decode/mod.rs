//! Format confirmation, dimension decoding and optional re-encoding
//!
//! The decoder never trusts a candidate's provisional format tag: the
//! signature is checked again before the header is decoded. A header that
//! fails to decode leaves the dimensions empty without dropping the image.

pub mod format;
pub mod dimensions;
pub mod reencode;

use std::borrow::Cow;

use log::{debug, warn};

use crate::workbook::errors::ExtractError;
use crate::workbook::types::{Anchor, DiscoveryMethod, ImageCandidate, ImageFormat};

pub use dimensions::decode_dimensions;
pub use format::{confirm_format, detect_format};
pub use reencode::reencode;

/// A candidate after format confirmation and header decoding
#[derive(Debug, Clone)]
pub struct DecodedImage<'a> {
    /// Output bytes (re-encoded when a canonical format is configured)
    pub data: Cow<'a, [u8]>,
    pub format: ImageFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub anchor: Anchor,
    pub method: DiscoveryMethod,
}

/// Decoder for image candidates
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder {
    reencode: Option<ImageFormat>,
}

impl ImageDecoder {
    /// Create a decoder
    ///
    /// # Arguments
    /// * `reencode` - Canonical output format, or `None` to keep source bytes
    pub fn new(reencode: Option<ImageFormat>) -> Self {
        ImageDecoder { reencode }
    }

    /// Confirm the format, optionally re-encode, and decode dimensions
    pub fn decode<'a>(&self, candidate: ImageCandidate<'a>) -> DecodedImage<'a> {
        let ImageCandidate { data, format: provisional, method, anchor, .. } = candidate;
        let mut data = data;
        let mut format = confirm_format(&data, provisional);

        if let Some(target) = self.reencode {
            if target != format {
                match reencode(&data, target) {
                    Ok(bytes) => {
                        debug!("Re-encoded {} image ({} bytes) as {} ({} bytes)",
                               format, data.len(), target, bytes.len());
                        data = Cow::Owned(bytes);
                        format = target;
                    }
                    Err(e) => warn!("Keeping original {} bytes, re-encoding failed: {}", format, e),
                }
            }
        }

        let (width, height) = match decode_dimensions(&data, format) {
            Ok((w, h)) => (Some(w), Some(h)),
            Err(e) => {
                debug!("{}", partial_decode_failure(format, e));
                (None, None)
            }
        };

        DecodedImage { data, format, width, height, anchor, method }
    }
}

fn partial_decode_failure(format: ImageFormat, e: ExtractError) -> String {
    format!("Dimensions unavailable for {} image: {}", format, e)
}

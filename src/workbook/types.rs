//! Core data types shared by the extraction pipeline

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Raster image formats the pipeline can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Lowercase name used in records and mime types
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// File extension used when saving an image to disk
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            other => other.name(),
        }
    }

    /// Mime type in the `image/<format>` form
    pub fn mime_type(&self) -> String {
        format!("image/{}", self.name())
    }

    /// Parse a format name as used in configuration and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Equivalent codec format in the `image` crate
    pub fn to_codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Webp => image::ImageFormat::WebP,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMethod {
    /// Declared image part of an archive container
    Structured,
    /// Found by signature scanning of raw bytes
    Scanned,
}

/// Declared placement of an image within a workbook
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor {
    /// Sheet name
    pub sheet: Option<String>,
    /// Cell reference such as "B3"
    pub cell: Option<String>,
}

/// A provisionally identified image
///
/// Scanned candidates borrow their bytes from the container and carry the
/// byte range they were found at. Structured candidates own the bytes read
/// out of the archive part.
#[derive(Debug, Clone)]
pub struct ImageCandidate<'a> {
    /// Image bytes
    pub data: Cow<'a, [u8]>,
    /// Half-open byte range within the container, for scanned candidates
    pub span: Option<Range<usize>>,
    /// Provisional format tag
    pub format: ImageFormat,
    /// How this candidate was found
    pub method: DiscoveryMethod,
    /// Sheet/cell placement, when declared
    pub anchor: Anchor,
}

impl<'a> ImageCandidate<'a> {
    /// Create a candidate for a byte range of the container
    pub fn scanned(container: &'a [u8], span: Range<usize>, format: ImageFormat) -> Self {
        ImageCandidate {
            data: Cow::Borrowed(&container[span.clone()]),
            span: Some(span),
            format,
            method: DiscoveryMethod::Scanned,
            anchor: Anchor::default(),
        }
    }

    /// Create a candidate from an archive part's bytes
    pub fn structured(data: Vec<u8>, format: ImageFormat, anchor: Anchor) -> Self {
        ImageCandidate {
            data: Cow::Owned(data),
            span: None,
            format,
            method: DiscoveryMethod::Structured,
            anchor,
        }
    }

    /// Length of the candidate in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

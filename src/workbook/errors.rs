//! Custom error types for workbook image extraction

use std::fmt;
use std::io;
use std::time::Duration;

/// Extraction error types
#[derive(Debug)]
pub enum ExtractError {
    /// I/O error
    IoError(io::Error),
    /// No payload bytes were supplied
    EmptyPayload,
    /// Payload exceeds the configured upload limit
    PayloadTooLarge { size: usize, limit: usize },
    /// Payload transport encoding could not be decoded
    InvalidPayload(String),
    /// Magic bytes matched no known container kind
    UnrecognizedContainer { prefix: Vec<u8> },
    /// Zip archive could not be read
    ArchiveError(zip::result::ZipError),
    /// Workbook XML part could not be parsed
    XmlError(quick_xml::Error),
    /// Image header or codec failure for a single candidate
    DecodeError(String),
    /// External document conversion failed
    ConversionFailed(String),
    /// External document conversion exceeded its time budget
    ConversionTimeout(Duration),
    /// Configuration could not be loaded
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl ExtractError {
    /// Whether this error was caused by the caller's input rather than by processing
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractError::EmptyPayload
                | ExtractError::PayloadTooLarge { .. }
                | ExtractError::InvalidPayload(_)
        )
    }

    /// Whether this error came from the external conversion step
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, ExtractError::ConversionFailed(_) | ExtractError::ConversionTimeout(_))
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::IoError(e) => write!(f, "I/O error: {}", e),
            ExtractError::EmptyPayload => write!(
                f,
                "No file provided. Send file as multipart/form-data, JSON with base64 field, or raw binary."
            ),
            ExtractError::PayloadTooLarge { size, limit } => {
                write!(f, "Payload of {} bytes exceeds the {} byte limit", size, limit)
            }
            ExtractError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            ExtractError::UnrecognizedContainer { prefix } => {
                write!(f, "Unrecognized container signature: {:02X?}", prefix)
            }
            ExtractError::ArchiveError(e) => write!(f, "Archive error: {}", e),
            ExtractError::XmlError(e) => write!(f, "XML error: {}", e),
            ExtractError::DecodeError(msg) => write!(f, "Image decode error: {}", msg),
            ExtractError::ConversionFailed(msg) => write!(f, "Document conversion failed: {}", msg),
            ExtractError::ConversionTimeout(limit) => {
                write!(f, "Document conversion timed out after {}s", limit.as_secs())
            }
            ExtractError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ExtractError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<io::Error> for ExtractError {
    fn from(error: io::Error) -> Self {
        ExtractError::IoError(error)
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(error: zip::result::ZipError) -> Self {
        ExtractError::ArchiveError(error)
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(error: quick_xml::Error) -> Self {
        ExtractError::XmlError(error)
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(error: image::ImageError) -> Self {
        ExtractError::DecodeError(error.to_string())
    }
}

impl From<base64::DecodeError> for ExtractError {
    fn from(error: base64::DecodeError) -> Self {
        ExtractError::InvalidPayload(format!("base64: {}", error))
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        ExtractError::GenericError(format!("JSON serialization failed: {}", error))
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::ConfigError(error.to_string())
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

impl From<String> for ExtractError {
    fn from(msg: String) -> Self {
        ExtractError::GenericError(msg)
    }
}

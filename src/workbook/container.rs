//! Container classification
//!
//! Decides from the first bytes of a payload which extraction path applies.

use std::fmt;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::workbook::constants::container::{CFB_MAGIC, PREFIX_LEN, ZIP_EMPTY_MAGIC, ZIP_MAGIC};
use crate::workbook::errors::ExtractError;

/// Kind of workbook container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    /// Zip-based Office Open XML workbook (.xlsx, .xlsm)
    Archive,
    /// OLE2 compound document workbook (.xls)
    LegacyBinary,
    /// Neither signature matched
    Unknown,
}

impl ContainerKind {
    /// Format name reported in responses
    pub fn format_name(&self) -> &'static str {
        match self {
            ContainerKind::Archive => "xlsx",
            ContainerKind::LegacyBinary => "xls",
            ContainerKind::Unknown => "unknown",
        }
    }

    /// Declared kind from a filename extension
    pub fn from_extension(filename: &str) -> ContainerKind {
        let extension = Path::new(filename)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xltx" | "xltm" => ContainerKind::Archive,
            "xls" | "xlt" => ContainerKind::LegacyBinary,
            _ => ContainerKind::Unknown,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Archive => write!(f, "archive"),
            ContainerKind::LegacyBinary => write!(f, "legacy-binary"),
            ContainerKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a payload by its magic bytes
///
/// Pure function of the prefix; an empty payload is `Unknown`.
pub fn classify(data: &[u8]) -> ContainerKind {
    if data.starts_with(&ZIP_MAGIC) || data.starts_with(&ZIP_EMPTY_MAGIC) {
        ContainerKind::Archive
    } else if data.starts_with(&CFB_MAGIC) {
        ContainerKind::LegacyBinary
    } else {
        ContainerKind::Unknown
    }
}

/// A workbook payload with its classified kind
///
/// Immutable once constructed.
#[derive(Debug)]
pub struct Container<'a> {
    data: &'a [u8],
    kind: ContainerKind,
    declared: ContainerKind,
}

impl<'a> Container<'a> {
    /// Classify a payload, using the filename only as a hint
    pub fn new(data: &'a [u8], filename: Option<&str>) -> Self {
        let kind = classify(data);
        let declared = filename.map(ContainerKind::from_extension).unwrap_or(ContainerKind::Unknown);
        debug!("Classified container as {} (declared: {})", kind, declared);

        if kind == ContainerKind::Unknown {
            let prefix = data[..data.len().min(PREFIX_LEN)].to_vec();
            warn!("{}; falling back to signature scanning", ExtractError::UnrecognizedContainer { prefix });
        }

        Container { data, kind, declared }
    }

    /// Raw container bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Kind detected from magic bytes
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Kind declared by the filename extension
    pub fn declared(&self) -> ContainerKind {
        self.declared
    }

    /// Detected kind, or the declared one when detection was inconclusive
    pub fn effective_kind(&self) -> ContainerKind {
        match self.kind {
            ContainerKind::Unknown => self.declared,
            kind => kind,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_archive() {
        assert_eq!(classify(b"PK\x03\x04rest of archive"), ContainerKind::Archive);
        assert_eq!(classify(b"PK\x05\x06"), ContainerKind::Archive);
    }

    #[test]
    fn test_classify_legacy() {
        let mut data = CFB_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert_eq!(classify(&data), ContainerKind::LegacyBinary);
    }

    #[test]
    fn test_classify_unknown_and_short() {
        assert_eq!(classify(b""), ContainerKind::Unknown);
        assert_eq!(classify(b"PK"), ContainerKind::Unknown);
        assert_eq!(classify(&CFB_MAGIC[..4]), ContainerKind::Unknown);
        assert_eq!(classify(b"hello world"), ContainerKind::Unknown);
    }

    #[test]
    fn test_filename_hint_only_used_when_inconclusive() {
        let container = Container::new(b"garbage bytes", Some("report.XLSX"));
        assert_eq!(container.kind(), ContainerKind::Unknown);
        assert_eq!(container.effective_kind(), ContainerKind::Archive);

        let container = Container::new(b"PK\x03\x04....", Some("report.xls"));
        assert_eq!(container.effective_kind(), ContainerKind::Archive);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ContainerKind::Archive.format_name(), "xlsx");
        assert_eq!(ContainerKind::LegacyBinary.format_name(), "xls");
        assert_eq!(ContainerKind::from_extension("a.xlt"), ContainerKind::LegacyBinary);
        assert_eq!(ContainerKind::from_extension("noext"), ContainerKind::Unknown);
    }
}

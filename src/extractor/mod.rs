//! Image extraction from workbook containers
//!
//! `ImageExtractor` dispatches on the classified container kind: archives
//! go through the structured extractor, legacy binaries through the
//! signature scanner (or through conversion and then the structured
//! extractor), and unknown containers through the scanner.

pub mod anchor;
pub mod claims;
pub mod drawing;
pub mod parts;
pub mod scanner;
pub mod structured;

use log::{info, warn};

use crate::convert::DocumentConverter;
use crate::workbook::container::{Container, ContainerKind};
use crate::workbook::errors::ExtractResult;
use crate::workbook::types::ImageCandidate;

pub use anchor::{cell_reference, column_letters};
pub use claims::ClaimedRegions;
pub use scanner::{Rejection, RejectedMatch, ScanOutcome, SignatureScanner};
pub use structured::{ArchiveSummary, StructuredExtractor};

/// Extractor that picks a strategy per container kind
pub struct ImageExtractor {
    structured: StructuredExtractor,
    scanner: SignatureScanner,
    converter: Option<Box<dyn DocumentConverter>>,
}

impl ImageExtractor {
    /// Create an extractor that scans legacy containers
    ///
    /// # Arguments
    /// * `scanner` - Signature scanner for legacy and unknown containers
    pub fn new(scanner: SignatureScanner) -> Self {
        ImageExtractor {
            structured: StructuredExtractor::new(),
            scanner,
            converter: None,
        }
    }

    /// Convert legacy containers with `converter` instead of scanning them
    pub fn with_converter(mut self, converter: Box<dyn DocumentConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn scanner(&self) -> &SignatureScanner {
        &self.scanner
    }

    pub fn structured(&self) -> &StructuredExtractor {
        &self.structured
    }

    /// Extract every image candidate of a container, in output order
    ///
    /// # Returns
    /// Candidates in output order, or an error that aborts the whole request
    pub fn extract<'a>(&self, container: &Container<'a>) -> ExtractResult<Vec<ImageCandidate<'a>>> {
        match container.kind() {
            ContainerKind::Archive => self.extract_archive(container),
            ContainerKind::LegacyBinary => self.extract_legacy(container),
            ContainerKind::Unknown => self.extract_unknown(container),
        }
    }

    /// Structured path only; an archive without images yields none
    fn extract_archive<'a>(&self, container: &Container<'a>) -> ExtractResult<Vec<ImageCandidate<'a>>> {
        info!("Using structured extraction for archive container ({} bytes)", container.len());
        self.structured.extract(container.data())
    }

    fn extract_legacy<'a>(&self, container: &Container<'a>) -> ExtractResult<Vec<ImageCandidate<'a>>> {
        match &self.converter {
            Some(converter) => {
                info!("Converting legacy container with {}", converter.name());
                let converted = converter.convert(container.data())?;
                self.structured.extract(&converted)
            }
            None => {
                info!("Scanning legacy container ({} bytes) for image signatures", container.len());
                Ok(self.scanner.scan(container.data()))
            }
        }
    }

    /// Best-effort path: try the declared archive layout, otherwise scan
    fn extract_unknown<'a>(&self, container: &Container<'a>) -> ExtractResult<Vec<ImageCandidate<'a>>> {
        if container.declared() == ContainerKind::Archive {
            match self.structured.extract(container.data()) {
                Ok(candidates) => return Ok(candidates),
                Err(e) => warn!("Declared archive could not be opened ({}), scanning instead", e),
            }
        }
        info!("Scanning unrecognized container ({} bytes) for image signatures", container.len());
        Ok(self.scanner.scan(container.data()))
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        ImageExtractor::new(SignatureScanner::default())
    }
}

//! Read-only container analysis report

use std::fmt;

use serde::Serialize;

use crate::extractor::scanner::{ScanOutcome, PASS_ORDER};
use crate::extractor::structured::ArchiveSummary;
use crate::workbook::cfb::CfbHeader;
use crate::workbook::container::ContainerKind;
use crate::workbook::types::ImageFormat;

/// Scanner results for one format pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatScanSummary {
    pub format: ImageFormat,
    pub accepted: usize,
    pub rejected: usize,
}

/// Structure summary of one payload
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub container_kind: ContainerKind,
    pub declared_kind: ContainerKind,
    pub size_bytes: usize,
    /// Compound document header, for legacy containers
    pub compound_document: Option<CfbHeader>,
    /// Entry counts, for archive containers
    pub archive: Option<ArchiveSummary>,
    /// What the signature scanner would produce, per format
    pub scan: Vec<FormatScanSummary>,
}

impl AnalysisReport {
    pub fn scan_summary(outcome: &ScanOutcome<'_>) -> Vec<FormatScanSummary> {
        PASS_ORDER
            .iter()
            .map(|&format| FormatScanSummary {
                format,
                accepted: outcome.accepted_count(format),
                rejected: outcome.rejected_count(format),
            })
            .collect()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Workbook Analysis Results: {}", self.filename)?;
        writeln!(f, "  Container: {} (declared: {})", self.container_kind, self.declared_kind)?;
        writeln!(f, "  Size: {} bytes", self.size_bytes)?;

        if let Some(header) = &self.compound_document {
            writeln!(f, "  Compound document version: {}.{}", header.major_version, header.minor_version)?;
            writeln!(f, "  Sector size: {} (mini: {})", header.sector_size, header.mini_sector_size)?;
        }
        if let Some(archive) = &self.archive {
            writeln!(f, "  Archive entries: {}", archive.entries)?;
            writeln!(f, "  Media parts: {}", archive.media_parts)?;
        }

        writeln!(f, "  Signature scan:")?;
        for summary in &self.scan {
            writeln!(f, "    {}: {} accepted, {} rejected", summary.format, summary.accepted, summary.rejected)?;
        }
        Ok(())
    }
}

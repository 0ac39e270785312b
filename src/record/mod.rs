//! Output records and response bodies
//!
//! This is the only part of the crate whose types cross the external
//! boundary.

pub mod assembler;
pub mod response;
pub mod analysis;

pub use assembler::{ImageRecord, RecordAssembler};
pub use response::{ErrorResponse, ExtractionReport, Response, SimpleImage, SimpleReport};
pub use analysis::{AnalysisReport, FormatScanSummary};

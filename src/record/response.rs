//! Response bodies
//!
//! Full and simple success bodies, plus the error body every failure is
//! turned into at the request boundary.

use serde::Serialize;

use crate::workbook::container::ContainerKind;
use crate::workbook::errors::{ExtractError, ExtractResult};

use super::assembler::ImageRecord;

/// Full extraction result for one payload
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub success: bool,
    pub filename: String,
    /// `xlsx`, `xls` or `unknown`
    pub container_format: &'static str,
    pub image_count: usize,
    pub images: Vec<ImageRecord>,
}

impl ExtractionReport {
    pub fn new(filename: &str, container: ContainerKind, images: Vec<ImageRecord>) -> Self {
        ExtractionReport {
            success: true,
            filename: filename.to_string(),
            container_format: container.format_name(),
            image_count: images.len(),
            images,
        }
    }

    /// Reduced body with data URIs only
    pub fn to_simple(&self) -> SimpleReport {
        SimpleReport {
            success: true,
            count: self.image_count,
            data_uris: self.images.iter().map(|img| img.data_uri.clone()).collect(),
            images: self
                .images
                .iter()
                .map(|img| SimpleImage {
                    index: img.index,
                    format: img.format.name(),
                    data_uri: img.data_uri.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SimpleImage {
    pub index: usize,
    pub format: &'static str,
    pub data_uri: String,
}

/// Simple extraction result
#[derive(Debug, Clone, Serialize)]
pub struct SimpleReport {
    pub success: bool,
    pub count: usize,
    pub data_uris: Vec<String>,
    pub images: Vec<SimpleImage>,
}

/// Error body: `{ "success": false, "error": "<message>" }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Transport status: 400 for input errors, 500 otherwise
    #[serde(skip)]
    pub status: u16,
}

impl From<&ExtractError> for ErrorResponse {
    fn from(e: &ExtractError) -> Self {
        ErrorResponse {
            success: false,
            error: e.to_string(),
            status: if e.is_input_error() { 400 } else { 500 },
        }
    }
}

/// Any body produced at the request boundary
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Full(ExtractionReport),
    Simple(SimpleReport),
    Error(ErrorResponse),
}

impl Response {
    /// Body for the outcome of one request
    ///
    /// # Arguments
    /// * `result` - Extraction outcome
    /// * `simple` - Return the reduced data-URI body on success
    pub fn from_result(result: ExtractResult<ExtractionReport>, simple: bool) -> Self {
        match result {
            Ok(report) if simple => Response::Simple(report.to_simple()),
            Ok(report) => Response::Full(report),
            Err(e) => Response::Error(ErrorResponse::from(&e)),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Error(_))
    }

    /// Status a transport should answer with
    pub fn status(&self) -> u16 {
        match self {
            Response::Error(e) => e.status,
            _ => 200,
        }
    }

    pub fn to_json(&self) -> ExtractResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

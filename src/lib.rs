pub mod io;
pub mod workbook;
pub mod extractor;
pub mod decode;
pub mod record;
pub mod convert;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

#[cfg(test)]
mod test_utils;

pub use crate::api::XlImage;

pub use config::Config;
pub use io::{Payload, PayloadEncoding};
pub use record::{ExtractionReport, ImageRecord, Response, SimpleReport};
pub use workbook::{ContainerKind, ExtractError, ExtractResult, ImageFormat};

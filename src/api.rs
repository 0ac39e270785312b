use log::{error, info};

use crate::config::Config;
use crate::convert::{DocumentConverter, SofficeConverter};
use crate::decode::ImageDecoder;
use crate::extractor::{ImageExtractor, SignatureScanner};
use crate::io::payload::{Payload, PayloadEncoding};
use crate::record::{AnalysisReport, ExtractionReport, RecordAssembler, Response};
use crate::workbook::cfb::CfbHeader;
use crate::workbook::container::{Container, ContainerKind};
use crate::workbook::errors::{ExtractError, ExtractResult};

/// Main interface to the xlimage library
///
/// One instance can serve any number of requests, including concurrent
/// ones; every call builds its own container and scan state.
pub struct XlImage {
    config: Config,
    extractor: ImageExtractor,
    decoder: ImageDecoder,
    assembler: RecordAssembler,
}

impl XlImage {
    /// Create an instance from a configuration
    ///
    /// When conversion is enabled, legacy workbooks are converted with the
    /// configured command instead of being scanned.
    ///
    /// # Returns
    /// An XlImage instance or an error if the conversion command is invalid
    pub fn new(config: Config) -> ExtractResult<Self> {
        let mut extractor = ImageExtractor::new(SignatureScanner::new(config.min_image_bytes));
        if config.conversion.enabled {
            let converter = SofficeConverter::new(&config.conversion.command, config.conversion_timeout())?;
            extractor = extractor.with_converter(Box::new(converter));
        }
        Ok(Self::build(config, extractor))
    }

    /// Create an instance that converts legacy workbooks with `converter`
    pub fn with_converter(config: Config, converter: Box<dyn DocumentConverter>) -> Self {
        let extractor = ImageExtractor::new(SignatureScanner::new(config.min_image_bytes))
            .with_converter(converter);
        Self::build(config, extractor)
    }

    fn build(config: Config, extractor: ImageExtractor) -> Self {
        XlImage {
            decoder: ImageDecoder::new(config.reencode),
            assembler: RecordAssembler::new(),
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode transport bytes into a payload, enforcing the upload limit
    ///
    /// # Arguments
    /// * `input` - Bytes as received
    /// * `encoding` - Transport encoding of `input`
    /// * `filename` - Optional filename hint
    pub fn decode_payload(&self, input: &[u8], encoding: PayloadEncoding,
                          filename: Option<&str>) -> ExtractResult<Payload> {
        Payload::decode(input, encoding, filename, self.config.max_payload_bytes)
    }

    /// Extract every embedded image of a workbook
    ///
    /// Zero images is a successful, empty report.
    ///
    /// # Returns
    /// The full report, or an error that aborts the whole request
    pub fn extract(&self, payload: &Payload) -> ExtractResult<ExtractionReport> {
        if payload.bytes.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }

        let container = Container::new(&payload.bytes, Some(&payload.filename));
        let candidates = self.extractor.extract(&container)?;
        let decoded = candidates.into_iter().map(|candidate| self.decoder.decode(candidate));
        let images = self.assembler.assemble(decoded);

        info!("Successfully extracted {} images from {}", images.len(), payload.filename);
        Ok(ExtractionReport::new(&payload.filename, container.effective_kind(), images))
    }

    /// Extract from raw workbook bytes
    pub fn extract_bytes(&self, data: &[u8], filename: Option<&str>) -> ExtractResult<ExtractionReport> {
        let payload = self.decode_payload(data, PayloadEncoding::Raw, filename)?;
        self.extract(&payload)
    }

    /// Request boundary: decode, extract, and turn any failure into an error body
    ///
    /// # Arguments
    /// * `input` - Bytes as received
    /// * `encoding` - Transport encoding of `input`
    /// * `filename` - Optional filename hint
    /// * `simple` - Return the reduced data-URI body
    pub fn respond(&self, input: &[u8], encoding: PayloadEncoding,
                   filename: Option<&str>, simple: bool) -> Response {
        let result = self
            .decode_payload(input, encoding, filename)
            .and_then(|payload| self.extract(&payload));

        if let Err(e) = &result {
            error!("Error processing request: {}", e);
        }
        Response::from_result(result, simple)
    }

    /// Summarize a payload's container structure without extracting
    pub fn analyze(&self, payload: &Payload) -> ExtractResult<AnalysisReport> {
        if payload.bytes.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }

        let container = Container::new(&payload.bytes, Some(&payload.filename));
        let compound_document = match container.kind() {
            ContainerKind::LegacyBinary => CfbHeader::parse(container.data()).ok(),
            _ => None,
        };
        let archive = match container.kind() {
            ContainerKind::Archive => Some(self.extractor.structured().summarize(container.data())?),
            _ => None,
        };
        let outcome = self.extractor.scanner().scan_detailed(container.data());

        Ok(AnalysisReport {
            filename: payload.filename.clone(),
            container_kind: container.kind(),
            declared_kind: container.declared(),
            size_bytes: container.len(),
            compound_document,
            archive,
            scan: AnalysisReport::scan_summary(&outcome),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{legacy_bytes, png_bytes, xlsx_bytes, Picture};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_across_threads() {
        assert_send_sync::<XlImage>();
    }

    #[test]
    fn test_respond_empty_input() {
        let api = XlImage::new(Config::default()).unwrap();
        let response = api.respond(b"", PayloadEncoding::Auto, None, false);
        assert!(!response.is_success());
        assert_eq!(response.status(), 400);
    }

    #[test]
    fn test_respond_simple() {
        let api = XlImage::new(Config::default()).unwrap();
        let data = legacy_bytes(&[&png_bytes(18, 18)]);
        match api.respond(&data, PayloadEncoding::Raw, Some("old.xls"), true) {
            Response::Simple(report) => {
                assert_eq!(report.count, 1);
                assert!(report.data_uris[0].starts_with("data:image/png;base64,"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_container_format_uses_hint_when_unknown() {
        let api = XlImage::new(Config::default()).unwrap();
        let report = api.extract_bytes(b"\x00\x01\x02\x03 plain bytes", Some("book.xls")).unwrap();
        assert_eq!(report.container_format, "xls");
        assert_eq!(report.image_count, 0);

        let report = api.extract_bytes(b"\x00\x01\x02\x03 plain bytes", None).unwrap();
        assert_eq!(report.container_format, "xlsx");
    }

    #[test]
    fn test_analyze_archive() {
        let api = XlImage::new(Config::default()).unwrap();
        let data = xlsx_bytes(&[("One", vec![Picture { media: "image1.png".into(), bytes: png_bytes(8, 8), from: (0, 0) }])]);
        let payload = api.decode_payload(&data, PayloadEncoding::Raw, Some("book.xlsx")).unwrap();
        let report = api.analyze(&payload).unwrap();

        assert_eq!(report.container_kind, ContainerKind::Archive);
        assert_eq!(report.archive.map(|a| a.media_parts), Some(1));
        assert!(report.compound_document.is_none());
        assert_eq!(report.scan.len(), 3);
        assert!(report.to_string().contains("Media parts: 1"));
    }

    #[test]
    fn test_reencode_from_config() {
        let config = Config { reencode: Some(crate::workbook::types::ImageFormat::Jpeg), ..Config::default() };
        let api = XlImage::new(config).unwrap();
        let data = legacy_bytes(&[&png_bytes(10, 10)]);
        let report = api.extract_bytes(&data, None).unwrap();
        assert_eq!(report.images[0].mime_type, "image/jpeg");
        assert_eq!(report.images[0].size_bytes, report.images[0].bytes().unwrap().len());
    }
}

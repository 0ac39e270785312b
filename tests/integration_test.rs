//! End-to-end tests for the extraction pipeline

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use xlimage::convert::DocumentConverter;
use xlimage::{Config, ExtractError, ExtractResult, ImageFormat, PayloadEncoding, Response, XlImage};

use common::{archive_workbook, jpeg, legacy_workbook, padding, png, Sheet};

struct BrokenConverter;

impl DocumentConverter for BrokenConverter {
    fn convert(&self, _data: &[u8]) -> ExtractResult<Vec<u8>> {
        Err(ExtractError::ConversionFailed("soffice exited with status 1".to_string()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn api() -> XlImage {
    let _ = env_logger::builder().is_test(true).try_init();
    XlImage::new(Config::default()).unwrap()
}

#[test]
fn test_zero_byte_input_is_input_error() {
    let api = api();
    let err = api.extract_bytes(b"", None).unwrap_err();
    assert!(matches!(err, ExtractError::EmptyPayload));
    assert!(err.is_input_error());

    let response = api.respond(b"", PayloadEncoding::Auto, Some("book.xlsx"), false);
    assert_eq!(response.status(), 400);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], false);
}

#[test]
fn test_archive_without_images_is_empty_success() {
    let data = archive_workbook(&[Sheet { name: "Sheet1", pictures: vec![] }]);
    let report = api().extract_bytes(&data, Some("empty.xlsx")).unwrap();

    assert!(report.success);
    assert_eq!(report.container_format, "xlsx");
    assert_eq!(report.image_count, 0);
    assert!(report.images.is_empty());
}

#[test]
fn test_legacy_png_and_jpeg_between_padding() {
    let png = png(32, 20);
    let jpeg = jpeg(24, 16);
    let mut data = legacy_workbook(&[]);
    data.extend_from_slice(&png);
    data.extend_from_slice(&padding(333, 9));
    data.extend_from_slice(&jpeg);
    data.extend_from_slice(&padding(71, 4));

    let report = api().extract_bytes(&data, Some("legacy.xls")).unwrap();
    assert_eq!(report.container_format, "xls");
    assert_eq!(report.image_count, 2);

    let first = &report.images[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.format, ImageFormat::Png);
    assert_eq!(first.size_bytes, png.len());
    assert_eq!(first.bytes().unwrap(), png);
    assert_eq!((first.width, first.height), (Some(32), Some(20)));
    assert_eq!(first.sheet, None);
    assert_eq!(first.cell, None);

    let second = &report.images[1];
    assert_eq!(second.index, 1);
    assert_eq!(second.format, ImageFormat::Jpeg);
    assert_eq!(second.mime_type, "image/jpeg");
    assert_eq!(second.size_bytes, jpeg.len());
    assert_eq!((second.width, second.height), (Some(24), Some(16)));
}

#[test]
fn test_conversion_failure_returns_no_records() {
    let _ = env_logger::builder().is_test(true).try_init();
    let api = XlImage::with_converter(Config::default(), Box::new(BrokenConverter));
    let data = legacy_workbook(&[&png(16, 16)]);

    let err = api.extract_bytes(&data, Some("legacy.xls")).unwrap_err();
    assert!(err.is_conversion_failure());

    match api.respond(&data, PayloadEncoding::Raw, Some("legacy.xls"), false) {
        Response::Error(body) => {
            assert!(!body.success);
            assert_eq!(body.status, 500);
            assert!(body.error.contains("conversion"));
        }
        other => panic!("expected an error body, got {:?}", other),
    }
}

#[test]
fn test_declared_parts_become_anchored_records() {
    let a = png(10, 10);
    let b = jpeg(12, 8);
    let c = png(6, 14);
    let data = archive_workbook(&[
        Sheet { name: "Summary", pictures: vec![("image3.png", c.clone(), 27, 99)] },
        Sheet { name: "Empty", pictures: vec![] },
        Sheet { name: "Data", pictures: vec![("image1.png", a.clone(), 0, 0), ("image2.jpeg", b.clone(), 3, 9)] },
    ]);

    let report = api().extract_bytes(&data, Some("anchored.xlsx")).unwrap();
    assert_eq!(report.image_count, 3);

    let placed: Vec<(Option<&str>, Option<&str>, usize)> = report
        .images
        .iter()
        .map(|img| (img.sheet.as_deref(), img.cell.as_deref(), img.size_bytes))
        .collect();
    assert_eq!(placed, vec![
        (Some("Summary"), Some("AB100"), c.len()),
        (Some("Data"), Some("A1"), a.len()),
        (Some("Data"), Some("D10"), b.len()),
    ]);
    assert_eq!(report.images[2].format, ImageFormat::Jpeg);
    assert_eq!(report.images[0].width, Some(6));
}

#[test]
fn test_vector_media_is_skipped() {
    let data = archive_workbook(&[Sheet {
        name: "Sheet1",
        pictures: vec![("image1.emf", vec![1, 0, 0, 0, 0x6C, 0, 0, 0], 0, 0), ("image2.png", png(8, 8), 1, 1)],
    }]);

    let report = api().extract_bytes(&data, None).unwrap();
    assert_eq!(report.image_count, 1);
    assert_eq!(report.images[0].cell.as_deref(), Some("B2"));
    assert_eq!(report.images[0].index, 0);
}

#[test]
fn test_missing_media_part_does_not_stop_the_sheet() {
    let first = png(10, 10);
    let third = jpeg(12, 8);
    let data = archive_workbook(&[Sheet {
        name: "Sheet1",
        pictures: vec![
            ("image1.png", first.clone(), 0, 0),
            ("image2.png", Vec::new(), 1, 1),
            ("image3.jpeg", third.clone(), 2, 2),
        ],
    }]);

    let report = api().extract_bytes(&data, Some("partial.xlsx")).unwrap();
    assert_eq!(report.image_count, 2);

    let placed: Vec<(usize, Option<&str>, usize)> = report
        .images
        .iter()
        .map(|img| (img.index, img.cell.as_deref(), img.size_bytes))
        .collect();
    assert_eq!(placed, vec![(0, Some("A1"), first.len()), (1, Some("C3"), third.len())]);
}

#[test]
fn test_transport_encodings() {
    let api = api();
    let data = legacy_workbook(&[&png(16, 16)]);
    let encoded = STANDARD.encode(&data);

    let uri = format!("data:application/vnd.ms-excel;base64,{}", encoded);
    let json = serde_json::json!({ "base64": encoded, "filename": "sent.xls" }).to_string();

    for (input, encoding) in [
        (encoded.as_bytes(), PayloadEncoding::Base64),
        (uri.as_bytes(), PayloadEncoding::Auto),
        (json.as_bytes(), PayloadEncoding::Json),
    ] {
        match api.respond(input, encoding, None, true) {
            Response::Simple(report) => {
                assert_eq!(report.count, 1);
                assert_eq!(report.images[0].format, "png");
                assert_eq!(report.data_uris[0], report.images[0].data_uri);
            }
            other => panic!("unexpected response for {:?}: {:?}", encoding, other),
        }
    }
}

#[test]
fn test_payload_limit_is_enforced() {
    let config = Config { max_payload_bytes: 64, ..Config::default() };
    let api = XlImage::new(config).unwrap();
    let err = api.extract_bytes(&legacy_workbook(&[]), None).unwrap_err();
    assert!(matches!(err, ExtractError::PayloadTooLarge { limit: 64, .. }));
}

#[test]
fn test_minimum_size_from_config() {
    let tiny_gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00\x2C\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02\x44\x01\x00\x3B";
    let data = legacy_workbook(&[tiny_gif]);

    let report = api().extract_bytes(&data, None).unwrap();
    assert_eq!(report.image_count, 0);

    let config = Config { min_image_bytes: 16, ..Config::default() };
    let report = XlImage::new(config).unwrap().extract_bytes(&data, None).unwrap();
    assert_eq!(report.image_count, 1);
    assert_eq!(report.images[0].format, ImageFormat::Gif);
    assert_eq!(report.images[0].size_bytes, tiny_gif.len());
}

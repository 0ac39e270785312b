//! Byte fixtures shared by unit tests

use std::io::{Cursor, Write};

use image::{ImageFormat as Codec, RgbImage};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Padding bytes that contain no image signature or terminator
///
/// Every byte is below 0x30, so the output never holds 0x3B, 0xFF, 0x89
/// or ASCII letters.
pub fn filler(len: usize, seed: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + seed * 17) % 0x30) as u8).collect()
}

/// Deterministic noisy RGB pixels, so encoders cannot compress them away
fn noise_image(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9E37_79B9 ^ (width << 16) ^ height;
    RgbImage::from_fn(width, height, |_, _| {
        let mut channel = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        image::Rgb([channel(), channel(), channel()])
    })
}

fn encode(width: u32, height: u32, codec: Codec) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    noise_image(width, height).write_to(&mut out, codec).unwrap();
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, Codec::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, Codec::Jpeg)
}

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, Codec::Bmp)
}

/// A 1x1 GIF89a whose only 0x3B byte is the final trailer
///
/// A comment extension pads it past the default minimum-size floor.
pub fn gif_bytes() -> Vec<u8> {
    let mut gif = b"GIF89a".to_vec();
    // Logical screen: 1x1, global color table of two entries
    gif.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00]);
    gif.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00]);
    // Comment extension
    gif.extend_from_slice(&[0x21, 0xFE, 0x78]);
    gif.extend_from_slice(&[b'a'; 0x78]);
    gif.push(0x00);
    // Image descriptor and LZW data
    gif.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    gif.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00]);
    gif.push(0x3B);
    gif
}

/// A picture placed on a sheet: media part name, bytes, and top-left cell
///
/// Empty `bytes` leave the media part out of the archive.
pub struct Picture {
    pub media: String,
    pub bytes: Vec<u8>,
    pub from: (u32, u32),
}

/// Build a minimal workbook archive
///
/// Each sheet gets one drawing part holding its pictures in order.
pub fn xlsx_bytes(sheets: &[(&str, Vec<Picture>)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, (name, pictures)) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, name, n, n));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));

        zip.start_file(format!("xl/worksheets/sheet{}.xml", n), options).unwrap();
        zip.write_all(br#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#).unwrap();
        if pictures.is_empty() {
            continue;
        }

        zip.start_file(format!("xl/worksheets/_rels/sheet{}.xml.rels", n), options).unwrap();
        zip.write_all(format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing{}.xml"/></Relationships>"#,
            n
        ).as_bytes()).unwrap();

        let mut drawing = String::from(
            r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        let mut drawing_rels = String::from(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (j, picture) in pictures.iter().enumerate() {
            drawing.push_str(&format!(
                r#"<xdr:oneCellAnchor><xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:ext cx="10" cy="10"/><xdr:pic><xdr:blipFill><a:blip r:embed="rId{}"/></xdr:blipFill></xdr:pic><xdr:clientData/></xdr:oneCellAnchor>"#,
                picture.from.0, picture.from.1, j + 1
            ));
            drawing_rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
                j + 1, picture.media
            ));
        }
        drawing.push_str("</xdr:wsDr>");
        drawing_rels.push_str("</Relationships>");

        zip.start_file(format!("xl/drawings/drawing{}.xml", n), options).unwrap();
        zip.write_all(drawing.as_bytes()).unwrap();
        zip.start_file(format!("xl/drawings/_rels/drawing{}.xml.rels", n), options).unwrap();
        zip.write_all(drawing_rels.as_bytes()).unwrap();
    }

    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str("</Relationships>");
    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(workbook_rels.as_bytes()).unwrap();

    let mut written = std::collections::BTreeSet::new();
    for (_, pictures) in sheets {
        for picture in pictures {
            if !picture.bytes.is_empty() && written.insert(picture.media.clone()) {
                zip.start_file(format!("xl/media/{}", picture.media), options).unwrap();
                zip.write_all(&picture.bytes).unwrap();
            }
        }
    }

    zip.finish().unwrap().into_inner()
}

/// A legacy binary container: CFB magic, padding, and the given payloads
pub fn legacy_bytes(payloads: &[&[u8]]) -> Vec<u8> {
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.extend_from_slice(&filler(504, 0));
    for (i, payload) in payloads.iter().enumerate() {
        data.extend_from_slice(payload);
        data.extend_from_slice(&filler(64 + i * 7, i + 1));
    }
    data
}

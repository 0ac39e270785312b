//! Fixtures for integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};

use image::{ImageFormat, RgbImage};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Padding that holds no image signature or terminator byte
pub fn padding(len: usize, seed: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 7 + seed * 13) % 0x30) as u8).collect()
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut state = 0x2545_F491u32 ^ (width * 31 + height);
    let image = RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let b = state.to_le_bytes();
        image::Rgb([b[3], b[2], b[1]])
    });
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

/// A compound document prefix followed by `parts`, with padding around each
pub fn legacy_workbook(parts: &[&[u8]]) -> Vec<u8> {
    let mut data = CFB_MAGIC.to_vec();
    data.extend_from_slice(&padding(600, 0));
    for (i, part) in parts.iter().enumerate() {
        data.extend_from_slice(part);
        data.extend_from_slice(&padding(97 + i * 13, i + 1));
    }
    data
}

/// One sheet of an archive fixture: name and (media name, bytes, col, row)
pub struct Sheet {
    pub name: &'static str,
    pub pictures: Vec<(&'static str, Vec<u8>, u32, u32)>,
}

/// Build an xlsx archive with one drawing per sheet that has pictures
pub fn archive_workbook(sheets: &[Sheet]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    let ns_rels = "http://schemas.openxmlformats.org/package/2006/relationships";
    let ns_types = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    zip.start_file("[Content_Types].xml", opts).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#).unwrap();

    let mut workbook = format!(r#"<workbook xmlns:r="{}"><sheets>"#, ns_types);
    let mut rels = format!(r#"<Relationships xmlns="{}">"#, ns_rels);

    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(r#"<sheet name="{}" sheetId="{}" r:id="rIdS{}"/>"#, sheet.name, n, n));
        rels.push_str(&format!(r#"<Relationship Id="rIdS{}" Type="{}/worksheet" Target="/xl/worksheets/sheet{}.xml"/>"#, n, ns_types, n));

        zip.start_file(format!("xl/worksheets/sheet{}.xml", n), opts).unwrap();
        zip.write_all(b"<worksheet><sheetData/></worksheet>").unwrap();
        if sheet.pictures.is_empty() {
            continue;
        }

        zip.start_file(format!("xl/worksheets/_rels/sheet{}.xml.rels", n), opts).unwrap();
        zip.write_all(format!(
            r#"<Relationships xmlns="{}"><Relationship Id="rIdD" Type="{}/drawing" Target="../drawings/drawing{}.xml"/></Relationships>"#,
            ns_rels, ns_types, n
        ).as_bytes()).unwrap();

        let mut drawing = String::from(r#"<xdr:wsDr xmlns:xdr="xdr" xmlns:a="a" xmlns:r="r">"#);
        let mut drawing_rels = format!(r#"<Relationships xmlns="{}">"#, ns_rels);
        for (j, (media, _, col, row)) in sheet.pictures.iter().enumerate() {
            drawing.push_str(&format!(
                r#"<xdr:twoCellAnchor><xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:pic><xdr:blipFill><a:blip r:embed="rIdP{}"/></xdr:blipFill></xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"#,
                col, row, col + 2, row + 2, j
            ));
            drawing_rels.push_str(&format!(
                r#"<Relationship Id="rIdP{}" Type="{}/image" Target="../media/{}"/>"#,
                j, ns_types, media
            ));
        }
        drawing.push_str("</xdr:wsDr>");
        drawing_rels.push_str("</Relationships>");

        zip.start_file(format!("xl/drawings/drawing{}.xml", n), opts).unwrap();
        zip.write_all(drawing.as_bytes()).unwrap();
        zip.start_file(format!("xl/drawings/_rels/drawing{}.xml.rels", n), opts).unwrap();
        zip.write_all(drawing_rels.as_bytes()).unwrap();

        // Empty bytes leave the media part out of the archive
        for (media, bytes, _, _) in sheet.pictures.iter().filter(|p| !p.1.is_empty()) {
            zip.start_file(format!("xl/media/{}", media), opts).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }

    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");
    zip.start_file("xl/workbook.xml", opts).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/_rels/workbook.xml.rels", opts).unwrap();
    zip.write_all(rels.as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}

//! Structured extraction from zip-based workbooks
//!
//! Images are located through the package's declared structure rather than
//! by scanning bytes:
//!
//! - `xl/workbook.xml` lists the sheets in workbook order
//! - each sheet's relationships point at its drawing part
//! - each drawing declares pictures with an anchor and an `r:embed` id
//! - the drawing's relationships map that id to a media part
//!
//! A part that cannot be resolved or read is logged and skipped.

use std::io::{Cursor, Read};
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;
use zip::ZipArchive;

use crate::decode::format::detect_format;
use crate::io::seekable::SeekableReader;
use crate::workbook::constants::parts::{REL_DRAWING, REL_IMAGE, REL_WORKSHEET, WORKBOOK, WORKBOOK_RELS};
use crate::workbook::errors::{ExtractError, ExtractResult};
use crate::workbook::types::{Anchor, ImageCandidate, ImageFormat};

use super::anchor::cell_reference;
use super::drawing::{parse_drawing, DrawingPicture};
use super::parts::{parse_relationships, parse_sheet_list, rels_part_for, resolve_target, Relationships};

/// Media extensions that hold vector content rather than raster images
const VECTOR_EXTENSIONS: [&str; 5] = ["emf", "wmf", "emz", "wmz", "svg"];

/// Upper bound on the buffer reserved from a part's declared size
const PREALLOCATE_LIMIT: u64 = 16 * 1024 * 1024;

/// Counts describing an archive container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    /// Number of zip entries
    pub entries: usize,
    /// Number of entries under `xl/media/`
    pub media_parts: usize,
}

/// Extractor for declared image parts of an archive container
#[derive(Debug, Default, Clone)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        StructuredExtractor
    }

    /// Extract one candidate per declared picture, sheets in workbook order
    pub fn extract(&self, data: &[u8]) -> ExtractResult<Vec<ImageCandidate<'static>>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        self.extract_from(&mut archive)
    }

    /// Count entries and media parts without extracting anything
    pub fn summarize(&self, data: &[u8]) -> ExtractResult<ArchiveSummary> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        let media_parts = archive
            .file_names()
            .filter(|name| name.starts_with("xl/media/"))
            .count();
        Ok(ArchiveSummary { entries: archive.len(), media_parts })
    }

    fn extract_from<R: SeekableReader>(&self, archive: &mut ZipArchive<R>) -> ExtractResult<Vec<ImageCandidate<'static>>> {
        let workbook_xml = match read_part_text(archive, WORKBOOK) {
            Ok(xml) => xml,
            Err(e) => {
                warn!("Archive has no readable workbook part: {}", e);
                return Ok(Vec::new());
            }
        };
        let sheets = parse_sheet_list(&workbook_xml)?;
        let workbook_rels = read_relationships(archive, WORKBOOK_RELS)?;

        let mut candidates = Vec::new();
        for sheet in &sheets {
            let sheet_part = match workbook_rels.get(&sheet.rel_id) {
                Some(rel) if rel.rel_type.ends_with(REL_WORKSHEET) => resolve_target(WORKBOOK, &rel.target),
                Some(_) => {
                    debug!("Sheet '{}' is not a worksheet, skipping", sheet.name);
                    continue;
                }
                None => {
                    warn!("Sheet '{}' has no relationship {}", sheet.name, sheet.rel_id);
                    continue;
                }
            };

            match self.extract_sheet(archive, &sheet.name, &sheet_part) {
                Ok(mut found) => {
                    debug!("Found {} images on sheet '{}'", found.len(), sheet.name);
                    candidates.append(&mut found);
                }
                Err(e) => warn!("Error extracting images from sheet {}: {}", sheet.name, e),
            }
        }

        info!("Structured extraction found {} images in {} sheets", candidates.len(), sheets.len());
        Ok(candidates)
    }

    fn extract_sheet<R: SeekableReader>(&self, archive: &mut ZipArchive<R>, sheet_name: &str,
                                        sheet_part: &str) -> ExtractResult<Vec<ImageCandidate<'static>>> {
        let sheet_rels_part = rels_part_for(sheet_part);
        if find_part_name(archive, &sheet_rels_part).is_none() {
            return Ok(Vec::new());
        }
        let sheet_rels = read_relationships(archive, &sheet_rels_part)?;

        let drawing_parts: Vec<String> = sheet_rels
            .of_type(REL_DRAWING)
            .map(|rel| resolve_target(sheet_part, &rel.target))
            .collect();

        let mut candidates = Vec::new();
        for drawing_part in drawing_parts {
            match self.extract_drawing(archive, sheet_name, &drawing_part) {
                Ok(mut found) => candidates.append(&mut found),
                Err(e) => warn!("Error reading drawing {} of sheet {}: {}", drawing_part, sheet_name, e),
            }
        }

        Ok(candidates)
    }

    /// Pictures of one drawing part; a picture that cannot be resolved is skipped
    fn extract_drawing<R: SeekableReader>(&self, archive: &mut ZipArchive<R>, sheet_name: &str,
                                          drawing_part: &str) -> ExtractResult<Vec<ImageCandidate<'static>>> {
        let drawing_xml = read_part_text(archive, drawing_part)?;
        let pictures = parse_drawing(&drawing_xml)?;
        if pictures.is_empty() {
            return Ok(Vec::new());
        }
        let drawing_rels = read_relationships(archive, &rels_part_for(drawing_part))?;

        let mut candidates = Vec::with_capacity(pictures.len());
        for (idx, picture) in pictures.iter().enumerate() {
            match self.extract_picture(archive, sheet_name, drawing_part, &drawing_rels, picture) {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(e) => warn!("Error extracting image {} from sheet {}: {}", idx, sheet_name, e),
            }
        }
        Ok(candidates)
    }

    fn extract_picture<R: SeekableReader>(&self, archive: &mut ZipArchive<R>, sheet_name: &str,
                                          drawing_part: &str, drawing_rels: &Relationships,
                                          picture: &DrawingPicture) -> ExtractResult<Option<ImageCandidate<'static>>> {
        let rel = drawing_rels
            .get(&picture.embed)
            .filter(|rel| rel.rel_type.ends_with(REL_IMAGE))
            .ok_or_else(|| ExtractError::GenericError(format!(
                "no image relationship {} in {}", picture.embed, drawing_part
            )))?;

        if rel.external {
            debug!("Skipping linked image {}", rel.target);
            return Ok(None);
        }

        let media_part = resolve_target(drawing_part, &rel.target);
        if is_vector_part(&media_part) {
            debug!("Skipping vector image {}", media_part);
            return Ok(None);
        }

        let bytes = read_part(archive, &media_part)?;
        let format = detect_format(&bytes).unwrap_or(ImageFormat::Png);
        let anchor = Anchor {
            sheet: Some(sheet_name.to_string()),
            cell: picture.from.map(|(col, row)| cell_reference(col, row)),
        };

        debug!("Read {} ({} bytes) anchored at {:?}", media_part, bytes.len(), anchor.cell);
        Ok(Some(ImageCandidate::structured(bytes, format, anchor)))
    }
}

fn is_vector_part(part: &str) -> bool {
    Path::new(part)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map_or(false, |ext| VECTOR_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
}

/// Exact part name, falling back to a case-insensitive match
fn find_part_name<R: SeekableReader>(archive: &ZipArchive<R>, name: &str) -> Option<String> {
    if archive.index_for_name(name).is_some() {
        return Some(name.to_string());
    }
    archive
        .file_names()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(str::to_string)
}

/// Read a part in full
fn read_part<R: SeekableReader>(archive: &mut ZipArchive<R>, name: &str) -> ExtractResult<Vec<u8>> {
    let actual = find_part_name(archive, name)
        .ok_or_else(|| ExtractError::GenericError(format!("missing part {}", name)))?;

    let mut file = archive.by_name(&actual)?;
    let expected = file.size();
    let mut bytes = Vec::with_capacity(expected.min(PREALLOCATE_LIMIT) as usize);
    file.read_to_end(&mut bytes)?;

    if bytes.len() as u64 != expected {
        return Err(ExtractError::GenericError(format!(
            "short read of {}: {} of {} bytes", name, bytes.len(), expected
        )));
    }
    Ok(bytes)
}

fn read_part_text<R: SeekableReader>(archive: &mut ZipArchive<R>, name: &str) -> ExtractResult<String> {
    let bytes = read_part(archive, name)?;
    String::from_utf8(bytes)
        .map_err(|e| ExtractError::GenericError(format!("{} is not valid UTF-8: {}", name, e)))
}

fn read_relationships<R: SeekableReader>(archive: &mut ZipArchive<R>, name: &str) -> ExtractResult<Relationships> {
    match find_part_name(archive, name) {
        Some(_) => parse_relationships(&read_part_text(archive, name)?),
        None => Ok(Relationships::default()),
    }
}

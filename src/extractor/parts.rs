//! Package part helpers for Office Open XML workbooks
//!
//! Parses relationship parts and the workbook sheet list, and resolves
//! relationship targets to package part names.

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;

use crate::workbook::errors::ExtractResult;

/// One `<Relationship>` entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Parsed relationships of a single source part
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Relationship with the given id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// Internal relationships whose type ends with `suffix`, in document order
    pub fn of_type<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.entries
            .iter()
            .filter(move |rel| !rel.external && rel.rel_type.ends_with(suffix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A `<sheet>` entry of the workbook part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub rel_id: String,
}

/// Read an attribute by local name, ignoring namespace prefixes
pub(crate) fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a relationships part
pub fn parse_relationships(xml: &str) -> ExtractResult<Relationships> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut entries = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attribute(&e, b"Id");
                let target = attribute(&e, b"Target");
                let rel_type = attribute(&e, b"Type").unwrap_or_default();
                let external = attribute(&e, b"TargetMode")
                    .map_or(false, |mode| mode.eq_ignore_ascii_case("External"));

                if let (Some(id), Some(target)) = (id, target) {
                    entries.push(Relationship { id, rel_type, target, external });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!("Parsed {} relationships", entries.len());
    Ok(Relationships { entries })
}

/// Parse the sheet list of `xl/workbook.xml`, in workbook order
pub fn parse_sheet_list(xml: &str) -> ExtractResult<Vec<SheetEntry>> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut sheets = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                // r:id carries the relationship; sheetId is a different attribute
                if let (Some(name), Some(rel_id)) = (attribute(&e, b"name"), attribute(&e, b"id")) {
                    sheets.push(SheetEntry { name, rel_id });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheets)
}

/// Name of the relationships part for `part`
///
/// `xl/worksheets/sheet1.xml` → `xl/worksheets/_rels/sheet1.xml.rels`
pub fn rels_part_for(part: &str) -> String {
    match part.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target relative to its source part
///
/// Fragments are dropped, absolute targets are taken from the package root,
/// and `.`/`..` segments are normalized.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.split('#').next().unwrap_or("");

    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        match source_part.rfind('/') {
            Some(pos) => format!("{}/{}", &source_part[..pos], target),
            None => target.to_string(),
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

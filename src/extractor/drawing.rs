//! Drawing part parsing
//!
//! Finds every picture in a spreadsheet drawing part together with the
//! top-left cell of the anchor it is placed in.

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;

use crate::workbook::errors::ExtractResult;

use super::parts::attribute;

/// A picture declared in a drawing part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingPicture {
    /// Relationship id of the image part (`r:embed`)
    pub embed: String,
    /// 0-based (column, row) of the anchor's top-left cell, if cell-anchored
    pub from: Option<(u32, u32)>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Col,
    Row,
}

/// Parse a drawing part into its pictures, in document order
///
/// Pictures inside `mc:Fallback` branches are skipped, since the matching
/// `mc:Choice` branch already declares them.
pub fn parse_drawing(xml: &str) -> ExtractResult<Vec<DrawingPicture>> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pictures = Vec::new();
    let mut fallback_depth = 0usize;
    let mut in_from = false;
    let mut in_pic = false;
    let mut field = Field::None;
    let mut from_col: Option<u32> = None;
    let mut from_row: Option<u32> = None;
    let mut embed: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" | b"absoluteAnchor" => {
                    from_col = None;
                    from_row = None;
                }
                b"Fallback" => fallback_depth += 1,
                b"from" => in_from = true,
                b"col" if in_from => field = Field::Col,
                b"row" if in_from => field = Field::Row,
                b"pic" => {
                    in_pic = true;
                    embed = None;
                }
                b"blip" if in_pic => embed = attribute(&e, b"embed"),
                _ => {}
            },
            Event::Empty(e) => {
                if in_pic && e.local_name().as_ref() == b"blip" {
                    embed = attribute(&e, b"embed");
                }
            }
            Event::Text(e) => {
                if field != Field::None {
                    let value = e.unescape()?.trim().parse::<u32>().ok();
                    match field {
                        Field::Col => from_col = value,
                        Field::Row => from_row = value,
                        Field::None => {}
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                b"from" => in_from = false,
                b"col" | b"row" => field = Field::None,
                b"pic" => {
                    in_pic = false;
                    if let Some(embed) = embed.take() {
                        if fallback_depth == 0 {
                            let from = from_col.zip(from_row);
                            pictures.push(DrawingPicture { embed, from });
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pictures)
}

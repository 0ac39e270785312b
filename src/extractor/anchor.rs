//! Cell reference conversion for drawing anchors

use crate::workbook::constants::limits::MAX_COLUMNS;

/// Convert a 0-based column index to spreadsheet column letters
///
/// Indices past the last spreadsheet column are capped to "XFD".
pub fn column_letters(col: u32) -> String {
    let mut n = col.min(MAX_COLUMNS - 1) + 1;
    let mut letters = Vec::with_capacity(3);

    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Build a cell reference ("B3") from 0-based column and row indices
pub fn cell_reference(col: u32, row: u32) -> String {
    format!("{}{}", column_letters(col), row.saturating_add(1))
}

//! External document conversion
//!
//! Legacy binary workbooks can be converted to the archive format before
//! extraction so that their images come with sheet and cell anchors.

pub mod converter;

pub use converter::{DocumentConverter, SofficeConverter};

//! Compound document header inspection
//!
//! Reads the fixed fields of an OLE2 compound document header for
//! diagnostics. This is not a parser for the container's directory or
//! streams; embedded images are still located by signature scanning.

use std::io::{Cursor, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;

use crate::io::seekable::SeekableReader;
use crate::workbook::constants::container::{
    CFB_BYTE_ORDER_MARK, CFB_HEADER_LEN, CFB_MAGIC, CFB_MINOR_VERSION_OFFSET,
};
use crate::workbook::errors::{ExtractError, ExtractResult};

/// Fixed fields of a compound document header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CfbHeader {
    pub minor_version: u16,
    pub major_version: u16,
    /// Sector size in bytes (512 for v3, 4096 for v4)
    pub sector_size: u32,
    /// Mini stream sector size in bytes
    pub mini_sector_size: u32,
}

impl CfbHeader {
    /// Read the header from the start of a compound document
    pub fn parse(data: &[u8]) -> ExtractResult<Self> {
        if data.len() < CFB_HEADER_LEN || !data.starts_with(&CFB_MAGIC) {
            return Err(ExtractError::GenericError(
                "Not a compound document header".to_string(),
            ));
        }

        let mut cursor = Cursor::new(data);
        Self::read(&mut cursor)
    }

    fn read(reader: &mut dyn SeekableReader) -> ExtractResult<Self> {
        reader.seek(SeekFrom::Start(CFB_MINOR_VERSION_OFFSET))?;
        let minor_version = reader.read_u16::<LittleEndian>()?;
        let major_version = reader.read_u16::<LittleEndian>()?;

        let byte_order = reader.read_u16::<LittleEndian>()?;
        if byte_order != CFB_BYTE_ORDER_MARK {
            return Err(ExtractError::GenericError(format!(
                "Invalid compound document byte order mark: {:#06x}",
                byte_order
            )));
        }

        let sector_shift = reader.read_u16::<LittleEndian>()?;
        let mini_sector_shift = reader.read_u16::<LittleEndian>()?;
        if sector_shift > 16 || mini_sector_shift > 16 {
            return Err(ExtractError::GenericError(format!(
                "Invalid sector shift: {} / {}",
                sector_shift, mini_sector_shift
            )));
        }

        debug!(
            "Compound document v{}.{}, sector shift {}",
            major_version, minor_version, sector_shift
        );

        Ok(CfbHeader {
            minor_version,
            major_version,
            sector_size: 1 << sector_shift,
            mini_sector_size: 1 << mini_sector_shift,
        })
    }
}

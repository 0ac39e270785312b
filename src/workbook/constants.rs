//! Workbook and image format constants
//!
//! Magic numbers used by the container classifier, the signature scanner
//! and the format decoder.

/// Container magic numbers
pub mod container {
    /// Length of the prefix inspected by the classifier
    pub const PREFIX_LEN: usize = 8;

    /// Zip local file header ("PK\x03\x04")
    pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

    /// Empty zip archive end-of-central-directory ("PK\x05\x06")
    pub const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

    /// OLE2 compound document header
    pub const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    /// Size of the compound document header block
    pub const CFB_HEADER_LEN: usize = 512;

    /// Offset of the minor version field in the compound document header
    pub const CFB_MINOR_VERSION_OFFSET: u64 = 24;

    /// Little-endian byte order mark stored in the compound document header
    pub const CFB_BYTE_ORDER_MARK: u16 = 0xFFFE;
}

/// Image start and end signatures
pub mod signatures {
    /// PNG file signature
    pub const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// PNG terminating chunk type
    pub const PNG_IEND: [u8; 4] = *b"IEND";

    /// Size of the chunk length field that precedes "IEND"
    pub const PNG_CHUNK_LENGTH_FIELD: usize = 4;

    /// Size of the whole IEND chunk: length field, type and CRC
    pub const PNG_IEND_CHUNK_LEN: usize = 12;

    /// JPEG start-of-image marker followed by the first marker prefix
    pub const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

    /// JPEG end-of-image marker
    pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

    /// GIF version strings
    pub const GIF87A: [u8; 6] = *b"GIF87a";
    pub const GIF89A: [u8; 6] = *b"GIF89a";

    /// GIF trailer byte
    pub const GIF_TRAILER: u8 = 0x3B;

    /// Bytes skipped after a GIF start before looking for the trailer
    pub const GIF_TRAILER_SKIP: usize = 6;

    /// BMP file header magic
    pub const BMP: [u8; 2] = *b"BM";

    /// RIFF container magic and WebP form type
    pub const RIFF: [u8; 4] = *b"RIFF";
    pub const WEBP: [u8; 4] = *b"WEBP";
}

/// Scanner limits
pub mod limits {
    /// Default minimum size of a scanned candidate in bytes
    pub const DEFAULT_MIN_IMAGE_BYTES: usize = 100;

    /// Default upload limit (50 MiB)
    pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 50 * 1024 * 1024;

    /// Number of columns in a spreadsheet (A..XFD)
    pub const MAX_COLUMNS: u32 = 16_384;
}

/// Package part names inside an Office Open XML workbook
pub mod parts {
    pub const WORKBOOK: &str = "xl/workbook.xml";
    pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";

    /// Relationship type suffixes
    pub const REL_WORKSHEET: &str = "/worksheet";
    pub const REL_DRAWING: &str = "/drawing";
    pub const REL_IMAGE: &str = "/image";
}

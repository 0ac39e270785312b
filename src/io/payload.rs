//! Payload transport decoding
//!
//! A workbook can arrive as raw bytes, as base64 text, as a data URI, or
//! as a JSON body carrying one of those. This module turns any of them into
//! the raw byte sequence the extractor works on.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use log::{debug, info};
use memchr::memchr;
use regex::Regex;
use serde::Deserialize;

use crate::workbook::errors::{ExtractError, ExtractResult};

/// Filename used when the caller did not supply one
pub const DEFAULT_FILENAME: &str = "unknown.xlsx";

lazy_static! {
    static ref DATA_URI: Regex = Regex::new(r"^\s*data:[^,]*,").unwrap();
}

/// How the payload bytes are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Raw workbook bytes
    Raw,
    /// Base64 text of the workbook bytes
    Base64,
    /// `data:<mime>;base64,<payload>`; everything after the first comma is base64
    DataUri,
    /// `{"base64": ..., "filename": ...}` or `{"data_uri": ...}`
    Json,
    /// Detect JSON bodies, data URIs and base64 text, otherwise raw
    Auto,
}

impl PayloadEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "raw" | "binary" => Some(PayloadEncoding::Raw),
            "base64" => Some(PayloadEncoding::Base64),
            "data-uri" | "datauri" | "data_uri" => Some(PayloadEncoding::DataUri),
            "json" => Some(PayloadEncoding::Json),
            "auto" => Some(PayloadEncoding::Auto),
            _ => None,
        }
    }
}

/// JSON request body
#[derive(Debug, Deserialize)]
struct JsonBody {
    base64: Option<String>,
    data_uri: Option<String>,
    filename: Option<String>,
}

/// A decoded workbook payload with its filename
#[derive(Debug, Clone)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl Payload {
    /// Decode transport bytes into a workbook payload
    ///
    /// # Arguments
    /// * `input` - Bytes as received
    /// * `encoding` - How `input` is encoded
    /// * `filename` - Optional filename, defaults to `unknown.xlsx`
    /// * `max_bytes` - Upload limit for the decoded payload
    pub fn decode(input: &[u8], encoding: PayloadEncoding,
                  filename: Option<&str>, max_bytes: usize) -> ExtractResult<Self> {
        let encoding = match encoding {
            PayloadEncoding::Auto => detect_encoding(input),
            other => other,
        };
        debug!("Decoding {} payload bytes as {:?}", input.len(), encoding);

        let mut body_filename = None;
        let bytes = match encoding {
            PayloadEncoding::Raw | PayloadEncoding::Auto => input.to_vec(),
            PayloadEncoding::Base64 => decode_base64(input)?,
            PayloadEncoding::DataUri => decode_data_uri(input)?,
            PayloadEncoding::Json => {
                let (bytes, name) = decode_json(input)?;
                body_filename = name;
                bytes
            }
        };

        if bytes.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }
        if bytes.len() > max_bytes {
            return Err(ExtractError::PayloadTooLarge { size: bytes.len(), limit: max_bytes });
        }

        let filename = body_filename
            .as_deref()
            .or(filename)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        info!("Received {:?} payload for: {}", encoding, filename);

        Ok(Payload { bytes, filename })
    }
}

/// Guess the transport encoding of a payload
///
/// Workbook containers always start with non-text magic bytes, so any
/// payload that is pure base64 text is treated as base64.
fn detect_encoding(input: &[u8]) -> PayloadEncoding {
    let text = match std::str::from_utf8(input) {
        Ok(text) => text,
        Err(_) => return PayloadEncoding::Raw,
    };

    if text.trim_start().starts_with('{') {
        PayloadEncoding::Json
    } else if DATA_URI.is_match(text) {
        PayloadEncoding::DataUri
    } else if !text.trim().is_empty() && text.bytes().all(is_base64_byte) {
        PayloadEncoding::Base64
    } else {
        PayloadEncoding::Raw
    }
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\r' | b'\n' | b' ' | b'\t')
}

fn decode_base64(input: &[u8]) -> ExtractResult<Vec<u8>> {
    let compact: Vec<u8> = input.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Base64-decode everything after the first comma; the header is not checked
fn decode_data_uri(input: &[u8]) -> ExtractResult<Vec<u8>> {
    let comma = memchr(b',', input)
        .ok_or_else(|| ExtractError::InvalidPayload("data URI has no comma separator".to_string()))?;
    decode_base64(&input[comma + 1..])
}

/// Decode a JSON body; `base64` takes precedence over `data_uri`
fn decode_json(input: &[u8]) -> ExtractResult<(Vec<u8>, Option<String>)> {
    let body: JsonBody = serde_json::from_slice(input)
        .map_err(|e| ExtractError::InvalidPayload(format!("malformed JSON body: {}", e)))?;

    let bytes = if let Some(b64) = &body.base64 {
        decode_base64(b64.as_bytes())?
    } else if let Some(uri) = &body.data_uri {
        decode_data_uri(uri.as_bytes())?
    } else {
        Vec::new()
    };
    Ok((bytes, body.filename))
}

//! Configuration
//!
//! Settings are read from TOML. A bundled default file is compiled into the
//! binary and parsed once; user files only need to name the keys they
//! change.

use std::fs;
use std::str::FromStr;
use std::time::Duration;

use lazy_static::lazy_static;
use log::debug;

use crate::workbook::constants::limits::{DEFAULT_MAX_PAYLOAD_BYTES, DEFAULT_MIN_IMAGE_BYTES};
use crate::workbook::errors::{ExtractError, ExtractResult};
use crate::workbook::types::ImageFormat;

lazy_static! {
    static ref BUNDLED_CONFIG: Config = {
        let content = include_str!("../xlimage.toml");
        Config::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse bundled configuration: {}", e);
            Config::default()
        })
    };
}

/// External conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Convert legacy containers instead of scanning them
    pub enabled: bool,
    /// Program plus optional leading arguments
    pub command: String,
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            enabled: false,
            command: "soffice".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_payload_bytes: usize,
    pub min_image_bytes: usize,
    pub conversion: ConversionConfig,
    /// Canonical output format, if images are re-encoded
    pub reencode: Option<ImageFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            min_image_bytes: DEFAULT_MIN_IMAGE_BYTES,
            conversion: ConversionConfig::default(),
            reencode: None,
        }
    }
}

/// Parse a configuration, layered over the built-in defaults
impl FromStr for Config {
    type Err = ExtractError;

    fn from_str(content: &str) -> ExtractResult<Config> {
        Config::default().merge_str(content)
    }
}

impl Config {
    /// Configuration from the bundled `xlimage.toml`
    pub fn bundled() -> Config {
        BUNDLED_CONFIG.clone()
    }

    /// Load a configuration file, layered over the bundled defaults
    pub fn load(path: &str) -> ExtractResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| ExtractError::ConfigError(format!("cannot read {}: {}", path, e)))?;
        debug!("Loaded configuration from {}", path);
        Config::bundled().merge_str(&content)
    }

    /// Override the keys present in `content`
    fn merge_str(mut self, content: &str) -> ExtractResult<Config> {
        let value: toml::Value = content.parse()?;

        if let Some(input) = value.get("input") {
            if let Some(v) = input.get("max_payload_bytes") {
                self.max_payload_bytes = positive_integer(v, "input.max_payload_bytes")? as usize;
            }
        }

        if let Some(scan) = value.get("scan") {
            if let Some(v) = scan.get("min_image_bytes") {
                self.min_image_bytes = positive_integer(v, "scan.min_image_bytes")? as usize;
            }
        }

        if let Some(conversion) = value.get("conversion") {
            if let Some(v) = conversion.get("enabled") {
                self.conversion.enabled = v
                    .as_bool()
                    .ok_or_else(|| invalid("conversion.enabled", "a boolean"))?;
            }
            if let Some(v) = conversion.get("command") {
                let command = v
                    .as_str()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| invalid("conversion.command", "a non-empty string"))?;
                self.conversion.command = command.to_string();
            }
            if let Some(v) = conversion.get("timeout_secs") {
                self.conversion.timeout_secs = positive_integer(v, "conversion.timeout_secs")?;
            }
        }

        if let Some(decode) = value.get("decode") {
            if let Some(v) = decode.get("reencode") {
                let name = v.as_str().ok_or_else(|| invalid("decode.reencode", "a format name"))?;
                self.reencode = Some(
                    ImageFormat::from_name(name)
                        .ok_or_else(|| invalid("decode.reencode", "one of png, jpeg, gif, webp, bmp"))?,
                );
            }
        }

        Ok(self)
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion.timeout_secs)
    }
}

fn positive_integer(value: &toml::Value, key: &str) -> ExtractResult<u64> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        _ => Err(invalid(key, "a positive integer")),
    }
}

fn invalid(key: &str, expected: &str) -> ExtractError {
    ExtractError::ConfigError(format!("{} must be {}", key, expected))
}

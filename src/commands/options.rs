//! Options shared by every command
//!
//! Resolves the input list, transport encoding and configuration from the
//! command line. Flags override values from the configuration file.

use clap::ArgMatches;
use log::info;

use crate::config::Config;
use crate::io::payload::{Payload, PayloadEncoding};
use crate::utils::file_utils::{input_filename, read_input};
use crate::workbook::errors::{ExtractError, ExtractResult};
use crate::workbook::types::ImageFormat;
use crate::XlImage;

/// Inputs and settings parsed from the command line
pub struct InputOptions {
    pub inputs: Vec<String>,
    pub encoding: PayloadEncoding,
    /// Filename hint overriding the input path's own name
    pub filename: Option<String>,
    pub config: Config,
}

impl InputOptions {
    pub fn from_args(args: &ArgMatches) -> ExtractResult<Self> {
        let inputs: Vec<String> = args
            .get_many::<String>("input")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if inputs.is_empty() {
            return Err(ExtractError::GenericError("Missing input file".to_string()));
        }

        let encoding = match args.get_one::<String>("encoding") {
            Some(name) => PayloadEncoding::from_name(name)
                .ok_or_else(|| ExtractError::GenericError(format!("Unknown payload encoding: {}", name)))?,
            None => PayloadEncoding::Auto,
        };

        let filename = args.get_one::<String>("filename").cloned();
        if filename.is_some() && inputs.len() > 1 {
            return Err(ExtractError::GenericError(
                "--filename can only be used with a single input".to_string(),
            ));
        }

        let config = Self::resolve_config(args)?;
        info!("Processing {} input(s) with {:?} encoding", inputs.len(), encoding);

        Ok(InputOptions { inputs, encoding, filename, config })
    }

    fn resolve_config(args: &ArgMatches) -> ExtractResult<Config> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => Config::load(path)?,
            None => Config::bundled(),
        };

        if args.get_flag("convert") {
            config.conversion.enabled = true;
        }
        if let Some(name) = args.get_one::<String>("reencode") {
            config.reencode = Some(
                ImageFormat::from_name(name)
                    .ok_or_else(|| ExtractError::ConfigError(format!("Unknown image format: {}", name)))?,
            );
        }
        if let Some(size) = args.get_one::<String>("min-size") {
            config.min_image_bytes = size
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ExtractError::ConfigError(format!("Invalid minimum image size: {}", size)))?;
        }

        Ok(config)
    }

    /// Build the library facade for these settings
    pub fn api(&self) -> ExtractResult<XlImage> {
        XlImage::new(self.config.clone())
    }

    /// Read and decode one input
    pub fn load_payload(&self, api: &XlImage, input: &str) -> ExtractResult<Payload> {
        let data = read_input(input)?;
        let filename = self.filename.clone().or_else(|| input_filename(input));
        api.decode_payload(&data, self.encoding, filename.as_deref())
    }
}

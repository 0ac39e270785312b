//! Image extraction command
//!
//! This module implements the command for extracting embedded images from
//! one or more workbooks, printing the full or simple JSON body per input
//! and optionally saving the images to disk.

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{error, info, warn};

use crate::commands::command_traits::Command;
use crate::commands::options::InputOptions;
use crate::record::{ExtractionReport, Response};
use crate::utils::file_utils::{save_images, write_output};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;
use crate::workbook::errors::{ExtractError, ExtractResult};
use crate::XlImage;

/// Command for extracting images from workbooks
pub struct ExtractCommand<'a> {
    /// Inputs, encoding and configuration
    options: InputOptions,
    /// Path to the JSON output file (stdout when absent)
    output_file: Option<String>,
    /// Directory to save extracted images into
    save_dir: Option<String>,
    /// Whether to emit the simple body
    simple: bool,
    /// Logger for per-input summary lines
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for per-input summary lines
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        let options = InputOptions::from_args(args)?;
        let output_file = args.get_one::<String>("output").cloned();
        let save_dir = args.get_one::<String>("save-dir").cloned();
        let simple = args.get_flag("simple");
        info!("Output: {:?}, save directory: {:?}, simple: {}", output_file, save_dir, simple);

        Ok(ExtractCommand {
            options,
            output_file,
            save_dir,
            simple,
            logger,
        })
    }

    /// Process one input into its response body
    fn process(&self, api: &XlImage, input: &str) -> Response {
        let result = self
            .options
            .load_payload(api, input)
            .and_then(|payload| api.extract(&payload))
            .and_then(|report| {
                self.save(input, &report)?;
                Ok(report)
            });

        match &result {
            Ok(report) => {
                let _ = self.logger.log(&format!("{}: {} images", input, report.image_count));
            }
            Err(e) => {
                error!("Error processing {}: {}", input, e);
                let _ = self.logger.log(&format!("{}: failed: {}", input, e));
            }
        }
        Response::from_result(result, self.simple)
    }

    /// Save a report's images if a save directory was requested
    fn save(&self, input: &str, report: &ExtractionReport) -> ExtractResult<()> {
        let Some(save_dir) = &self.save_dir else {
            return Ok(());
        };

        let dir = self.image_dir(Path::new(save_dir), input);
        save_images(&report.images, &dir)?;
        Ok(())
    }

    /// With several inputs each one gets its own subdirectory
    fn image_dir(&self, save_dir: &Path, input: &str) -> PathBuf {
        if self.options.inputs.len() == 1 {
            return save_dir.to_path_buf();
        }
        let stem = Path::new(input)
            .file_stem()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("stdin");
        save_dir.join(stem)
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        let api = self.options.api()?;
        let inputs = &self.options.inputs;

        let progress = if inputs.len() > 1 {
            ProgressTracker::new(inputs.len() as u64, "Extracting images")
        } else {
            ProgressTracker::hidden()
        };

        let mut responses = Vec::with_capacity(inputs.len());
        for input in inputs {
            progress.set_message(input);
            responses.push(self.process(&api, input));
            progress.increment(1);
        }
        progress.finish();

        let json = if responses.len() == 1 {
            responses[0].to_json()?
        } else {
            serde_json::to_string_pretty(&responses)?
        };
        write_output(self.output_file.as_deref(), &json)?;

        let failed = responses.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            warn!("{} of {} inputs failed", failed, responses.len());
            return Err(ExtractError::GenericError(format!(
                "{} of {} inputs failed", failed, responses.len()
            )));
        }
        Ok(())
    }
}

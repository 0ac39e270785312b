//! Workbook structure analysis command
//!
//! Reports the container kind, header or archive summary, and what the
//! signature scanner would find, without extracting anything.

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::options::InputOptions;
use crate::record::AnalysisReport;
use crate::utils::file_utils::write_output;
use crate::utils::logger::Logger;
use crate::workbook::errors::ExtractResult;

/// Command for analyzing workbook structure
pub struct AnalyzeCommand<'a> {
    /// Inputs, encoding and configuration
    options: InputOptions,
    /// Emit JSON instead of text
    json: bool,
    /// Path to the output file (stdout when absent)
    output_file: Option<String>,
    /// Logger for per-input summary lines
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for per-input summary lines
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        Ok(AnalyzeCommand {
            options: InputOptions::from_args(args)?,
            json: args.get_flag("json"),
            output_file: args.get_one::<String>("output").cloned(),
            logger,
        })
    }

    /// Display the scanner's rejections at debug level
    fn display_scan_details(&self, report: &AnalysisReport) {
        for summary in &report.scan {
            debug!("  {} pass: {} accepted, {} rejected",
                   summary.format, summary.accepted, summary.rejected);
        }
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        let api = self.options.api()?;

        let mut reports = Vec::with_capacity(self.options.inputs.len());
        for input in &self.options.inputs {
            let payload = self.options.load_payload(&api, input)?;
            let report = api.analyze(&payload)?;
            info!("Analyzed {}: {} container, {} bytes", input, report.container_kind, report.size_bytes);
            self.display_scan_details(&report);
            let _ = self.logger.log(&format!("{}: analyzed as {}", input, report.container_kind));
            reports.push(report);
        }

        let content = if self.json {
            serde_json::to_string_pretty(&reports)?
        } else {
            reports.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
        };
        write_output(self.output_file.as_deref(), &content)
    }
}

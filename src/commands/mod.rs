//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod options;
pub mod analyze_command;
pub mod extract_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use extract_command::ExtractCommand;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::workbook::errors::ExtractResult;

/// Factory for creating command instances based on CLI arguments
pub struct XlImageCommandFactory;

impl XlImageCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        XlImageCommandFactory
    }
}

impl Default for XlImageCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for XlImageCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Box<dyn Command + 'a>> {
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        } else {
            // Default to extraction
            Ok(Box::new(ExtractCommand::new(args, logger)?))
        }
    }
}

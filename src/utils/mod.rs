//! Utility modules for common functionality
//!
//! This module provides the logger, progress reporting and file helpers
//! used by the command line front end.

pub mod logger;
pub mod progress;
pub mod file_utils;

//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, writing every record to a log file and mirroring
//! it to stderr. Stdout is left free for JSON output.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level written
    level: LevelFilter,
    /// Whether records are mirrored to stderr
    console: bool,
}

impl Logger {
    /// Creates a new logger instance that only writes to its file
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        Self::with_level(log_file, LevelFilter::Info, false)
    }

    fn with_level(log_file: &str, level: LevelFilter, console: bool) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
            console,
        })
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Static method to initialize the global logger
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    /// * `verbose` - Record debug output instead of stopping at info
    pub fn init_global_logger(log_file: &str, verbose: bool) -> io::Result<()> {
        let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
        let global_logger = Logger::with_level(log_file, level, true)?;

        // Only called once at startup
        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.log(&message);

            if self.console {
                eprintln!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}

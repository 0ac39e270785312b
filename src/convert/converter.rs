//! Legacy-to-archive document conversion
//!
//! The conversion runs an external office suite in headless mode inside a
//! private temporary directory. The child process is polled until it exits
//! or the timeout expires; on timeout it is killed and the whole extraction
//! fails.

use std::fs;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::workbook::errors::{ExtractError, ExtractResult};

/// Interval between child process status checks
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const INPUT_NAME: &str = "input.xls";
const OUTPUT_NAME: &str = "input.xlsx";

/// Converts legacy binary workbooks into archive workbooks
pub trait DocumentConverter: Send + Sync {
    /// Convert legacy bytes to archive bytes
    ///
    /// # Returns
    /// The converted workbook, or `ConversionFailed`/`ConversionTimeout`
    fn convert(&self, data: &[u8]) -> ExtractResult<Vec<u8>>;

    /// Short name for logging
    fn name(&self) -> &str;
}

/// Converter backed by a headless office suite (`soffice`)
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl SofficeConverter {
    /// Create a converter
    ///
    /// # Arguments
    /// * `command` - Program to run, optionally followed by leading arguments
    /// * `timeout` - Upper bound on the conversion's wall-clock time
    pub fn new(command: &str, timeout: Duration) -> ExtractResult<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ExtractError::ConfigError("conversion command is empty".to_string()))?;

        Ok(SofficeConverter {
            program,
            leading_args: parts.collect(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self, dir: &std::path::Path) -> ExtractResult<()> {
        let input = dir.join(INPUT_NAME);

        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("--headless")
            .args(["--convert-to", "xlsx", "--outdir"])
            .arg(dir)
            .arg(&input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExtractError::ConversionFailed(format!("{}: {}", self.program, e)))?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    debug!("{} finished in {:?}", self.program, started.elapsed());
                    return Ok(());
                }
                return Err(ExtractError::ConversionFailed(format!(
                    "{} exited with {}", self.program, status
                )));
            }

            if started.elapsed() >= self.timeout {
                warn!("{} did not finish within {:?}, killing it", self.program, self.timeout);
                if let Err(e) = child.kill() {
                    warn!("Failed to kill {}: {}", self.program, e);
                }
                let _ = child.wait();
                return Err(ExtractError::ConversionTimeout(self.timeout));
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl DocumentConverter for SofficeConverter {
    fn convert(&self, data: &[u8]) -> ExtractResult<Vec<u8>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(INPUT_NAME), data)?;

        info!("Converting {} byte legacy workbook with {}", data.len(), self.program);
        self.run(dir.path())?;

        let output = dir.path().join(OUTPUT_NAME);
        let converted = fs::read(&output).map_err(|e| {
            ExtractError::ConversionFailed(format!("no converted workbook produced: {}", e))
        })?;

        info!("Conversion produced {} bytes", converted.len());
        Ok(converted)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

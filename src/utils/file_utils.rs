//! File helpers for the command line front end
//!
//! Reading inputs (a path, or `-` for stdin), writing JSON output, and
//! saving extracted images to disk.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::record::ImageRecord;
use crate::workbook::errors::{ExtractError, ExtractResult};

/// Input path that stands for stdin
pub const STDIN_PATH: &str = "-";

/// Read an input fully into memory
pub fn read_input(path: &str) -> ExtractResult<Vec<u8>> {
    if path == STDIN_PATH {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        debug!("Read {} bytes from stdin", data.len());
        return Ok(data);
    }

    let data = fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path);
    Ok(data)
}

/// Filename hint for an input path; stdin has none
pub fn input_filename(path: &str) -> Option<String> {
    if path == STDIN_PATH {
        return None;
    }
    Path::new(path)
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_string)
}

/// Write `content` to a file, or to stdout when no path is given
pub fn write_output(path: Option<&str>, content: &str) -> ExtractResult<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            info!("Wrote output to {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
            handle.flush()?;
        }
    }
    Ok(())
}

/// File name for a saved image: `image_<index>.<ext>`
pub fn image_file_name(record: &ImageRecord) -> String {
    format!("image_{}.{}", record.index, record.format.extension())
}

/// Decode and write every record's payload into `dir`
///
/// # Returns
/// Paths of the written files, in record order
pub fn save_images(records: &[ImageRecord], dir: &Path) -> ExtractResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let bytes = record.bytes()?;
        if bytes.len() != record.size_bytes {
            return Err(ExtractError::GenericError(format!(
                "image {} decoded to {} bytes, expected {}",
                record.index, bytes.len(), record.size_bytes
            )));
        }

        let path = dir.join(image_file_name(record));
        fs::write(&path, &bytes)?;
        debug!("Saved image {} to {}", record.index, path.display());
        written.push(path);
    }

    info!("Saved {} images to {}", written.len(), dir.display());
    Ok(written)
}

//! Marker export and import.
//!
//! Markers are written as a two-column table, one layer per row in ascending
//! position:
//!
//! ```text
//! index,position
//! 0,3.25
//! 1,7.5
//! ```
//!
//! [`parse_markers`] reads the same layout back (the header is optional) so a
//! previous export can seed a new session.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

/// Error type for marker file operations.
#[derive(Debug, Error)]
pub enum MarkerFileError {
    #[error("I/O error accessing marker file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {content:?} is not an `index,position` row")]
    InvalidRow { line: usize, content: String },
}

const HEADER: &str = "index,position";

/// Writes `markers` to `path`, replacing any existing file.
pub fn write_markers(path: &Path, markers: &[f64]) -> Result<(), MarkerFileError> {
    let io_error = |source| MarkerFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_markers_to(&mut writer, markers).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    info!(path = %path.display(), count = markers.len(), "markers exported");
    Ok(())
}

/// Writes the header and one `n,x` row per marker to `writer`.
pub fn write_markers_to<W: Write>(writer: &mut W, markers: &[f64]) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for (n, x) in markers.iter().enumerate() {
        writeln!(writer, "{n},{x}")?;
    }
    Ok(())
}

/// Reads marker positions from `path`.
pub fn read_markers(path: &Path) -> Result<Vec<f64>, MarkerFileError> {
    let file = File::open(path).map_err(|source| MarkerFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let markers = parse_markers(BufReader::new(file)).map_err(|e| match e {
        MarkerFileError::Io { source, .. } => MarkerFileError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), count = markers.len(), "markers imported");
    Ok(markers)
}

/// Parses marker positions in file order.  The position is the last column
/// of each row; a first row whose position is not a number is taken as the
/// header.
pub fn parse_markers<R: BufRead>(reader: R) -> Result<Vec<f64>, MarkerFileError> {
    let mut markers = Vec::new();
    let mut first_row = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MarkerFileError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let cell = trimmed.rsplit(',').next().unwrap_or(trimmed).trim();
        match cell.parse::<f64>() {
            Ok(x) => markers.push(x),
            Err(_) if first_row => {}
            Err(_) => {
                return Err(MarkerFileError::InvalidRow {
                    line: i + 1,
                    content: trimmed.to_string(),
                })
            }
        }
        first_row = false;
    }

    Ok(markers)
}

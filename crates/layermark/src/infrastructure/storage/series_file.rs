//! Loading of multi-channel series from comma-separated text.
//!
//! The first line names the index column followed by one column per channel:
//!
//! ```text
//! depth,conductivity,dust
//! 0.00,1.02,17
//! 0.01,1.04,
//! ```
//!
//! Empty channel cells are read as NaN and show up as gaps in the plot.
//! Rows whose index cell is empty or not a number are skipped with a warning.

use std::{
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use layermark_core::{Channel, Series, SeriesError};
use thiserror::Error;
use tracing::{info, warn};

/// Error type for reading a series file.
#[derive(Debug, Error)]
pub enum SeriesFileError {
    #[error("cannot read series file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("series file has no header line")]
    MissingHeader,
    #[error("line {line}: expected {expected} columns, found {actual}")]
    ColumnCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: column {column:?} holds {value:?}, which is not a number")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Reads and validates the series stored at `path`.
pub fn load_series(path: &Path) -> Result<Series, SeriesFileError> {
    let io_error = |source| SeriesFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_error)?;
    let series = parse_series(BufReader::new(file)).map_err(|e| match e {
        SeriesFileError::Io { source, .. } => io_error(source),
        other => other,
    })?;
    info!(
        path = %path.display(),
        rows = series.len(),
        channels = series.channel_count(),
        "series loaded"
    );
    Ok(series)
}

/// Parses a series from any buffered reader.  Line numbers in errors are
/// one-based.
pub fn parse_series<R: BufRead>(reader: R) -> Result<Series, SeriesFileError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|source| SeriesFileError::Io {
                    path: PathBuf::new(),
                    source,
                })?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(SeriesFileError::MissingHeader),
        }
    };
    let names: Vec<String> = split_row(&header).map(str::to_string).collect();
    let channel_names = &names[1..];

    let mut index = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); channel_names.len()];

    for (i, line) in lines {
        let line_no = i + 1;
        let line = line.map_err(|source| SeriesFileError::Io {
            path: PathBuf::new(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = split_row(&line).collect();
        if cells.len() != names.len() {
            return Err(SeriesFileError::ColumnCount {
                line: line_no,
                expected: names.len(),
                actual: cells.len(),
            });
        }

        let Ok(position) = cells[0].parse::<f64>() else {
            warn!(line = line_no, value = cells[0], "row without numeric index skipped");
            continue;
        };
        index.push(position);

        for ((cell, column), name) in cells[1..].iter().zip(&mut columns).zip(channel_names) {
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>()
                    .map_err(|_| SeriesFileError::InvalidValue {
                        line: line_no,
                        column: name.clone(),
                        value: (*cell).to_string(),
                    })?
            };
            column.push(value);
        }
    }

    let channels = channel_names
        .iter()
        .zip(columns)
        .map(|(name, values)| Channel::new(name.clone(), values))
        .collect();
    Ok(Series::new(index, channels)?)
}

fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_series_reads_index_and_channels() {
        let csv = "depth,conductivity,dust\n0.0,1.5,10\n0.5,1.7,12\n1.0,1.6,11\n";

        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.index(), &[0.0, 0.5, 1.0]);
        assert_eq!(series.channel_count(), 2);
        assert_eq!(series.channels()[0].name, "conductivity");
        assert_eq!(series.channels()[1].values, vec![10.0, 12.0, 11.0]);
        assert_eq!(series.range().max, 1.0);
    }

    #[test]
    fn test_parse_series_skips_blank_lines_and_reads_empty_cells_as_nan() {
        let csv = "\ndepth,a\n\n0,1\n1,\n";

        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.channels()[0].values[1].is_nan());
    }

    #[test]
    fn test_parse_series_skips_row_with_non_numeric_index() {
        let csv = "depth,a\n0,1\nunits,mS\n1,2\n";

        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.index(), &[0.0, 1.0]);
    }

    #[test]
    fn test_parse_series_rejects_ragged_row() {
        let csv = "depth,a,b\n0,1,2\n1,2\n";

        let err = parse_series(csv.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            SeriesFileError::ColumnCount { line: 3, expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_parse_series_rejects_non_numeric_value() {
        let csv = "depth,a\n0,x\n";

        let err = parse_series(csv.as_bytes()).unwrap_err();

        match err {
            SeriesFileError::InvalidValue { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "a");
                assert_eq!(value, "x");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_series_empty_input_is_missing_header() {
        assert!(matches!(
            parse_series("".as_bytes()),
            Err(SeriesFileError::MissingHeader)
        ));
    }

    #[test]
    fn test_parse_series_header_only_reports_empty_index() {
        let err = parse_series("depth,a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SeriesFileError::Series(SeriesError::EmptyIndex)));
    }

    #[test]
    fn test_parse_series_without_channels_is_rejected() {
        let err = parse_series("depth\n0\n1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SeriesFileError::Series(SeriesError::NoChannels)));
    }
}

//! Multi-channel series domain entity.
//!
//! A [`Series`] is the immutable input of a marking session: one shared,
//! non-decreasing index (depth, age, sample number...) and any number of
//! named channels holding one value per index entry.  The index bounds define
//! the [`DataRange`] every layer marker is clamped into.

use thiserror::Error;
use tracing::trace;

/// Errors that can occur when building a [`Series`].
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    /// The index has no entries.
    #[error("series index is empty")]
    EmptyIndex,

    /// The series has no channels to plot.
    #[error("series has no channels")]
    NoChannels,

    /// An index value is NaN or infinite.
    #[error("index value at row {row} is not finite")]
    NonFiniteIndex { row: usize },

    /// The index decreases between two consecutive rows.
    #[error("index is not sorted: row {row} is smaller than the row before it")]
    UnsortedIndex { row: usize },

    /// A channel does not have exactly one value per index entry.
    #[error("channel '{name}' has {actual} values, expected {expected}")]
    ChannelLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Closed interval `[min, max]` of valid x-positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    /// Creates a range, swapping the bounds if they are given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Snaps `x` to the nearest bound when it falls outside the range.
    ///
    /// NaN is passed through unchanged; callers decide what to do with it.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Returns `true` if `x` lies inside the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Width of the range (`max - min`).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// One named measurement channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub values: Vec<f64>,
}

impl Channel {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Validated multi-channel series sharing one index.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<f64>,
    channels: Vec<Channel>,
    range: DataRange,
}

impl Series {
    /// Builds a series from its index and channels.
    ///
    /// # Errors
    ///
    /// Returns a [`SeriesError`] when the index is empty, not finite, or not
    /// sorted, when there are no channels, or when a channel length differs
    /// from the index length.
    pub fn new(index: Vec<f64>, channels: Vec<Channel>) -> Result<Self, SeriesError> {
        if index.is_empty() {
            return Err(SeriesError::EmptyIndex);
        }
        if channels.is_empty() {
            return Err(SeriesError::NoChannels);
        }
        for (row, value) in index.iter().enumerate() {
            if !value.is_finite() {
                return Err(SeriesError::NonFiniteIndex { row });
            }
            if row > 0 && *value < index[row - 1] {
                return Err(SeriesError::UnsortedIndex { row });
            }
        }
        for channel in &channels {
            if channel.values.len() != index.len() {
                return Err(SeriesError::ChannelLengthMismatch {
                    name: channel.name.clone(),
                    expected: index.len(),
                    actual: channel.values.len(),
                });
            }
        }

        // Sorted and non-empty, so the bounds are the first and last rows.
        let range = DataRange::new(index[0], index[index.len() - 1]);
        trace!(
            rows = index.len(),
            channels = channels.len(),
            min = range.min,
            max = range.max,
            "series validated"
        );
        Ok(Self {
            index,
            channels,
            range,
        })
    }

    /// The shared x-index.
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// All channels in display order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Number of channels (one plot row each).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of rows in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false`: a validated series has at least one row.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Valid x-domain `[min(index), max(index)]`.
    pub fn range(&self) -> DataRange {
        self.range
    }

    /// Arithmetic mean of the index values, where the preview cursor starts.
    pub fn mean_index(&self) -> f64 {
        self.index.iter().sum::<f64>() / self.index.len() as f64
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! In-memory display surface.
//!
//! [`VirtualCanvas`] implements [`DisplaySurface`] without a window: it keeps
//! the stacked plot rows, the data curves, and every live vertical line in
//! memory, and maps between data and pixel coordinates with the same
//! geometry a windowed backend would use.  The binary replays recorded
//! sessions against it, and tests inspect it after driving a board.
//!
//! # Geometry
//!
//! ```text
//!  0        margin_left                         width - margin_right   width
//!  ├────────┼─────────────────────────────────────────┼────────────────┤
//!  row 0    │ x_min ─────────── data ──────────► x_max │   row_height px
//!  row 1    │                                          │   row_height px
//! ```
//!
//! All rows share the same horizontal layout; row `n` occupies the pixel band
//! `n * row_height .. (n + 1) * row_height`.

use std::collections::BTreeMap;

use layermark_core::{AxisId, DataPoint, DataRange, LineStyle, MouseButton, PointerEvent};
use tracing::{trace, warn};

use crate::application::cursor_board::{DisplaySurface, LineHandle};

/// Pixel layout of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub width_px: f64,
    pub row_height_px: f64,
    pub margin_left_px: f64,
    pub margin_right_px: f64,
}

impl CanvasGeometry {
    /// Width of the plotting area between the margins (at least one pixel).
    pub fn plot_width(&self) -> f64 {
        (self.width_px - self.margin_left_px - self.margin_right_px).max(1.0)
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width_px: 1500.0,
            row_height_px: 150.0,
            margin_left_px: 80.0,
            margin_right_px: 20.0,
        }
    }
}

/// A data curve drawn into a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub style: LineStyle,
}

/// A live full-height vertical line.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLine {
    pub axis: AxisId,
    pub x: f64,
    pub style: LineStyle,
}

#[derive(Debug, Clone)]
struct Row {
    label: String,
    x_limits: DataRange,
    y_limits: Option<DataRange>,
    traces: Vec<Trace>,
}

/// Window-less [`DisplaySurface`].
#[derive(Debug)]
pub struct VirtualCanvas {
    geometry: CanvasGeometry,
    rows: Vec<Row>,
    lines: BTreeMap<LineHandle, VerticalLine>,
    next_line: u64,
    redraws: usize,
    displayed_count: usize,
}

impl VirtualCanvas {
    pub fn new(geometry: CanvasGeometry) -> Self {
        Self {
            geometry,
            rows: Vec::new(),
            lines: BTreeMap::new(),
            next_line: 0,
            redraws: 0,
            displayed_count: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_label(&self, axis: AxisId) -> Option<&str> {
        self.rows.get(axis.0).map(|row| row.label.as_str())
    }

    pub fn traces(&self, axis: AxisId) -> &[Trace] {
        self.rows
            .get(axis.0)
            .map(|row| row.traces.as_slice())
            .unwrap_or(&[])
    }

    pub fn line(&self, handle: LineHandle) -> Option<&VerticalLine> {
        self.lines.get(&handle)
    }

    /// Live vertical lines in row `axis`, in handle order.
    pub fn vertical_lines(&self, axis: AxisId) -> impl Iterator<Item = &VerticalLine> {
        self.lines.values().filter(move |line| line.axis == axis)
    }

    /// Total number of live vertical lines across all rows.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of full repaints requested so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Marker count shown by the most recent repaint.
    pub fn displayed_count(&self) -> usize {
        self.displayed_count
    }

    /// Maps a horizontal pixel position in row `axis` back to data x.
    pub fn pixel_to_data_x(&self, axis: AxisId, pixel_x: f64) -> Option<f64> {
        let row = self.rows.get(axis.0)?;
        let fraction = (pixel_x - self.geometry.margin_left_px) / self.geometry.plot_width();
        Some(row.x_limits.min + fraction * row.x_limits.span())
    }

    /// Builds the pointer event a windowed backend would report for a click
    /// at canvas pixel `(pixel_x, pixel_y)`.
    ///
    /// Pixels in the margins or below the last row produce an event outside
    /// every row.
    pub fn pointer_event_at(
        &self,
        button: Option<MouseButton>,
        pixel_x: f64,
        pixel_y: f64,
    ) -> PointerEvent {
        let plot_left = self.geometry.margin_left_px;
        let plot_right = plot_left + self.geometry.plot_width();
        if !(plot_left..=plot_right).contains(&pixel_x) || pixel_y < 0.0 {
            return PointerEvent::outside(button);
        }

        let row_index = (pixel_y / self.geometry.row_height_px).floor() as usize;
        let Some(row) = self.rows.get(row_index) else {
            return PointerEvent::outside(button);
        };
        let axis = AxisId(row_index);
        let Some(x) = self.pixel_to_data_x(axis, pixel_x) else {
            return PointerEvent::outside(button);
        };

        // Screen y grows downwards; data y grows upwards.
        let within_row = pixel_y - row_index as f64 * self.geometry.row_height_px;
        let y = match row.y_limits {
            Some(limits) => limits.max - within_row / self.geometry.row_height_px * limits.span(),
            None => 0.0,
        };

        PointerEvent {
            button,
            axis: Some(axis),
            position: Some(DataPoint { x, y }),
        }
    }
}

impl Default for VirtualCanvas {
    fn default() -> Self {
        Self::new(CanvasGeometry::default())
    }
}

impl DisplaySurface for VirtualCanvas {
    fn add_axes(&mut self, label: &str, x_limits: DataRange) -> AxisId {
        self.rows.push(Row {
            label: label.to_string(),
            x_limits,
            y_limits: None,
            traces: Vec::new(),
        });
        let axis = AxisId(self.rows.len() - 1);
        trace!(?axis, label, "row added");
        axis
    }

    fn plot_series(&mut self, axis: AxisId, xs: &[f64], ys: &[f64], style: &LineStyle) {
        let Some(row) = self.rows.get_mut(axis.0) else {
            warn!(?axis, "plot into unknown row ignored");
            return;
        };

        let finite = ys.iter().copied().filter(|y| y.is_finite());
        let bounds = finite.fold(None, |acc: Option<(f64, f64)>, y| match acc {
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            None => Some((y, y)),
        });
        if let Some((lo, hi)) = bounds {
            row.y_limits = Some(match row.y_limits {
                Some(current) => DataRange::new(current.min.min(lo), current.max.max(hi)),
                None => DataRange::new(lo, hi),
            });
        }

        row.traces.push(Trace {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            style: style.clone(),
        });
    }

    fn add_vertical_line(&mut self, axis: AxisId, x: f64, style: &LineStyle) -> LineHandle {
        let handle = LineHandle(self.next_line);
        self.next_line += 1;
        self.lines.insert(
            handle,
            VerticalLine {
                axis,
                x,
                style: style.clone(),
            },
        );
        trace!(?handle, ?axis, x, "vertical line added");
        handle
    }

    fn move_vertical_line(&mut self, line: LineHandle, x: f64) {
        match self.lines.get_mut(&line) {
            Some(existing) => existing.x = x,
            None => warn!(?line, "move of unknown line ignored"),
        }
    }

    fn remove_vertical_line(&mut self, line: LineHandle) {
        if self.lines.remove(&line).is_none() {
            warn!(?line, "removal of unknown line ignored");
        }
    }

    fn data_to_pixel_x(&self, axis: AxisId, x: f64) -> Option<f64> {
        let row = self.rows.get(axis.0)?;
        let span = row.x_limits.span();
        let fraction = if span > 0.0 {
            (x - row.x_limits.min) / span
        } else {
            0.5
        };
        Some(self.geometry.margin_left_px + fraction * self.geometry.plot_width())
    }

    fn redraw(&mut self, marker_count: usize) {
        self.redraws += 1;
        self.displayed_count = marker_count;
        trace!(marker_count, lines = self.lines.len(), "canvas repainted");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! CursorBoard: the interactive layer-marking state machine.
//!
//! The board owns the committed layer markers, the single preview cursor, and
//! the interaction state.  It receives [`BoardEvent`]s from a display surface,
//! decides what each one means (move the preview, start or continue a drag,
//! delete a marker, commit the preview), and issues drawing commands back to
//! the surface through the [`DisplaySurface`] trait.
//!
//! # Architecture
//!
//! The board depends only on the `DisplaySurface` trait and on domain types
//! from `layermark_core`.  Every rendered line is an opaque [`LineHandle`]
//! owned by exactly one marker (or by the preview cursor) and released with
//! [`DisplaySurface::remove_vertical_line`]; the board never looks inside the
//! surface.
//!
//! # Interaction rules
//!
//! ```text
//!                 primary down on a marker line
//!        Idle  ───────────────────────────────────►  Dragging(key)
//!         ▲                                              │  pointer move in a row:
//!         │          primary up inside a row             │  rekey marker to clamped x
//!         └──────────────────────────────────────────────┘
//! ```
//!
//! - Primary down off any marker line moves the preview cursor.
//! - Secondary down on a marker line deletes that marker.
//! - The commit key (`b` by default) turns the preview position into a marker.
//! - Every position written by the board is clamped to the series x-domain.

use layermark_core::{
    pick_nearest, AxisId, BoardEvent, DataRange, HitCandidate, KeyEvent, LineStyle, MarkerKey,
    MarkerSet, MouseButton, PointerEvent, Rekey, Series, DEFAULT_PICK_RADIUS_PX,
};
use tracing::{debug, info};

/// Opaque identifier of a line drawn on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(pub u64);

/// Rendering and input-mapping operations the board needs from a display.
///
/// Infrastructure implements this for a real or virtual canvas; tests use
/// recording doubles.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySurface {
    /// Creates a new plot row labelled `label` showing `x_limits` horizontally.
    fn add_axes(&mut self, label: &str, x_limits: DataRange) -> AxisId;

    /// Draws a data curve into row `axis`.
    fn plot_series(&mut self, axis: AxisId, xs: &[f64], ys: &[f64], style: &LineStyle);

    /// Draws a full-height vertical line at data position `x` in row `axis`.
    fn add_vertical_line(&mut self, axis: AxisId, x: f64, style: &LineStyle) -> LineHandle;

    /// Moves an existing vertical line to data position `x`.
    fn move_vertical_line(&mut self, line: LineHandle, x: f64);

    /// Removes a vertical line and releases its handle.
    fn remove_vertical_line(&mut self, line: LineHandle);

    /// Maps data position `x` to a horizontal pixel position in row `axis`.
    ///
    /// Returns `None` if the row does not exist.
    fn data_to_pixel_x(&self, axis: AxisId, x: f64) -> Option<f64>;

    /// Repaints the whole surface and shows the current marker count.
    fn redraw(&mut self, marker_count: usize);
}

/// Tunable behaviour and appearance of a board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSettings {
    /// Key that commits the preview cursor as a new marker.
    pub commit_key: String,
    /// Pixel tolerance for selecting a marker line.
    pub pick_radius_px: f64,
    pub series_style: LineStyle,
    pub preview_style: LineStyle,
    pub marker_style: LineStyle,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            commit_key: "b".to_string(),
            pick_radius_px: DEFAULT_PICK_RADIUS_PX,
            series_style: LineStyle::series(),
            preview_style: LineStyle::preview(),
            marker_style: LineStyle::marker(),
        }
    }
}

/// Global interaction state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// The marker with this key follows the pointer.
    Dragging(MarkerKey),
}

/// A committed layer marker: one rendered line per plot row.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    lines: Vec<LineHandle>,
}

impl Marker {
    pub fn lines(&self) -> &[LineHandle] {
        &self.lines
    }
}

/// The uncommitted candidate marker.
#[derive(Debug, Clone, PartialEq)]
struct PreviewCursor {
    x: f64,
    lines: Vec<LineHandle>,
}

/// What remains after [`CursorBoard::close`]: the final marker positions and
/// the surface with every board-owned line released.
#[derive(Debug)]
pub struct ClosedBoard<S> {
    pub markers: Vec<f64>,
    pub surface: S,
}

/// The layer-marking board.
pub struct CursorBoard<S: DisplaySurface> {
    surface: S,
    settings: BoardSettings,
    range: DataRange,
    axes: Vec<AxisId>,
    preview: PreviewCursor,
    markers: MarkerSet<Marker>,
    interaction: Interaction,
}

impl<S: DisplaySurface> CursorBoard<S> {
    /// Builds a board on `surface`.
    ///
    /// Creates one row per channel, draws the channel curves, places the
    /// preview cursor at the mean index value, and inserts `initial_markers`
    /// (each clamped into the series x-domain).
    pub fn new<I>(
        series: &Series,
        initial_markers: I,
        mut surface: S,
        settings: BoardSettings,
    ) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let range = series.range();

        let mut axes = Vec::with_capacity(series.channel_count());
        for channel in series.channels() {
            let axis = surface.add_axes(&channel.name, range);
            surface.plot_series(axis, series.index(), &channel.values, &settings.series_style);
            axes.push(axis);
        }

        let preview_x = range.clamp(series.mean_index());
        let preview_lines = axes
            .iter()
            .map(|axis| surface.add_vertical_line(*axis, preview_x, &settings.preview_style))
            .collect();

        let mut board = Self {
            surface,
            settings,
            range,
            axes,
            preview: PreviewCursor {
                x: preview_x,
                lines: preview_lines,
            },
            markers: MarkerSet::new(),
            interaction: Interaction::Idle,
        };

        for x in initial_markers {
            board.insert_marker(x);
        }
        info!(
            channels = board.axes.len(),
            markers = board.markers.len(),
            "layer board ready"
        );
        board.redraw();
        board
    }

    // ── Marker operations ─────────────────────────────────────────────────────

    /// Adds a marker at `x`, clamped into the series x-domain.
    ///
    /// Re-adding an existing position replaces that marker's lines, so the
    /// board still holds exactly one marker there.  Non-finite positions are
    /// ignored.
    pub fn add_marker(&mut self, x: f64) {
        if self.insert_marker(x).is_some() {
            self.redraw();
        }
    }

    /// Removes the marker at exactly `x`.  Does nothing if there is none.
    pub fn remove_marker(&mut self, x: f64) {
        if let Some(key) = MarkerKey::new(x) {
            self.remove_marker_key(key);
        }
    }

    /// Sorted marker positions.
    pub fn markers(&self) -> Vec<f64> {
        self.markers.positions()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Rendered lines of the marker at exactly `x`.
    pub fn marker(&self, x: f64) -> Option<&Marker> {
        MarkerKey::new(x).and_then(|key| self.markers.get(key))
    }

    /// Current x-position of the preview cursor.
    pub fn preview_position(&self) -> f64 {
        self.preview.x
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// The series x-domain every position is clamped into.
    pub fn range(&self) -> DataRange {
        self.range
    }

    /// Plot rows in channel order.
    pub fn axes(&self) -> &[AxisId] {
        &self.axes
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    // ── Event handling ────────────────────────────────────────────────────────

    /// Dispatches one input event to its handler.
    pub fn handle_event(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::PointerDown(pointer) => self.handle_pointer_down(pointer),
            BoardEvent::PointerUp(pointer) => self.handle_pointer_up(pointer),
            BoardEvent::PointerMove(pointer) => self.handle_pointer_move(pointer),
            BoardEvent::KeyPress(key) => self.handle_key_press(key),
        }
    }

    /// Primary: grab the marker under the pointer, or move the preview there.
    /// Secondary: delete the marker under the pointer.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent) {
        let Some((axis, x)) = self.locate(event) else {
            debug!("pointer down outside plotted rows ignored");
            return;
        };

        match event.button {
            Some(MouseButton::Primary) => match self.hit_test(axis, x) {
                Some(key) => {
                    debug!(marker = %key, "drag started");
                    self.interaction = Interaction::Dragging(key);
                }
                None => {
                    self.move_preview(x);
                    self.redraw();
                }
            },
            Some(MouseButton::Secondary) => {
                if let Some(key) = self.hit_test(axis, x) {
                    self.remove_marker_key(key);
                }
            }
            Some(MouseButton::Middle) | None => {}
        }
    }

    /// Ends a drag when the primary button is released inside a row.
    pub fn handle_pointer_up(&mut self, event: &PointerEvent) {
        let Interaction::Dragging(key) = self.interaction else {
            return;
        };
        if event.button != Some(MouseButton::Primary) || !self.in_plotted_row(event.axis) {
            return;
        }
        debug!(marker = %key, "drag finished");
        self.interaction = Interaction::Idle;
        self.redraw();
    }

    /// Moves the dragged marker to the pointer's (clamped) x-position.
    pub fn handle_pointer_move(&mut self, event: &PointerEvent) {
        let Interaction::Dragging(from) = self.interaction else {
            return;
        };
        let Some((_, x)) = self.locate(event) else {
            return;
        };
        let Some(to) = MarkerKey::new(self.range.clamp(x)) else {
            return;
        };

        match self.markers.rekey(from, to) {
            Rekey::Moved { displaced } => {
                if let Some(marker) = self.markers.get(to) {
                    for line in &marker.lines {
                        self.surface.move_vertical_line(*line, to.value());
                    }
                }
                if let Some(displaced) = displaced {
                    debug!(marker = %to, "dragged marker replaced the marker at its new position");
                    self.release_lines(&displaced.lines);
                }
                self.interaction = Interaction::Dragging(to);
                self.redraw();
            }
            Rekey::Missing => {
                self.interaction = Interaction::Idle;
            }
        }
    }

    /// Commits the preview cursor when the commit key is pressed.
    pub fn handle_key_press(&mut self, event: &KeyEvent) {
        if event.key != self.settings.commit_key {
            return;
        }
        let x = self.range.clamp(self.preview.x);
        debug!(x, "committing preview cursor");
        self.add_marker(x);
    }

    // ── Teardown ──────────────────────────────────────────────────────────────

    /// Releases every marker and preview line and returns the final positions.
    pub fn close(mut self) -> ClosedBoard<S> {
        let markers = self.markers.positions();
        for (_, marker) in self.markers.drain() {
            self.release_lines(&marker.lines);
        }
        let preview_lines = std::mem::take(&mut self.preview.lines);
        self.release_lines(&preview_lines);
        info!(markers = markers.len(), "layer board closed");
        ClosedBoard {
            markers,
            surface: self.surface,
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn insert_marker(&mut self, x: f64) -> Option<MarkerKey> {
        let Some(key) = MarkerKey::new(self.range.clamp(x)) else {
            debug!(x, "non-finite marker position ignored");
            return None;
        };
        let lines = self.draw_marker_lines(key.value());
        if let Some(previous) = self.markers.insert(key, Marker { lines }) {
            self.release_lines(&previous.lines);
        }
        Some(key)
    }

    fn remove_marker_key(&mut self, key: MarkerKey) {
        let Some(marker) = self.markers.remove(key) else {
            return;
        };
        self.release_lines(&marker.lines);
        if self.interaction == Interaction::Dragging(key) {
            self.interaction = Interaction::Idle;
        }
        debug!(marker = %key, "marker removed");
        self.redraw();
    }

    fn move_preview(&mut self, x: f64) {
        let x = self.range.clamp(x);
        self.preview.x = x;
        for line in &self.preview.lines {
            self.surface.move_vertical_line(*line, x);
        }
    }

    fn draw_marker_lines(&mut self, x: f64) -> Vec<LineHandle> {
        let style = &self.settings.marker_style;
        self.axes
            .iter()
            .map(|axis| self.surface.add_vertical_line(*axis, x, style))
            .collect()
    }

    fn release_lines(&mut self, lines: &[LineHandle]) {
        for line in lines {
            self.surface.remove_vertical_line(*line);
        }
    }

    /// Finds the marker whose line lies under the pointer in row `axis`.
    fn hit_test(&self, axis: AxisId, x: f64) -> Option<MarkerKey> {
        let pointer_px = self.surface.data_to_pixel_x(axis, x)?;
        let candidates = self.markers.keys().filter_map(|key| {
            self.surface
                .data_to_pixel_x(axis, key.value())
                .map(|pixel_x| HitCandidate { key, pixel_x })
        });
        pick_nearest(candidates, pointer_px, self.settings.pick_radius_px)
    }

    fn in_plotted_row(&self, axis: Option<AxisId>) -> bool {
        axis.is_some_and(|axis| self.axes.contains(&axis))
    }

    /// Row and data x of a pointer event inside a plotted row with usable
    /// coordinates.
    fn locate(&self, event: &PointerEvent) -> Option<(AxisId, f64)> {
        let axis = event.axis.filter(|axis| self.axes.contains(axis))?;
        let position = event.position?;
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        Some((axis, position.x))
    }

    fn redraw(&mut self) {
        let count = self.markers.len();
        info!("number of layers: {count}");
        self.surface.redraw(count);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use layermark_core::Channel;
    use std::collections::BTreeMap;

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Pixels per data unit of the recording surface.  With the default pick
    /// radius of 2px a click reaches 0.2 data units either side of a line.
    const PX_PER_UNIT: f64 = 10.0;

    #[derive(Default)]
    struct RecordingSurface {
        axes: Vec<String>,
        traces: usize,
        lines: BTreeMap<LineHandle, (AxisId, f64)>,
        next_line: u64,
        removed: Vec<LineHandle>,
        redraws: Vec<usize>,
    }

    impl RecordingSurface {
        fn lines_at(&self, x: f64) -> usize {
            self.lines.values().filter(|(_, lx)| *lx == x).count()
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn add_axes(&mut self, label: &str, _x_limits: DataRange) -> AxisId {
            self.axes.push(label.to_string());
            AxisId(self.axes.len() - 1)
        }

        fn plot_series(&mut self, _axis: AxisId, _xs: &[f64], _ys: &[f64], _style: &LineStyle) {
            self.traces += 1;
        }

        fn add_vertical_line(&mut self, axis: AxisId, x: f64, _style: &LineStyle) -> LineHandle {
            let handle = LineHandle(self.next_line);
            self.next_line += 1;
            self.lines.insert(handle, (axis, x));
            handle
        }

        fn move_vertical_line(&mut self, line: LineHandle, x: f64) {
            if let Some(entry) = self.lines.get_mut(&line) {
                entry.1 = x;
            }
        }

        fn remove_vertical_line(&mut self, line: LineHandle) {
            self.lines.remove(&line);
            self.removed.push(line);
        }

        fn data_to_pixel_x(&self, axis: AxisId, x: f64) -> Option<f64> {
            (axis.0 < self.axes.len()).then_some(x * PX_PER_UNIT)
        }

        fn redraw(&mut self, marker_count: usize) {
            self.redraws.push(marker_count);
        }
    }

    fn series_0_to_20(channels: usize) -> Series {
        let index: Vec<f64> = (0..=200).map(|i| i as f64 / 10.0).collect();
        let channels = (0..channels)
            .map(|c| Channel::new(format!("ch{c}"), vec![c as f64; index.len()]))
            .collect();
        Series::new(index, channels).unwrap()
    }

    fn make_board(initial: &[f64]) -> CursorBoard<RecordingSurface> {
        CursorBoard::new(
            &series_0_to_20(2),
            initial.iter().copied(),
            RecordingSurface::default(),
            BoardSettings::default(),
        )
    }

    fn down(button: MouseButton, x: f64) -> BoardEvent {
        BoardEvent::PointerDown(PointerEvent::at(Some(button), AxisId(0), x, 0.0))
    }

    fn up(x: f64) -> BoardEvent {
        BoardEvent::PointerUp(PointerEvent::at(Some(MouseButton::Primary), AxisId(1), x, 0.0))
    }

    fn motion(x: f64) -> BoardEvent {
        BoardEvent::PointerMove(PointerEvent::at(None, AxisId(1), x, 0.0))
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_creates_one_row_and_trace_per_channel() {
        let board = CursorBoard::new(
            &series_0_to_20(3),
            Vec::new(),
            RecordingSurface::default(),
            BoardSettings::default(),
        );
        assert_eq!(board.surface().axes, vec!["ch0", "ch1", "ch2"]);
        assert_eq!(board.surface().traces, 3);
        assert_eq!(board.axes().len(), 3);
    }

    #[test]
    fn test_new_places_preview_at_mean_index_on_every_row() {
        let board = make_board(&[]);
        assert!((board.preview_position() - 10.0).abs() < 1e-9);
        assert_eq!(board.surface().lines.len(), 2, "one preview line per row");
    }

    #[test]
    fn test_new_inserts_initial_markers_clamped_and_sorted() {
        let board = make_board(&[12.0, -4.0, 3.0, 30.0]);
        assert_eq!(board.markers(), vec![0.0, 3.0, 12.0, 20.0]);
        assert_eq!(board.surface().redraws.last(), Some(&4));
    }

    // ── add_marker ────────────────────────────────────────────────────────────

    #[test]
    fn test_add_marker_clamps_above_range_to_max() {
        let mut board = make_board(&[]);
        board.add_marker(25.0);
        assert_eq!(board.markers(), vec![20.0]);
    }

    #[test]
    fn test_add_marker_twice_at_same_position_keeps_one_marker() {
        let mut board = make_board(&[]);
        board.add_marker(25.0);
        board.add_marker(20.0);

        assert_eq!(board.markers(), vec![20.0]);
        assert_eq!(board.marker_count(), 1);
        assert_eq!(board.surface().lines_at(20.0), 2, "re-add must not orphan lines");
    }

    #[test]
    fn test_add_marker_draws_one_line_per_row() {
        let mut board = make_board(&[]);
        board.add_marker(4.0);
        let marker = board.marker(4.0).expect("marker present");
        assert_eq!(marker.lines().len(), 2);
    }

    #[test]
    fn test_add_marker_ignores_nan() {
        let mut board = make_board(&[1.0]);
        let redraws = board.surface().redraws.len();

        board.add_marker(f64::NAN);

        assert_eq!(board.markers(), vec![1.0]);
        assert_eq!(board.surface().redraws.len(), redraws);
    }

    #[test]
    fn test_add_marker_redraws_with_new_count() {
        let mut board = make_board(&[1.0]);
        board.add_marker(2.0);
        assert_eq!(board.surface().redraws.last(), Some(&2));
    }

    // ── remove_marker ─────────────────────────────────────────────────────────

    #[test]
    fn test_remove_marker_releases_its_lines() {
        let mut board = make_board(&[3.0, 7.0, 12.0]);
        let lines = board.marker(7.0).unwrap().lines().to_vec();

        board.remove_marker(7.0);

        assert_eq!(board.markers(), vec![3.0, 12.0]);
        assert_eq!(board.surface().removed, lines);
        assert_eq!(board.surface().lines_at(7.0), 0);
    }

    #[test]
    fn test_remove_marker_absent_key_is_noop() {
        let mut board = make_board(&[3.0, 7.0, 12.0]);
        board.remove_marker(7.0);
        let redraws = board.surface().redraws.len();

        board.remove_marker(7.0);

        assert_eq!(board.markers(), vec![3.0, 12.0]);
        assert_eq!(board.surface().redraws.len(), redraws);
    }

    // ── Pointer down ──────────────────────────────────────────────────────────

    #[test]
    fn test_primary_down_off_markers_moves_preview() {
        let mut board = make_board(&[5.0]);

        board.handle_event(&down(MouseButton::Primary, 8.0));

        assert_eq!(board.preview_position(), 8.0);
        assert_eq!(board.interaction(), Interaction::Idle);
        assert_eq!(board.surface().lines_at(8.0), 2);
    }

    #[test]
    fn test_primary_down_on_marker_starts_drag() {
        let mut board = make_board(&[5.0]);

        board.handle_event(&down(MouseButton::Primary, 5.1));

        assert_eq!(board.interaction(), Interaction::Dragging(MarkerKey::new(5.0).unwrap()));
        assert!((board.preview_position() - 10.0).abs() < 1e-9, "preview must not move");
    }

    #[test]
    fn test_primary_down_on_marker_at_zero_starts_drag() {
        let mut board = make_board(&[0.0]);
        board.handle_event(&down(MouseButton::Primary, 0.05));
        assert_eq!(board.interaction(), Interaction::Dragging(MarkerKey::new(0.0).unwrap()));
    }

    #[test]
    fn test_primary_down_picks_nearest_of_overlapping_markers() {
        let mut board = make_board(&[5.0, 5.3]);

        board.handle_event(&down(MouseButton::Primary, 5.2));

        assert_eq!(board.interaction(), Interaction::Dragging(MarkerKey::new(5.3).unwrap()));
    }

    #[test]
    fn test_primary_down_outside_rows_is_ignored() {
        let mut board = make_board(&[]);
        let before = board.preview_position();

        board.handle_event(&BoardEvent::PointerDown(PointerEvent::outside(Some(
            MouseButton::Primary,
        ))));
        board.handle_event(&BoardEvent::PointerDown(PointerEvent::at(
            Some(MouseButton::Primary),
            AxisId(9),
            3.0,
            0.0,
        )));

        assert_eq!(board.preview_position(), before);
    }

    #[test]
    fn test_primary_down_clamps_preview_into_range() {
        let mut board = make_board(&[]);
        board.handle_event(&down(MouseButton::Primary, -7.0));
        assert_eq!(board.preview_position(), 0.0);
    }

    #[test]
    fn test_secondary_down_on_marker_deletes_it() {
        let mut board = make_board(&[3.0, 7.0]);

        board.handle_event(&down(MouseButton::Secondary, 6.9));

        assert_eq!(board.markers(), vec![3.0]);
    }

    #[test]
    fn test_secondary_down_off_markers_changes_nothing() {
        let mut board = make_board(&[3.0, 7.0]);
        let preview = board.preview_position();

        board.handle_event(&down(MouseButton::Secondary, 5.0));

        assert_eq!(board.markers(), vec![3.0, 7.0]);
        assert_eq!(board.preview_position(), preview);
    }

    #[test]
    fn test_middle_down_is_ignored() {
        let mut board = make_board(&[3.0]);
        board.handle_event(&down(MouseButton::Middle, 3.0));
        assert_eq!(board.interaction(), Interaction::Idle);
        assert_eq!(board.markers(), vec![3.0]);
    }

    // ── Dragging ──────────────────────────────────────────────────────────────

    #[test]
    fn test_drag_move_rekeys_marker_atomically() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.handle_event(&motion(9.0));

        assert_eq!(board.markers(), vec![9.0]);
        assert_eq!(board.marker_count(), 1);
        assert_eq!(board.interaction(), Interaction::Dragging(MarkerKey::new(9.0).unwrap()));
        assert_eq!(board.surface().lines_at(9.0), 2);
        assert_eq!(board.surface().lines_at(5.0), 0);
    }

    #[test]
    fn test_drag_move_clamps_to_range() {
        let mut board = make_board(&[19.0]);
        board.handle_event(&down(MouseButton::Primary, 19.0));

        board.handle_event(&motion(42.0));

        assert_eq!(board.markers(), vec![20.0]);
    }

    #[test]
    fn test_drag_onto_other_marker_merges_without_orphan_lines() {
        let mut board = make_board(&[5.0, 9.0]);
        let resting = board.marker(9.0).unwrap().lines().to_vec();
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.handle_event(&motion(9.0));

        assert_eq!(board.markers(), vec![9.0]);
        assert_eq!(board.surface().lines_at(9.0), 2);
        assert!(resting.iter().all(|l| board.surface().removed.contains(l)));
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&motion(9.0));
        assert_eq!(board.markers(), vec![5.0]);
    }

    #[test]
    fn test_drag_move_outside_rows_or_without_coordinates_is_ignored() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.handle_event(&BoardEvent::PointerMove(PointerEvent::outside(None)));
        board.handle_event(&BoardEvent::PointerMove(PointerEvent {
            button: None,
            axis: Some(AxisId(0)),
            position: None,
        }));

        assert_eq!(board.markers(), vec![5.0]);
        assert!(matches!(board.interaction(), Interaction::Dragging(_)));
    }

    #[test]
    fn test_primary_up_inside_row_ends_drag() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));
        board.handle_event(&motion(6.0));

        board.handle_event(&up(6.0));

        assert_eq!(board.interaction(), Interaction::Idle);
        assert_eq!(board.markers(), vec![6.0]);
    }

    #[test]
    fn test_primary_up_outside_rows_keeps_dragging() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.handle_event(&BoardEvent::PointerUp(PointerEvent::outside(Some(
            MouseButton::Primary,
        ))));

        assert!(matches!(board.interaction(), Interaction::Dragging(_)));
    }

    #[test]
    fn test_secondary_up_does_not_end_drag() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.handle_event(&BoardEvent::PointerUp(PointerEvent::at(
            Some(MouseButton::Secondary),
            AxisId(0),
            5.0,
            0.0,
        )));

        assert!(matches!(board.interaction(), Interaction::Dragging(_)));
    }

    #[test]
    fn test_removing_dragged_marker_returns_to_idle() {
        let mut board = make_board(&[5.0]);
        board.handle_event(&down(MouseButton::Primary, 5.0));

        board.remove_marker(5.0);

        assert_eq!(board.interaction(), Interaction::Idle);
    }

    // ── Commit key ────────────────────────────────────────────────────────────

    #[test]
    fn test_commit_key_adds_marker_at_preview() {
        let mut board = make_board(&[]);
        board.handle_event(&down(MouseButton::Primary, 4.5));

        board.handle_event(&BoardEvent::KeyPress(KeyEvent::new("b")));

        assert_eq!(board.markers(), vec![4.5]);
    }

    #[test]
    fn test_other_keys_do_not_commit() {
        let mut board = make_board(&[]);
        board.handle_event(&BoardEvent::KeyPress(KeyEvent::new("g")));
        assert!(board.markers().is_empty());
    }

    #[test]
    fn test_commit_key_is_configurable() {
        let settings = BoardSettings {
            commit_key: "enter".to_string(),
            ..BoardSettings::default()
        };
        let mut board = CursorBoard::new(
            &series_0_to_20(1),
            Vec::new(),
            RecordingSurface::default(),
            settings,
        );

        board.handle_event(&BoardEvent::KeyPress(KeyEvent::new("b")));
        board.handle_event(&BoardEvent::KeyPress(KeyEvent::new("enter")));

        assert_eq!(board.marker_count(), 1);
    }

    // ── close ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_close_releases_all_lines_and_returns_sorted_markers() {
        let mut board = make_board(&[12.0, 3.0]);
        board.add_marker(7.0);

        let closed = board.close();

        assert_eq!(closed.markers, vec![3.0, 7.0, 12.0]);
        assert!(closed.surface.lines.is_empty(), "every line must be released");
    }

    // ── Surface interaction counts (mockall) ──────────────────────────────────

    fn permissive_mock() -> MockDisplaySurface {
        let mut surface = MockDisplaySurface::new();
        let mut next_axis = 0;
        surface.expect_add_axes().returning(move |_, _| {
            next_axis += 1;
            AxisId(next_axis - 1)
        });
        surface.expect_plot_series().return_const(());
        let mut next_line = 0;
        surface.expect_add_vertical_line().returning(move |_, _, _| {
            next_line += 1;
            LineHandle(next_line)
        });
        surface.expect_data_to_pixel_x().returning(|_, x| Some(x * PX_PER_UNIT));
        surface.expect_redraw().return_const(());
        surface
    }

    #[test]
    fn test_remove_marker_calls_surface_release_once_per_row() {
        let mut surface = permissive_mock();
        surface.expect_remove_vertical_line().times(2).return_const(());
        surface.expect_move_vertical_line().never();

        let mut board = CursorBoard::new(
            &series_0_to_20(2),
            vec![6.0],
            surface,
            BoardSettings::default(),
        );
        board.remove_marker(6.0);
    }

    #[test]
    fn test_drag_step_moves_each_marker_line_once() {
        let mut surface = permissive_mock();
        surface.expect_move_vertical_line().times(3).return_const(());
        surface.expect_remove_vertical_line().never();

        let mut board = CursorBoard::new(
            &series_0_to_20(3),
            vec![6.0],
            surface,
            BoardSettings::default(),
        );
        board.handle_event(&BoardEvent::PointerDown(PointerEvent::at(
            Some(MouseButton::Primary),
            AxisId(2),
            6.0,
            0.0,
        )));
        board.handle_event(&BoardEvent::PointerMove(PointerEvent::at(None, AxisId(2), 8.0, 0.0)));
    }
}

//! Board input events.
//!
//! A display surface reports user input as one of four [`BoardEvent`]
//! variants, each with a fixed payload: which button or key, which plot row
//! (axis) the pointer was over, and the pointer position in data
//! coordinates.  Axis and position are `None` when the pointer was outside
//! every plotted area.
//!
//! # JSON form
//!
//! Events are stored in session scripts as JSON objects tagged by `"type"`:
//!
//! ```json
//! {"type":"pointer_down","button":"primary","axis":0,"position":{"x":3.2,"y":0.4}}
//! {"type":"pointer_move","axis":1,"position":{"x":3.9,"y":-1.0}}
//! {"type":"key_press","key":"b"}
//! ```

use serde::{Deserialize, Serialize};

/// Index of a plot row, as handed out by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisId(pub usize);

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    Middle,
    /// Usually the right button.
    Secondary,
}

/// A position in data coordinates (x along the shared index, y in the
/// channel's own units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Payload of the pointer variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Button pressed or released; `None` for plain motion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// Row under the pointer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisId>,
    /// Pointer position in data coordinates, if inside a row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<DataPoint>,
}

impl PointerEvent {
    /// Pointer event inside row `axis` at data position `(x, y)`.
    pub fn at(button: Option<MouseButton>, axis: AxisId, x: f64, y: f64) -> Self {
        Self {
            button,
            axis: Some(axis),
            position: Some(DataPoint { x, y }),
        }
    }

    /// Pointer event outside every plotted row.
    pub fn outside(button: Option<MouseButton>) -> Self {
        Self {
            button,
            axis: None,
            position: None,
        }
    }

    /// The data x-coordinate, if the pointer was inside a row.
    pub fn x(&self) -> Option<f64> {
        self.position.map(|p| p.x)
    }
}

/// Payload of [`BoardEvent::KeyPress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the surface, e.g. `"b"` or `"ctrl+s"`.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<DataPoint>,
}

impl KeyEvent {
    /// Key press with no pointer context.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            axis: None,
            position: None,
        }
    }
}

/// Every input a display surface can deliver to the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
    KeyPress(KeyEvent),
}

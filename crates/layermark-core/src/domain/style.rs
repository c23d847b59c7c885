//! Line styling shared by the board and the configuration file.

use serde::{Deserialize, Serialize};

/// Stroke pattern of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dashed,
}

/// Visual attributes of one rendered line.
///
/// Every field has a serde default so a config file may override only the
/// attributes it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke width in points.
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_dash")]
    pub dash: Dash,
    /// CSS-style colour, e.g. `"#ff7f0e"`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Opacity in `0.0..=1.0`.
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Drawing order; lower values are painted first (behind the data).
    #[serde(default)]
    pub z_order: i32,
}

fn default_width() -> f32 {
    1.0
}
fn default_dash() -> Dash {
    Dash::Solid
}
fn default_color() -> String {
    "#000000".to_string()
}
fn default_alpha() -> f32 {
    1.0
}

impl LineStyle {
    /// Thin solid black line used for the measurement curves.
    pub fn series() -> Self {
        Self {
            width: 0.5,
            ..Self::default()
        }
    }

    /// Thick dashed line for the uncommitted preview cursor.
    pub fn preview() -> Self {
        Self {
            width: 2.0,
            dash: Dash::Dashed,
            color: "#1f77b4".to_string(),
            alpha: 1.0,
            z_order: -100,
        }
    }

    /// Thin orange line for committed layer markers.
    pub fn marker() -> Self {
        Self {
            width: 1.0,
            dash: Dash::Solid,
            color: "#ff7f0e".to_string(),
            alpha: 0.9,
            z_order: -100,
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: default_width(),
            dash: default_dash(),
            color: default_color(),
            alpha: default_alpha(),
            z_order: 0,
        }
    }
}

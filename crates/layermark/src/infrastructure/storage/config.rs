//! TOML-based configuration for the layermark binary.
//!
//! `AppConfig` is read from the path given with `--config`, or else from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\LayerMark\config.toml`
//! - Linux:    `~/.config/layermark/config.toml`
//! - macOS:    `~/Library/Application Support/LayerMark/config.toml`
//!
//! ```toml
//! [board]
//! commit_key = "b"
//! pick_radius_px = 2.0
//!
//! [canvas]
//! width_px = 1500.0
//!
//! [style.marker]
//! color = "#d62728"
//! width = 1.5
//!
//! [logging]
//! log_level = "debug"
//! ```
//!
//! Every field is optional.  A style table that is present replaces the whole
//! role style, with unspecified attributes taking the generic line defaults.
//! Out-of-range numbers are logged and replaced by their defaults.

use std::path::{Path, PathBuf};

use layermark_core::{LineStyle, DEFAULT_PICK_RADIUS_PX};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::cursor_board::BoardSettings;
use crate::infrastructure::canvas::CanvasGeometry;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Interaction settings of the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardConfig {
    /// Key that commits the preview cursor.
    #[serde(default = "default_commit_key")]
    pub commit_key: String,
    /// Pixel tolerance for grabbing a marker line.
    #[serde(default = "default_pick_radius")]
    pub pick_radius_px: f64,
}

/// Pixel layout of the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width_px: f64,
    /// Height of each channel row.
    #[serde(default = "default_row_height")]
    pub row_height_px: f64,
    #[serde(default = "default_margin_left")]
    pub margin_left_px: f64,
    #[serde(default = "default_margin_right")]
    pub margin_right_px: f64,
}

/// Line styles per role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleConfig {
    #[serde(default = "LineStyle::series")]
    pub series: LineStyle,
    #[serde(default = "LineStyle::preview")]
    pub preview: LineStyle,
    #[serde(default = "LineStyle::marker")]
    pub marker: LineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_commit_key() -> String {
    "b".to_string()
}
fn default_pick_radius() -> f64 {
    DEFAULT_PICK_RADIUS_PX
}
fn default_width() -> f64 {
    CanvasGeometry::default().width_px
}
fn default_row_height() -> f64 {
    CanvasGeometry::default().row_height_px
}
fn default_margin_left() -> f64 {
    CanvasGeometry::default().margin_left_px
}
fn default_margin_right() -> f64 {
    CanvasGeometry::default().margin_right_px
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            commit_key: default_commit_key(),
            pick_radius_px: default_pick_radius(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width_px: default_width(),
            row_height_px: default_row_height(),
            margin_left_px: default_margin_left(),
            margin_right_px: default_margin_right(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            series: LineStyle::series(),
            preview: LineStyle::preview(),
            marker: LineStyle::marker(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl BoardConfig {
    fn sanitize(&mut self) {
        if !(self.pick_radius_px.is_finite() && self.pick_radius_px >= 0.0) {
            warn!(value = self.pick_radius_px, "invalid board.pick_radius_px, using default");
            self.pick_radius_px = default_pick_radius();
        }
    }
}

impl CanvasConfig {
    fn sanitize(&mut self) {
        if !(self.row_height_px.is_finite() && self.row_height_px > 0.0) {
            warn!(value = self.row_height_px, "invalid canvas.row_height_px, using default");
            self.row_height_px = default_row_height();
        }
        if !(self.margin_left_px.is_finite() && self.margin_left_px >= 0.0) {
            warn!(value = self.margin_left_px, "invalid canvas.margin_left_px, using default");
            self.margin_left_px = default_margin_left();
        }
        if !(self.margin_right_px.is_finite() && self.margin_right_px >= 0.0) {
            warn!(value = self.margin_right_px, "invalid canvas.margin_right_px, using default");
            self.margin_right_px = default_margin_right();
        }
        // The plot area between the margins must keep a positive width.
        let margins = self.margin_left_px + self.margin_right_px;
        if !(self.width_px.is_finite() && self.width_px > margins) {
            warn!(value = self.width_px, margins, "invalid canvas.width_px, using default");
            let fallback = default_width();
            self.width_px = if fallback > margins { fallback } else { margins + fallback };
        }
    }
}

impl AppConfig {
    /// Replaces out-of-range numeric settings with their defaults.
    fn sanitize(mut self) -> Self {
        self.board.sanitize();
        self.canvas.sanitize();
        self
    }

    /// Board settings described by the `[board]` and `[style.*]` sections.
    pub fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            commit_key: self.board.commit_key.clone(),
            pick_radius_px: self.board.pick_radius_px,
            series_style: self.style.series.clone(),
            preview_style: self.style.preview.clone(),
            marker_style: self.style.marker.clone(),
        }
    }

    pub fn canvas_geometry(&self) -> CanvasGeometry {
        CanvasGeometry {
            width_px: self.canvas.width_px,
            row_height_px: self.canvas.row_height_px,
            margin_left_px: self.canvas.margin_left_px,
            margin_right_px: self.canvas.margin_right_px,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from `path`, or from the default location when `path` is
/// `None`.
///
/// A missing file yields `AppConfig::default()`.  Without an explicit path and
/// without a platform config directory, defaults are used as well.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Ok(p) => p,
            Err(ConfigError::NoPlatformConfigDir) => return Ok(AppConfig::default()),
            Err(e) => return Err(e),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg = toml::from_str::<AppConfig>(&content)?.sanitize();
            debug!(path = %path.display(), "config loaded");
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config directory for LayerMark.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("LayerMark"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("layermark"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("LayerMark")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

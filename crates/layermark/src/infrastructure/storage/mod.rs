//! Storage infrastructure: everything LayerMark reads from or writes to disk.
//!
//! - `config` – the TOML configuration file and its defaults.
//! - `series_file` – the comma-separated input series.
//! - `marker_file` – export (and re-import) of the committed layer positions.

pub mod config;
pub mod marker_file;
pub mod series_file;

//! LayerMark entry point.
//!
//! Replays a recorded marking session against a series and exports the
//! resulting layer positions.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- TOML file or defaults
//!  └─ load_series() / read_markers()
//!  └─ CursorBoard::new(VirtualCanvas)
//!  └─ run_session(ScriptedEventSource)
//!  └─ write_markers()            -- sorted positions to CSV
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use layermark::application::cursor_board::CursorBoard;
use layermark::application::session::run_session;
use layermark::infrastructure::canvas::VirtualCanvas;
use layermark::infrastructure::event_source::ScriptedEventSource;
use layermark::infrastructure::storage::{config, marker_file, series_file};

/// Marks annual layers on a multi-channel series.
#[derive(Debug, Parser)]
#[command(
    name = "layermark",
    about = "Mark annual layers on multi-channel series",
    version
)]
struct Cli {
    /// Comma-separated series: index column followed by one column per channel.
    #[arg(long, env = "LAYERMARK_SERIES", required_unless_present = "init_config")]
    series: Option<PathBuf>,

    /// Recorded session events, one JSON object per line.
    #[arg(long, env = "LAYERMARK_EVENTS", required_unless_present = "init_config")]
    events: Option<PathBuf>,

    /// Previously exported markers to start the session with.
    #[arg(long, env = "LAYERMARK_MARKERS")]
    markers: Option<PathBuf>,

    /// Where to write the final marker positions.
    #[arg(long, default_value = "layers.csv", env = "LAYERMARK_OUTPUT")]
    output: PathBuf,

    /// Configuration file.  Defaults to the platform config directory.
    #[arg(long, env = "LAYERMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Write the default configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.log_level)),
        )
        .init();

    if cli.init_config {
        let path = match cli.config {
            Some(path) => path,
            None => config::config_file_path().context("no config path available")?,
        };
        config::save_config(&config::AppConfig::default(), &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "default configuration written");
        return Ok(());
    }

    let series_path = cli.series.context("--series is required")?;
    let events_path = cli.events.context("--events is required")?;

    let series = series_file::load_series(&series_path)
        .with_context(|| format!("failed to load series {}", series_path.display()))?;

    let initial = match cli.markers {
        Some(ref path) => marker_file::read_markers(path)
            .with_context(|| format!("failed to read markers {}", path.display()))?,
        None => Vec::new(),
    };

    let source = ScriptedEventSource::from_path(&events_path)
        .with_context(|| format!("failed to load events {}", events_path.display()))?;

    let canvas = VirtualCanvas::new(cfg.canvas_geometry());
    let board = CursorBoard::new(&series, initial, canvas, cfg.board_settings());

    let closed = run_session(board, &source).context("marking session failed")?;

    marker_file::write_markers(&cli.output, &closed.markers)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        layers = closed.markers.len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

//! Replay of recorded sessions.
//!
//! A script is a JSON Lines file: each non-blank line is one
//! [`BoardEvent`] in its tagged form, for example
//!
//! ```text
//! # place a layer at x = 12.5 and commit it
//! {"type":"pointer_down","button":"primary","axis":0,"position":{"x":12.5,"y":0.3}}
//! {"type":"key_press","key":"b"}
//! ```
//!
//! Lines starting with `#` are comments.  Starting the source sends every
//! event and then closes the channel, which ends the session as if the user
//! had closed the window after the last event.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
};

use layermark_core::BoardEvent;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::session::{EventSource, SourceError};

/// Error type for loading an event script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read event script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid event on script line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// [`EventSource`] that replays a fixed list of recorded events.
#[derive(Debug)]
pub struct ScriptedEventSource {
    events: Vec<BoardEvent>,
    stopped: AtomicBool,
}

impl ScriptedEventSource {
    pub fn new(events: Vec<BoardEvent>) -> Self {
        Self {
            events,
            stopped: AtomicBool::new(false),
        }
    }

    /// Loads a script from `path`.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let file = File::open(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            ScriptError::Io { source, .. } => ScriptError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(path = %path.display(), events = source.len(), "event script loaded");
        Ok(source)
    }

    /// Parses a script from any buffered reader.  Line numbers in errors are
    /// one-based.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ScriptError> {
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ScriptError::Io {
                path: PathBuf::new(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse {
                line: index + 1,
                source,
            })?;
            events.push(event);
        }
        Ok(Self::new(events))
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for ScriptedEventSource {
    fn start(&self) -> Result<mpsc::Receiver<BoardEvent>, SourceError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(SourceError::AlreadyStopped);
        }
        let (tx, rx) = mpsc::channel();
        for event in &self.events {
            tx.send(event.clone())
                .map_err(|e| SourceError::StartFailed(e.to_string()))?;
        }
        debug!(events = self.events.len(), "script queued");
        Ok(rx)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

//! Marking session: connects a board to an event source and runs it to close.
//!
//! A display surface delivers input through an [`EventSource`].  The board is
//! registered exactly once per session with [`EventSubscription::register`],
//! which hands back a disposer: dropping the subscription calls
//! [`EventSource::stop`], so the source is released on every exit path.
//!
//! Events are handled one at a time, to completion, on the calling thread.
//! The session ends when the source closes its channel (the user closed the
//! window or the script ran out); the board is then closed and its final
//! marker positions returned.

use std::sync::mpsc;

use layermark_core::BoardEvent;
use thiserror::Error;
use tracing::{debug, info};

use super::cursor_board::{ClosedBoard, CursorBoard, DisplaySurface};

/// Error type for event source operations.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("event source failed to start: {0}")]
    StartFailed(String),
    #[error("event source has already been stopped")]
    AlreadyStopped,
}

/// Producer of board input events.
///
/// Implementations wrap a window's event loop, a recorded script, or a test
/// harness.
pub trait EventSource {
    /// Starts delivery and returns the receiving end of the event channel.
    ///
    /// The channel disconnects when the surface is closed.
    fn start(&self) -> Result<mpsc::Receiver<BoardEvent>, SourceError>;

    /// Stops delivery and releases whatever the source holds.
    fn stop(&self);
}

/// Live registration of a board with an [`EventSource`].
///
/// Dropping the subscription stops the source.
pub struct EventSubscription<'a, E: EventSource + ?Sized> {
    source: &'a E,
    events: mpsc::Receiver<BoardEvent>,
}

impl<'a, E: EventSource + ?Sized> EventSubscription<'a, E> {
    /// Starts `source` and subscribes to its events.
    ///
    /// # Errors
    ///
    /// Returns the source's [`SourceError`] if it cannot be started.
    pub fn register(source: &'a E) -> Result<Self, SourceError> {
        let events = source.start()?;
        debug!("board handlers registered");
        Ok(Self { source, events })
    }

    /// Blocks until the next event arrives; `None` once the source has closed.
    pub fn next_event(&self) -> Option<BoardEvent> {
        self.events.recv().ok()
    }
}

impl<E: EventSource + ?Sized> Drop for EventSubscription<'_, E> {
    fn drop(&mut self) {
        self.source.stop();
        debug!("board handlers disposed");
    }
}

/// Feeds every event from `source` into `board` until the source closes,
/// then closes the board.
///
/// # Errors
///
/// Returns [`SourceError`] if the source cannot be started.  The board is
/// dropped without producing markers in that case.
pub fn run_session<S, E>(
    mut board: CursorBoard<S>,
    source: &E,
) -> Result<ClosedBoard<S>, SourceError>
where
    S: DisplaySurface,
    E: EventSource + ?Sized,
{
    let subscription = EventSubscription::register(source)?;
    info!("marking session started");

    let mut handled = 0usize;
    while let Some(event) = subscription.next_event() {
        board.handle_event(&event);
        handled += 1;
    }
    drop(subscription);

    info!(events = handled, "marking session ended");
    Ok(board.close())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

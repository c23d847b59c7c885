//! Mock event source for unit testing.
//!
//! Allows tests to inject synthetic [`BoardEvent`]s without a window.  Events
//! injected before [`EventSource::start`] are queued and delivered as soon as
//! the source starts; [`MockEventSource::close_window`] disconnects the
//! channel, which ends a running session.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use layermark_core::BoardEvent;

use crate::application::session::{EventSource, SourceError};

#[derive(Default)]
struct MockState {
    sender: Option<Sender<BoardEvent>>,
    pending: Vec<BoardEvent>,
    closed: bool,
    starts: u32,
    stops: u32,
}

/// A mock implementation of [`EventSource`] that allows tests to inject events.
#[derive(Clone, Default)]
pub struct MockEventSource {
    state: Arc<Mutex<MockState>>,
}

impl MockEventSource {
    /// Creates a new mock event source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source preloaded with `events` whose window is already
    /// closed: a session run against it handles exactly those events.
    pub fn with_events(events: impl IntoIterator<Item = BoardEvent>) -> Self {
        let source = Self::new();
        for event in events {
            source.inject_event(event);
        }
        source.close_window();
        source
    }

    /// Injects a synthetic event, as if produced by the window.
    ///
    /// Before `start()` the event is queued; after `close_window()` it is
    /// discarded.
    pub fn inject_event(&self, event: BoardEvent) {
        let mut state = self.state.lock().expect("lock poisoned");
        if state.closed {
            return;
        }
        match state.sender {
            Some(ref sender) => {
                // A dropped receiver means the session already ended.
                let _ = sender.send(event);
            }
            None => state.pending.push(event),
        }
    }

    /// Simulates the user closing the window.
    pub fn close_window(&self) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.closed = true;
        state.sender = None;
    }

    /// Returns how many times `start()` succeeded.
    pub fn start_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").starts
    }

    /// Returns how many times `stop()` was called.
    pub fn stop_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").stops
    }
}

impl EventSource for MockEventSource {
    fn start(&self) -> Result<mpsc::Receiver<BoardEvent>, SourceError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if state.stops > 0 {
            return Err(SourceError::AlreadyStopped);
        }

        let (tx, rx) = mpsc::channel();
        for event in state.pending.drain(..) {
            let _ = tx.send(event);
        }
        if !state.closed {
            state.sender = Some(tx);
        }
        state.starts += 1;
        Ok(rx)
    }

    fn stop(&self) {
        let mut state = self.state.lock().expect("lock poisoned");
        // Drop the sender to close the channel
        state.sender = None;
        state.stops += 1;
    }
}

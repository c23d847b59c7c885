//! Event source adapters.
//!
//! Both sources implement [`EventSource`](crate::application::session::EventSource):
//!
//! - [`script::ScriptedEventSource`] replays a recorded session from a JSON
//!   Lines file, one [`BoardEvent`](layermark_core::BoardEvent) per line.
//! - [`mock::MockEventSource`] lets tests inject events by hand and close the
//!   window when they are done.

pub mod mock;
pub mod script;

pub use mock::MockEventSource;
pub use script::{ScriptError, ScriptedEventSource};

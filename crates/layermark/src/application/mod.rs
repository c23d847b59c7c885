//! Application layer of LayerMark.
//!
//! Sits between the domain (`layermark_core`) and the infrastructure
//! (canvas, event sources, files).  Code here depends on traits only:
//!
//! - **`cursor_board`** – the [`CursorBoard`](cursor_board::CursorBoard)
//!   state machine and the [`DisplaySurface`](cursor_board::DisplaySurface)
//!   trait it draws through.  Every pointer and key event of a session passes
//!   through this module.
//!
//! - **`session`** – registers a board with an
//!   [`EventSource`](session::EventSource), drains its events until the
//!   source closes, and returns the final marker positions.

pub mod cursor_board;
pub mod session;

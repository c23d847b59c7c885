//! Infrastructure layer for the layermark application.
//!
//! Contains the adapters around the board: the in-memory canvas that
//! implements `DisplaySurface`, the event sources, and file storage for the
//! configuration, the input series, and the marker export.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `layermark_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod canvas;
pub mod event_source;
pub mod storage;

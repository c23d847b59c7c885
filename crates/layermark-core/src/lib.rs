//! # layermark-core
//!
//! Shared library for LayerMark containing the domain entities and the input
//! event model.
//!
//! LayerMark lets a user mark annual layer boundaries on a multi-channel core
//! series (ice-core isotopes, sediment chemistry, ...) by clicking on stacked
//! line plots.  This crate holds everything about that task that does not
//! touch a screen or a file:
//!
//! - **`domain`** – the validated input [`Series`], the ordered [`MarkerSet`]
//!   keyed by x-position, the pixel hit-test rule, and line styles.
//!
//! - **`event`** – the tagged [`BoardEvent`] a display surface delivers for
//!   each pointer or key input.
//!
//! It has no dependency on rendering backends, OS APIs, or the file system.

pub mod domain;
pub mod event;

pub use domain::hit_test::{pick_nearest, HitCandidate, DEFAULT_PICK_RADIUS_PX};
pub use domain::marker::{MarkerKey, MarkerSet, Rekey};
pub use domain::series::{Channel, DataRange, Series, SeriesError};
pub use domain::style::{Dash, LineStyle};
pub use event::messages::{AxisId, BoardEvent, DataPoint, KeyEvent, MouseButton, PointerEvent};

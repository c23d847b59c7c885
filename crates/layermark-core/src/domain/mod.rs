//! Domain entities for LayerMark.
//!
//! Pure data and rules with no I/O and no rendering: the input [`series`],
//! the ordered [`marker`] set, the [`hit_test`] rule for picking a marker
//! line under the pointer, and the [`style`] of rendered lines.
//!
//! Outer layers (the board, file storage, the CLI) depend on this module;
//! it depends on none of them.

pub mod marker;
pub mod series;
pub mod style;

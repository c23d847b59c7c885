//! Input event model shared by every display surface and the board.

pub mod messages;

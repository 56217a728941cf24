//! Rendering layer.  Everything that touches Ratatui widgets lives here.
//!
//! Drawing is a pure function of the state it is handed; no network or
//! clipboard I/O happens in this layer.

pub mod layout;
pub mod screen;
pub mod theme;

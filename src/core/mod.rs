//! Reading-list items and page geometry.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod item;
pub mod layout;

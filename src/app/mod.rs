//! Application orchestration: selection state, input dispatch, the pure
//! update step, and the event loop that drives them.

pub mod controller;
pub mod input;
pub mod state;
pub mod terminal;
pub mod update;

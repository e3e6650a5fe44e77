//! Core engine – timing, drivers, highlight, and the autoscroll state machine.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The outside
//! world is reached only through the traits in [`surface`].

pub mod document;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod scheduler;
pub mod speed;
pub mod surface;
pub mod timing;

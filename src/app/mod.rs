//! Application orchestration — state, event loop, and input handling around
//! the core engine.

pub mod event;
pub mod handler;
pub mod page;
pub mod runtime;
pub mod state;
pub mod wake;

//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer turns the page and engine state into cells on the terminal.
//! It never mutates the engine.

pub mod layout;
pub mod prompter_widget;
pub mod status;
pub mod theme;

//! Central application state.
//!
//! All mutable state lives here so that rendering is a pure function over
//! `&AppState` and event handling a function over `&mut AppState`.

use crate::config::AppConfig;
use crate::core::engine::Autoscroll;

use super::page::Page;
use super::wake::SystemWakeLock;

/// The engine as hosted by the terminal app.
pub type Engine = Autoscroll<Page, SystemWakeLock>;

/// Top-level application state.
pub struct AppState {
    pub engine: Engine,
    pub config: AppConfig,
    /// Shown in the text pane's border.
    pub title: String,
    /// An optional status message shown in the bottom bar; cleared on the
    /// next key press.
    pub status_message: Option<String>,
    /// Whether the terminal currently has focus.  Drawing is skipped while
    /// hidden.
    pub visible: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(engine: Engine, config: AppConfig, title: String) -> Self {
        Self {
            engine,
            config,
            title,
            status_message: None,
            visible: true,
            should_quit: false,
        }
    }
}

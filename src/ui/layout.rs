//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Columns reserved left of the text for the reading-line cue.
pub const CUE_GUTTER: u16 = 2;

/// Primary screen layout with the script pane and a bottom status bar.
pub struct AppLayout {
    pub text_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // script pane
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            text_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Split a pane interior into the cue gutter and the text columns.
pub fn split_gutter(inner: Rect) -> (Rect, Rect) {
    let gutter = CUE_GUTTER.min(inner.width);
    let cue = Rect::new(inner.x, inner.y, gutter, inner.height);
    let text = Rect::new(inner.x + gutter, inner.y, inner.width - gutter, inner.height);
    (cue, text)
}

/// Row of the reading line (the viewport center), relative to the pane top.
pub fn center_row(height: u16) -> u16 {
    height / 2
}

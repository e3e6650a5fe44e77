//! The text pane as seen by the engine.
//!
//! A [`Page`] holds the loaded document wrapped to the pane width and a
//! scroll offset in logical pixels (`px_per_row` per text row).  Pixels give
//! slow speeds sub-row precision; the renderer shows whole rows.

use crate::core::document::{BlockKind, Document, Layout, Row};
use crate::core::surface::{BlockId, ContentBlocks, Rect, ScrollSurface, ViewportGeometry};

#[derive(Debug, Clone)]
pub struct Page {
    document: Option<Document>,
    layout: Layout,
    /// Wrap width in columns.
    width: u16,
    /// Visible rows.
    height: u16,
    px_per_row: f64,
    lead_in: bool,
    scroll_top: f64,
    marked: Option<usize>,
}

impl Page {
    pub fn new(px_per_row: f64, lead_in: bool) -> Self {
        Self {
            document: None,
            layout: Layout::default(),
            width: 0,
            height: 0,
            px_per_row,
            lead_in,
            scroll_top: 0.0,
            marked: None,
        }
    }

    /// Replace the document.  Scroll returns to the top.
    pub fn load(&mut self, document: Document) {
        self.document = Some(document);
        self.scroll_top = 0.0;
        self.marked = None;
        self.relayout();
    }

    /// Re-wrap for a new pane size, keeping the text on the reading line (the
    /// pane center) in place.  Returns `true` when the layout changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        let anchor = self.reading_anchor();
        self.width = width;
        self.height = height;
        self.relayout();
        if let Some((block, fraction)) = anchor {
            self.restore_anchor(block, fraction);
        }
        true
    }

    /// Block under the reading line and how far into it, in `[0, 1]`.  `None`
    /// at the very top, which stays the top across a resize.
    fn reading_anchor(&self) -> Option<(usize, f64)> {
        if !self.attached() || self.scroll_top <= 0.0 {
            return None;
        }
        let center = self.scroll_top / self.px_per_row + f64::from(self.height) / 2.0;
        let (block, span) = self
            .layout
            .spans
            .iter()
            .enumerate()
            .rev()
            .find(|(_, span)| span.first_row as f64 <= center)?;
        let fraction = (center - span.first_row as f64) / span.row_count as f64;
        Some((block, fraction.clamp(0.0, 1.0)))
    }

    fn restore_anchor(&mut self, block: usize, fraction: f64) {
        if !self.attached() {
            return;
        }
        let Some(span) = self.layout.spans.get(block) else {
            return;
        };
        let center = span.first_row as f64 + fraction * span.row_count as f64;
        let top = (center - f64::from(self.height) / 2.0) * self.px_per_row;
        self.set_scroll_offset(top);
    }

    fn relayout(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let lead_in = if self.lead_in {
            usize::from(self.height / 2)
        } else {
            0
        };
        self.layout = Layout::build(doc, usize::from(self.width), lead_in);
        let max = self.max_scroll_top().max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, max);
    }

    fn attached(&self) -> bool {
        self.document.is_some() && self.width > 0 && self.height > 0
    }

    fn max_scroll_top(&self) -> f64 {
        (self.layout.row_count() as f64 - f64::from(self.height)) * self.px_per_row
    }

    #[cfg(test)]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// First row shown at the top of the pane.
    pub fn first_visible_row(&self) -> usize {
        (self.scroll_top / self.px_per_row).floor().max(0.0) as usize
    }

    /// Rows currently inside the pane, top to bottom.
    pub fn visible_rows(&self) -> &[Row] {
        let start = self.first_visible_row().min(self.layout.rows.len());
        let end = (start + usize::from(self.height)).min(self.layout.rows.len());
        &self.layout.rows[start..end]
    }

    pub fn block_kind(&self, block: usize) -> Option<BlockKind> {
        self.layout.spans.get(block).map(|s| s.kind)
    }

    pub fn block_count(&self) -> usize {
        self.layout.spans.len()
    }

    /// Block carrying the highlight marker.
    pub fn marked(&self) -> Option<usize> {
        self.marked
    }

    /// Scroll progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let max = self.max_scroll_top();
        if max <= 0.0 {
            return 0.0;
        }
        (self.scroll_top / max).clamp(0.0, 1.0)
    }
}

impl ScrollSurface for Page {
    fn geometry(&self) -> Option<ViewportGeometry> {
        if !self.attached() {
            return None;
        }
        let client_height = f64::from(self.height) * self.px_per_row;
        Some(ViewportGeometry {
            rect: Rect::new(0.0, client_height),
            scroll_top: self.scroll_top,
            scroll_height: self.layout.row_count() as f64 * self.px_per_row,
            client_height,
        })
    }

    fn set_scroll_offset(&mut self, offset_px: f64) {
        let max = self.max_scroll_top().max(0.0);
        self.scroll_top = offset_px.clamp(0.0, max);
    }
}

impl ContentBlocks for Page {
    fn block_rects(&self) -> Vec<(BlockId, Rect)> {
        if !self.attached() {
            return Vec::new();
        }
        self.layout
            .spans
            .iter()
            .enumerate()
            .map(|(i, span)| {
                let top = span.first_row as f64 * self.px_per_row - self.scroll_top;
                let height = span.row_count as f64 * self.px_per_row;
                (BlockId(i), Rect::new(top, height))
            })
            .collect()
    }

    fn set_marked(&mut self, id: BlockId, marked: bool) {
        if id.0 >= self.layout.spans.len() {
            return;
        }
        if marked {
            self.marked = Some(id.0);
        } else if self.marked == Some(id.0) {
            self.marked = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str, width: u16, height: u16) -> Page {
        let mut page = Page::new(10.0, false);
        page.load(Document::parse(text));
        page.resize(width, height);
        page
    }

    #[test]
    fn detached_until_loaded_and_sized() {
        let mut page = Page::new(10.0, true);
        assert!(page.geometry().is_none());
        page.load(Document::parse("hello"));
        assert!(page.geometry().is_none());
        page.resize(20, 4);
        assert!(page.geometry().is_some());
    }

    #[test]
    fn geometry_is_in_pixels() {
        // Three one-row blocks separated by blanks → 5 rows.
        let page = page("a\n\nb\n\nc", 10, 2);
        let geo = page.geometry().unwrap();
        assert_eq!(geo.scroll_height, 50.0);
        assert_eq!(geo.client_height, 20.0);
        assert_eq!(geo.max_scroll_top(), 30.0);
    }

    #[test]
    fn block_rects_move_with_scroll() {
        let mut page = page("a\n\nb\n\nc", 10, 2);
        page.set_scroll_offset(15.0);
        let rects = page.block_rects();
        assert_eq!(rects[1], (BlockId(1), Rect::new(5.0, 10.0)));
        assert_eq!(page.first_visible_row(), 1);
        assert_eq!(page.visible_rows()[1].text, "b");
    }

    #[test]
    fn offset_is_clamped() {
        let mut page = page("a\n\nb\n\nc", 10, 2);
        page.set_scroll_offset(1_000.0);
        assert_eq!(page.scroll_top(), 30.0);
        assert_eq!(page.progress(), 1.0);
        page.set_scroll_offset(-5.0);
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn lead_in_pads_half_a_viewport() {
        let mut page = Page::new(10.0, true);
        page.load(Document::parse("only line"));
        page.resize(20, 6);
        // 3 + 1 + 3 rows
        assert_eq!(page.geometry().unwrap().scroll_height, 70.0);
        assert_eq!(page.block_rects()[0].1, Rect::new(30.0, 10.0));
    }

    #[test]
    fn single_marker() {
        let mut page = page("a\n\nb", 10, 2);
        page.set_marked(BlockId(0), true);
        page.set_marked(BlockId(1), true);
        assert_eq!(page.marked(), Some(1));
        // Unmarking a block that is not marked leaves the marker alone.
        page.set_marked(BlockId(0), false);
        assert_eq!(page.marked(), Some(1));
        page.set_marked(BlockId(7), true);
        assert_eq!(page.marked(), Some(1));
    }

    #[test]
    fn resize_keeps_the_reading_line_on_the_same_block() {
        // one, _, two, _, three, _, four
        let mut page = page("one\n\ntwo\n\nthree\n\nfour", 10, 2);
        page.set_scroll_offset(30.0);
        // Pane center at row 4: "three".
        assert!(page.resize(10, 4));
        assert_eq!(page.scroll_top(), 20.0);
        assert_eq!(page.visible_rows()[2].text, "three");
        assert!(!page.resize(10, 4));
    }

    #[test]
    fn resize_at_the_top_stays_at_the_top() {
        let mut page = page("one\n\ntwo\n\nthree\n\nfour", 10, 2);
        page.resize(10, 3);
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn shrinking_keeps_offset_in_range() {
        let mut page = page("one two three four five six", 30, 1);
        page.resize(4, 1);
        page.set_scroll_offset(40.0);
        page.resize(30, 1);
        assert_eq!(page.scroll_top(), 0.0);
    }
}

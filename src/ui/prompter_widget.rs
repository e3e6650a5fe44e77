//! Ratatui widget that renders the visible slice of a [`Page`], with the
//! highlighted block emphasised and a cue marking the reading line.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::page::Page;
use crate::core::document::BlockKind;

use super::layout::{center_row, split_gutter};
use super::theme::Theme;

const CUE: &str = "▶";

pub struct PrompterWidget<'a> {
    page: &'a Page,
    block: Option<Block<'a>>,
}

impl<'a> PrompterWidget<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for PrompterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (cue_area, text_area) = split_gutter(inner);
        let marked = self.page.marked();

        for (i, row) in self.page.visible_rows().iter().enumerate() {
            let y = text_area.y + i as u16;
            if y >= text_area.bottom() {
                break;
            }
            let style = match row.block {
                Some(b) if Some(b) == marked => Theme::highlight_style(),
                Some(b) => match self.page.block_kind(b) {
                    Some(BlockKind::Heading(_)) => Theme::heading_style(),
                    _ => Theme::text_style(),
                },
                None => Theme::text_style(),
            };
            let line = Line::from(Span::styled(row.text.as_str(), style));
            buf.set_line(text_area.x, y, &line, text_area.width);
        }

        if cue_area.width > 0 {
            let y = cue_area.y + center_row(cue_area.height);
            buf.set_string(cue_area.x, y, CUE, Theme::cue_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;
    use crate::core::surface::{BlockId, ContentBlocks, ScrollSurface};
    use ratatui::style::Modifier;

    fn page(text: &str, width: u16, height: u16) -> Page {
        let mut page = Page::new(10.0, false);
        page.load(Document::parse(text));
        page.resize(width, height);
        page
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn draws_visible_rows_after_gutter() {
        let page = page("one\n\ntwo\n\nthree", 10, 3);
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        PrompterWidget::new(&page).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "  one       ");
        assert_eq!(row_text(&buf, 2), "  two       ");
    }

    #[test]
    fn follows_scroll_offset() {
        let mut page = page("one\n\ntwo\n\nthree", 10, 3);
        page.set_scroll_offset(20.0);
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        PrompterWidget::new(&page).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "  two       ");
        assert_eq!(row_text(&buf, 1), "▶           ");
        assert_eq!(row_text(&buf, 2), "  three     ");
    }

    #[test]
    fn marked_block_is_emphasised() {
        let mut page = page("# Title\n\nbody", 10, 3);
        page.set_marked(BlockId(1), true);
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        PrompterWidget::new(&page).render(area, &mut buf);

        assert_eq!(buf[(2, 0)].fg, Theme::heading_style().fg.unwrap_or_default());
        assert!(buf[(2, 2)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(2, 2)].fg, Theme::highlight_style().fg.unwrap_or_default());
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let page = page("text", 10, 3);
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        PrompterWidget::new(&page).render(area, &mut buf);
    }
}

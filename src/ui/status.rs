//! Bottom status bar: play state, speed, progress, and hints or messages.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::state::AppState;

use super::theme::Theme;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let engine = &self.state.engine;
        let badge = if engine.is_playing() {
            Span::styled(" PLAYING ", Theme::playing_badge_style())
        } else {
            Span::styled(" PAUSED ", Theme::paused_badge_style())
        };

        let mut spans = vec![
            badge,
            Span::raw(format!(
                " {} px/s [{}/{}] · {:>3}%",
                engine.speed_px_per_sec(),
                engine.speed_level() + 1,
                engine.speed_levels().len(),
                (engine.page().progress() * 100.0).round() as u32,
            )),
        ];
        if let Some(block) = engine.highlighted() {
            spans.push(Span::raw(format!(
                " · block {}/{}",
                block.0 + 1,
                engine.page().block_count()
            )));
        }
        if engine.wake().is_held() {
            spans.push(Span::raw(" · awake"));
        }
        spans.push(Span::raw("  "));

        match &self.state.status_message {
            Some(message) => spans.push(Span::styled(message.clone(), Theme::message_style())),
            None => spans.push(Span::raw(self.state.config.status_bar_hint())),
        }
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(self.spans()))
            .style(Theme::status_bar_style())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::Page;
    use crate::app::wake::SystemWakeLock;
    use crate::config::AppConfig;
    use crate::core::document::Document;
    use crate::core::engine::Autoscroll;

    fn state() -> AppState {
        state_with("hello")
    }

    fn state_with(text: &str) -> AppState {
        let config = AppConfig::default();
        let mut page = Page::new(config.px_per_row, false);
        page.load(Document::parse(text));
        page.resize(20, 5);
        let engine = Autoscroll::new(page, SystemWakeLock::new(false), config.speed_levels.clone());
        AppState::new(engine, config, "t".into())
    }

    fn rendered(state: &AppState) -> String {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(state).render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn shows_state_speed_and_hint() {
        let state = state();
        let text = rendered(&state);
        assert!(text.starts_with(" PAUSED  50 px/s [3/5] ·   0%"));
        assert!(text.contains("Space play/pause"));
    }

    #[test]
    fn playing_shows_the_highlighted_block() {
        let script: String = (0..20).map(|i| format!("line {i}\n\n")).collect();
        let mut state = state_with(&script);
        state.engine.start(0.0).unwrap();
        let text = rendered(&state);
        assert!(text.starts_with(" PLAYING "));
        assert!(text.contains("block 2/20"));
    }

    #[test]
    fn message_replaces_hint() {
        let mut state = state();
        state.status_message = Some("nothing to scroll".into());
        let text = rendered(&state);
        assert!(text.contains("nothing to scroll"));
        assert!(!text.contains("play/pause"));
    }
}

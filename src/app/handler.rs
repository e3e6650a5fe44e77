//! Input handling — maps key/mouse/focus events to engine commands.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tracing::debug;

use crate::config::Action;
use crate::core::error::StartRefused;
use crate::core::surface::ScrollSurface;

use super::event::AppEvent;
use super::state::AppState;

/// Rows moved per mouse-wheel notch.
const WHEEL_ROWS: f64 = 3.0;

/// Fraction of the viewport moved by PageUp/PageDown.
const PAGE_FRACTION: f64 = 0.8;

/// Dispatch one event.  `now_ms` is the engine clock at delivery.
pub fn handle_event(state: &mut AppState, event: AppEvent, now_ms: f64) {
    match event {
        AppEvent::Key(k) => handle_key(state, k, now_ms),
        AppEvent::Mouse(m) => handle_mouse(state, m),
        AppEvent::Visibility(visible) => {
            debug!(visible, "visibility changed");
            state.visible = visible;
            state.engine.set_visible(visible, now_ms);
        }
        AppEvent::Resize | AppEvent::Tick => {}
    }
}

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now_ms: f64) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    state.status_message = None;

    let Some(action) = state.config.match_key(key) else {
        // Digits pick a speed level directly.
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let index = c as usize - '1' as usize;
            if state.engine.set_speed_level(index, now_ms) {
                report_speed(state);
            }
        }
        return;
    };

    debug!(?action, "key action");
    match action {
        Action::Quit => state.should_quit = true,
        Action::TogglePlay => {
            let result = state.engine.toggle(now_ms);
            report_start(state, result);
        }
        Action::Play => {
            let result = state.engine.start(now_ms);
            report_start(state, result);
        }
        Action::Pause => state.engine.stop(),
        Action::Faster => {
            if state.engine.increase_speed(now_ms) {
                report_speed(state);
            } else {
                state.status_message = Some("Already at the fastest speed".into());
            }
        }
        Action::Slower => {
            if state.engine.decrease_speed(now_ms) {
                report_speed(state);
            } else {
                state.status_message = Some("Already at the slowest speed".into());
            }
        }
        Action::Reset => state.engine.reset(),
        Action::ScrollUp => page_scroll(state, -1.0),
        Action::ScrollDown => page_scroll(state, 1.0),
    }
}

/// Mouse wheel scrolls manually, subject to the manual-scroll policy.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let direction = match mouse.kind {
        MouseEventKind::ScrollDown => 1.0,
        MouseEventKind::ScrollUp => -1.0,
        _ => return,
    };
    let delta = direction * WHEEL_ROWS * state.config.px_per_row;
    state.engine.manual_scroll(delta, state.config.manual_scroll);
}

fn page_scroll(state: &mut AppState, direction: f64) {
    let Some(geo) = state.engine.page().geometry() else {
        return;
    };
    let delta = direction * geo.client_height * PAGE_FRACTION;
    state.engine.manual_scroll(delta, state.config.manual_scroll);
}

/// Surface a refused start in the status bar.
pub fn report_start(state: &mut AppState, result: Result<(), StartRefused>) {
    if let Err(refused) = result {
        state.status_message = Some(refused.to_string());
    }
}

fn report_speed(state: &mut AppState) {
    let levels = state.engine.speed_levels().len();
    state.status_message = Some(format!(
        "Speed {} px/s ({}/{})",
        state.engine.speed_px_per_sec(),
        state.engine.speed_level() + 1,
        levels
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::Page;
    use crate::app::wake::SystemWakeLock;
    use crate::config::AppConfig;
    use crate::core::document::Document;
    use crate::core::engine::{Autoscroll, ManualScrollPolicy};
    use crate::core::scheduler::Driver;

    fn state_with(text: &str, rows: u16) -> AppState {
        let config = AppConfig::default();
        let mut page = Page::new(config.px_per_row, false);
        page.load(Document::parse(text));
        page.resize(40, rows);
        let engine = Autoscroll::new(page, SystemWakeLock::new(false), config.speed_levels.clone());
        AppState::new(engine, config, "test".into())
    }

    fn long_script() -> String {
        (0..40).map(|i| format!("Line number {i}.\n\n")).collect()
    }

    fn press(state: &mut AppState, code: KeyCode, now_ms: f64) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE), now_ms);
    }

    #[test]
    fn space_toggles_playback() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::Char(' '), 0.0);
        assert!(state.engine.is_playing());
        press(&mut state, KeyCode::Char(' '), 100.0);
        assert!(!state.engine.is_playing());
    }

    #[test]
    fn refused_start_is_reported() {
        let mut state = state_with("short", 10);
        press(&mut state, KeyCode::Char(' '), 0.0);
        assert!(!state.engine.is_playing());
        let message = state.status_message.as_deref().unwrap_or_default();
        assert!(message.starts_with("nothing to scroll"));
    }

    #[test]
    fn arrows_step_speed_and_report_bounds() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::Up, 0.0);
        assert_eq!(state.engine.speed_px_per_sec(), 75.0);
        assert_eq!(state.status_message.as_deref(), Some("Speed 75 px/s (4/5)"));
        press(&mut state, KeyCode::Up, 0.0);
        press(&mut state, KeyCode::Up, 0.0);
        assert_eq!(state.status_message.as_deref(), Some("Already at the fastest speed"));
        press(&mut state, KeyCode::Down, 0.0);
        assert_eq!(state.engine.speed_px_per_sec(), 75.0);
    }

    #[test]
    fn digits_select_levels() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::Char('1'), 0.0);
        assert_eq!(state.engine.speed_px_per_sec(), 10.0);
        press(&mut state, KeyCode::Char('9'), 0.0);
        assert_eq!(state.engine.speed_level(), 0);
    }

    #[test]
    fn reset_key_stops_and_rewinds() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::Char('p'), 0.0);
        state.engine.tick(Driver::Watchdog, 3_000.0);
        assert!(state.engine.page().scroll_top() > 0.0);
        press(&mut state, KeyCode::Char('r'), 3_100.0);
        assert!(!state.engine.is_playing());
        assert_eq!(state.engine.page().scroll_top(), 0.0);
    }

    #[test]
    fn focus_loss_suspends_frame_driver() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::Char('p'), 0.0);
        handle_event(&mut state, AppEvent::Visibility(false), 500.0);
        assert!(!state.visible);
        assert!(!state.engine.schedulers().should_fire(Driver::Frame));
        assert!(state.engine.schedulers().should_fire(Driver::Watchdog));
        handle_event(&mut state, AppEvent::Visibility(true), 2_000.0);
        assert_eq!(state.engine.page().scroll_top(), 100.0);
    }

    #[test]
    fn page_down_obeys_manual_scroll_policy() {
        let mut state = state_with(&long_script(), 10);
        press(&mut state, KeyCode::PageDown, 0.0);
        let idle_offset = state.engine.page().scroll_top();
        assert!(idle_offset > 0.0);

        press(&mut state, KeyCode::Char('p'), 0.0);
        press(&mut state, KeyCode::PageDown, 10.0);
        assert!(state.engine.is_playing());

        state.config.manual_scroll = ManualScrollPolicy::Cancel;
        press(&mut state, KeyCode::PageDown, 20.0);
        assert!(!state.engine.is_playing());
        assert!(state.engine.page().scroll_top() > idle_offset);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut state = state_with("x", 4);
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            0.0,
        );
        assert!(state.should_quit);
    }
}

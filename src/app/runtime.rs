//! The main loop: terminal events, the two tick drivers, and the highlight
//! refresher multiplexed with `tokio::select!`.
//!
//! The drivers are plain tokio intervals.  Their select branches carry the
//! engine's arm state as a precondition, so once `stop` has returned no
//! branch for a disarmed driver is polled again.

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders},
    Frame, Terminal,
};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::engine::TickOutcome;
use crate::core::scheduler::Driver;
use crate::core::timing::Clock;
use crate::ui::{
    layout::{split_gutter, AppLayout},
    prompter_widget::PrompterWidget,
    status::StatusBar,
    theme::Theme,
};

use super::event::{spawn_event_reader, AppEvent};
use super::handler;
use super::state::AppState;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Poll window for the blocking terminal reader.
const EVENT_POLL: Duration = Duration::from_millis(250);

fn driver_interval(period: Duration) -> Interval {
    let mut timer = interval(period);
    // A late driver catches up in one tick; the offset comes from the clock.
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Run until the user quits.  With `autoplay`, playback starts right after
/// the first frame has laid the page out.
pub async fn run(terminal: &mut Tui, state: &mut AppState, autoplay: bool) -> Result<()> {
    let clock = Clock::start();
    let cadence = state.config.cadence();
    debug!(?cadence, "driver cadence");

    let mut events = spawn_event_reader(EVENT_POLL);
    let mut frame = driver_interval(cadence.frame);
    let mut watchdog = driver_interval(cadence.watchdog);
    let mut highlight = driver_interval(cadence.highlight);

    terminal.draw(|f| draw(f, state, clock.now_ms()))?;
    if autoplay {
        let result = state.engine.start(clock.now_ms());
        handler::report_start(state, result);
    }

    let mut needs_draw = true;
    loop {
        if needs_draw && state.visible {
            terminal.draw(|f| draw(f, state, clock.now_ms()))?;
        }
        needs_draw = false;

        tokio::select! {
            biased;

            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                needs_draw = !matches!(event, AppEvent::Tick);
                handler::handle_event(state, event, clock.now_ms());
            }

            _ = frame.tick(), if state.engine.schedulers().should_fire(Driver::Frame) => {
                let outcome = state.engine.tick(Driver::Frame, clock.now_ms());
                needs_draw = outcome != TickOutcome::Skipped;
            }

            _ = watchdog.tick(), if state.engine.schedulers().should_fire(Driver::Watchdog) => {
                let outcome = state.engine.tick(Driver::Watchdog, clock.now_ms());
                // The frame driver draws while visible; the watchdog only
                // redraws for the end of playback.
                needs_draw = outcome == TickOutcome::Finished;
            }

            _ = highlight.tick(), if state.engine.is_playing() => {
                state.engine.refresh_highlight();
                if state.engine.wake_mut().check_exited() {
                    needs_draw = true;
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    state.engine.stop();
    info!("quitting");
    Ok(())
}

/// Lay the page out for the current terminal size and render everything.
fn draw(frame: &mut Frame, state: &mut AppState, now_ms: f64) {
    let layout = AppLayout::from_area(frame.area());

    let pane = Block::default()
        .title(format!(" {} ", state.title))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());

    let (_, text) = split_gutter(pane.inner(layout.text_area));
    if state.engine.page_mut().resize(text.width, text.height) {
        state.engine.reanchor(now_ms);
    }

    frame.render_widget(
        PrompterWidget::new(state.engine.page()).block(pane),
        layout.text_area,
    );
    frame.render_widget(StatusBar::new(state), layout.status_area);
}

//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a blocking reader that
//! forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Terminal focus changed; stands in for page visibility.
    Visibility(bool),
    Tick,
}

/// Spawns a blocking task that polls the terminal for events and sends them
/// through the returned channel.  The task exits once the receiver is gone.
pub fn spawn_event_reader(poll_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        let has_event = event::poll(poll_rate).unwrap_or(false);
        let app_event = if has_event {
            match event::read() {
                Ok(CtEvent::Key(k)) => AppEvent::Key(k),
                Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(CtEvent::FocusGained) => AppEvent::Visibility(true),
                Ok(CtEvent::FocusLost) => AppEvent::Visibility(false),
                _ => continue,
            }
        } else {
            // Nothing within the poll window; the tick also tells us when
            // the receiver has been dropped.
            AppEvent::Tick
        };
        if tx.send(app_event).is_err() {
            break;
        }
    });

    rx
}

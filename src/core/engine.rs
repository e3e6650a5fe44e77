//! Autoscroll state machine.
//!
//! [`Autoscroll`] owns the playback state, the current scroll origin, the
//! highlight, and the arm flag of the driver pair.  The page (scroll surface
//! + content blocks) and the wake lock are injected.  Time is always passed
//! in as `now_ms` so every transition is deterministic.
//!
//! States are `Idle` and `Playing` (`is_playing`).  Reaching the end of the
//! content is not terminal: it is absorbed as an ordinary stop, and the next
//! start wraps back to the top.

use tracing::{debug, info, warn};

use super::error::StartRefused;
use super::highlight::HighlightState;
use super::scheduler::{Driver, SchedulerPair};
use super::speed::SpeedLevels;
use super::surface::{BlockId, ContentBlocks, ScrollSurface, WakeLock};
use super::timing::{compute_target_offset, ScrollOrigin};

/// Mutable playback bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Sole authority for whether the drivers are armed.
    pub is_playing: bool,
    pub speed_px_per_sec: f64,
    pub speed_level_index: usize,
    /// `None` means "resynchronise, do not assume continuity".  Advisory
    /// only: offsets never depend on it.
    pub last_tick_ms: Option<f64>,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not playing, driver not armed, or nothing attached.
    Skipped,
    /// Scroll offset written.
    Advanced { offset_px: f64 },
    /// End of content reached; playback stopped.
    Finished,
}

/// What manual scroll input does while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManualScrollPolicy {
    /// Drop manual input; the autoscroll keeps ownership of the offset.
    #[default]
    Ignore,
    /// Stop playback, then apply the manual scroll.
    Cancel,
}

impl ManualScrollPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Some(Self::Ignore),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Cancel => "cancel",
        }
    }
}

/// The autoscroll & highlight engine.
pub struct Autoscroll<P, W> {
    page: P,
    wake: W,
    speeds: SpeedLevels,
    playback: PlaybackState,
    origin: Option<ScrollOrigin>,
    highlight: HighlightState,
    schedulers: SchedulerPair,
    wake_held: bool,
}

impl<P, W> Autoscroll<P, W>
where
    P: ScrollSurface + ContentBlocks,
    W: WakeLock,
{
    pub fn new(page: P, wake: W, speeds: SpeedLevels) -> Self {
        let playback = PlaybackState {
            is_playing: false,
            speed_px_per_sec: speeds.current(),
            speed_level_index: speeds.index(),
            last_tick_ms: None,
        };
        Self {
            page,
            wake,
            speeds,
            playback,
            origin: None,
            highlight: HighlightState::default(),
            schedulers: SchedulerPair::default(),
            wake_held: false,
        }
    }

    /// Start at the level closest to `speed_px_per_sec`.
    pub fn with_initial_speed(mut self, speed_px_per_sec: f64) -> Self {
        self.speeds.select_closest(speed_px_per_sec);
        self.sync_speed();
        self
    }

    // ── accessors ─────────────────────────────────────────────

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable page access for the host (layout, loading).  Scroll writes
    /// during playback should go through the engine instead.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn wake(&self) -> &W {
        &self.wake
    }

    /// Host access to the provider, e.g. to poll its health.
    pub fn wake_mut(&mut self) -> &mut W {
        &mut self.wake
    }

    #[cfg(test)]
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing
    }

    pub fn speed_px_per_sec(&self) -> f64 {
        self.playback.speed_px_per_sec
    }

    pub fn speed_level(&self) -> usize {
        self.playback.speed_level_index
    }

    pub fn speed_levels(&self) -> &SpeedLevels {
        &self.speeds
    }

    #[cfg(test)]
    pub fn origin(&self) -> Option<ScrollOrigin> {
        self.origin
    }

    pub fn highlighted(&self) -> Option<BlockId> {
        self.highlight.current()
    }

    pub fn schedulers(&self) -> &SchedulerPair {
        &self.schedulers
    }

    // ── transitions ───────────────────────────────────────────

    /// `Idle -> Playing`.  No-op when already playing.
    pub fn start(&mut self, now_ms: f64) -> Result<(), StartRefused> {
        if self.playback.is_playing {
            return Ok(());
        }

        let Some(geo) = self.page.geometry() else {
            warn!("autoscroll start refused: no container");
            return Err(StartRefused::NoContainer);
        };
        if !geo.is_scrollable() {
            warn!(
                scroll_height = geo.scroll_height,
                client_height = geo.client_height,
                "autoscroll start refused: content is not scrollable"
            );
            return Err(StartRefused::Unscrollable {
                scroll_height: geo.scroll_height,
                client_height: geo.client_height,
            });
        }

        // Already at the end: wrap to the top.
        let mut position = geo.scroll_top;
        if position >= geo.max_scroll_top() {
            self.page.set_scroll_offset(0.0);
            position = 0.0;
        }

        self.playback.is_playing = true;
        self.playback.last_tick_ms = None;
        self.origin = Some(ScrollOrigin::capture(now_ms, position));

        match self.wake.acquire() {
            Ok(()) => self.wake_held = true,
            Err(e) => warn!(error = %e, "wake lock unavailable, playing without it"),
        }

        self.schedulers.arm();
        self.sync_highlight();

        info!(
            speed = self.playback.speed_px_per_sec,
            position,
            arm_epoch = self.schedulers.arm_epoch(),
            "autoscroll started"
        );
        Ok(())
    }

    /// `Playing -> Idle`.  Idempotent.
    ///
    /// Disarms both drivers before returning: a tick delivered after this
    /// call finds the pair disarmed and `is_playing == false` and writes
    /// nothing.
    pub fn stop(&mut self) {
        if !self.playback.is_playing {
            return;
        }

        self.playback.is_playing = false;
        self.playback.last_tick_ms = None;
        self.schedulers.disarm();
        self.origin = None;

        if self.wake_held {
            self.wake_held = false;
            if let Err(e) = self.wake.release() {
                warn!(error = %e, "wake lock release failed");
            }
        }

        self.highlight.clear(&mut self.page);
        info!("autoscroll stopped");
    }

    pub fn toggle(&mut self, now_ms: f64) -> Result<(), StartRefused> {
        if self.playback.is_playing {
            self.stop();
            Ok(())
        } else {
            self.start(now_ms)
        }
    }

    /// Jump to the top and stop.
    pub fn reset(&mut self) {
        if self.page.geometry().is_some() {
            self.page.set_scroll_offset(0.0);
        }
        self.stop();
        self.highlight.clear(&mut self.page);
        debug!("autoscroll reset");
    }

    /// Select a speed level.  Out-of-range indices are ignored.
    pub fn set_speed_level(&mut self, index: usize, now_ms: f64) -> bool {
        if !self.speeds.select(index) {
            return false;
        }
        self.on_speed_changed(now_ms);
        true
    }

    pub fn increase_speed(&mut self, now_ms: f64) -> bool {
        if !self.speeds.increment() {
            return false;
        }
        self.on_speed_changed(now_ms);
        true
    }

    pub fn decrease_speed(&mut self, now_ms: f64) -> bool {
        if !self.speeds.decrement() {
            return false;
        }
        self.on_speed_changed(now_ms);
        true
    }

    /// Host visibility changed.  Hidden suspends the frame driver; visible
    /// resumes it and snaps the offset to wall-clock time immediately.
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) -> TickOutcome {
        self.schedulers.set_frame_suspended(!visible);
        if !self.playback.is_playing {
            return TickOutcome::Skipped;
        }
        if visible {
            self.advance(now_ms)
        } else {
            self.playback.last_tick_ms = None;
            TickOutcome::Skipped
        }
    }

    /// One driver tick.  Both drivers call this; the playing flag and the
    /// driver's arm state are checked here, not only when scheduling.
    pub fn tick(&mut self, driver: Driver, now_ms: f64) -> TickOutcome {
        if !self.playback.is_playing || !self.schedulers.should_fire(driver) {
            return TickOutcome::Skipped;
        }
        self.advance(now_ms)
    }

    /// The host changed the page layout under a running scroll.  Re-anchor at
    /// the current offset so the next tick continues from the text now on
    /// screen instead of the old pixel position.
    pub fn reanchor(&mut self, now_ms: f64) {
        if !self.playback.is_playing {
            return;
        }
        if let Some(geo) = self.page.geometry() {
            self.origin = Some(ScrollOrigin::capture(now_ms, geo.scroll_top));
            self.playback.last_tick_ms = None;
            debug!(position = geo.scroll_top, "re-anchored after relayout");
        }
        self.sync_highlight();
    }

    /// Highlight-only refresh on its own period while playing.
    pub fn refresh_highlight(&mut self) {
        if self.playback.is_playing {
            self.sync_highlight();
        }
    }

    /// Manual scroll by `delta_px`, subject to `policy` while playing.
    /// Returns `true` if the offset was moved.
    pub fn manual_scroll(&mut self, delta_px: f64, policy: ManualScrollPolicy) -> bool {
        if self.playback.is_playing {
            match policy {
                ManualScrollPolicy::Ignore => {
                    debug!(delta_px, "manual scroll ignored while playing");
                    return false;
                }
                ManualScrollPolicy::Cancel => self.stop(),
            }
        }
        let Some(geo) = self.page.geometry() else {
            return false;
        };
        let max = geo.max_scroll_top().max(0.0);
        let target = (geo.scroll_top + delta_px).clamp(0.0, max);
        if target == geo.scroll_top {
            return false;
        }
        self.page.set_scroll_offset(target);
        true
    }

    // ── internals ─────────────────────────────────────────────

    fn advance(&mut self, now_ms: f64) -> TickOutcome {
        let (Some(geo), Some(origin)) = (self.page.geometry(), self.origin) else {
            return TickOutcome::Skipped;
        };

        let max = geo.max_scroll_top();
        if max <= 0.0 {
            debug!("content no longer scrollable, stopping");
            self.stop();
            return TickOutcome::Finished;
        }

        let target = compute_target_offset(origin, self.playback.speed_px_per_sec, now_ms);
        if target >= max {
            self.page.set_scroll_offset(max);
            debug!(max, "reached end of content");
            self.stop();
            return TickOutcome::Finished;
        }

        let offset = target.max(0.0);
        self.page.set_scroll_offset(offset);
        self.playback.last_tick_ms = Some(now_ms);
        self.sync_highlight();
        TickOutcome::Advanced { offset_px: offset }
    }

    fn sync_highlight(&mut self) {
        if let Some(geo) = self.page.geometry() {
            self.highlight.update(geo.rect, &mut self.page);
        }
    }

    fn sync_speed(&mut self) {
        self.playback.speed_px_per_sec = self.speeds.current();
        self.playback.speed_level_index = self.speeds.index();
    }

    /// Re-anchor at the current position so the change alters only the rate.
    fn on_speed_changed(&mut self, now_ms: f64) {
        self.sync_speed();
        if self.playback.is_playing {
            if let Some(geo) = self.page.geometry() {
                self.origin = Some(ScrollOrigin::capture(now_ms, geo.scroll_top));
            }
            self.playback.last_tick_ms = None;
        }
        debug!(
            speed = self.playback.speed_px_per_sec,
            level = self.playback.speed_level_index,
            "scroll speed changed"
        );
    }
}

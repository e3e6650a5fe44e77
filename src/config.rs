//! User configuration — speeds, driver cadence, and keybindings.
//!
//! Read from a simple key-value text file at
//! `$XDG_CONFIG_HOME/prompter/config.toml` (default `~/.config/prompter/config.toml`).
//! The file is only ever read; nothing here writes preferences back.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::core::engine::ManualScrollPolicy;
use crate::core::scheduler::Cadence;
use crate::core::speed::SpeedLevels;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TogglePlay,
    Play,
    Pause,
    Faster,
    Slower,
    Reset,
    ScrollUp,
    ScrollDown,
    Quit,
}

impl Action {
    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::TogglePlay => "play/pause",
            Action::Play => "play",
            Action::Pause => "pause",
            Action::Faster => "faster",
            Action::Slower => "slower",
            Action::Reset => "reset",
            Action::ScrollUp => "scroll up",
            Action::ScrollDown => "scroll down",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "toggle_play" => Some(Action::TogglePlay),
            "play" => Some(Action::Play),
            "pause" => Some(Action::Pause),
            "faster" => Some(Action::Faster),
            "slower" => Some(Action::Slower),
            "reset" => Some(Action::Reset),
            "scroll_up" => Some(Action::ScrollUp),
            "scroll_down" => Some(Action::ScrollDown),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT are compared.  SHIFT is ignored so that symbol keys
    /// like `+` match however the terminal reports them.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Short display string for the status bar (e.g. `"Space"`, `"↑"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+r"`, `"Up"`, `"Space"`, `"+"`.
    fn parse(s: &str) -> Option<Self> {
        // A lone "+" is the key itself, not a modifier separator.
        if s == "+" {
            return Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::NONE));
        }

        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => {
                let n: u8 = k[1..].parse().ok()?;
                KeyCode::F(n)
            }
            k if k.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub speed_levels: SpeedLevels,
    /// Starting speed in px/s; snapped to the closest level.
    pub initial_speed: Option<f64>,
    pub frame_rate_hz: u32,
    pub watchdog_ms: u64,
    pub highlight_ms: u64,
    /// Logical pixels per text row.
    pub px_per_row: f64,
    pub manual_scroll: ManualScrollPolicy,
    pub wake_lock: bool,
    /// Pad half a viewport above and below the text.
    pub lead_in: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            speed_levels: SpeedLevels::default(),
            initial_speed: None,
            frame_rate_hz: 60,
            watchdog_ms: 16,
            highlight_ms: 100,
            px_per_row: 24.0,
            manual_scroll: ManualScrollPolicy::default(),
            wake_lock: true,
            lead_in: true,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Action::TogglePlay, vec![KeyBind::new(Char(' '), n)]);
        m.insert(Action::Play, vec![KeyBind::new(Char('p'), n)]);
        m.insert(Action::Pause, vec![KeyBind::new(Char('s'), n)]);
        m.insert(Action::Faster, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n), KeyBind::new(Char('+'), n)]);
        m.insert(Action::Slower, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n), KeyBind::new(Char('-'), n)]);
        m.insert(Action::Reset, vec![KeyBind::new(Char('r'), n), KeyBind::new(Home, n)]);
        m.insert(Action::ScrollUp, vec![KeyBind::new(PageUp, n)]);
        m.insert(Action::ScrollDown, vec![KeyBind::new(PageDown, n)]);
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Key hints for the status bar.
    pub fn status_bar_hint(&self) -> String {
        [Action::TogglePlay, Action::Faster, Action::Slower, Action::Reset, Action::Quit]
            .iter()
            .map(|&a| format!("{} {}", self.short_binding(a), a.label()))
            .collect::<Vec<_>>()
            .join(" · ")
    }

    pub fn cadence(&self) -> Cadence {
        Cadence::new(self.frame_rate_hz, self.watchdog_ms, self.highlight_ms)
    }

    // ── loading ─────────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "speed_levels" => {
                    let parsed: Option<Vec<f64>> =
                        value.split(',').map(|v| v.trim().parse().ok()).collect();
                    match parsed.and_then(SpeedLevels::new) {
                        Some(levels) => config.speed_levels = levels,
                        None => warn!(value, "invalid speed_levels, keeping defaults"),
                    }
                    continue;
                }
                "initial_speed" => {
                    match value.parse::<f64>() {
                        Ok(v) if v.is_finite() && v > 0.0 => config.initial_speed = Some(v),
                        _ => warn!(value, "invalid initial_speed"),
                    }
                    continue;
                }
                "frame_rate_hz" => {
                    match value.parse::<u32>() {
                        Ok(v) => config.frame_rate_hz = v.clamp(10, 240),
                        Err(_) => warn!(value, "invalid frame_rate_hz"),
                    }
                    continue;
                }
                "watchdog_ms" => {
                    match value.parse::<u64>() {
                        Ok(v) => config.watchdog_ms = v.clamp(4, 100),
                        Err(_) => warn!(value, "invalid watchdog_ms"),
                    }
                    continue;
                }
                "highlight_ms" => {
                    match value.parse::<u64>() {
                        Ok(v) => config.highlight_ms = v.clamp(20, 1000),
                        Err(_) => warn!(value, "invalid highlight_ms"),
                    }
                    continue;
                }
                "px_per_row" => {
                    match value.parse::<f64>() {
                        Ok(v) if v.is_finite() => config.px_per_row = v.clamp(4.0, 200.0),
                        _ => warn!(value, "invalid px_per_row"),
                    }
                    continue;
                }
                "manual_scroll" => {
                    match ManualScrollPolicy::parse(value) {
                        Some(p) => config.manual_scroll = p,
                        None => warn!(value, "manual_scroll must be `ignore` or `cancel`"),
                    }
                    continue;
                }
                "wake_lock" => {
                    config.wake_lock = value == "true";
                    continue;
                }
                "lead_in" => {
                    config.lead_in = value == "true";
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                warn!(key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .map(|part| part.trim().trim_matches('"'))
                .filter(|part| !part.is_empty())
                .filter_map(KeyBind::parse)
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/prompter/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("prompter").join("config.toml")
}

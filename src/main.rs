//! A terminal teleprompter.
//!
//! Scrolls a text script at a steady, wall-clock-driven speed and highlights
//! the block sitting on the reading line.  Run with a file path, or `-` to
//! read the script from stdin.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stdout, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::app::{page::Page, runtime, state::AppState, wake::SystemWakeLock};
use crate::core::document::{self, Document, ScriptFormat};
use crate::core::engine::{Autoscroll, ManualScrollPolicy};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal teleprompter with autoscroll and reading-line highlight")]
struct Cli {
    /// Script to show; `-` reads stdin.
    #[arg(default_value = "-")]
    path: PathBuf,

    /// Starting speed in px/s, snapped to the closest configured level.
    #[arg(long)]
    speed: Option<f64>,

    /// Starting speed level, 1-based.  Overrides `--speed`.
    #[arg(long)]
    level: Option<usize>,

    /// What manual scrolling does while playing: `ignore` or `cancel`.
    #[arg(long = "manual-scroll", value_parser = parse_policy)]
    manual_scroll: Option<ManualScrollPolicy>,

    /// Do not keep the display awake during playback.
    #[arg(long = "no-wake-lock")]
    no_wake_lock: bool,

    /// Start scrolling immediately.
    #[arg(long)]
    autoplay: bool,
}

fn parse_policy(s: &str) -> Result<ManualScrollPolicy, String> {
    ManualScrollPolicy::parse(s).ok_or_else(|| format!("expected `ignore` or `cancel`, got `{s}`"))
}

/// A loaded script and the name shown in the pane title.
struct Script {
    document: Document,
    title: String,
}

/// Load a `.md`/`.txt` script, or markdown from stdin for `-`.  Bytes are
/// decoded leniently: a BOM is dropped and invalid UTF-8 is replaced.
fn read_script(path: &Path) -> Result<Script> {
    let (bytes, format, title) = if path == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read script from stdin")?;
        (bytes, ScriptFormat::Markdown, "stdin".to_string())
    } else {
        let Some(format) = ScriptFormat::from_path(path) else {
            bail!("{} is not a script: expected a .md or .txt file", path.display());
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        (bytes, format, title)
    };

    let decoded = document::decode(&bytes);
    if decoded.lossy {
        warn!(%title, "script is not valid UTF-8, invalid bytes replaced");
    }
    Ok(Script {
        document: Document::parse_as(&decoded.text, format),
        title,
    })
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (silent unless RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute the TUI on stdout
        .init();

    let cli = Cli::parse();

    // ── configuration ─────────────────────────────────────────
    let mut config = config::AppConfig::load();
    if let Some(speed) = cli.speed {
        config.initial_speed = Some(speed);
    }
    if let Some(policy) = cli.manual_scroll {
        config.manual_scroll = policy;
    }
    if cli.no_wake_lock {
        config.wake_lock = false;
    }

    // ── script & engine ───────────────────────────────────────
    let Script { document, title } = read_script(&cli.path)?;
    if document.is_empty() {
        warn!(%title, "script is empty");
    }
    info!(blocks = document.blocks().len(), %title, "script loaded");

    let mut page = Page::new(config.px_per_row, config.lead_in);
    page.load(document);

    let mut engine = Autoscroll::new(
        page,
        SystemWakeLock::new(config.wake_lock),
        config.speed_levels.clone(),
    );
    if let Some(speed) = config.initial_speed {
        engine = engine.with_initial_speed(speed);
    }
    if let Some(level) = cli.level {
        if (1..=engine.speed_levels().len()).contains(&level) {
            engine.set_speed_level(level - 1, 0.0);
        } else {
            warn!(level, levels = ?engine.speed_levels().levels(), "speed level out of range, ignored");
        }
    }

    info!(
        speed = engine.speed_px_per_sec(),
        manual_scroll = config.manual_scroll.label(),
        wake_lock = config.wake_lock,
        "engine ready"
    );

    let mut state = AppState::new(engine, config, title);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(
        stdout_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = runtime::run(&mut terminal, &mut state, cli.autoplay).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::BlockKind;

    fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prompter-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn invalid_utf8_is_loaded_lossily() {
        let path = write_temp("broken.md", b"Hello \xff world\n\nsecond");
        let script = read_script(&path).unwrap();
        assert_eq!(script.title, "broken.md");
        assert_eq!(script.document.blocks()[0].text, "Hello \u{FFFD} world");
        assert_eq!(script.document.blocks().len(), 2);
    }

    #[test]
    fn bom_prefixed_markdown_keeps_its_heading() {
        let path = write_temp("bom.md", b"\xEF\xBB\xBF# Opening\n\nbody");
        let script = read_script(&path).unwrap();
        assert_eq!(script.document.blocks()[0].kind, BlockKind::Heading(1));
        assert_eq!(script.document.blocks()[0].text, "Opening");
    }

    #[test]
    fn text_files_highlight_line_by_line() {
        let path = write_temp("lines.txt", b"first line\nsecond line\n");
        let script = read_script(&path).unwrap();
        assert_eq!(script.document.blocks().len(), 2);
    }

    #[test]
    fn other_extensions_are_rejected() {
        let path = write_temp("slides.pdf", b"%PDF");
        let err = read_script(&path).err().unwrap();
        assert!(err.to_string().contains("expected a .md or .txt file"));
    }
}

//! Primer CLI - Binary entry point and terminal session management.
//!
//! The CLI bridges [`primer_core`] (application state) and [`primer_tui`]
//! (rendering), with RAII terminal management that restores the terminal on
//! every exit path.
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`primer_tui::InputPump`])
//! 3. Advance timers (`app.tick(now)`): loading window, copy feedback
//! 4. Render frame

mod assets;

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tokio::time::{MissedTickBehavior, interval};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use primer_core::{App, EnvColorScheme, JsonFileStore, PrimerConfig, Registry};
use primer_tui::{Clipboard, InputPump, NoopClipboard, SystemClipboard, draw, handle_events};

const FRAME_DURATION: Duration = Duration::from_millis(16);
/// Frames per spinner step.
const SPINNER_DIVISOR: usize = 5;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: prefer no logs over corrupting the TUI via stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.primer/logs/primer.log
    if let Some(config_path) = PrimerConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("primer.log"));
    }

    // Fallback: ./.primer/logs/primer.log
    candidates.push(PathBuf::from(".primer").join("logs").join("primer.log"));

    candidates
}

/// Raw mode, the alternate screen, bracketed paste and focus reporting for the
/// lifetime of the value. Dropping it restores the terminal, including on early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(
            out,
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableFocusChange
        ) {
            let _ = disable_raw_mode();
            let _ = execute!(
                out,
                LeaveAlternateScreen,
                DisableBracketedPaste,
                DisableFocusChange
            );
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(
                    stdout(),
                    LeaveAlternateScreen,
                    DisableBracketedPaste,
                    DisableFocusChange
                );
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste,
            DisableFocusChange
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = match PrimerConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Using default config: {err}");
            PrimerConfig::default()
        }
    };

    let registry = Registry::new(assets::topics());
    let store = JsonFileStore::new(config.state_path());
    tracing::info!(
        topics = registry.len(),
        state = %store.path().display(),
        "Starting Primer"
    );
    let mut app = App::new(registry, Box::new(store), &config, Box::new(EnvColorScheme));
    let mut clipboard: Box<dyn Clipboard> = if config.clipboard_enabled() {
        Box::new(SystemClipboard::new())
    } else {
        tracing::info!("System clipboard disabled by config");
        Box::new(NoopClipboard)
    };

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app, clipboard.as_mut()).await
    };

    if let Err(err) = &result {
        tracing::error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
    }
    result
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    clipboard: &mut dyn Clipboard,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame_count: usize = 0;

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input, clipboard) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick(Instant::now());

        let spinner_tick = frame_count / SPINNER_DIVISOR;
        if let Err(e) = terminal.draw(|frame| draw(frame, app, spinner_tick)) {
            break Err(e.into());
        }
        frame_count = frame_count.wrapping_add(1);
    };

    input.shutdown().await;
    result
}

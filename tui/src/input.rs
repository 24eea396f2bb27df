//! Input handling for the Primer TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tokio::time::timeout;
use tracing::debug;

use primer_core::{App, GateTime, Screen};

use crate::clipboard::Clipboard;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking task and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued events into the app. Returns `true` once the app wants to quit.
pub fn handle_events(
    app: &mut App,
    input: &mut InputPump,
    clipboard: &mut dyn Clipboard,
) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev, Instant::now(), clipboard) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` once the app wants to quit.
pub fn apply_event(
    app: &mut App,
    event: Event,
    now: Instant,
    clipboard: &mut dyn Clipboard,
) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            apply_key(app, key, now, clipboard);
        }
        Event::Paste(text) => {
            let chars = text.chars().filter(|c| !c.is_control());
            match KeyContext::of(app) {
                KeyContext::Gate => chars.for_each(|c| app.gate_push(c)),
                KeyContext::Filter => chars.for_each(|c| app.filter_push(c)),
                _ => {}
            }
        }
        // Terminals only report a background change indirectly; refocus is the cue.
        Event::FocusGained => app.refresh_color_scheme(),
        _ => {}
    }
    app.should_quit()
}

/// Apply one key press to whichever screen is showing.
pub fn apply_key(app: &mut App, key: KeyEvent, now: Instant, clipboard: &mut dyn Clipboard) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    match KeyContext::of(app) {
        KeyContext::Gate => handle_gate(app, key),
        KeyContext::Filter => handle_filter(app, key),
        KeyContext::Listing => handle_listing(app, key, now),
        KeyContext::Loading => handle_loading(app, key),
        KeyContext::Detail => handle_detail(app, key, now, clipboard),
    }
}

/// Which key map applies right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyContext {
    Gate,
    Filter,
    Listing,
    Loading,
    Detail,
}

impl KeyContext {
    fn of(app: &App) -> Self {
        match app.screen() {
            Screen::Gate => Self::Gate,
            Screen::Listing if app.view().listing.editing_filter => Self::Filter,
            Screen::Listing => Self::Listing,
            Screen::Loading(_) => Self::Loading,
            Screen::Detail(_) => Self::Detail,
        }
    }
}

fn handle_gate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let passed = app.gate_submit(GateTime::now());
            debug!(passed, "Access code submitted");
        }
        KeyCode::Backspace => app.gate_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.gate_push(c),
        _ => {}
    }
}

fn handle_filter(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.finish_filter(),
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.filter_backspace(),
        KeyCode::Up => app.cursor_up(),
        KeyCode::Down => app.cursor_down(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.filter_push(c),
        _ => {}
    }
}

/// Keys shared by every screen without a text field. Returns `true` if handled.
fn handle_global(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('h') => app.go_home(),
        _ => return false,
    }
    true
}

fn handle_listing(app: &mut App, key: KeyEvent, now: Instant) {
    if handle_global(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Enter => app.open_selected(now),
        KeyCode::Char('/') => app.begin_filter(),
        KeyCode::Esc => app.clear_filter(),
        _ => {}
    }
}

fn handle_loading(app: &mut App, key: KeyEvent) {
    if handle_global(app, key) {
        return;
    }
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace
    ) {
        app.back();
    }
}

fn handle_detail(app: &mut App, key: KeyEvent, now: Instant, clipboard: &mut dyn Clipboard) {
    if handle_global(app, key) {
        return;
    }
    let page = app.view().detail.layout.page_size();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_by(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_by(page),
        KeyCode::PageUp => app.scroll_by(-page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        KeyCode::Char(']') => app.next_heading(),
        KeyCode::Char('[') => app.prev_heading(),
        KeyCode::Tab => app.focus_next_code(),
        KeyCode::Char('c') => copy_focused_code(app, now, clipboard),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.back(),
        _ => {}
    }
}

/// Copy the focused code block, focusing the first one if none is.
fn copy_focused_code(app: &mut App, now: Instant, clipboard: &mut dyn Clipboard) {
    if app.focused_code().is_none() {
        app.focus_next_code();
    }
    let Some((index, code)) = app.focused_code() else {
        return;
    };
    clipboard.copy(&code.code);
    app.mark_copied(index, now);
}

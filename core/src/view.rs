//! View state for rendering.
//!
//! Ephemeral, per-screen state: cursor positions, drafts, scroll offsets and the
//! "copied" flash. None of it is persisted and none of it touches topic data.

use std::time::{Duration, Instant};

use crate::gate::AccessDenied;

/// How long the "copied" confirmation stays on a code block.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1500);

/// Access gate prompt state.
#[derive(Debug, Default, Clone)]
pub struct GateInput {
    pub draft: String,
    pub error: Option<AccessDenied>,
}

/// Listing cursor and filter.
#[derive(Debug, Default, Clone)]
pub struct ListingView {
    /// Index into the filtered topic list.
    pub cursor: usize,
    pub filter: String,
    /// Keystrokes go to the filter instead of list navigation.
    pub editing_filter: bool,
}

/// A code block recently copied to the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFeedback {
    /// Index of the code block in the topic's content.
    pub block: usize,
    pub until: Instant,
}

/// Line offsets of the rendered detail document, recorded at draw time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailLayout {
    pub heading_offsets: Vec<u16>,
    /// `(content index, line offset)` for each code block.
    pub code_offsets: Vec<(usize, u16)>,
    pub max_scroll: u16,
    /// Rows of the scrollable area.
    pub viewport: u16,
}

impl DetailLayout {
    /// Rows moved by PgUp/PgDn: one screen less two rows of overlap.
    #[must_use]
    pub fn page_size(&self) -> i32 {
        i32::from(self.viewport.saturating_sub(2).max(1))
    }
}

/// Reading position inside an open topic.
#[derive(Debug, Default, Clone)]
pub struct DetailView {
    pub scroll: u16,
    /// Content index of the focused code block.
    pub focused_code: Option<usize>,
    pub copied: Option<CopyFeedback>,
    pub layout: DetailLayout,
}

impl DetailView {
    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.layout.max_scroll));
        self.scroll = next as u16;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.layout.max_scroll;
    }

    /// Jump to the first heading below the current position.
    pub fn next_heading(&mut self) {
        if let Some(offset) = self
            .layout
            .heading_offsets
            .iter()
            .copied()
            .find(|&offset| offset > self.scroll)
        {
            self.scroll = offset.min(self.layout.max_scroll);
        }
    }

    /// Jump to the last heading above the current position.
    pub fn prev_heading(&mut self) {
        self.scroll = self
            .layout
            .heading_offsets
            .iter()
            .copied()
            .rev()
            .find(|&offset| offset < self.scroll)
            .unwrap_or(0);
    }

    /// Bring the focused code block into view.
    pub fn reveal_focused_code(&mut self) {
        let Some(focused) = self.focused_code else {
            return;
        };
        if let Some(&(_, offset)) = self
            .layout
            .code_offsets
            .iter()
            .find(|(index, _)| *index == focused)
        {
            self.scroll = offset.min(self.layout.max_scroll);
        }
    }

    pub fn expire_feedback(&mut self, now: Instant) {
        if self.copied.is_some_and(|copied| now >= copied.until) {
            self.copied = None;
        }
    }
}

/// All view state, grouped by screen.
#[derive(Debug, Default, Clone)]
pub struct ViewState {
    pub gate: GateInput,
    pub listing: ListingView,
    pub detail: DetailView,
}

//! Application state: the registry, navigator, gate and theme behind one owner.
//!
//! Every mutation goes through a named method here, so the UI layer only reads
//! state and forwards user intents.

use std::mem;
use std::time::Instant;

use primer_types::{CodeBlock, ColorScheme, ContentBlock, Topic, TopicId, UiOptions};

use crate::config::PrimerConfig;
use crate::gate::{AccessGate, GateTime};
use crate::navigation::{NavigationState, Navigator, Transition};
use crate::registry::Registry;
use crate::store::KeyValueStore;
use crate::theme::{ColorSchemeSource, FixedColorScheme, ThemeState};
use crate::view::{COPY_FEEDBACK_DURATION, CopyFeedback, DetailView, ViewState};

/// What the user currently sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    /// Nothing else is reachable until the gate passes.
    Gate,
    Listing,
    Loading(&'a TopicId),
    Detail(&'a Topic),
}

pub struct App {
    registry: Registry,
    navigator: Navigator,
    gate: AccessGate<Box<dyn KeyValueStore>>,
    theme: ThemeState,
    ui_options: UiOptions,
    view: ViewState,
    /// Host preference, re-read on [`App::refresh_color_scheme`]. `None` when
    /// config pins the theme.
    scheme_source: Option<Box<dyn ColorSchemeSource>>,
    should_quit: bool,
}

impl App {
    /// Assemble the app from configuration.
    ///
    /// A theme pinned in config wins over the host preference source, and
    /// later host changes are ignored.
    pub fn new(
        registry: Registry,
        store: Box<dyn KeyValueStore>,
        config: &PrimerConfig,
        scheme_source: Box<dyn ColorSchemeSource>,
    ) -> Self {
        let (theme, scheme_source) = match config.theme().pinned() {
            Some(scheme) => (
                ThemeState::from_source(&FixedColorScheme(Some(scheme))),
                None,
            ),
            None => (ThemeState::from_source(&*scheme_source), Some(scheme_source)),
        };
        let mut app = Self::from_parts(
            registry,
            AccessGate::new(store),
            Navigator::new(config.loading_delay()),
            theme,
            config.ui_options(),
        );
        app.scheme_source = scheme_source;
        app
    }

    #[must_use]
    pub fn from_parts(
        registry: Registry,
        gate: AccessGate<Box<dyn KeyValueStore>>,
        navigator: Navigator,
        theme: ThemeState,
        ui_options: UiOptions,
    ) -> Self {
        tracing::info!(
            topics = registry.len(),
            verified = gate.is_verified(),
            "App initialized"
        );
        Self {
            registry,
            navigator,
            gate,
            theme,
            ui_options,
            view: ViewState::default(),
            scheme_source: None,
            should_quit: false,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    #[must_use]
    pub fn screen(&self) -> Screen<'_> {
        if !self.gate.is_verified() {
            return Screen::Gate;
        }
        match self.navigator.state() {
            NavigationState::Listing => Screen::Listing,
            NavigationState::Loading(pending) => Screen::Loading(&pending.topic),
            NavigationState::Detail(id) => match self.registry.lookup(id) {
                Some(topic) => Screen::Detail(topic),
                None => Screen::Listing,
            },
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        self.navigator.state()
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.gate.is_verified()
    }

    #[must_use]
    pub fn theme(&self) -> ThemeState {
        self.theme
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable view state, for layout data recorded while drawing.
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    /// Host color-scheme change notification.
    pub fn on_color_scheme_changed(&mut self, scheme: ColorScheme) {
        self.theme.on_preference_changed(scheme);
    }

    /// Re-read the host preference and apply it if it has an answer.
    pub fn refresh_color_scheme(&mut self) {
        let Some(scheme) = self
            .scheme_source
            .as_ref()
            .and_then(|source| source.preferred())
        else {
            return;
        };
        if scheme != self.theme.scheme() {
            tracing::debug!(?scheme, "Host color scheme changed");
        }
        self.on_color_scheme_changed(scheme);
    }

    // ========================================================================
    // Gate
    // ========================================================================

    pub fn gate_push(&mut self, c: char) {
        if !c.is_control() {
            self.view.gate.draft.push(c);
        }
    }

    pub fn gate_backspace(&mut self) {
        self.view.gate.draft.pop();
    }

    /// Submit the drafted code. On failure the draft is cleared and an inline
    /// error is shown; the user may retry at once.
    pub fn gate_submit(&mut self, now: GateTime) -> bool {
        let candidate = mem::take(&mut self.view.gate.draft);
        match self.gate.submit(&candidate, now) {
            Ok(()) => {
                self.view.gate.error = None;
                true
            }
            Err(denied) => {
                self.view.gate.error = Some(denied);
                false
            }
        }
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Topics matching the current filter, in catalogue order.
    #[must_use]
    pub fn visible_topics(&self) -> Vec<&Topic> {
        let filter = self.view.listing.filter.as_str();
        self.registry
            .topics()
            .filter(|topic| topic.matches(filter))
            .collect()
    }

    /// The topic under the listing cursor.
    #[must_use]
    pub fn selected_topic(&self) -> Option<&Topic> {
        self.visible_topics()
            .get(self.view.listing.cursor)
            .copied()
    }

    pub fn cursor_up(&mut self) {
        self.view.listing.cursor = self.view.listing.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let last = self.visible_topics().len().saturating_sub(1);
        self.view.listing.cursor = (self.view.listing.cursor + 1).min(last);
    }

    pub fn begin_filter(&mut self) {
        self.view.listing.editing_filter = true;
    }

    pub fn finish_filter(&mut self) {
        self.view.listing.editing_filter = false;
    }

    pub fn filter_push(&mut self, c: char) {
        if !c.is_control() {
            self.view.listing.filter.push(c);
            self.view.listing.cursor = 0;
        }
    }

    pub fn filter_backspace(&mut self) {
        self.view.listing.filter.pop();
        self.view.listing.cursor = 0;
    }

    pub fn clear_filter(&mut self) {
        self.view.listing.filter.clear();
        self.view.listing.editing_filter = false;
        self.view.listing.cursor = 0;
    }

    /// Open the topic under the cursor.
    pub fn open_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_topic().map(|topic| topic.id.clone()) {
            self.select_topic(id, now);
        }
    }

    /// Start loading a topic by id. Unknown ids fall back to the listing when the
    /// loading window ends.
    pub fn select_topic(&mut self, id: TopicId, now: Instant) {
        if !self.gate.is_verified() {
            return;
        }
        self.navigator.select(id, now);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn back(&mut self) {
        if let Some(transition) = self.navigator.back() {
            self.after_transition(&transition);
        }
    }

    pub fn go_home(&mut self) {
        if let Some(transition) = self.navigator.go_home() {
            self.after_transition(&transition);
        }
    }

    /// Advance timers: complete the loading window and expire copy feedback.
    pub fn tick(&mut self, now: Instant) {
        if let Some(transition) = self.navigator.poll(now, &self.registry) {
            self.after_transition(&transition);
        }
        self.view.detail.expire_feedback(now);
    }

    fn after_transition(&mut self, transition: &Transition) {
        if transition.to != "loading" {
            self.view.detail = DetailView::default();
        }
    }

    // ========================================================================
    // Detail
    // ========================================================================

    pub fn scroll_by(&mut self, delta: i32) {
        self.view.detail.scroll_by(delta);
    }

    pub fn scroll_to_top(&mut self) {
        self.view.detail.scroll_to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.view.detail.scroll_to_bottom();
    }

    pub fn next_heading(&mut self) {
        self.view.detail.next_heading();
    }

    pub fn prev_heading(&mut self) {
        self.view.detail.prev_heading();
    }

    /// Move focus to the next code block of the open topic, wrapping around.
    pub fn focus_next_code(&mut self) {
        let Screen::Detail(topic) = self.screen() else {
            return;
        };
        let indices: Vec<usize> = code_block_indices(topic).collect();
        if indices.is_empty() {
            return;
        }
        let next = match self.view.detail.focused_code {
            Some(current) => indices
                .iter()
                .copied()
                .find(|&index| index > current)
                .unwrap_or(indices[0]),
            None => indices[0],
        };
        self.view.detail.focused_code = Some(next);
        self.view.detail.reveal_focused_code();
    }

    /// The focused code block, as `(content index, block)`.
    #[must_use]
    pub fn focused_code(&self) -> Option<(usize, &CodeBlock)> {
        let Screen::Detail(topic) = self.screen() else {
            return None;
        };
        let index = self.view.detail.focused_code?;
        match topic.content.get(index) {
            Some(ContentBlock::Code(code)) => Some((index, code)),
            _ => None,
        }
    }

    /// Flash "copied" on a code block for a short while.
    pub fn mark_copied(&mut self, block: usize, now: Instant) {
        self.view.detail.copied = Some(CopyFeedback {
            block,
            until: now + COPY_FEEDBACK_DURATION,
        });
    }
}

fn code_block_indices(topic: &Topic) -> impl Iterator<Item = usize> + '_ {
    topic
        .content
        .iter()
        .enumerate()
        .filter_map(|(index, block)| matches!(block, ContentBlock::Code(_)).then_some(index))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::gate::{OVERRIDE_CODE, STORE_KEY};
    use crate::navigation::DEFAULT_LOADING_DELAY;
    use crate::config::{AppConfig, ThemeSetting};
    use crate::registry::tests::{sample_registry, topic};
    use crate::store::MemoryStore;

    const NOW: GateTime = GateTime::new(5, 21, 6);

    fn app_with(registry: Registry, verified: bool) -> App {
        let mut store = MemoryStore::new();
        if verified {
            store.set_flag(STORE_KEY, true).unwrap();
        }
        App::new(
            registry,
            Box::new(store),
            &PrimerConfig::default(),
            Box::new(FixedColorScheme(Some(ColorScheme::Dark))),
        )
    }

    fn verified_app() -> App {
        app_with(sample_registry(), true)
    }

    #[test]
    fn gate_blocks_everything_until_verified() {
        let mut app = app_with(sample_registry(), false);
        assert_eq!(app.screen(), Screen::Gate);

        app.select_topic(TopicId::new("git-basics").unwrap(), Instant::now());
        assert_eq!(app.navigation(), &NavigationState::Listing);

        for c in "0000".chars() {
            app.gate_push(c);
        }
        assert!(!app.gate_submit(NOW));
        assert!(app.view().gate.error.is_some());
        assert!(app.view().gate.draft.is_empty());
        assert_eq!(app.screen(), Screen::Gate);

        for c in "5216".chars() {
            app.gate_push(c);
        }
        assert!(app.gate_submit(NOW));
        assert!(app.view().gate.error.is_none());
        assert_eq!(app.screen(), Screen::Listing);
    }

    #[test]
    fn override_code_opens_gate() {
        let mut app = app_with(sample_registry(), false);
        for c in OVERRIDE_CODE.chars() {
            app.gate_push(c);
        }
        assert!(app.gate_submit(GateTime::new(0, 1, 1)));
        assert!(app.is_verified());
    }

    #[test]
    fn open_selected_goes_through_loading() {
        let mut app = verified_app();
        let now = Instant::now();

        app.cursor_down();
        app.open_selected(now);
        assert!(matches!(app.screen(), Screen::Loading(id) if id.as_str() == "rust-traits"));

        app.tick(now + DEFAULT_LOADING_DELAY);
        match app.screen() {
            Screen::Detail(topic) => assert_eq!(topic.id.as_str(), "rust-traits"),
            other => panic!("expected detail, got {other:?}"),
        }

        app.back();
        assert_eq!(app.screen(), Screen::Listing);
    }

    #[test]
    fn unknown_topic_returns_to_listing() {
        let mut app = verified_app();
        let now = Instant::now();
        app.select_topic(TopicId::new("does-not-exist").unwrap(), now);
        app.tick(now + DEFAULT_LOADING_DELAY);
        assert_eq!(app.screen(), Screen::Listing);
    }

    #[test]
    fn filter_narrows_listing_and_resets_cursor() {
        let mut app = verified_app();
        app.cursor_down();
        app.begin_filter();
        for c in "git".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.view().listing.cursor, 0);
        let titles: Vec<&str> = app
            .visible_topics()
            .iter()
            .map(|t| t.meta.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Git Basics"]);

        app.clear_filter();
        assert_eq!(app.visible_topics().len(), 3);
        assert!(!app.view().listing.editing_filter);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = verified_app();
        for _ in 0..10 {
            app.cursor_down();
        }
        assert_eq!(app.view().listing.cursor, 2);
        for _ in 0..10 {
            app.cursor_up();
        }
        assert_eq!(app.view().listing.cursor, 0);
    }

    fn registry_with_code() -> Registry {
        let mut with_code = topic("code-topic", "Rust", "Code");
        with_code.content = vec![
            ContentBlock::Code(CodeBlock {
                language: "rust".into(),
                code: "let a = 1;".into(),
                explanation: None,
            }),
            ContentBlock::Unsupported,
            ContentBlock::Code(CodeBlock {
                language: "sh".into(),
                code: "cargo run".into(),
                explanation: None,
            }),
        ];
        Registry::new([with_code])
    }

    #[test]
    fn code_focus_cycles_and_copy_feedback_expires() {
        let mut app = app_with(registry_with_code(), true);
        let now = Instant::now();
        app.open_selected(now);
        app.tick(now + DEFAULT_LOADING_DELAY);

        app.focus_next_code();
        assert_eq!(app.focused_code().map(|(i, _)| i), Some(0));
        app.focus_next_code();
        let (index, code) = app.focused_code().unwrap();
        assert_eq!(index, 2);
        assert_eq!(code.code, "cargo run");
        app.focus_next_code();
        assert_eq!(app.focused_code().map(|(i, _)| i), Some(0));

        app.mark_copied(0, now);
        assert!(app.view().detail.copied.is_some());
        app.tick(now + Duration::from_secs(5));
        assert!(app.view().detail.copied.is_none());
    }

    #[test]
    fn leaving_detail_resets_ephemeral_state() {
        let mut app = app_with(registry_with_code(), true);
        let now = Instant::now();
        app.open_selected(now);
        app.tick(now + DEFAULT_LOADING_DELAY);
        app.focus_next_code();
        app.mark_copied(0, now);

        app.go_home();
        assert_eq!(app.screen(), Screen::Listing);
        assert!(app.view().detail.focused_code.is_none());
        assert!(app.view().detail.copied.is_none());
    }

    #[test]
    fn theme_toggle_is_independent_of_navigation() {
        let mut app = verified_app();
        assert!(app.theme().dark_mode());
        app.toggle_theme();
        assert!(!app.theme().dark_mode());
        app.go_home();
        assert!(!app.theme().dark_mode());
        app.on_color_scheme_changed(ColorScheme::Dark);
        assert!(!app.theme().dark_mode());
    }

    #[test]
    fn pinned_theme_ignores_host_refresh() {
        let config = PrimerConfig {
            app: Some(AppConfig {
                theme: ThemeSetting::Dark,
                ..AppConfig::default()
            }),
            storage: None,
        };
        let mut app = App::new(
            sample_registry(),
            Box::new(MemoryStore::new()),
            &config,
            Box::new(FixedColorScheme(Some(ColorScheme::Light))),
        );
        assert!(app.theme().dark_mode());
        app.refresh_color_scheme();
        assert!(app.theme().dark_mode());
    }

    #[test]
    fn system_theme_follows_host_refresh() {
        let mut app = App::new(
            sample_registry(),
            Box::new(MemoryStore::new()),
            &PrimerConfig::default(),
            Box::new(FixedColorScheme(Some(ColorScheme::Light))),
        );
        assert!(!app.theme().dark_mode());
        app.on_color_scheme_changed(ColorScheme::Dark);
        assert!(app.theme().dark_mode());
        app.refresh_color_scheme();
        assert!(!app.theme().dark_mode());
    }
}

//! Navigation state machine.
//!
//! ```text
//!            select(id)               timer elapsed, id resolves
//! Listing ─────────────▶ Loading ───────────────────────────▶ Detail(id)
//!    ▲                    │  │                                  │
//!    │   timer elapsed,   │  │ back / go_home                   │ back / go_home
//!    │   id unknown       │  │                                  │
//!    └────────────────────┴──┴──────────────────────────────────┘
//! ```
//!
//! The loading window is purely cosmetic: the topic is already resident in the
//! registry. Each `select` issues a fresh [`LoadTicket`]; a timer completion only
//! lands if its ticket is still the pending one, so a newer `select` or a `back`
//! always wins over an older timer.

use std::time::{Duration, Instant};

use primer_types::TopicId;

use crate::registry::Registry;

pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(300);
pub const MIN_LOADING_DELAY: Duration = Duration::from_millis(50);
pub const MAX_LOADING_DELAY: Duration = Duration::from_millis(2000);

/// Identifies one `select` and its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// The in-flight load while in `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub topic: TopicId,
    pub ticket: LoadTicket,
    pub deadline: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Listing,
    Loading(PendingLoad),
    Detail(TopicId),
}

impl NavigationState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Loading(_) => "loading",
            Self::Detail(_) => "detail",
        }
    }

    #[must_use]
    pub fn is_listing(&self) -> bool {
        matches!(self, Self::Listing)
    }

    #[must_use]
    pub fn detail_topic(&self) -> Option<&TopicId> {
        match self {
            Self::Detail(id) => Some(id),
            _ => None,
        }
    }
}

/// A state change, reported for logging and for callers that reset view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug)]
pub struct Navigator {
    state: NavigationState,
    loading_delay: Duration,
    next_ticket: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_LOADING_DELAY)
    }
}

impl Navigator {
    /// Create a navigator in `Listing`. The delay is clamped to the supported window.
    #[must_use]
    pub fn new(loading_delay: Duration) -> Self {
        Self {
            state: NavigationState::Listing,
            loading_delay: loading_delay.clamp(MIN_LOADING_DELAY, MAX_LOADING_DELAY),
            next_ticket: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn loading_delay(&self) -> Duration {
        self.loading_delay
    }

    /// The pending load, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingLoad> {
        match &self.state {
            NavigationState::Loading(pending) => Some(pending),
            _ => None,
        }
    }

    /// Start loading `topic`. Always enters `Loading`, even for ids the registry
    /// does not know; resolution happens when the timer elapses.
    ///
    /// Ignored (returns `None`) while a topic is open.
    pub fn select(&mut self, topic: TopicId, now: Instant) -> Option<LoadTicket> {
        if matches!(self.state, NavigationState::Detail(_)) {
            tracing::debug!(topic = %topic, "Ignoring select while a topic is open");
            return None;
        }

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let pending = PendingLoad {
            topic,
            ticket,
            deadline: now + self.loading_delay,
        };
        tracing::debug!(topic = %pending.topic, ticket = ticket.0, "Loading topic");
        self.set_state(NavigationState::Loading(pending));
        Some(ticket)
    }

    /// Complete the load identified by `ticket`.
    ///
    /// Stale tickets (superseded by a newer select, or cancelled by back/home) are ignored.
    pub fn timer_elapsed(&mut self, ticket: LoadTicket, registry: &Registry) -> Option<Transition> {
        let topic = match &self.state {
            NavigationState::Loading(pending) if pending.ticket == ticket => pending.topic.clone(),
            _ => {
                tracing::debug!(ticket = ticket.0, "Dropping stale loading timer");
                return None;
            }
        };

        if registry.contains(&topic) {
            Some(self.set_state(NavigationState::Detail(topic)))
        } else {
            tracing::debug!(topic = %topic, "Topic not found; returning to listing");
            Some(self.set_state(NavigationState::Listing))
        }
    }

    /// Fire the pending timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant, registry: &Registry) -> Option<Transition> {
        let ticket = self
            .pending()
            .filter(|pending| now >= pending.deadline)
            .map(|pending| pending.ticket)?;
        self.timer_elapsed(ticket, registry)
    }

    /// Leave the open topic (or cancel a pending load) and return to the listing.
    pub fn back(&mut self) -> Option<Transition> {
        match self.state {
            NavigationState::Listing => None,
            NavigationState::Loading(_) | NavigationState::Detail(_) => {
                Some(self.set_state(NavigationState::Listing))
            }
        }
    }

    /// "Go home": always ends in `Listing`. A no-op when already there.
    pub fn go_home(&mut self) -> Option<Transition> {
        self.back()
    }

    fn set_state(&mut self, next: NavigationState) -> Transition {
        let transition = Transition {
            from: self.state.name(),
            to: next.name(),
        };
        self.state = next;
        tracing::debug!(from = transition.from, to = transition.to, "Navigation");
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::sample_registry;

    fn id(raw: &str) -> TopicId {
        TopicId::new(raw).unwrap()
    }

    #[test]
    fn starts_in_listing() {
        let nav = Navigator::default();
        assert_eq!(nav.state(), &NavigationState::Listing);
    }

    #[test]
    fn loading_delay_is_clamped() {
        assert_eq!(Navigator::new(Duration::ZERO).loading_delay(), MIN_LOADING_DELAY);
        assert_eq!(
            Navigator::new(Duration::from_secs(60)).loading_delay(),
            MAX_LOADING_DELAY
        );
    }

    #[test]
    fn select_then_timer_enters_detail() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        let ticket = nav.select(id("git-basics"), now).unwrap();
        assert!(matches!(nav.state(), NavigationState::Loading(_)));

        let transition = nav.timer_elapsed(ticket, &registry).unwrap();
        assert_eq!(transition.to, "detail");
        assert_eq!(nav.state(), &NavigationState::Detail(id("git-basics")));
    }

    #[test]
    fn round_trip_back_to_listing_leaves_registry_untouched() {
        let registry = sample_registry();
        let before: Vec<_> = registry.topics().cloned().collect();
        let mut nav = Navigator::default();
        let now = Instant::now();

        nav.select(id("rust-traits"), now);
        nav.poll(now + DEFAULT_LOADING_DELAY, &registry);
        assert!(nav.state().detail_topic().is_some());
        nav.back();

        assert_eq!(nav.state(), &NavigationState::Listing);
        let after: Vec<_> = registry.topics().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_topic_degrades_to_listing() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        nav.select(id("does-not-exist"), now);
        assert!(matches!(nav.state(), NavigationState::Loading(_)));

        nav.poll(now + DEFAULT_LOADING_DELAY, &registry);
        assert_eq!(nav.state(), &NavigationState::Listing);
    }

    #[test]
    fn poll_before_deadline_does_nothing() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        nav.select(id("git-basics"), now);
        assert!(nav.poll(now + Duration::from_millis(10), &registry).is_none());
        assert!(matches!(nav.state(), NavigationState::Loading(_)));
    }

    #[test]
    fn newer_select_supersedes_pending_timer() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        let first = nav.select(id("git-basics"), now).unwrap();
        let second = nav.select(id("rust-traits"), now).unwrap();
        assert_ne!(first, second);

        assert!(nav.timer_elapsed(first, &registry).is_none());
        assert!(matches!(nav.state(), NavigationState::Loading(_)));

        nav.timer_elapsed(second, &registry);
        assert_eq!(nav.state(), &NavigationState::Detail(id("rust-traits")));
    }

    #[test]
    fn back_during_loading_cancels_timer() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        let ticket = nav.select(id("git-basics"), now).unwrap();
        nav.back();
        assert_eq!(nav.state(), &NavigationState::Listing);

        assert!(nav.timer_elapsed(ticket, &registry).is_none());
        assert_eq!(nav.state(), &NavigationState::Listing);
    }

    #[test]
    fn select_is_ignored_in_detail() {
        let registry = sample_registry();
        let mut nav = Navigator::default();
        let now = Instant::now();

        let ticket = nav.select(id("git-basics"), now).unwrap();
        nav.timer_elapsed(ticket, &registry);
        assert!(nav.select(id("rust-traits"), now).is_none());
        assert_eq!(nav.state(), &NavigationState::Detail(id("git-basics")));
    }

    #[test]
    fn go_home_is_idempotent() {
        let mut nav = Navigator::default();
        assert!(nav.go_home().is_none());
        assert!(nav.go_home().is_none());
        assert_eq!(nav.state(), &NavigationState::Listing);
    }
}

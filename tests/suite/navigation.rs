//! Navigation state machine driven through the app

use std::time::{Duration, Instant};

use primer_core::{NavigationState, Screen};

use crate::common::{AFTER_LOADING, open_topic, verified_app};

#[test]
fn select_then_back_round_trip() {
    let mut app = verified_app();
    let now = Instant::now();
    let before: Vec<_> = app.registry().topics().cloned().collect();

    app.select_topic("rust-ownership".try_into().unwrap(), now);
    assert!(matches!(app.screen(), Screen::Loading(id) if id.as_str() == "rust-ownership"));

    app.tick(now + AFTER_LOADING);
    let Screen::Detail(topic) = app.screen() else {
        panic!("expected detail");
    };
    assert_eq!(topic.id.as_str(), "rust-ownership");

    app.back();
    assert_eq!(app.screen(), Screen::Listing);
    let after: Vec<_> = app.registry().topics().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn missing_topic_degrades_to_listing() {
    let mut app = verified_app();
    let now = Instant::now();

    app.select_topic("does-not-exist".try_into().unwrap(), now);
    assert!(matches!(app.navigation(), NavigationState::Loading(_)));

    app.tick(now + AFTER_LOADING);
    assert_eq!(app.screen(), Screen::Listing);
    assert!(app.navigation().is_listing());
}

#[test]
fn loading_waits_for_the_timer() {
    let mut app = verified_app();
    let now = Instant::now();

    app.select_topic("git-basics".try_into().unwrap(), now);
    app.tick(now + Duration::from_millis(10));
    assert!(matches!(app.screen(), Screen::Loading(_)));
}

#[test]
fn newer_selection_wins() {
    let mut app = verified_app();
    let now = Instant::now();

    app.select_topic("rust-ownership".try_into().unwrap(), now);
    app.select_topic("git-basics".try_into().unwrap(), now + Duration::from_millis(100));
    app.tick(now + AFTER_LOADING);

    let Screen::Detail(topic) = app.screen() else {
        panic!("expected detail");
    };
    assert_eq!(topic.id.as_str(), "git-basics");
}

#[test]
fn back_during_loading_cancels_the_pending_timer() {
    let mut app = verified_app();
    let now = Instant::now();

    app.select_topic("rust-ownership".try_into().unwrap(), now);
    app.back();
    app.tick(now + AFTER_LOADING);
    assert_eq!(app.screen(), Screen::Listing);
}

#[test]
fn go_home_is_idempotent() {
    let mut app = verified_app();
    app.go_home();
    app.go_home();
    assert_eq!(app.screen(), Screen::Listing);

    open_topic(&mut app, "git-basics", Instant::now());
    app.go_home();
    assert_eq!(app.screen(), Screen::Listing);
}

#[test]
fn registry_lookup_is_stable() {
    let mut app = verified_app();
    let first = app.registry().lookup_str("rust-ownership").cloned();
    open_topic(&mut app, "rust-ownership", Instant::now());
    app.back();
    let second = app.registry().lookup_str("rust-ownership").cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn listing_filter_narrows_and_selects() {
    let mut app = verified_app();
    let now = Instant::now();

    app.begin_filter();
    for c in "git".chars() {
        app.filter_push(c);
    }
    app.finish_filter();
    let visible: Vec<&str> = app.visible_topics().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(visible, vec!["git-basics"]);

    app.open_selected(now);
    app.tick(now + AFTER_LOADING);
    assert!(matches!(app.screen(), Screen::Detail(topic) if topic.id.as_str() == "git-basics"));
}

//! Access gate behaviour end to end

use std::fs;

use primer_core::gate::{expected_code, verify};
use primer_core::{GateTime, JsonFileStore, Screen};
use tempfile::tempdir;

use crate::common::{app_with_store, locked_app, sample_topics};

#[test]
fn worked_example() {
    let now = GateTime::new(5, 21, 6);
    assert_eq!(expected_code(now), "5216");
    assert!(verify("5216", now));
    assert!(verify("826068", now));
    assert!(!verify("0000", now));
}

#[test]
fn override_is_time_independent() {
    for (minute, day, month) in [(0, 1, 1), (59, 31, 12), (30, 15, 10)] {
        assert!(verify("826068", GateTime::new(minute, day, month)));
    }
}

#[test]
fn long_concatenation_is_truncated() {
    // "45" + "30" + "12" = "453012"
    let now = GateTime::new(45, 30, 12);
    assert_eq!(expected_code(now), "4530");
    assert!(!verify("453012", now));
}

#[test]
fn failed_attempts_never_lock_out() {
    let mut app = locked_app();
    let now = GateTime::new(5, 21, 6);

    for _ in 0..20 {
        for c in "0000".chars() {
            app.gate_push(c);
        }
        assert!(!app.gate_submit(now));
        assert!(app.view().gate.error.is_some());
        assert_eq!(app.screen(), Screen::Gate);
    }

    for c in "5216".chars() {
        app.gate_push(c);
    }
    assert!(app.gate_submit(now));
    assert!(app.view().gate.error.is_none());
    assert_eq!(app.screen(), Screen::Listing);
}

#[test]
fn verification_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let mut first = app_with_store(sample_topics(), Box::new(JsonFileStore::new(&path)));
    assert!(!first.is_verified());
    for c in "826068".chars() {
        first.gate_push(c);
    }
    assert!(first.gate_submit(GateTime::new(0, 1, 1)));
    drop(first);

    let second = app_with_store(sample_topics(), Box::new(JsonFileStore::new(&path)));
    assert!(second.is_verified());
    assert_eq!(second.screen(), Screen::Listing);
}

#[test]
fn corrupt_state_file_means_unverified() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ not json").unwrap();

    let app = app_with_store(sample_topics(), Box::new(JsonFileStore::new(&path)));
    assert!(!app.is_verified());
}

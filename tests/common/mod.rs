//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::time::{Duration, Instant};

use serde_json::{Value, json};

use primer_core::{
    App, FixedColorScheme, KeyValueStore, MemoryStore, PrimerConfig, Registry,
};
use primer_types::{ColorScheme, Topic};

/// The documents shipped in the binary, read from the same files.
pub const EMBEDDED_TOPICS: &[(&str, &str)] = &[
    (
        "rust-ownership",
        include_str!("../../cli/assets/topics/rust-ownership.json"),
    ),
    (
        "git-basics",
        include_str!("../../cli/assets/topics/git-basics.json"),
    ),
    (
        "http-fundamentals",
        include_str!("../../cli/assets/topics/http-fundamentals.json"),
    ),
];

/// Comfortably past any clamped loading delay.
pub const AFTER_LOADING: Duration = Duration::from_secs(3);

pub fn embedded_topics() -> Vec<Topic> {
    EMBEDDED_TOPICS
        .iter()
        .map(|(_, raw)| serde_json::from_str(raw).expect("embedded topic parses"))
        .collect()
}

/// A topic document with the given content blocks.
pub fn topic_with(id: &str, category: &str, title: &str, content: Value) -> Topic {
    serde_json::from_value(json!({
        "id": id,
        "meta": {
            "title": title,
            "description": format!("About {title}"),
            "category": category,
            "difficulty": "beginner",
            "duration": 5
        },
        "content": content
    }))
    .expect("fixture topic parses")
}

pub fn sample_topics() -> Vec<Topic> {
    vec![
        topic_with(
            "rust-ownership",
            "Rust",
            "Ownership",
            json!([
                {"type": "heading", "level": 1, "text": "Ownership"},
                {"type": "paragraph", "text": "One owner per value."},
                {"type": "code", "language": "rust", "code": "let a = 1;"}
            ]),
        ),
        topic_with(
            "git-basics",
            "Tools",
            "Git Basics",
            json!([{"type": "paragraph", "text": "Snapshots."}]),
        ),
    ]
}

pub fn app_with_store(topics: Vec<Topic>, store: Box<dyn KeyValueStore>) -> App {
    App::new(
        Registry::new(topics),
        store,
        &PrimerConfig::default(),
        Box::new(FixedColorScheme(Some(ColorScheme::Dark))),
    )
}

pub fn locked_app() -> App {
    app_with_store(sample_topics(), Box::new(MemoryStore::default()))
}

pub fn verified_app() -> App {
    let mut store = MemoryStore::default();
    store.set_flag("verified", true).expect("memory store write");
    app_with_store(sample_topics(), Box::new(store))
}

/// Select a topic and let the loading window run out.
pub fn open_topic(app: &mut App, id: &str, now: Instant) {
    app.select_topic(id.try_into().expect("valid id"), now);
    app.tick(now + AFTER_LOADING);
}

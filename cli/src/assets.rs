//! Topic documents compiled into the binary.

use primer_types::Topic;

macro_rules! topic_asset {
    ($id:literal) => {
        (
            $id,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/topics/",
                $id,
                ".json"
            )),
        )
    };
}

/// `(id, JSON document)` for every topic shipped with the binary.
pub const TOPIC_SOURCES: &[(&str, &str)] = &[
    topic_asset!("rust-ownership"),
    topic_asset!("git-basics"),
    topic_asset!("http-fundamentals"),
];

/// Parse the embedded topics. A document that fails to parse, or whose `id`
/// disagrees with its asset name, is logged and skipped.
pub fn topics() -> Vec<Topic> {
    TOPIC_SOURCES
        .iter()
        .filter_map(|(id, raw)| match serde_json::from_str::<Topic>(raw) {
            Ok(topic) if topic.id.as_str() == *id => Some(topic),
            Ok(topic) => {
                tracing::error!(asset = id, found = %topic.id, "Topic id does not match asset name");
                None
            }
            Err(err) => {
                tracing::error!(asset = id, error = %err, "Failed to parse embedded topic");
                None
            }
        })
        .collect()
}

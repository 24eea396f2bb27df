//! Embedded topic documents

use primer_core::Registry;
use primer_types::{BlockKind, ContentBlock};

use crate::common::{EMBEDDED_TOPICS, embedded_topics};

#[test]
fn every_embedded_topic_parses_with_matching_id() {
    for (id, raw) in EMBEDDED_TOPICS {
        let topic: primer_types::Topic = serde_json::from_str(raw).unwrap();
        assert_eq!(topic.id.as_str(), *id);
        assert!(!topic.meta.title.is_empty());
        assert!(!topic.content.is_empty());
    }
}

#[test]
fn embedded_topics_cover_every_block_kind() {
    let kinds: Vec<BlockKind> = embedded_topics()
        .iter()
        .flat_map(|topic| topic.content.iter().filter_map(ContentBlock::kind))
        .collect();
    for kind in [
        BlockKind::Heading,
        BlockKind::Paragraph,
        BlockKind::Code,
        BlockKind::List,
        BlockKind::Table,
        BlockKind::Alert,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
}

#[test]
fn embedded_unknown_blocks_become_unsupported() {
    let unsupported = embedded_topics()
        .iter()
        .flat_map(|topic| topic.content.iter())
        .filter(|block| !block.is_supported())
        .count();
    assert_eq!(unsupported, 2);
}

#[test]
fn registry_holds_all_embedded_topics() {
    let registry = Registry::new(embedded_topics());
    assert_eq!(registry.len(), EMBEDDED_TOPICS.len());
    for (id, _) in EMBEDDED_TOPICS {
        assert!(registry.lookup_str(id).is_some());
    }
}

#[test]
fn extra_metadata_is_kept() {
    let topics = embedded_topics();
    let ownership = topics
        .iter()
        .find(|topic| topic.id.as_str() == "rust-ownership")
        .unwrap();
    assert_eq!(ownership.meta.extra.get("author"), Some(&serde_json::json!("Primer")));
    assert_eq!(ownership.next_steps.len(), 2);
}

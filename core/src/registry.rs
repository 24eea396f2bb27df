//! The topic registry: an immutable map from topic id to topic.
//!
//! Built exactly once at startup. Lookups of unknown ids return `None`; that is
//! a normal outcome, not an error.

use std::collections::HashMap;

use primer_types::{Topic, TopicId};
use thiserror::Error;

/// Rejected during construction. Reported through tracing, never surfaced to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate topic id '{0}' (first definition kept)")]
    DuplicateTopic(TopicId),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    topics: HashMap<TopicId, Topic>,
    /// Ids in catalogue order (category, then title).
    order: Vec<TopicId>,
}

impl Registry {
    /// Build the registry. Duplicate ids keep the first topic seen.
    #[must_use]
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        let (registry, rejected) = Self::build(topics);
        for err in rejected {
            tracing::warn!("{err}");
        }
        registry
    }

    /// Build the registry and return the rejected entries alongside it.
    pub fn build(topics: impl IntoIterator<Item = Topic>) -> (Self, Vec<RegistryError>) {
        let mut map: HashMap<TopicId, Topic> = HashMap::new();
        let mut rejected = Vec::new();

        for topic in topics {
            if map.contains_key(&topic.id) {
                rejected.push(RegistryError::DuplicateTopic(topic.id.clone()));
                continue;
            }
            map.insert(topic.id.clone(), topic);
        }

        let mut order: Vec<TopicId> = map.keys().cloned().collect();
        order.sort_by(|a, b| {
            let (ta, tb) = (&map[a].meta, &map[b].meta);
            ta.category
                .to_lowercase()
                .cmp(&tb.category.to_lowercase())
                .then_with(|| ta.title.to_lowercase().cmp(&tb.title.to_lowercase()))
                .then_with(|| a.cmp(b))
        });

        (Self { topics: map, order }, rejected)
    }

    #[must_use]
    pub fn lookup(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.get(id)
    }

    /// Lookup by raw string. Blank ids are never present.
    #[must_use]
    pub fn lookup_str(&self, id: &str) -> Option<&Topic> {
        let id = TopicId::new(id).ok()?;
        self.topics.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: &TopicId) -> bool {
        self.topics.contains_key(id)
    }

    /// All topics in catalogue order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.order.iter().filter_map(|id| self.topics.get(id))
    }

    /// Distinct categories in catalogue order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for topic in self.topics() {
            let category = topic.meta.category.as_str();
            if out.last() != Some(&category) {
                out.push(category);
            }
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

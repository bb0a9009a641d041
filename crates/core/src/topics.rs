//! Transformation functions for HubSpot blog topics

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Topic list envelope returned by `/blogs/v3/topics`
#[derive(Debug, Deserialize, Clone)]
pub struct TopicList {
    pub objects: Vec<RawTopic>,
}

/// Topic as returned by the API
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawTopic {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Topic with a string id, ready to be joined against posts and emitted
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Topic {
    pub id: String,
    #[serde(rename = "hubspotID")]
    pub hubspot_id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<serde_json::Value>,
    /// Passthrough fields, kept sorted so serialization is canonical
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Render an upstream identifier as a string.
///
/// Post-side references and topic ids are both compared in this form, so
/// `42` and `"42"` resolve to the same topic.
pub fn normalize_id(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn normalize_topic(raw: RawTopic) -> Topic {
    let mut fields: BTreeMap<_, _> = raw.fields.into_iter().collect();
    fields.remove("hubspotID");

    Topic {
        id: normalize_id(&raw.id),
        hubspot_id: raw.id,
        name: raw.name,
        fields,
    }
}

pub fn normalize_topics(raw: Vec<RawTopic>) -> Vec<Topic> {
    raw.into_iter().map(normalize_topic).collect()
}

/// Topics in upstream order, indexed by normalized id.
///
/// Built once per run and only read afterwards. When the upstream list
/// repeats an id, lookups resolve to its first occurrence.
#[derive(Debug, Default, Clone)]
pub struct TopicIndex {
    topics: Vec<Topic>,
    by_id: HashMap<String, usize>,
}

impl TopicIndex {
    pub fn new(topics: Vec<Topic>) -> Self {
        let mut by_id = HashMap::with_capacity(topics.len());
        for (position, topic) in topics.iter().enumerate() {
            by_id.entry(topic.id.clone()).or_insert(position);
        }

        Self { topics, by_id }
    }

    pub fn from_raw(raw: Vec<RawTopic>) -> Self {
        Self::new(normalize_topics(raw))
    }

    /// Look up a topic by its string id
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.by_id.get(id).map(|&position| &self.topics[position])
    }

    /// Number of distinct ids in the index
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Every topic received, duplicates included, in upstream order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn into_topics(self) -> Vec<Topic> {
        self.topics
    }
}

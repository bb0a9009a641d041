//! Node construction and registration
//!
//! Every topic and post becomes a [`Node`]: the record's own fields, a
//! host-assigned id, no parent, no children, and an `internal` block holding
//! the type tag, the canonical JSON serialization of the record, and the MD5
//! digest of that serialization. Identical records always serialize to the
//! same text, so the digest can be used for change detection between runs.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::host::Host;
use crate::posts::Post;
use crate::topics::Topic;

/// Keys owned by the node envelope; a record field with one of these names
/// is shadowed by the envelope.
const RESERVED_KEYS: [&str; 4] = ["id", "parent", "children", "internal"];

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    #[serde(rename = "HubspotTopic")]
    Topic,
    #[serde(rename = "HubspotPost")]
    Post,
}

impl NodeType {
    pub fn type_tag(self) -> &'static str {
        match self {
            NodeType::Topic => "HubspotTopic",
            NodeType::Post => "HubspotPost",
        }
    }

    fn seed_prefix(self) -> &'static str {
        match self {
            NodeType::Topic => "hubspot-topic-",
            NodeType::Post => "hubspot-post-",
        }
    }

    /// Seed handed to [`Host::create_node_id`] for a record with `record_id`
    pub fn seed(self, record_id: &str) -> String {
        format!("{}{record_id}", self.seed_prefix())
    }

    fn kind(self) -> &'static str {
        match self {
            NodeType::Topic => "topic",
            NodeType::Post => "post",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_tag())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Internal {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub content: String,
    #[serde(rename = "contentDigest")]
    pub content_digest: String,
}

/// A record wrapped for the content graph
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub internal: Internal,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Records that can be emitted as nodes
pub trait Record: Serialize {
    const NODE_TYPE: NodeType;

    fn record_id(&self) -> &str;
}

impl Record for Topic {
    const NODE_TYPE: NodeType = NodeType::Topic;

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Post {
    const NODE_TYPE: NodeType = NodeType::Post;

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Lowercase hex MD5 of `content`
pub fn content_digest(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Wrap `record` in a node with the given host id.
pub fn build_node<R: Record>(id: String, record: &R) -> Result<Node, TransformError> {
    let node_type = R::NODE_TYPE;
    let serialize_error = |source| TransformError::Serialize {
        kind: node_type.kind(),
        id: record.record_id().to_string(),
        source,
    };

    let content = serde_json::to_string(record).map_err(serialize_error)?;
    let mut fields = match serde_json::to_value(record).map_err(serialize_error)? {
        serde_json::Value::Object(map) => map,
        _ => return Err(TransformError::NotAnObject(node_type.kind())),
    };
    for key in RESERVED_KEYS {
        fields.remove(key);
    }

    Ok(Node {
        id,
        parent: None,
        children: Vec::new(),
        internal: Internal {
            node_type,
            content_digest: content_digest(&content),
            content,
        },
        fields,
    })
}

/// Ask the host for an id and build the node for `record`.
pub fn prepare_node<R: Record, H: Host + ?Sized>(
    host: &H,
    record: &R,
) -> Result<Node, TransformError> {
    let id = host.create_node_id(&R::NODE_TYPE.seed(record.record_id()));
    build_node(id, record)
}

/// Counts of nodes handed to the host
#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct EmitSummary {
    pub posts: usize,
    pub topics: usize,
}

/// Register one node per post and one per topic, posts first.
///
/// All nodes are built before the first registration, so a serialization
/// failure leaves the host untouched.
pub fn register_nodes<H: Host + ?Sized>(
    host: &mut H,
    posts: &[Post],
    topics: &[Topic],
) -> Result<EmitSummary, TransformError> {
    let post_nodes = posts
        .iter()
        .map(|post| prepare_node(&*host, post))
        .collect::<Result<Vec<_>, _>>()?;
    let topic_nodes = topics
        .iter()
        .map(|topic| prepare_node(&*host, topic))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = EmitSummary {
        posts: post_nodes.len(),
        topics: topic_nodes.len(),
    };

    for node in post_nodes.into_iter().chain(topic_nodes) {
        host.create_node(node);
    }

    Ok(summary)
}

//! Core library for hubsource
//!
//! This crate implements the **Functional Core** of the hubsource application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`hubsource_core`** (this crate): Pure transformation functions with zero I/O
//! - **`hubsource`**: HTTP calls, configuration loading, node sinks, and the CLI
//!   (the Imperative Shell)
//!
//! Everything here is deterministic: the same API payloads always produce the
//! same nodes, ids and content digests. Tests run against fixture data, no HTTP
//! mocking required.
//!
//! # Module Organization
//!
//! - [`options`]: Plugin options (`key`, `filters`) and their validation
//! - [`query`]: Endpoint URLs and filter query strings
//! - [`topics`]: Topic normalization and the id → topic index
//! - [`posts`]: Post projection and topic resolution
//! - [`node`]: Node envelopes, content digests, registration with a host
//! - [`host`]: The [`host::Host`] seam and an in-memory implementation
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use hubsource_core::host::MemoryHost;
//! use hubsource_core::node::register_nodes;
//! use hubsource_core::posts::{transform_posts, PostList};
//! use hubsource_core::topics::{TopicIndex, TopicList};
//!
//! let topics: TopicList = serde_json::from_str(topics_body)?;
//! let posts: PostList = serde_json::from_str(posts_body)?;
//!
//! let index = TopicIndex::from_raw(topics.objects);
//! let posts = transform_posts(posts.objects, &index);
//!
//! let mut host = MemoryHost::new();
//! let summary = register_nodes(&mut host, &posts, index.topics())?;
//! assert_eq!(summary.posts, posts.len());
//! ```

pub mod error;
pub mod host;
pub mod node;
pub mod options;
pub mod posts;
pub mod query;
pub mod topics;

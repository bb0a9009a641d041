//! Transformation functions for HubSpot blog posts
//!
//! Raw posts from `/content/api/v2/blog-posts` are projected into a flatter
//! [`Post`] shape: some fields are copied verbatim, some are renamed, the
//! author is reduced to a fixed set of profile fields, and topic ids are
//! resolved against a [`TopicIndex`].

use serde::{Deserialize, Serialize};

use crate::topics::{normalize_id, Topic, TopicIndex};

/// Post list envelope returned by the API
#[derive(Debug, Deserialize, Clone)]
pub struct PostList {
    pub objects: Vec<RawPost>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl PostList {
    /// Whether the upstream reports more posts than this single page carries
    pub fn is_truncated(&self) -> bool {
        match self.total {
            Some(total) => total > self.offset.unwrap_or(0) + self.objects.len() as u64,
            None => false,
        }
    }
}

/// Blog post as returned by the API
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RawPost {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub post_body: Option<serde_json::Value>,
    #[serde(default)]
    pub state: Option<serde_json::Value>,
    /// `None` when absent or not an author object
    #[serde(default, deserialize_with = "lenient")]
    pub blog_post_author: Option<RawAuthor>,
    #[serde(default)]
    pub featured_image: Option<serde_json::Value>,
    #[serde(default)]
    pub featured_image_alt_text: Option<serde_json::Value>,
    #[serde(default)]
    pub featured_image_height: Option<serde_json::Value>,
    #[serde(default)]
    pub featured_image_length: Option<serde_json::Value>,
    #[serde(default)]
    pub featured_image_width: Option<serde_json::Value>,
    #[serde(default)]
    pub page_title: Option<serde_json::Value>,
    #[serde(default)]
    pub meta_description: Option<serde_json::Value>,
    #[serde(default)]
    pub post_summary: Option<serde_json::Value>,
    #[serde(default)]
    pub publish_date: Option<serde_json::Value>,
    #[serde(default)]
    pub updated: Option<serde_json::Value>,
    #[serde(default)]
    pub created: Option<serde_json::Value>,
    #[serde(default)]
    pub slug: Option<serde_json::Value>,
    #[serde(default)]
    pub subcategory: Option<serde_json::Value>,
    #[serde(default)]
    pub resolved_domain: Option<serde_json::Value>,
    #[serde(default)]
    pub label: Option<serde_json::Value>,
    #[serde(default)]
    pub tag_ids: Option<serde_json::Value>,
    #[serde(default)]
    pub topic_ids: Option<serde_json::Value>,
    #[serde(default)]
    pub absolute_url: Option<serde_json::Value>,
}

/// `blog_post_author` object embedded in a raw post
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RawAuthor {
    #[serde(default)]
    pub id: serde_json::Value,
    /// Either `{"avatar": "<url>"}` or, on some portals, the URL itself
    #[serde(default)]
    pub avatar: Option<serde_json::Value>,
    #[serde(default)]
    pub display_name: Option<serde_json::Value>,
    #[serde(default)]
    pub full_name: Option<serde_json::Value>,
    #[serde(default)]
    pub bio: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<serde_json::Value>,
    #[serde(default)]
    pub facebook: Option<serde_json::Value>,
    #[serde(default)]
    pub google_plus: Option<serde_json::Value>,
    #[serde(default)]
    pub linkedin: Option<serde_json::Value>,
    #[serde(default)]
    pub twitter: Option<serde_json::Value>,
    #[serde(default)]
    pub twitter_username: Option<serde_json::Value>,
    #[serde(default)]
    pub website: Option<serde_json::Value>,
    #[serde(default)]
    pub slug: Option<serde_json::Value>,
}

/// Author profile attached to a transformed post
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    #[serde(rename = "hubspotID")]
    pub hubspot_id: serde_json::Value,
    pub avatar: Option<serde_json::Value>,
    pub name: Option<serde_json::Value>,
    pub full_name: Option<serde_json::Value>,
    pub bio: Option<serde_json::Value>,
    pub email: Option<serde_json::Value>,
    pub facebook: Option<serde_json::Value>,
    pub google_plus: Option<serde_json::Value>,
    pub linkedin: Option<serde_json::Value>,
    pub twitter: Option<serde_json::Value>,
    pub twitter_username: Option<serde_json::Value>,
    pub website: Option<serde_json::Value>,
    pub slug: Option<serde_json::Value>,
}

/// SEO metadata
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Meta {
    pub title: Option<serde_json::Value>,
    pub description: Option<serde_json::Value>,
}

/// Transformed post
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    #[serde(rename = "hubspotID")]
    pub hubspot_id: serde_json::Value,
    pub title: Option<serde_json::Value>,
    pub body: Option<serde_json::Value>,
    pub state: Option<serde_json::Value>,
    pub author: Option<Author>,
    pub featured_image: Option<serde_json::Value>,
    pub featured_image_alt_text: Option<serde_json::Value>,
    pub featured_image_height: Option<serde_json::Value>,
    pub featured_image_length: Option<serde_json::Value>,
    pub featured_image_width: Option<serde_json::Value>,
    pub meta: Meta,
    pub summary: Option<serde_json::Value>,
    pub published: Option<serde_json::Value>,
    pub updated: Option<serde_json::Value>,
    pub created: Option<serde_json::Value>,
    pub slug: Option<serde_json::Value>,
    pub subcategory: Option<serde_json::Value>,
    pub resolved_domain: Option<serde_json::Value>,
    pub label: Option<serde_json::Value>,
    pub tag_ids: Option<serde_json::Value>,
    pub topics: Vec<Topic>,
    pub absolute_url: Option<serde_json::Value>,
}

/// Read an optional nested object, treating a value of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Pull the avatar out of the author's `avatar` value.
///
/// `{"avatar": x}` unwraps to `x`; any other non-null value is kept as is.
fn unwrap_avatar(avatar: Option<serde_json::Value>) -> Option<serde_json::Value> {
    match avatar? {
        serde_json::Value::Object(mut map) => map.remove("avatar").filter(|v| !v.is_null()),
        serde_json::Value::Null => None,
        other => Some(other),
    }
}

/// Topic ids of a raw post; anything other than an array counts as none
fn topic_ids(raw: &Option<serde_json::Value>) -> &[serde_json::Value] {
    match raw {
        Some(serde_json::Value::Array(ids)) => ids,
        _ => &[],
    }
}

pub fn transform_author(raw: RawAuthor) -> Author {
    Author {
        id: normalize_id(&raw.id),
        hubspot_id: raw.id,
        avatar: unwrap_avatar(raw.avatar),
        name: raw.display_name,
        full_name: raw.full_name,
        bio: raw.bio,
        email: raw.email,
        facebook: raw.facebook,
        google_plus: raw.google_plus,
        linkedin: raw.linkedin,
        twitter: raw.twitter,
        twitter_username: raw.twitter_username,
        website: raw.website,
        slug: raw.slug,
    }
}

/// Resolve topic ids against the index.
///
/// Ids without a matching topic are dropped; the rest keep their order.
pub fn resolve_topics(topic_ids: &[serde_json::Value], topics: &TopicIndex) -> Vec<Topic> {
    topic_ids
        .iter()
        .filter_map(|id| topics.get(&normalize_id(id)))
        .cloned()
        .collect()
}

/// Project a raw post into a [`Post`], joining its topics.
pub fn transform_post(raw: RawPost, topics: &TopicIndex) -> Post {
    let resolved = resolve_topics(topic_ids(&raw.topic_ids), topics);

    Post {
        id: normalize_id(&raw.id),
        hubspot_id: raw.id,
        title: raw.title,
        body: raw.post_body,
        state: raw.state,
        author: raw.blog_post_author.map(transform_author),
        featured_image: raw.featured_image,
        featured_image_alt_text: raw.featured_image_alt_text,
        featured_image_height: raw.featured_image_height,
        featured_image_length: raw.featured_image_length,
        featured_image_width: raw.featured_image_width,
        meta: Meta {
            title: raw.page_title,
            description: raw.meta_description,
        },
        summary: raw.post_summary,
        published: raw.publish_date,
        updated: raw.updated,
        created: raw.created,
        slug: raw.slug,
        subcategory: raw.subcategory,
        resolved_domain: raw.resolved_domain,
        label: raw.label,
        tag_ids: raw.tag_ids,
        topics: resolved,
        absolute_url: raw.absolute_url,
    }
}

/// Transform every post in the page; the output has one post per input post.
pub fn transform_posts(raw: Vec<RawPost>, topics: &TopicIndex) -> Vec<Post> {
    raw.into_iter()
        .map(|post| transform_post(post, topics))
        .collect()
}

//! Endpoint URL construction for the HubSpot content API

use crate::options::Filters;

/// Public HubSpot API host
pub const DEFAULT_API_BASE: &str = "https://api.hubapi.com";

/// Upper bound on topics requested in the single topic-list call
pub const TOPIC_LIMIT: usize = 1000;

const POSTS_PATH: &str = "/content/api/v2/blog-posts";
const TOPICS_PATH: &str = "/blogs/v3/topics";
const KEY_PARAM: &str = "hapikey=";

/// Serialize filters into a query string (without the leading `?` or `&`).
///
/// Keys come out sorted. Arrays expand into one `name=value` pair per
/// element, `null` renders the bare name, and nested objects are sent as
/// their JSON text.
pub fn stringify_filters(filters: &Filters) -> String {
    let mut pairs = Vec::new();

    for (name, value) in filters {
        let name = urlencoding::encode(name);
        match value {
            serde_json::Value::Array(values) => {
                for value in values {
                    pairs.push(render_pair(&name, value));
                }
            }
            value => pairs.push(render_pair(&name, value)),
        }
    }

    pairs.join("&")
}

fn render_pair(name: &str, value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => name.to_string(),
        serde_json::Value::String(s) => format!("{name}={}", urlencoding::encode(s)),
        other => format!("{name}={}", urlencoding::encode(&other.to_string())),
    }
}

/// Build the post-list endpoint for `key`, appending `filters` when present.
pub fn posts_url(base: &str, key: &str, filters: &Filters) -> String {
    let base = base.trim_end_matches('/');
    let query = stringify_filters(filters);

    if query.is_empty() {
        format!("{base}{POSTS_PATH}?hapikey={}", urlencoding::encode(key))
    } else {
        format!(
            "{base}{POSTS_PATH}?hapikey={}&{query}",
            urlencoding::encode(key)
        )
    }
}

/// Build the topic-list endpoint for `key`, capped at [`TOPIC_LIMIT`].
pub fn topics_url(base: &str, key: &str) -> String {
    format!(
        "{}{TOPICS_PATH}?hapikey={}&limit={TOPIC_LIMIT}",
        base.trim_end_matches('/'),
        urlencoding::encode(key)
    )
}

/// Hide the API key in a URL before it is logged or printed.
///
/// Only the value of the `hapikey` query parameter is replaced; the rest of
/// the URL is returned untouched.
pub fn redact_key(url: &str) -> String {
    let Some((head, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with(KEY_PARAM) {
                format!("{KEY_PARAM}***")
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{head}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filters(pairs: &[(&str, serde_json::Value)]) -> Filters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_posts_url_without_filters() {
        let url = posts_url(DEFAULT_API_BASE, "abc123", &Filters::new());
        assert_eq!(
            url,
            "https://api.hubapi.com/content/api/v2/blog-posts?hapikey=abc123"
        );
        assert!(!url.contains('&'));
    }

    #[test]
    fn test_posts_url_with_filters() {
        let url = posts_url(
            DEFAULT_API_BASE,
            "abc123",
            &filters(&[("state", json!("PUBLISHED")), ("limit", json!(20))]),
        );
        assert_eq!(
            url,
            "https://api.hubapi.com/content/api/v2/blog-posts?hapikey=abc123&limit=20&state=PUBLISHED"
        );
    }

    #[test]
    fn test_posts_url_filters_follow_key() {
        let url = posts_url(
            "http://localhost:8080/",
            "k",
            &filters(&[("content_group_id", json!(42))]),
        );
        let key_pos = url.find("hapikey=k").unwrap();
        let filter_pos = url.find("content_group_id=42").unwrap();
        assert!(key_pos < filter_pos);
        assert!(url.starts_with("http://localhost:8080/content/api/v2/blog-posts?"));
    }

    #[test]
    fn test_topics_url() {
        assert_eq!(
            topics_url(DEFAULT_API_BASE, "abc123"),
            "https://api.hubapi.com/blogs/v3/topics?hapikey=abc123&limit=1000"
        );
    }

    #[test]
    fn test_stringify_filters_encoding() {
        let query = stringify_filters(&filters(&[("name", json!("hello world & more"))]));
        assert_eq!(query, "name=hello%20world%20%26%20more");
    }

    #[test]
    fn test_stringify_filters_arrays_and_null() {
        let query = stringify_filters(&filters(&[
            ("topic_id", json!([1, 2])),
            ("archived", json!(null)),
            ("draft", json!(false)),
        ]));
        assert_eq!(query, "archived&draft=false&topic_id=1&topic_id=2");
    }

    #[test]
    fn test_stringify_filters_empty() {
        assert_eq!(stringify_filters(&Filters::new()), "");
    }

    #[test]
    fn test_redact_key() {
        let url = topics_url(DEFAULT_API_BASE, "secret");
        let redacted = redact_key(&url);
        assert!(!redacted.contains("secret"));
        assert_eq!(
            redacted,
            "https://api.hubapi.com/blogs/v3/topics?hapikey=***&limit=1000"
        );
    }

    #[test]
    fn test_redact_key_leaves_host_and_filters_alone() {
        let url = posts_url(
            DEFAULT_API_BASE,
            "api",
            &filters(&[("slug", json!("api-design"))]),
        );
        assert_eq!(
            redact_key(&url),
            "https://api.hubapi.com/content/api/v2/blog-posts?hapikey=***&slug=api-design"
        );
    }

    #[test]
    fn test_redact_key_without_query() {
        assert_eq!(
            redact_key("https://api.hubapi.com/blogs/v3/topics"),
            "https://api.hubapi.com/blogs/v3/topics"
        );
    }
}

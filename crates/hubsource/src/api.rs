use std::time::Duration;

use hubsource_core::options::Filters;
use hubsource_core::posts::PostList;
use hubsource_core::query::{posts_url, redact_key, topics_url};
use hubsource_core::topics::{RawTopic, TopicList};
use serde::de::DeserializeOwned;

use crate::prelude::*;

const TOPICS_ENDPOINT: &str = "topics";
const POSTS_ENDPOINT: &str = "blog-posts";

/// Thin client over the two read-only HubSpot content endpoints
#[derive(Debug, Clone)]
pub struct HubspotClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl HubspotClient {
    pub fn new(base_url: &str, key: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hubsource/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            key: key.to_string(),
        })
    }

    /// Post-list URL for `filters`, with the key hidden
    pub fn display_posts_url(&self, filters: &Filters) -> String {
        redact_key(&posts_url(&self.base_url, &self.key, filters))
    }

    /// Fetch the topic list (one page, capped at 1000 topics)
    pub async fn fetch_topics(&self) -> Result<Vec<RawTopic>, Error> {
        let url = topics_url(&self.base_url, &self.key);
        let list: TopicList = self.get_json(TOPICS_ENDPOINT, &url).await?;

        for topic in &list.objects {
            log::debug!(
                "Found topic: {}",
                value_text(topic.name.as_ref()).unwrap_or_else(|| "(unnamed)".to_string())
            );
        }

        Ok(list.objects)
    }

    /// Fetch one page of blog posts matching `filters`
    pub async fn fetch_posts(&self, filters: &Filters) -> Result<PostList, Error> {
        let url = posts_url(&self.base_url, &self.key, filters);
        self.get_json(POSTS_ENDPOINT, &url).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
    ) -> Result<T, Error> {
        log::debug!("GET {}", redact_key(url));

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network {
                endpoint,
                message: e.without_url().to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Upstream {
                endpoint,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| Error::Network {
            endpoint,
            message: e.without_url().to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| Error::Parse {
            endpoint,
            message: e.to_string(),
        })
    }
}

//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls upstream endpoints, the per-call timeout, the
//! cache TTL and the client identifier sent upstream. Every field has a
//! default so partial TOML documents deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default per-call timeout for every upstream request.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

/// Default cache time-to-live (five minutes).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Fixed browser-like client identifier sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration for the aggregation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-request timeout in seconds, applied to every upstream call.
    pub timeout_seconds: u64,
    /// How long resolved results stay cached, in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Client identifier sent as the `User-Agent` header.
    pub user_agent: String,
    /// Upstream API locations.
    pub endpoints: Endpoints,
    /// News feeds queried for the news category, in merge order.
    pub news_feeds: Vec<NewsFeed>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            endpoints: Endpoints::default(),
            news_feeds: NewsFeed::defaults(),
        }
    }
}

/// Base URLs of the upstream providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Question-answering API used for general results.
    pub general: String,
    /// Image-prompt search API.
    pub images: String,
    /// Video search API.
    pub videos: String,
    /// Front-end base used to build video watch links.
    pub video_watch_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            general: "https://api.duckduckgo.com/".to_owned(),
            images: "https://lexica.art/api/v1/search".to_owned(),
            videos: "https://piped.video/api/v1/search".to_owned(),
            video_watch_base: "https://piped.video".to_owned(),
        }
    }
}

/// A named news feed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    /// Source name stamped onto every record from this feed.
    pub name: String,
    /// Location of the feed document.
    pub url: String,
}

impl NewsFeed {
    /// Build a feed entry.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The three built-in feeds.
    pub fn defaults() -> Vec<NewsFeed> {
        vec![
            Self::new("BBC News", "https://feeds.bbci.co.uk/news/rss.xml"),
            Self::new("Reuters", "https://feeds.reuters.com/reuters/businessNews"),
            Self::new(
                "Times of India",
                "https://timesofindia.indiatimes.com/rssfeedstopstories.cms",
            ),
        ]
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `user_agent` must not be blank
    /// - every endpoint must be non-blank
    /// - `news_feeds` must not be empty, and no feed may have a blank URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SearchError::Config("user_agent must not be empty".into()));
        }
        let endpoints = [
            ("general", &self.endpoints.general),
            ("images", &self.endpoints.images),
            ("videos", &self.endpoints.videos),
            ("video_watch_base", &self.endpoints.video_watch_base),
        ];
        for (name, value) in endpoints {
            if value.trim().is_empty() {
                return Err(SearchError::Config(format!(
                    "endpoints.{name} must not be empty"
                )));
            }
        }
        if self.news_feeds.is_empty() {
            return Err(SearchError::Config(
                "at least one news feed must be configured".into(),
            ));
        }
        if let Some(feed) = self.news_feeds.iter().find(|f| f.url.trim().is_empty()) {
            return Err(SearchError::Config(format!(
                "news feed {:?} has an empty url",
                feed.name
            )));
        }
        Ok(())
    }

    /// Whether resolved results should be cached at all.
    pub fn caching_enabled(&self) -> bool {
        self.cache_ttl_seconds > 0
    }
}

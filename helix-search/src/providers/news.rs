//! Headlines merged from a fixed list of news feeds.
//!
//! All feeds are fetched concurrently and awaited together; a slow or
//! failing feed never cancels the others. Picks are merged in the order the
//! feeds are configured, each feed's own order preserved.

use crate::config::{NewsFeed, SearchConfig};
use crate::error::SearchError;
use crate::feed;
use crate::http;
use crate::provider::Provider;
use crate::types::{Category, Query, ResultRecord};

/// Feed-backed provider for the news category.
pub struct NewsProvider;

impl Provider for NewsProvider {
    fn category(&self) -> Category {
        Category::News
    }

    /// Fetch every configured feed and merge the picks.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllSourcesFailed`] only if **every** feed
    /// fails. Feeds that load but contain nothing relevant simply contribute
    /// no records.
    async fn fetch(
        &self,
        query: &Query,
        client: &reqwest::Client,
        config: &SearchConfig,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tracing::trace!(query = %query, feeds = config.news_feeds.len(), "news fan-out");

        let futures: Vec<_> = config
            .news_feeds
            .iter()
            .map(|source| async move { (source, fetch_feed(client, source, query).await) })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        let mut merged: Vec<ResultRecord> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        let mut any_loaded = false;

        for (source, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    tracing::debug!(feed = %source.name, count = records.len(), "feed returned items");
                    any_loaded = true;
                    merged.extend(records);
                }
                Err(err) => {
                    tracing::warn!(feed = %source.name, error = %err, "feed fetch failed");
                    errors.push(format!("{}: {err}", source.name));
                }
            }
        }

        if !any_loaded {
            return Err(SearchError::AllSourcesFailed(errors.join("; ")));
        }

        merged.truncate(Category::News.cap());
        Ok(merged)
    }

    fn fallback_on_empty(&self) -> bool {
        false
    }
}

/// Fetch one feed and select its stories for `query`.
async fn fetch_feed(
    client: &reqwest::Client,
    source: &NewsFeed,
    query: &Query,
) -> Result<Vec<ResultRecord>, SearchError> {
    let markup = http::get_text(client, &source.name, &source.url, &[]).await?;
    Ok(parse_feed(&markup, &source.name, query))
}

/// Map the stories of one feed document into records attributed to `source`.
pub(crate) fn parse_feed(markup: &str, source: &str, query: &Query) -> Vec<ResultRecord> {
    let raw = feed::scan(markup);
    feed::select_for_query(&raw, query.as_str())
        .into_iter()
        .map(|item| ResultRecord::new(item.title, item.description, item.link, source))
        .collect()
}

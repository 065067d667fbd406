//! Aggregation dispatcher: category routing, cache lookup, provider call,
//! fallback and capping.

use std::time::Duration;

use crate::cache::{CacheStore, MokaStore};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::{self, Resolution};
use crate::providers::{GeneralProvider, ImageProvider, NewsProvider, VideoProvider};
use crate::types::{Category, Query, ResultRecord};

/// Resolves `(query, category)` requests into capped result lists.
///
/// Holds one HTTP client and one cache store for its whole lifetime, so a
/// single instance is meant to be shared by every request a process serves.
pub struct Aggregator<S: CacheStore = MokaStore> {
    config: SearchConfig,
    client: reqwest::Client,
    store: S,
}

impl Aggregator<MokaStore> {
    /// Build an aggregator with its own [`MokaStore`] using the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let ttl = Duration::from_secs(config.cache_ttl_seconds);
        Self::with_store(config, MokaStore::new(ttl))
    }
}

impl<S: CacheStore> Aggregator<S> {
    /// Build an aggregator on top of an existing store.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::new`].
    pub fn with_store(config: SearchConfig, store: S) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// The cache store backing this aggregator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `raw` and resolve it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] if `raw` is blank. Provider
    /// failures never surface here.
    pub async fn search(
        &self,
        raw: &str,
        category: Category,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        let query = Query::parse(raw)?;
        Ok(self.resolve(&query, category).await)
    }

    /// Resolve `query` within `category`.
    ///
    /// # Pipeline
    ///
    /// 1. Build the cache key `"<category>-<query>"`
    /// 2. On a cache hit, return the cached list unchanged
    /// 3. On a miss, call the category's provider and settle the outcome
    ///    (real data, or the category's fallback set)
    /// 4. Cap the list at the category's limit
    /// 5. Store it if non-empty and not a stand-in for a failed provider,
    ///    then return it
    pub async fn resolve(&self, query: &Query, category: Category) -> Vec<ResultRecord> {
        let key = query.cache_key(category);
        let caching = self.config.caching_enabled();

        if caching {
            if let Some(cached) = self.store.get(&key).await {
                tracing::debug!(%category, count = cached.len(), "cache hit");
                return cached;
            }
        }

        let Resolution { mut records, tier } = self.dispatch(query, category).await;
        records.truncate(category.cap());

        tracing::debug!(
            %category,
            count = records.len(),
            ?tier,
            "resolved"
        );

        if caching && tier.is_cacheable() && !records.is_empty() {
            self.store.set(key, records.clone()).await;
        }
        records
    }

    async fn dispatch(&self, query: &Query, category: Category) -> Resolution {
        let (client, config) = (&self.client, &self.config);
        match category {
            Category::General => provider::run(&GeneralProvider, query, client, config).await,
            Category::Image => provider::run(&ImageProvider, query, client, config).await,
            Category::News => provider::run(&NewsProvider, query, client, config).await,
            Category::Video => provider::run(&VideoProvider, query, client, config).await,
        }
    }
}

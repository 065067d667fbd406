//! # helix-search
//!
//! Search-result aggregation for Helix.
//!
//! Given a query and a result category, this crate asks the matching
//! upstream provider, maps its response into a common [`ResultRecord`],
//! caches the list briefly, and falls back to synthetic records whenever
//! the provider is unreachable, slow or empty.
//!
//! ## Design
//!
//! - One provider per [`Category`]: a question-answering API (general), an
//!   image-prompt search API (images), three news feeds fetched concurrently
//!   (news) and a video search API (videos)
//! - Every upstream call is bounded by the configured timeout (8s default)
//! - Results are cached for five minutes under `"<category>-<query>"`;
//!   fallbacks standing in for a failed provider are not cached
//! - Provider failures are settled into fallback records; callers only ever
//!   see an error for a blank query or an invalid configuration
//!
//! ## Privacy
//!
//! - Query text is logged only at trace level
//! - Nothing is persisted beyond the in-memory cache

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod http;
pub mod provider;
pub mod providers;
pub mod types;

use std::time::Duration;

pub use aggregator::Aggregator;
pub use cache::{CacheStore, MokaStore, TtlStore};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use provider::{Provider, ProviderOutcome, Resolution, Tier};
pub use types::{Category, FeedItem, Query, ResultRecord};

/// Resolve `query` within `category` using the process-wide cache.
///
/// Builds a fresh HTTP client per call; long-lived callers should hold an
/// [`Aggregator`] instead.
///
/// # Errors
///
/// Returns [`SearchError::EmptyQuery`] for a blank query and
/// [`SearchError::Config`] for an invalid `config`. Provider failures are
/// absorbed into fallback records.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> helix_search::Result<()> {
/// use helix_search::{Category, SearchConfig};
///
/// let results = helix_search::search("rust", Category::News, &SearchConfig::default()).await?;
/// for result in &results {
///     println!("{} ({}): {}", result.title, result.source, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    category: Category,
    config: &SearchConfig,
) -> Result<Vec<ResultRecord>> {
    let query = Query::parse(query)?;
    let store = cache::global(Duration::from_secs(config.cache_ttl_seconds));
    let aggregator = Aggregator::with_store(config.clone(), store)?;
    Ok(aggregator.resolve(&query, category).await)
}

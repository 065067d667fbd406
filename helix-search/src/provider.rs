//! Trait definition for pluggable result providers, and the fallback policy
//! that settles a provider call into records.
//!
//! Each category (general, image, news, video) has one implementation of
//! [`Provider`]. A provider call never reaches the caller as an error:
//! [`run`] turns it into a [`ProviderOutcome`] and then into a
//! [`Resolution`], substituting the category's fallback set where needed.

use std::future::Future;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::fallback;
use crate::types::{Category, Query, ResultRecord};

/// A source of results for one [`Category`].
///
/// Implementors handle their own:
///
/// - URL construction with query encoding
/// - The HTTP request (bounded by the client's timeout)
/// - Mapping the provider's response shape into [`ResultRecord`]s
///
/// All implementations must be `Send + Sync` so the aggregator can be shared
/// across request handlers.
pub trait Provider: Send + Sync {
    /// Which category this provider serves.
    fn category(&self) -> Category;

    /// Fetch and map results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failure, timeout, non-success
    /// status or an undecodable payload.
    fn fetch(
        &self,
        query: &Query,
        client: &reqwest::Client,
        config: &SearchConfig,
    ) -> impl Future<Output = Result<Vec<ResultRecord>, SearchError>> + Send;

    /// Whether an empty (but successful) fetch should be replaced by the
    /// fallback set.
    fn fallback_on_empty(&self) -> bool {
        true
    }

    /// Synthetic records used when real data is unavailable.
    fn fallback(&self, query: &Query) -> Vec<ResultRecord> {
        fallback::records(self.category(), query)
    }
}

/// The raw result of one provider call.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// The provider returned at least one record.
    Fresh(Vec<ResultRecord>),
    /// The provider answered but had nothing usable.
    Empty,
    /// The provider could not be reached or its answer could not be used.
    Failed(SearchError),
}

impl From<Result<Vec<ResultRecord>, SearchError>> for ProviderOutcome {
    fn from(result: Result<Vec<ResultRecord>, SearchError>) -> Self {
        match result {
            Ok(records) if records.is_empty() => Self::Empty,
            Ok(records) => Self::Fresh(records),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Where the records of a [`Resolution`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Real provider data.
    Provider,
    /// The category's synthetic fallback set, standing in for an answer
    /// that had nothing usable.
    Fallback,
    /// The fallback set, standing in for a provider that failed. Never
    /// cached, so a recovered provider is picked up on the next request.
    Degraded,
}

impl Tier {
    /// Whether records of this tier may be stored in the cache.
    pub fn is_cacheable(self) -> bool {
        !matches!(self, Self::Degraded)
    }
}

/// The settled, caller-safe result of a provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub records: Vec<ResultRecord>,
    pub tier: Tier,
}

impl Resolution {
    fn provider(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            tier: Tier::Provider,
        }
    }

    fn fallback(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            tier: Tier::Fallback,
        }
    }

    fn degraded(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            tier: Tier::Degraded,
        }
    }
}

/// Settle an outcome using `provider`'s fallback policy.
pub fn settle<P: Provider + ?Sized>(
    provider: &P,
    query: &Query,
    outcome: ProviderOutcome,
) -> Resolution {
    let category = provider.category();
    match outcome {
        ProviderOutcome::Fresh(mut records) => {
            records.retain(ResultRecord::is_presentable);
            records.truncate(category.cap());
            if records.is_empty() && provider.fallback_on_empty() {
                Resolution::fallback(provider.fallback(query))
            } else {
                Resolution::provider(records)
            }
        }
        ProviderOutcome::Empty if provider.fallback_on_empty() => {
            tracing::debug!(%category, "provider returned nothing, using fallback");
            Resolution::fallback(provider.fallback(query))
        }
        ProviderOutcome::Empty => Resolution::provider(Vec::new()),
        ProviderOutcome::Failed(err) => {
            tracing::warn!(%category, error = %err, "provider failed, using fallback");
            Resolution::degraded(provider.fallback(query))
        }
    }
}

/// Call `provider` and settle the outcome.
pub async fn run<P: Provider>(
    provider: &P,
    query: &Query,
    client: &reqwest::Client,
    config: &SearchConfig,
) -> Resolution {
    let outcome = ProviderOutcome::from(provider.fetch(query, client, config).await);
    settle(provider, query, outcome)
}

//! General web results from the DuckDuckGo Instant Answer API.
//!
//! The API returns at most one "abstract" (a summary of the topic with its
//! source) plus a list of related topics. Topic text carries the title on
//! its first line; anything after that is treated as the description.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{truncate_chars, Category, Query, ResultRecord};

use super::{array_field, str_field};

const PROVIDER: &str = "DuckDuckGo";

/// Maximum related topics mapped per response.
const MAX_RELATED_TOPICS: usize = 6;

/// Maximum description length, in characters.
const MAX_DESCRIPTION_CHARS: usize = 160;

/// Question-answering provider for the general category.
pub struct GeneralProvider;

impl Provider for GeneralProvider {
    fn category(&self) -> Category {
        Category::General
    }

    async fn fetch(
        &self,
        query: &Query,
        client: &reqwest::Client,
        config: &SearchConfig,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tracing::trace!(query = %query, "DuckDuckGo instant answer lookup");

        let body = http::get_json(
            client,
            PROVIDER,
            &config.endpoints.general,
            &[("q", query.as_str()), ("format", "json")],
        )
        .await?;

        let results = parse_instant_answer(&body, query);
        tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
        Ok(results)
    }
}

/// Map an Instant Answer payload into records.
///
/// Missing or mistyped fields are skipped rather than treated as errors.
pub(crate) fn parse_instant_answer(body: &Value, query: &Query) -> Vec<ResultRecord> {
    let search_url = format!("https://duckduckgo.com/?q={}", query.url_encoded());
    let mut results = Vec::new();

    if let (Some(text), Some(source)) = (
        str_field(body, "AbstractText"),
        str_field(body, "AbstractSource"),
    ) {
        results.push(ResultRecord::new(
            str_field(body, "Heading").unwrap_or(query.as_str()),
            truncate_chars(text, MAX_DESCRIPTION_CHARS),
            str_field(body, "AbstractURL").unwrap_or(&search_url),
            source,
        ));
    }

    for topic in array_field(body, "RelatedTopics")
        .iter()
        .take(MAX_RELATED_TOPICS)
    {
        // Grouped topics carry a nested "Topics" list instead of "Text".
        let Some(text) = str_field(topic, "Text") else {
            continue;
        };
        let mut lines = text.split('\n');
        let title = lines.next().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let rest = lines.collect::<Vec<_>>().join(" ");
        let description = truncate_chars(rest.trim(), MAX_DESCRIPTION_CHARS);
        let description = if description.is_empty() {
            "Related topic".to_owned()
        } else {
            description
        };

        results.push(ResultRecord::new(
            title,
            description,
            str_field(topic, "FirstURL").unwrap_or(&search_url),
            PROVIDER,
        ));
    }

    results.truncate(Category::General.cap());
    results
}

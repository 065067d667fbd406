//! Image results from the Lexica prompt-search API.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{truncate_chars, Category, Query, ResultRecord};

use super::{array_field, str_field};

const PROVIDER: &str = "Lexica.art";

/// Maximum title length taken from an image prompt, in characters.
const MAX_TITLE_CHARS: usize = 60;

/// Image-prompt search provider for the image category.
pub struct ImageProvider;

impl Provider for ImageProvider {
    fn category(&self) -> Category {
        Category::Image
    }

    async fn fetch(
        &self,
        query: &Query,
        client: &reqwest::Client,
        config: &SearchConfig,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tracing::trace!(query = %query, "Lexica image search");

        let body = http::get_json(
            client,
            PROVIDER,
            &config.endpoints.images,
            &[("q", query.as_str())],
        )
        .await?;

        let results = parse_images(&body);
        tracing::debug!(count = results.len(), "Lexica results parsed");
        Ok(results)
    }
}

/// Map a Lexica search payload into records.
///
/// Entries without an image URL are dropped; the image URL doubles as the
/// link and the thumbnail.
pub(crate) fn parse_images(body: &Value) -> Vec<ResultRecord> {
    array_field(body, "images")
        .iter()
        .take(Category::Image.cap())
        .filter_map(|image| {
            let src = str_field(image, "src")?;
            let title = str_field(image, "prompt")
                .map(|p| truncate_chars(p, MAX_TITLE_CHARS))
                .unwrap_or_else(|| "AI Generated Image".to_owned());
            let model = str_field(image, "model").unwrap_or("Lexica AI");
            Some(ResultRecord::new(title, model, src, PROVIDER).with_thumbnail(src))
        })
        .collect()
}

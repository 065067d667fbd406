//! Video results from the Piped search API.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::fallback::VIDEO_PLACEHOLDER_THUMBNAIL;
use crate::http;
use crate::provider::Provider;
use crate::types::{Category, Query, ResultRecord};

use super::{array_field, str_field};

const PROVIDER: &str = "Piped";

/// Source name stamped onto video records.
const SOURCE: &str = "Piped (YouTube)";

/// Video search provider for the video category.
pub struct VideoProvider;

impl Provider for VideoProvider {
    fn category(&self) -> Category {
        Category::Video
    }

    async fn fetch(
        &self,
        query: &Query,
        client: &reqwest::Client,
        config: &SearchConfig,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tracing::trace!(query = %query, "Piped video search");

        let body = http::get_json(
            client,
            PROVIDER,
            &config.endpoints.videos,
            &[("q", query.as_str()), ("filter", "videos")],
        )
        .await?;

        let results = parse_videos(&body, &config.endpoints.video_watch_base);
        tracing::debug!(count = results.len(), "Piped results parsed");
        Ok(results)
    }
}

/// Map a Piped search payload into records linking under `watch_base`.
///
/// Only items typed `"video"` are considered; items whose URL carries no
/// video identifier are dropped.
pub(crate) fn parse_videos(body: &Value, watch_base: &str) -> Vec<ResultRecord> {
    let watch_base = watch_base.trim_end_matches('/');
    array_field(body, "items")
        .iter()
        .filter(|item| str_field(item, "type") == Some("video"))
        .filter_map(|item| {
            let id = video_id(str_field(item, "url")?)?;
            let title = str_field(item, "title").unwrap_or("Video");
            let uploader = str_field(item, "uploaderName").unwrap_or("Unknown");
            let duration = format_duration(item.get("duration"));
            let thumbnail = str_field(item, "thumbnail").unwrap_or(VIDEO_PLACEHOLDER_THUMBNAIL);
            Some(
                ResultRecord::new(
                    title,
                    format!("{uploader} • {duration}"),
                    format!("{watch_base}/watch?v={id}"),
                    SOURCE,
                )
                .with_thumbnail(thumbnail),
            )
        })
        .take(Category::Video.cap())
        .collect()
}

/// Pull the identifier out of a `/watch?v=<id>&...` URL.
fn video_id(url: &str) -> Option<&str> {
    let (_, tail) = url.split_once("/watch?v=")?;
    let id = tail.split('&').next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Render a duration given either as seconds or as preformatted text.
fn format_duration(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(secs) if secs < 0 => "live".to_owned(),
            Some(secs) => {
                let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
                if h > 0 {
                    format!("{h}:{m:02}:{s:02}")
                } else {
                    format!("{m}:{s:02}")
                }
            }
            None => "0:00".to_owned(),
        },
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        _ => "0:00".to_owned(),
    }
}

//! Core types: the normalised result record, result categories and the
//! validated query.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SearchError;

/// A single normalised hit, regardless of which provider produced it.
///
/// Records handed to callers always carry a non-empty `title` and `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Display title.
    pub title: String,
    /// Short text shown under the title.
    pub description: String,
    /// Link target.
    pub url: String,
    /// Human-readable name of the provider or feed the record came from.
    pub source: String,
    /// Preview image, for image and video results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ResultRecord {
    /// Build a record without a thumbnail.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
            source: source.into(),
            thumbnail: None,
        }
    }

    /// Attach a thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Whether this record may be returned to a caller.
    pub fn is_presentable(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }
}

/// One title/description/link triple pulled out of a news feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
}

/// The kinds of results the aggregator can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General web results from a question-answering API.
    General,
    /// Image results.
    Image,
    /// Headlines merged from several news feeds.
    News,
    /// Video results.
    Video,
}

impl Category {
    /// Parse the wire name used by the query interface.
    ///
    /// Unrecognised values fall back to [`Category::General`].
    pub fn from_param(param: &str) -> Self {
        match param.trim().to_ascii_lowercase().as_str() {
            "images" | "image" => Self::Image,
            "news" => Self::News,
            "videos" | "video" => Self::Video,
            _ => Self::General,
        }
    }

    /// The canonical wire name (`all`, `images`, `news`, `videos`).
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::General => "all",
            Self::Image => "images",
            Self::News => "news",
            Self::Video => "videos",
        }
    }

    /// Cache key namespace for this category.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Image => "images",
            Self::News => "news",
            Self::Video => "videos",
        }
    }

    /// Maximum number of records returned for this category.
    pub fn cap(&self) -> usize {
        match self {
            Self::General => 8,
            Self::Image => 12,
            Self::News => 9,
            Self::Video => 10,
        }
    }

    /// Returns all categories.
    pub fn all() -> &'static [Category] {
        &[Self::General, Self::Image, Self::News, Self::Video]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// A trimmed, non-blank search query.
///
/// The only way to obtain one is [`Query::parse`], so anything that takes a
/// `&Query` never has to deal with blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Validate raw query text.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] if the text is blank.
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The query text as entered, minus surrounding whitespace.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key for this query within `category`: `"<namespace>-<query>"`.
    ///
    /// The query part is lowercased so that differently-cased repeats share
    /// an entry.
    pub fn cache_key(&self, category: Category) -> String {
        format!("{}-{}", category.namespace(), self.0.to_lowercase())
    }

    /// The query percent-encoded for use inside a URL query string.
    pub fn url_encoded(&self) -> String {
        url::form_urlencoded::byte_serialize(self.0.as_bytes()).collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate `text` to at most `max_chars` characters without splitting a
/// code point.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

//! Tolerant news-feed scanner.
//!
//! Feeds are not parsed as a document tree. Titles, descriptions and links
//! are each collected by an independent pattern scan and then paired up by
//! position. This survives truncated or slightly malformed documents, but
//! is only correct while the three lists stay in 1:1:1 correspondence: a
//! feed that carries extra `<title>`/`<link>` pairs (an `<image>` block, for
//! instance) will shift the pairing.
//!
//! Position 0 is the channel's own title/description/link and is never
//! returned as a story.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{truncate_chars, FeedItem};

/// Maximum description length kept per item, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Story positions examined per feed when selecting for a query.
const SELECTION_WINDOW: usize = 4;

/// Items kept per feed regardless of relevance.
const MIN_FILL: usize = 3;

/// The compiled scanning patterns, built once per process.
struct Patterns {
    title: Regex,
    description: Regex,
    link: Regex,
    cdata: Regex,
    tag: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let built = Patterns {
                title: Regex::new(r"(?s)<title(?:\s[^>]*)?>(.*?)</title>").ok()?,
                description: Regex::new(r"(?s)<description(?:\s[^>]*)?>(.*?)</description>")
                    .ok()?,
                // Self-closing `<link .../>` elements carry no text and are skipped.
                link: Regex::new(r"(?s)<link(?:\s[^>]*[^>/])?>(.*?)</link>").ok()?,
                cdata: Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").ok()?,
                tag: Regex::new(r"<[^>]*>").ok()?,
            };
            Some(built)
        })
        .as_ref()
}

/// The raw, positionally-ordered captures from one feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeed {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub links: Vec<String>,
}

/// Scan `markup` for title, description and link elements.
///
/// Each list is collected independently in document order. CDATA wrappers
/// are unwrapped; no other normalisation happens here.
pub fn scan(markup: &str) -> RawFeed {
    let Some(patterns) = patterns() else {
        tracing::error!("feed patterns failed to compile");
        return RawFeed::default();
    };
    let capture_all = |re: &Regex| -> Vec<String> {
        re.captures_iter(markup)
            .filter_map(|caps| caps.get(1))
            .map(|m| unwrap_cdata(patterns, m.as_str()))
            .collect()
    };

    let feed = RawFeed {
        titles: capture_all(&patterns.title),
        descriptions: capture_all(&patterns.description),
        links: capture_all(&patterns.link),
    };
    tracing::trace!(
        titles = feed.titles.len(),
        descriptions = feed.descriptions.len(),
        links = feed.links.len(),
        "feed scanned"
    );
    feed
}

impl RawFeed {
    /// Number of positions available, driven by the title list.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether no titles were found.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// The normalised item at `index`.
    ///
    /// Returns `None` when the position is out of range or when the title or
    /// link is empty after trimming. A missing description is an empty one.
    pub fn item(&self, index: usize) -> Option<FeedItem> {
        let title = unescape_entities(self.titles.get(index)?.trim());
        let link = self.links.get(index).map(|l| l.trim()).unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        let description = self
            .descriptions
            .get(index)
            .map(|d| clean_description(d))
            .unwrap_or_default();

        Some(FeedItem {
            title,
            description,
            link: unescape_entities(link),
        })
    }

    /// Usable stories among the first `window` positions after the channel
    /// metadata at position 0. Unusable items still consume a position.
    pub fn stories(&self, window: usize) -> impl Iterator<Item = FeedItem> + '_ {
        (1..self.len()).take(window).filter_map(|i| self.item(i))
    }
}

/// Pick the stories from `feed` worth showing for `query`.
///
/// Looks at up to four story positions after the channel metadata. An item
/// is kept when its title contains the query (case-insensitively), or when
/// fewer than three items have been kept so far.
pub fn select_for_query(feed: &RawFeed, query: &str) -> Vec<FeedItem> {
    let needle = query.to_lowercase();
    let mut picked = Vec::new();

    for item in feed.stories(SELECTION_WINDOW) {
        if picked.len() < MIN_FILL || item.title.to_lowercase().contains(&needle) {
            picked.push(item);
        }
    }
    picked
}

/// Trim, strip embedded tags, unescape and cap a description.
fn clean_description(raw: &str) -> String {
    let stripped = match patterns() {
        Some(p) => p.tag.replace_all(raw.trim(), ""),
        None => raw.trim().into(),
    };
    let capped = truncate_chars(stripped.trim(), MAX_DESCRIPTION_CHARS);
    unescape_entities(&capped)
}

fn unwrap_cdata(patterns: &Patterns, text: &str) -> String {
    patterns.cdata.replace_all(text, "$1").into_owned()
}

/// Replace the common markup entities with their characters.
///
/// `&amp;` goes last so `&amp;lt;` becomes the literal text `&lt;`.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

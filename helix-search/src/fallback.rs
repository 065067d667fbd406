//! Synthetic records used when a provider has nothing to offer.
//!
//! One generator per category, parameterised only by the query. Every
//! record produced here has a non-empty title and URL.

use crate::types::{Category, Query, ResultRecord};

/// Placeholder thumbnail for video pointers.
pub const VIDEO_PLACEHOLDER_THUMBNAIL: &str = "/placeholder.svg";

/// Number of placeholder images generated for the image category.
pub const IMAGE_PLACEHOLDER_COUNT: usize = 12;

/// The fallback set for `category`.
pub fn records(category: Category, query: &Query) -> Vec<ResultRecord> {
    match category {
        Category::General => general(query),
        Category::Image => images(query),
        Category::News => news(query),
        Category::Video => videos(query),
    }
}

fn general(query: &Query) -> Vec<ResultRecord> {
    vec![
        ResultRecord::new(
            format!("Search results for \"{query}\""),
            "No direct results found. Try a different search query.",
            format!("https://duckduckgo.com/?q={}", query.url_encoded()),
            "DuckDuckGo",
        ),
        ResultRecord::new(
            format!("{query} - Wikipedia"),
            "Find comprehensive information about this topic.",
            format!(
                "https://en.wikipedia.org/wiki/{}",
                query.as_str().replace(' ', "_")
            ),
            "Wikipedia",
        ),
    ]
}

fn images(query: &Query) -> Vec<ResultRecord> {
    let encoded = query.url_encoded();
    (1..=IMAGE_PLACEHOLDER_COUNT)
        .map(|i| {
            ResultRecord::new(
                format!("{query} image {i}"),
                "High-quality royalty-free image",
                format!("https://source.unsplash.com/600x400/?{encoded}&random={i}"),
                "Unsplash",
            )
            .with_thumbnail(format!(
                "https://source.unsplash.com/300x300/?{encoded}&random={i}"
            ))
        })
        .collect()
}

fn news(query: &Query) -> Vec<ResultRecord> {
    vec![
        ResultRecord::new(
            format!("Latest news about {query}"),
            "Check BBC News for the latest updates.",
            "https://www.bbc.com/news",
            "BBC News",
        ),
        ResultRecord::new(
            format!("Reuters: {query}"),
            "International news coverage from Reuters.",
            "https://www.reuters.com/",
            "Reuters",
        ),
        ResultRecord::new(
            "Times of India",
            "Latest news and updates.",
            "https://timesofindia.indiatimes.com/",
            "Times of India",
        ),
    ]
}

fn videos(query: &Query) -> Vec<ResultRecord> {
    let encoded = query.url_encoded();
    vec![
        ResultRecord::new(
            format!("{query} on YouTube"),
            "Find videos about your search query",
            format!("https://www.youtube.com/results?search_query={encoded}"),
            "YouTube",
        )
        .with_thumbnail(VIDEO_PLACEHOLDER_THUMBNAIL),
        ResultRecord::new(
            format!("{query} tutorials and guides"),
            "Educational content and tutorials",
            format!("https://www.youtube.com/results?search_query={encoded}+tutorial"),
            "YouTube",
        )
        .with_thumbnail(VIDEO_PLACEHOLDER_THUMBNAIL),
    ]
}

//! Integration tests for the aggregation pipeline against mock upstreams.
//!
//! Every provider endpoint and news feed is served by a local
//! [`wiremock::MockServer`]; nothing here touches the real network.

use std::sync::Arc;
use std::time::Duration;

use helix_search::cache::{ManualClock, TtlStore};
use helix_search::config::{Endpoints, NewsFeed};
use helix_search::{Aggregator, CacheStore, Category, Query, ResultRecord, SearchConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TTL: Duration = Duration::from_secs(300);

fn config_for(server: &MockServer) -> SearchConfig {
    let base = server.uri();
    SearchConfig {
        timeout_seconds: 1,
        endpoints: Endpoints {
            general: format!("{base}/general"),
            images: format!("{base}/images"),
            videos: format!("{base}/videos"),
            video_watch_base: "https://piped.video".to_owned(),
        },
        news_feeds: vec![
            NewsFeed::new("BBC News", format!("{base}/feeds/bbc")),
            NewsFeed::new("Reuters", format!("{base}/feeds/reuters")),
            NewsFeed::new("Times of India", format!("{base}/feeds/toi")),
        ],
        ..Default::default()
    }
}

fn aggregator(server: &MockServer) -> Aggregator<TtlStore> {
    Aggregator::with_store(config_for(server), TtlStore::new(TTL)).expect("aggregator")
}

fn query(text: &str) -> Query {
    Query::parse(text).expect("valid query")
}

fn feed(channel: &str, stories: &[&str]) -> String {
    let mut markup = format!(
        "<?xml version=\"1.0\"?><rss><channel><title>{channel}</title>\
         <description>{channel} headlines</description><link>https://{channel}.example/</link>"
    );
    for (i, story) in stories.iter().enumerate() {
        markup.push_str(&format!(
            "<item><title>{story}</title><description><![CDATA[<p>{story} body</p>]]></description>\
             <link>https://{channel}.example/{i}</link></item>"
        ));
    }
    markup.push_str("</channel></rss>");
    markup
}

async fn mount_feed(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn assert_presentable(records: &[ResultRecord]) {
    for (i, r) in records.iter().enumerate() {
        assert!(!r.title.is_empty(), "record {i} has empty title");
        assert!(!r.url.is_empty(), "record {i} has empty url");
    }
}

// ── General ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn general_results_are_mapped_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/general"))
        .and(query_param("q", "react"))
        .and(query_param("format", "json"))
        .and(header("user-agent", helix_search::config::DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Heading": "React",
            "AbstractText": "React is a JavaScript library for building user interfaces.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/React_(software)",
            "RelatedTopics": [
                {"Text": "JSX\nSyntax extension", "FirstURL": "https://duckduckgo.com/JSX"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agg = aggregator(&server);
    let first = agg.resolve(&query("react"), Category::General).await;
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].title, "React");
    assert_eq!(first[1].title, "JSX");

    // Within the TTL the second call must come from the cache (expect(1) above).
    let second = agg.resolve(&query("react"), Category::General).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn general_empty_answer_uses_pointer_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RelatedTopics": []})))
        .mount(&server)
        .await;

    let records = aggregator(&server)
        .resolve(&query("obscure thing"), Category::General)
        .await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].source, "Wikipedia");
}

#[tokio::test]
async fn general_malformed_json_uses_pointer_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/general"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("x"), Category::General).await;
    assert_eq!(records.len(), 2);
    assert_presentable(&records);
}

// ── Images ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn images_provider_unreachable_yields_twelve_placeholders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("golang"), Category::Image).await;
    assert_eq!(records.len(), 12);
    for r in &records {
        assert_eq!(r.source, "Unsplash");
        assert!(r.url.contains("golang"));
    }
}

#[tokio::test]
async fn images_are_capped_at_twelve() {
    let server = MockServer::start().await;
    let images: Vec<_> = (0..40)
        .map(|i| json!({"prompt": format!("prompt {i}"), "model": "m", "src": format!("https://img/{i}.png")}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": images })))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("cats"), Category::Image).await;
    assert_eq!(records.len(), 12);
    assert_eq!(records[0].source, "Lexica.art");
}

#[tokio::test]
async fn slow_provider_times_out_into_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"images": [{"src": "https://img/late.png"}]}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("late"), Category::Image).await;
    assert_eq!(records.len(), 12);
    assert!(records.iter().all(|r| r.source == "Unsplash"));
}

// ── News ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn news_merges_sources_in_configured_order() {
    let server = MockServer::start().await;
    mount_feed(&server, "/feeds/bbc", feed("bbc", &["B1", "B2", "B3", "B4"])).await;
    mount_feed(&server, "/feeds/reuters", feed("reuters", &["R1", "R2", "R3"])).await;
    mount_feed(&server, "/feeds/toi", feed("toi", &["T1", "T2", "T3", "T4 golang"])).await;

    let records = aggregator(&server).resolve(&query("golang"), Category::News).await;
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    // 3 + 3 + 4 picks, capped at 9 in source order.
    assert_eq!(
        titles,
        ["B1", "B2", "B3", "R1", "R2", "R3", "T1", "T2", "T3"]
    );
    assert_eq!(records[0].source, "BBC News");
    assert_eq!(records[0].description, "B1 body");
    assert_eq!(records[3].source, "Reuters");
    assert_eq!(records[8].source, "Times of India");
}

#[tokio::test]
async fn news_tolerates_failing_and_slow_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feeds/bbc"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feeds/reuters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed("reuters", &["Too late"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_feed(&server, "/feeds/toi", feed("toi", &["Monsoon arrives", "Markets"])).await;

    let records = aggregator(&server).resolve(&query("monsoon"), Category::News).await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.source == "Times of India"));
}

#[tokio::test]
async fn news_total_failure_yields_source_pointers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("anything"), Category::News).await;
    let sources: Vec<_> = records.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, ["BBC News", "Reuters", "Times of India"]);
}

#[tokio::test]
async fn news_feeds_without_stories_yield_empty_uncached_list() {
    let server = MockServer::start().await;
    for route in ["/feeds/bbc", "/feeds/reuters", "/feeds/toi"] {
        mount_feed(&server, route, feed("empty", &[])).await;
    }

    let agg = aggregator(&server);
    let records = agg.resolve(&query("quiet day"), Category::News).await;
    assert!(records.is_empty());
    assert!(agg.store().get("news-quiet day").await.is_none());
}

// ── Videos ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn videos_are_filtered_and_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("filter", "videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
            {"type": "channel", "url": "/channel/x", "name": "A channel"},
            {"type": "video", "url": "/watch?v=abc123", "title": "Axum in depth",
             "uploaderName": "Rustacean", "duration": 754, "thumbnail": "https://t/1.jpg"}
        ]})))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("axum"), Category::Video).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "https://piped.video/watch?v=abc123");
    assert_eq!(records[0].description, "Rustacean • 12:34");
}

#[tokio::test]
async fn videos_empty_result_yields_youtube_pointers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let records = aggregator(&server).resolve(&query("axum"), Category::Video).await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.source == "YouTube"));
}

// ── Cache lifecycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn expired_entries_are_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"images": [{"prompt": "p", "src": "https://img/1.png"}]})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new());
    let store = TtlStore::with_clock(TTL, Arc::clone(&clock));
    let agg = Aggregator::with_store(config_for(&server), store).expect("aggregator");

    agg.resolve(&query("cats"), Category::Image).await;
    clock.advance(Duration::from_secs(299));
    agg.resolve(&query("cats"), Category::Image).await;
    clock.advance(Duration::from_secs(1));
    agg.resolve(&query("cats"), Category::Image).await;
}

#[tokio::test]
async fn recovered_provider_is_not_hidden_by_failure_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let agg = aggregator(&server);
    let during_outage = agg.resolve(&query("golang"), Category::Image).await;
    assert!(during_outage.iter().all(|r| r.source == "Unsplash"));
    assert!(agg.store().get("images-golang").await.is_none());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{"prompt": "gopher", "model": "m", "src": "https://img/gopher.png"}]
        })))
        .mount(&server)
        .await;

    let recovered = agg.resolve(&query("golang"), Category::Image).await;
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].source, "Lexica.art");
    assert_eq!(agg.store().get("images-golang").await, Some(recovered));
}

#[tokio::test]
async fn empty_answer_fallback_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RelatedTopics": []})))
        .expect(1)
        .mount(&server)
        .await;

    let agg = aggregator(&server);
    let first = agg.resolve(&query("obscure"), Category::General).await;
    let second = agg.resolve(&query("obscure"), Category::General).await;
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn categories_use_separate_cache_namespaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"images": [], "items": []})),
        )
        .mount(&server)
        .await;

    let agg = aggregator(&server);
    let images = agg.resolve(&query("rust"), Category::Image).await;
    let videos = agg.resolve(&query("rust"), Category::Video).await;
    assert_ne!(images, videos);
    assert!(agg.store().get("images-rust").await.is_some());
    assert!(agg.store().get("videos-rust").await.is_some());
}

#[tokio::test]
async fn every_category_respects_its_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let agg = aggregator(&server);
    for category in Category::all() {
        let records = agg.resolve(&query("caps"), *category).await;
        assert!(records.len() <= category.cap());
        assert_presentable(&records);
    }
}

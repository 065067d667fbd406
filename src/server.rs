//! HTTP query interface over the aggregation layer.
//!
//! Endpoints:
//!
//! - `GET /api/search?q=<text>&category=<all|images|news|videos>`
//! - `GET /api/lucky`: a random query in a random category
//! - `GET /api/health`
//!
//! Provider failures never show up here as HTTP errors; they are absorbed
//! into fallback records by the aggregator. A blank `q` is a 400. A 500 is
//! returned only when the resolving task itself faults.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use helix_search::{Aggregator, Category, ResultRecord};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{HelixError, Result};

/// Queries the lucky endpoint picks from.
pub const LUCKY_QUERIES: &[&str] = &[
    "react hooks tutorial",
    "web design inspiration",
    "javascript best practices",
    "nextjs deployment",
    "tailwind css tips",
    "typescript advanced",
    "web performance optimization",
    "css grid layout",
    "api design patterns",
    "database optimization",
];

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Query-string parameters of `/api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Successful search response. `category` and `query` echo the request
/// parameters as received.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ResultRecord>,
    pub category: String,
    pub query: String,
}

/// Error response; `results` is always empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub results: Vec<ResultRecord>,
    pub error: String,
}

impl ErrorResponse {
    fn new(error: &str) -> Self {
        Self {
            results: Vec::new(),
            error: error.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    /// One aggregator (and therefore one cache) for the whole process.
    aggregator: Arc<Aggregator>,
}

/// Build the router with all endpoints.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/api/search", get(handle_search))
        .route("/api/lucky", get(handle_lucky))
        .route("/api/health", get(handle_health))
        .with_state(AppState { aggregator })
}

// ---------------------------------------------------------------------------
// SearchServer
// ---------------------------------------------------------------------------

/// The query interface, serving on a background task.
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(config: &ServerConfig, aggregator: Arc<Aggregator>) -> Result<Self> {
        let app = router(aggregator);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| HelixError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| HelixError::Server(format!("failed to get local addr: {e}")))?;

        info!("search API listening on http://{addr}/api");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "undecodable search parameters");
            return bad_request();
        }
    };
    let raw = params.q.unwrap_or_default();
    let Ok(query) = helix_search::Query::parse(&raw) else {
        return bad_request();
    };
    let category_param = params.category.unwrap_or_else(|| "all".to_owned());
    let category = Category::from_param(&category_param);

    respond(state.aggregator, query, category, raw, category_param).await
}

async fn handle_lucky(State(state): State<AppState>) -> Response {
    let (raw, category) = {
        let mut rng = rand::thread_rng();
        let raw = LUCKY_QUERIES
            .choose(&mut rng)
            .copied()
            // SAFETY: LUCKY_QUERIES is a non-empty const array
            .unwrap_or(LUCKY_QUERIES[0]);
        let category = Category::all()
            .choose(&mut rng)
            .copied()
            .unwrap_or(Category::General);
        (raw, category)
    };

    match helix_search::Query::parse(raw) {
        Ok(query) => {
            let param = category.as_param().to_owned();
            respond(state.aggregator, query, category, raw.to_owned(), param).await
        }
        Err(e) => internal_error(&e.to_string()),
    }
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Resolve on a separate task so that a fault inside the pipeline becomes a
/// 500 for this request instead of taking down the connection.
async fn respond(
    aggregator: Arc<Aggregator>,
    query: helix_search::Query,
    category: Category,
    echo_query: String,
    echo_category: String,
) -> Response {
    tracing::trace!(query = %query.as_str(), %category, "search request");

    let task = tokio::spawn(async move { aggregator.resolve(&query, category).await });
    match task.await {
        Ok(results) => Json(SearchResponse {
            results,
            category: echo_category,
            query: echo_query,
        })
        .into_response(),
        Err(e) => internal_error(&e.to_string()),
    }
}

fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Query parameter required")),
    )
        .into_response()
}

fn internal_error(detail: &str) -> Response {
    tracing::error!(error = detail, "search request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Failed to fetch results")),
    )
        .into_response()
}

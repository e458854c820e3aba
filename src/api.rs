// 🌐 HTTP routes - thin transport over the query facade
//
// Medal routes always answer 200: either the envelope or `{}` when the feed
// could not be read.

use crate::feed::MedalFeed;
use crate::query::{MedalResponse, MedalService, DEFAULT_TOP_N};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    /// Comma-separated NOC codes, e.g. `USA,fra`
    pub countries: Option<String>,
}

impl SummaryParams {
    pub fn codes(&self) -> Vec<String> {
        self.countries
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub n: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/medals?countries=USA,FRA
async fn get_summary<F: MedalFeed + 'static>(
    State(service): State<Arc<MedalService<F>>>,
    Query(params): Query<SummaryParams>,
) -> Json<MedalResponse> {
    Json(service.summary(&params.codes()).await)
}

/// GET /api/medals/top?n=5
async fn get_top<F: MedalFeed + 'static>(
    State(service): State<Arc<MedalService<F>>>,
    Query(params): Query<TopParams>,
) -> Json<MedalResponse> {
    Json(service.top_n(params.n.unwrap_or(DEFAULT_TOP_N)).await)
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router<F: MedalFeed + 'static>(service: Arc<MedalService<F>>, web_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/medals", get(get_summary::<F>))
        .route("/medals/top", get(get_top::<F>))
        .with_state(service);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(web_dir))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::TotalsFilter;
    use crate::query::tests::{sample_feed, sample_store, StubFeed};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(feed: StubFeed) -> Router {
        let service = MedalService::new(feed, sample_store(), TotalsFilter::default());
        router(Arc::new(service), Path::new("web"))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_summary_params_codes() {
        let params = SummaryParams {
            countries: Some(" usa, ,FRA,".to_string()),
        };
        assert_eq!(params.codes(), vec!["usa".to_string(), "FRA".to_string()]);

        assert!(SummaryParams::default().codes().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(sample_feed()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_medals_route() {
        let (status, body) = get_json(app(sample_feed()), "/api/medals").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_results"], 4);
        assert_eq!(body["results"][0]["country"]["code"], "CHN");
        assert_eq!(body["results"][1]["country"]["iso_alpha_2"], "US");
    }

    #[tokio::test]
    async fn test_medals_route_with_filter() {
        let (_, body) = get_json(app(sample_feed()), "/api/medals?countries=fra,usa").await;

        assert_eq!(body["total_results"], 2);
        assert_eq!(body["results"][0]["country"]["code"], "USA");
        assert_eq!(body["results"][0]["rank"], 1);
        assert_eq!(body["results"][1]["country"]["code"], "FRA");
        assert_eq!(body["results"][1]["rank"], 3);
    }

    #[tokio::test]
    async fn test_top_route_defaults_to_three() {
        let (_, body) = get_json(app(sample_feed()), "/api/medals/top").await;
        assert_eq!(body["total_results"], 3);

        let (_, body) = get_json(app(sample_feed()), "/api/medals/top?n=1").await;
        assert_eq!(body["total_results"], 1);
        assert_eq!(body["results"][0]["country"]["code"], "CHN");
    }

    #[tokio::test]
    async fn test_feed_down_is_empty_object_with_ok_status() {
        let feed = StubFeed {
            entries: None,
            ..sample_feed()
        };

        let (status, body) = get_json(app(feed), "/api/medals/top").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));
    }
}

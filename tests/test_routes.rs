use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stream_picker::api::upstream::StreamSource;
use stream_picker::utils::clock::Clock;
use stream_picker::utils::display::DisplayFormatter;
use stream_picker::{create_router, AppState, Config, StreamService, UpstreamError};
use tower::ServiceExt;

struct StaticSource {
    body: Option<Value>,
    calls: AtomicUsize,
}

#[async_trait]
impl StreamSource for StaticSource {
    async fn fetch(&self) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(UpstreamError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
        }
    }
}

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

fn schedule() -> Value {
    json!({
        "timestamp": 100,
        "performance": 0.05,
        "streams": [
            {"category": "Football", "streams": [
                {"id": 1, "name": "Derby", "tag": "Premier", "starts_at": 50, "ends_at": 150},
                {"id": 2, "name": "Cup Final", "starts_at": 500, "ends_at": 600}
            ]},
            {"category": "Esports", "streams": [
                {"id": 5, "name": "Alpha Major", "always_live": 1, "iframe": "https://embed/alpha"},
                {"id": 9, "name": "Old Match", "starts_at": 1, "ends_at": 2}
            ]}
        ]
    })
}

fn app_with(body: Option<Value>) -> (Router, Arc<StaticSource>) {
    let source = Arc::new(StaticSource {
        body,
        calls: AtomicUsize::new(0),
    });
    let service = StreamService::new(source.clone(), Arc::new(FixedClock(100)));
    let state = AppState {
        service: Arc::new(service),
        display: Arc::new(DisplayFormatter::new(&Config::default())),
    };
    (create_router(state), source)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn ids(body: &Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_all_streams_with_status() {
    let (app, _) = app_with(Some(schedule()));

    let (status, body) = get_json(&app, "/api/streams").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], 100);
    assert_eq!(body["count"], 4);
    assert_eq!(ids(&body), vec![1, 2, 5, 9]);
    let statuses: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["live", "upcoming", "live", "ended"]);
    assert_eq!(body["items"][0]["category"], "Football");
    assert_eq!(body["items"][2]["iframe"], "https://embed/alpha");
}

#[tokio::test]
async fn applies_query_filters() {
    let (app, source) = app_with(Some(schedule()));

    let (_, body) = get_json(&app, "/api/streams?q=%20DERBY%20").await;
    assert_eq!(ids(&body), vec![1]);

    let (_, body) = get_json(&app, "/api/streams?status=live").await;
    assert_eq!(ids(&body), vec![1, 5]);

    let (_, body) = get_json(&app, "/api/streams?status=live&category=Esports").await;
    assert_eq!(ids(&body), vec![5]);
    assert_eq!(body["count"], 1);

    let (_, body) = get_json(&app, "/api/streams?q=premier&status=live&category=Football").await;
    assert_eq!(ids(&body), vec![1]);

    let (_, body) = get_json(&app, "/api/streams?q=&status=&category=").await;
    assert_eq!(body["count"], 4);

    let (_, body) = get_json(&app, "/api/streams?status=bogus").await;
    assert_eq!(body["count"], 0);

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let (app, _) = app_with(None);

    let (status, body) = get_json(&app, "/api/streams").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn watch_renders_requested_streams_in_order() {
    let (app, _) = app_with(Some(schedule()));

    let (status, page) = get(&app, "/watch?ids=5,x,1,5,77").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Watching 3 stream(s)"));
    let alpha = page.find("Alpha Major").unwrap();
    let derby = page.find("Derby").unwrap();
    assert!(alpha < derby);
    assert!(page.contains("<iframe src=\"https://embed/alpha\""));
}

#[tokio::test]
async fn watch_rejects_missing_or_unparseable_ids() {
    let (app, source) = app_with(Some(schedule()));

    let (status, _) = get(&app, "/watch").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/watch?ids=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/watch?ids=a,b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn watch_with_no_matches_is_not_found() {
    let (app, _) = app_with(Some(schedule()));

    let (status, body) = get_json(&app, "/watch?ids=42,43").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No matching streams");
}

#[tokio::test]
async fn serves_select_page() {
    let (app, source) = app_with(Some(schedule()));

    let (status, page) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("/api/streams"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

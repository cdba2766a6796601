use crate::error::AppResult;
use crate::models::stream::StreamRecord;
use crate::services::query::{parse_ids, StreamQuery};
use crate::services::stream_service::StreamService;
use crate::utils::display::DisplayFormatter;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StreamService>,
    pub display: Arc<DisplayFormatter>,
}

/// Optional filters for `/api/streams`.
#[derive(Debug, Default, Deserialize)]
pub struct StreamsParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub timestamp: Option<Value>,
    pub count: usize,
    pub items: Vec<StreamRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchParams {
    pub ids: Option<String>,
}

async fn select_screen(State(state): State<AppState>) -> Html<&'static str> {
    Html(state.display.select_page())
}

async fn api_streams(
    State(state): State<AppState>,
    Query(params): Query<StreamsParams>,
) -> AppResult<Json<StreamsResponse>> {
    let filter = StreamQuery::from_params(
        params.q.as_deref(),
        params.status.as_deref(),
        params.category.as_deref(),
    );
    let (payload, items) = state.service.list(&filter).await?;
    debug!(?filter, count = items.len(), "Filtered streams");

    Ok(Json(StreamsResponse {
        timestamp: payload.timestamp.clone(),
        count: items.len(),
        items,
    }))
}

async fn watch(
    State(state): State<AppState>,
    Query(params): Query<WatchParams>,
) -> AppResult<Html<String>> {
    let ids = parse_ids(params.ids.as_deref())?;
    let streams = state.service.resolve(&ids).await?;
    Ok(Html(state.display.watch_page(&streams)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(select_screen))
        .route("/api/streams", get(api_streams))
        .route("/watch", get(watch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

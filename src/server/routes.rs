use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, instrument, warn};

use crate::server::storage::BeaconStore;
use crate::telemetry::DeviceInfo;

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub id: Option<String>,
}

pub fn build_router(store: BeaconStore) -> Router {
    Router::new()
        .route("/beacon", post(post_beacon))
        .route("/fetch", get(get_fetch))
        .with_state(store)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[instrument(level = "info", skip(store, body), fields(body_len = body.len()))]
pub async fn post_beacon(State(store): State<BeaconStore>, body: Bytes) -> Response {
    let mut info: DeviceInfo = match serde_json::from_slice(&body) {
        Ok(info) => info,
        Err(err) => {
            warn!(%err, "rejected malformed beacon");
            return (StatusCode::BAD_REQUEST, format!("Invalid request body: {err}")).into_response();
        }
    };
    info.last_beacon_time = Utc::now();

    if let Err(err) = store.save(&info).await {
        error!(%err, id = %info.id, "failed to store beacon");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store data").into_response();
    }

    info!(id = %info.id, os = %info.os, "stored beacon");
    (StatusCode::OK, "Data received and stored successfully").into_response()
}

#[instrument(level = "info", skip(store))]
pub async fn get_fetch(State(store): State<BeaconStore>, Query(q): Query<FetchQuery>) -> Response {
    let Some(id) = q.id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing ID parameter").into_response();
    };

    match store.get(&id).await {
        Ok(Some(info)) => Json(info).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "ID not found").into_response(),
        Err(err) => {
            error!(%err, %id, "failed to fetch record");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data").into_response()
        }
    }
}

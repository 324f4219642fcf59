#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use shellhacked::server::{BeaconStore, build_router};
use shellhacked::telemetry::DeviceInfo;

async fn store() -> BeaconStore {
    let store = BeaconStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store
}

fn beacon_body(id: &str) -> String {
    format!(
        r#"{{"id":"{id}","username":"alice","os":"linux","ram_total":8192,"cpu_cores":4,
            "file_count":17,"interfaces":["eth0"],"last_beacon_time":"2000-01-01T00:00:00Z"}}"#
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

fn post_beacon(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/beacon")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_beacon_then_fetch() {
    let store = store().await;
    let app = build_router(store.clone());

    let (status, body) = send(&app, post_beacon(beacon_body("host-1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Data received and stored successfully");

    let (status, body) = send(&app, get("/fetch?id=host-1")).await;
    assert_eq!(status, StatusCode::OK);
    let info: DeviceInfo = serde_json::from_str(&body).unwrap();
    assert_eq!(info.username, "alice");
    assert_eq!(info.file_count, Some(17));
    assert_eq!(info.interfaces, vec!["eth0".to_string()]);
    // Server stamps the time itself.
    assert!(info.last_beacon_time.timestamp() > 946_684_800);
}

#[tokio::test]
async fn test_beacon_upserts_by_id() {
    let store = store().await;
    let app = build_router(store.clone());
    send(&app, post_beacon(beacon_body("host-1"))).await;
    send(&app, post_beacon(beacon_body("host-1"))).await;
    send(&app, post_beacon(beacon_body("host-2"))).await;
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_malformed_beacon_is_bad_request() {
    let app = build_router(store().await);
    let (status, _) = send(&app, post_beacon("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, post_beacon(r#"{"id":"x"}"#.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_status_codes() {
    let app = build_router(store().await);

    let (status, body) = send(&app, get("/fetch")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing ID parameter");

    let (status, _) = send(&app, get("/fetch?id=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/fetch?id=ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "ID not found");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    // No migration, so the table does not exist.
    let store = BeaconStore::connect("sqlite::memory:").await.unwrap();
    let app = build_router(store);

    let (status, _) = send(&app, post_beacon(beacon_body("host-1"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = send(&app, get("/fetch?id=host-1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = build_router(store().await);
    let (status, _) = send(&app, get("/beacon")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

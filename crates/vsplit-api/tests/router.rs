//! Router smoke tests with a stub engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use vsplit_api::{create_router, ApiConfig, AppState};
use vsplit_media::{MediaEngine, MediaError, MediaResult, SourceMetadata};
use vsplit_models::{EncodingConfig, SegmentRange};

/// Engine stub; none of these tests reach actual processing.
struct StubEngine;

#[async_trait]
impl MediaEngine for StubEngine {
    async fn probe(&self, path: &Path) -> MediaResult<SourceMetadata> {
        Err(MediaError::FileNotFound(path.to_path_buf()))
    }

    async fn extract(
        &self,
        _input: &Path,
        _output: &Path,
        _range: &SegmentRange,
        _encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        unreachable!("extract is never reached in router tests")
    }

    async fn concatenate(
        &self,
        _parts: &[PathBuf],
        _output: &Path,
        _encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        unreachable!("concatenate is never reached in router tests")
    }
}

fn test_app() -> axum::Router {
    let dir = tempfile::tempdir().unwrap().into_path();
    let config = ApiConfig {
        upload_dir: dir.join("uploads"),
        output_dir: dir.join("outputs"),
        ..ApiConfig::default()
    };
    let state = AppState::with_engine(config, Arc::new(StubEngine));
    create_router(state, None)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn unknown_job_returns_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/api/jobs/no-such-job")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_with_missing_source_is_a_client_error() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::post("/api/jobs")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"source": "missing.mp4"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn listing_starts_empty() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/api/jobs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["jobs"].as_array().unwrap().len(), 0);
}

use std::path::PathBuf;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use audioguard_detect::DetectionResult;

use crate::page::UPLOAD_PAGE;
use crate::upload::{allowed_extension, TempUpload, ALLOWED_EXTENSIONS};
use crate::{ApiError, AppState, MAX_UPLOAD_BYTES};

/// General API adapter: CORS enabled for browser frontends.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/detect", post(detect))
        .route("/detect/url", post(detect_url))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Local single-user adapter: serves the embedded upload page and
/// accepts `POST /upload` as an alias, same pipeline and barrier.
pub fn local_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(local_index))
        .route("/health", get(health))
        .route("/upload", post(detect))
        .route("/detect", post(detect))
        .route("/detect/url", post(detect_url))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "service": "AudioGuard Audio Authenticity API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/detect": "POST - detect an uploaded audio file",
            "/detect/url": "POST - detect audio fetched from a URL",
            "/health": "GET - health check",
        },
    }))
}

async fn local_index() -> impl IntoResponse {
    Html(UPLOAD_PAGE)
}

/// Reports the active compute device. The first call takes the
/// one-time model load through the barrier.
async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let service = state.service().clone();
    let device = tokio::task::spawn_blocking(move || service.device())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(json!({
        "status": "healthy",
        "accelerator_available": device.accelerator_available,
        "device": device.device,
    })))
}

/// Multipart upload detection. Validates before anything touches disk
/// so rejected requests leave no temp file behind.
async fn detect(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            audio = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        audio.ok_or_else(|| ApiError::Validation("no audio file provided".to_string()))?;
    if filename.is_empty() {
        return Err(ApiError::Validation("no file selected".to_string()));
    }
    if allowed_extension(&filename).is_none() {
        return Err(ApiError::Validation(format!(
            "unsupported format, allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let upload = TempUpload::write(state.upload_dir(), &filename, &data)?;
    let result = run_detect(&state, upload.path().to_path_buf()).await?;
    Ok(Json(full_payload(&result)))
}

#[derive(Debug, Deserialize)]
struct UrlRequest {
    url: Option<String>,
}

/// Remote-fetch detection: download with a fixed 30 s timeout, then
/// run the same pipeline. Returns the reduced payload.
async fn detect_url(State(state): State<AppState>, body: String) -> Result<Json<Value>, ApiError> {
    let url = serde_json::from_str::<UrlRequest>(&body)
        .ok()
        .and_then(|req| req.url)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("url is required".to_string()))?;

    let response = state
        .fetch()
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let data = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let name = url.rsplit('/').next().unwrap_or("remote.wav");
    let upload = TempUpload::write(state.upload_dir(), name, &data)?;
    let result = run_detect(&state, upload.path().to_path_buf()).await?;
    Ok(Json(reduced_payload(&result)))
}

/// Inference blocks its thread for the request's duration; run it on
/// the blocking pool so the async workers stay responsive.
async fn run_detect(state: &AppState, path: PathBuf) -> Result<DetectionResult, ApiError> {
    let service = state.service().clone();
    tokio::task::spawn_blocking(move || service.detect(&path))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn full_payload(r: &DetectionResult) -> Value {
    json!({
        "status": "success",
        "is_fake": r.is_fake,
        "confidence": round4(r.confidence),
        "fake_probability": round4(r.fake_probability),
        "real_probability": round4(r.real_probability),
        "label": r.label,
        "result": r.verdict(),
        "detection_result": if r.is_fake { "AI-generated voice" } else { "Human voice" },
        "confidence_percent": format!("{:.1}%", r.confidence * 100.0),
    })
}

fn reduced_payload(r: &DetectionResult) -> Value {
    json!({
        "status": "success",
        "is_fake": r.is_fake,
        "confidence": round4(r.confidence),
        "label": r.label,
        "result": r.verdict(),
    })
}

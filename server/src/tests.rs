use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use audioguard_audio::AudioError;
use audioguard_detect::{
    DetectError, DetectionResult, DetectionService, DeviceInfo, LABEL_FAKE, LABEL_REAL,
};

use crate::{api_router, local_router, AppState};

/// Test double standing in for the model pair. Counts load and detect
/// events and can simulate a pipeline failure.
struct MockService {
    loaded: OnceCell<()>,
    loads: AtomicUsize,
    detects: AtomicUsize,
    load_delay: Duration,
    fail: bool,
    result: DetectionResult,
}

impl MockService {
    fn new() -> Self {
        Self {
            loaded: OnceCell::new(),
            loads: AtomicUsize::new(0),
            detects: AtomicUsize::new(0),
            load_delay: Duration::ZERO,
            fail: false,
            result: DetectionResult {
                is_fake: false,
                confidence: 0.987654,
                fake_probability: 0.012346,
                real_probability: 0.987654,
                label: LABEL_REAL,
            },
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn slow_loading() -> Self {
        Self {
            load_delay: Duration::from_millis(50),
            ..Self::new()
        }
    }

    fn ensure_loaded(&self) {
        self.loaded.get_or_init(|| {
            std::thread::sleep(self.load_delay);
            self.loads.fetch_add(1, Ordering::SeqCst);
        });
    }
}

impl DetectionService for MockService {
    fn detect(&self, path: &Path) -> Result<DetectionResult, DetectError> {
        self.ensure_loaded();
        self.detects.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DetectError::Audio(AudioError::EmptyStream {
                path: path.to_path_buf(),
            }));
        }
        Ok(self.result.clone())
    }

    fn device(&self) -> Result<DeviceInfo, DetectError> {
        self.ensure_loaded();
        Ok(DeviceInfo {
            device: "cpu".to_string(),
            accelerator_available: false,
        })
    }
}

struct TestApp {
    app: Router,
    service: Arc<MockService>,
    upload_dir: PathBuf,
}

impl TestApp {
    fn api(service: MockService) -> Self {
        Self::build(service, api_router as fn(AppState) -> Router)
    }

    fn local(service: MockService) -> Self {
        Self::build(service, local_router as fn(AppState) -> Router)
    }

    fn build(service: MockService, router: fn(AppState) -> Router) -> Self {
        let upload_dir =
            std::env::temp_dir().join(format!("audioguard-test-{}", Uuid::new_v4().simple()));
        let service = Arc::new(service);
        let state = AppState::new(service.clone(), &upload_dir).unwrap();
        Self {
            app: router(state),
            service,
            upload_dir,
        }
    }

    fn upload_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).unwrap().count()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.upload_dir).ok();
    }
}

const BOUNDARY: &str = "XxAudioGuardBoundaryxX";

fn multipart_request(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn index_lists_endpoints() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["status"], "online");
    assert!(v["endpoints"]["/detect"].is_string());
}

#[tokio::test]
async fn health_reports_device_and_loads_once() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["device"], "cpu");
    assert_eq!(v["accelerator_available"], false);
    assert_eq!(t.service.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn detect_success_payload() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "clip.wav", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["status"], "success");
    assert_eq!(v["is_fake"], false);
    assert_eq!(v["result"], "real");
    assert_eq!(v["label"], LABEL_REAL);
    assert_eq!(v["detection_result"], "Human voice");
    // Rounded to 4 decimals, percent rendered with one decimal.
    assert_eq!(v["confidence"], 0.9877);
    assert_eq!(v["fake_probability"], 0.0123);
    assert_eq!(v["real_probability"], 0.9877);
    assert_eq!(v["confidence_percent"], "98.8%");
}

#[tokio::test]
async fn detect_is_idempotent() {
    let t = TestApp::api(MockService::new());
    let mut payloads = Vec::new();
    for _ in 0..2 {
        let response = t
            .app
            .clone()
            .oneshot(multipart_request("/detect", "audio", "clip.wav", b"fakewav"))
            .await
            .unwrap();
        payloads.push(body_json(response).await);
    }
    assert_eq!(payloads[0], payloads[1]);
}

#[tokio::test]
async fn detect_missing_field_rejected_without_temp_file() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "other", "clip.wav", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let v = body_json(response).await;
    assert_eq!(v["status"], "error");
    assert!(v["message"].as_str().unwrap().contains("no audio file"));
    assert_eq!(t.upload_count(), 0);
    assert_eq!(t.service.detects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn detect_empty_filename_rejected() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let v = body_json(response).await;
    assert_eq!(v["status"], "error");
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test]
async fn detect_bad_extension_skips_pipeline() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "clip.txt", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let v = body_json(response).await;
    assert!(v["message"].as_str().unwrap().contains("unsupported format"));
    assert_eq!(t.service.detects.load(Ordering::SeqCst), 0);
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test]
async fn temp_file_removed_after_success() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "clip.wav", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test]
async fn temp_file_removed_after_pipeline_failure() {
    let t = TestApp::api(MockService::failing());
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "clip.wav", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let v = body_json(response).await;
    assert_eq!(v["status"], "error");
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test]
async fn detect_url_requires_url_field() {
    let t = TestApp::api(MockService::new());
    for body in ["{}", r#"{"url": ""}"#, "not json"] {
        let response = t
            .app
            .clone()
            .oneshot(json_request("/detect/url", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let v = body_json(response).await;
        assert_eq!(v["status"], "error");
    }
    assert_eq!(t.service.detects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn detect_url_unreachable_host_is_bad_gateway() {
    let t = TestApp::api(MockService::new());
    let response = t
        .app
        .clone()
        .oneshot(json_request(
            "/detect/url",
            r#"{"url": "http://127.0.0.1:1/clip.wav"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let v = body_json(response).await;
    assert_eq!(v["status"], "error");
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_load_models_once() {
    let t = TestApp::api(MockService::slow_loading());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = t.app.clone();
        handles.push(tokio::spawn(async move {
            app.oneshot(multipart_request("/detect", "audio", "clip.wav", b"fakewav"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["status"], "success");
    }

    assert_eq!(t.service.loads.load(Ordering::SeqCst), 1);
    assert_eq!(t.service.detects.load(Ordering::SeqCst), 8);
    assert_eq!(t.upload_count(), 0);
}

#[tokio::test]
async fn local_router_serves_upload_page_and_alias() {
    let t = TestApp::local(MockService::new());

    let response = t
        .app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(std::str::from_utf8(&bytes).unwrap().contains("AudioGuard"));

    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/upload", "audio", "clip.wav", b"fakewav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["status"], "success");
    assert_eq!(v["detection_result"], "Human voice");
}

#[tokio::test]
async fn fake_verdict_renders_fake_labels() {
    let mut service = MockService::new();
    service.result = DetectionResult {
        is_fake: true,
        confidence: 0.75,
        fake_probability: 0.75,
        real_probability: 0.25,
        label: LABEL_FAKE,
    };
    let t = TestApp::api(service);
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/detect", "audio", "clip.mp3", b"fakemp3"))
        .await
        .unwrap();
    let v = body_json(response).await;
    assert_eq!(v["result"], "fake");
    assert_eq!(v["label"], LABEL_FAKE);
    assert_eq!(v["detection_result"], "AI-generated voice");
    assert_eq!(v["confidence_percent"], "75.0%");
}

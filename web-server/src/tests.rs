//! Router tests

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use waste_sorter_core::logic::model::UnloadedEngine;
use waste_sorter_core::{Classifier, ClassifierConfig, ClassifyError, FeedbackLog, InferenceEngine, Label};

use crate::{config::Config, create_router, AppState};

const BOUNDARY: &str = "wastesorterboundary";

/// Always answers "metal" with the given confidence
struct FixedEngine(f32);

impl InferenceEngine for FixedEngine {
    fn run(&self, _input: Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        let mut output = vec![0.0; Label::COUNT];
        output[Label::Metal.index()] = self.0;
        Ok(output)
    }

    fn name(&self) -> String {
        "fixed".to_string()
    }
}

fn test_config(dir: &Path) -> Config {
    Config {
        port: 0,
        model_path: dir.join("model.onnx"),
        feedback_file: dir.join("user_feedback.csv"),
        sample_dir: dir.join("samples"),
        max_upload_bytes: 1024 * 1024,
        environment: "test".to_string(),
    }
}

fn app_with(classifier: Classifier) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let state = AppState {
        classifier: Arc::new(classifier),
        feedback: Arc::new(FeedbackLog::new(config.feedback_file.clone())),
        config,
    };
    (create_router(state), dir)
}

fn app(confidence: f32) -> (Router, TempDir) {
    app_with(Classifier::new(FixedEngine(confidence), ClassifierConfig::default()))
}

fn png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([120, 120, 130])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/classify")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app(0.9);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app"], "Waste Sorter");
}

#[tokio::test]
async fn test_index_page() {
    let (app, _dir) = app(0.9);
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Waste Classifier"));
}

#[tokio::test]
async fn test_classify_image() {
    let (app, _dir) = app(0.83);
    let (status, body) = send(&app, multipart_request("image", &png())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "metal");
    assert_eq!(body["advice"], Label::Metal.advice());
    assert!(body["message"].as_str().unwrap().starts_with("METAL (83.00%)"));
    assert_eq!(body["low_confidence"], false);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_classify_low_confidence() {
    let (app, _dir) = app(0.3);
    let (_, body) = send(&app, multipart_request("image", &png())).await;
    assert_eq!(body["low_confidence"], true);
    assert!(body["message"].as_str().unwrap().contains("Low confidence"));
}

#[tokio::test]
async fn test_classify_without_image_field() {
    let (app, _dir) = app(0.9);
    let (status, body) = send(&app, multipart_request("other", b"ignored")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "");
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(body["error"], "no_image");
}

#[tokio::test]
async fn test_classify_corrupt_image() {
    let (app, _dir) = app(0.9);
    let (status, body) = send(&app, multipart_request("image", b"\x89PNG broken")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "");
    assert_eq!(body["error"], "decode");
}

#[tokio::test]
async fn test_classify_without_model() {
    let (app, _dir) = app_with(Classifier::new(
        UnloadedEngine::new("missing"),
        ClassifierConfig::default(),
    ));
    let (_, body) = send(&app, multipart_request("image", &png())).await;
    assert_eq!(body["error"], "inference");

    let (_, status) = send(&app, get("/api/v1/engine/status")).await;
    assert_eq!(status["model_loaded"], false);
}

#[tokio::test]
async fn test_feedback_roundtrip() {
    let (app, dir) = app(0.9);

    let (status, body) = send(
        &app,
        json_request(
            "/api/v1/feedback",
            json!({ "label": "metal", "confidence": 0.9, "advice": Label::Metal.advice(), "correct": "yes" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "✅ Feedback saved. Thanks!");

    let (status, _) = send(
        &app,
        json_request("/api/v1/feedback", json!({ "label": "", "confidence": 0.0, "advice": "", "correct": "no" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let csv = std::fs::read_to_string(dir.path().join("user_feedback.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "timestamp,predicted_label,confidence_percentage,advice,correct_prediction");
    assert!(lines[1].ends_with(",metal,90.00%,Recyclable material. Sort into metal recycling containers.,yes"));

    let (_, summary) = send(&app, get("/api/v1/feedback/summary")).await;
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["correct"], 1);
    assert_eq!(summary["per_label"]["metal"]["correct"], 1);
}

#[tokio::test]
async fn test_feedback_stores_canonical_label() {
    let (app, dir) = app(0.9);
    let (status, _) = send(
        &app,
        json_request(
            "/api/v1/feedback",
            json!({ "label": " PLASTIC ", "confidence": 0.75, "advice": Label::Plastic.advice(), "correct": "no" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let csv = std::fs::read_to_string(dir.path().join("user_feedback.csv")).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.contains(",plastic,75.00%,"), "row was {row}");
    assert!(!row.contains("PLASTIC"));

    let (_, summary) = send(&app, get("/api/v1/feedback/summary")).await;
    assert_eq!(summary["per_label"]["plastic"]["incorrect"], 1);
    assert!(summary["per_label"].get(" PLASTIC ").is_none());
}

#[tokio::test]
async fn test_classify_rejects_oversized_upload() {
    let (app, _dir) = app(0.9);
    let payload = vec![0u8; 2 * 1024 * 1024];
    let response = app.clone().oneshot(multipart_request("image", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let (_, status) = send(&app, get("/api/v1/engine/status")).await;
    assert_eq!(status["inference_count"], 0);
}

#[tokio::test]
async fn test_feedback_rejects_unknown_label() {
    let (app, _dir) = app(0.9);
    let (status, body) = send(
        &app,
        json_request("/api/v1/feedback", json!({ "label": "cardboard", "confidence": 0.5, "correct": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_feedback_rejects_bad_confidence() {
    let (app, _dir) = app(0.9);
    let (status, _) = send(
        &app,
        json_request("/api/v1/feedback", json!({ "label": "glass", "confidence": 1.5, "correct": "no" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_rejects_bad_verdict() {
    let (app, _dir) = app(0.9);
    let (status, _) = send(
        &app,
        json_request("/api/v1/feedback", json!({ "label": "glass", "confidence": 0.5, "correct": "maybe" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_samples_listing() {
    let (app, dir) = app(0.9);
    let sample_dir = dir.path().join("samples");
    std::fs::create_dir_all(&sample_dir).unwrap();
    let name = waste_sorter_core::logic::samples::SAMPLE_IMAGES[2];
    std::fs::write(sample_dir.join(name), png()).unwrap();

    let (status, body) = send(&app, get("/api/v1/samples")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["url"], format!("/samples/{}", name));

    let response = app.oneshot(get(&format!("/samples/{}", name))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_engine_status_counts() {
    let (app, _dir) = app(0.7);
    send(&app, multipart_request("image", &png())).await;

    let (_, status) = send(&app, get("/api/v1/engine/status")).await;
    assert_eq!(status["model_loaded"], true);
    assert_eq!(status["model_name"], "fixed");
    assert_eq!(status["inference_count"], 1);
}

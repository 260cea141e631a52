// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Annotation endpoint tests for POST /api/image/annotate and
//! POST /api/image/annotate/file
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`,
//! so CORS, body limits and multipart parsing are exercised as in production.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{Rgb, RgbImage};
use std::sync::Arc;
use tower::ServiceExt;
use xray_annotator::{
    annotation::AnnotationRenderer,
    api::{create_router, AppState},
    detection::{DetectionResolver, DetectionTable, TableRow},
    service::AnnotationPipeline,
    vision::{decode_rgb_image, OutputFormat},
};

const BOUNDARY: &str = "XRAYTESTBOUNDARY";
const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Helper: Router over a small in-memory table
fn test_router(output_format: OutputFormat) -> Router {
    let table = Arc::new(DetectionTable::from_rows(vec![TableRow::new(
        "0001.png",
        "Cardiomegaly",
        10,
        20,
        110,
        220,
    )]));
    let pipeline = AnnotationPipeline::new(DetectionResolver::new(table), AnnotationRenderer::default())
        .with_output_format(output_format)
        .with_max_upload_bytes(1024 * 1024);
    create_router(AppState::new(pipeline))
}

/// Helper: PNG-encoded blank image
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::new(width, height)
        .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
        .unwrap();
    bytes
}

/// Helper: multipart/form-data body with a single file field
fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_home_banner() {
    let response = test_router(OutputFormat::Jpeg)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&body[..], b"X-ray Annotation API is running");
}

#[tokio::test]
async fn test_health_reports_table() {
    let response = test_router(OutputFormat::Jpeg)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["tableRows"], 1);
    assert_eq!(json["matchStrategy"], "substring");
}

#[tokio::test]
async fn test_annotate_inline_json() {
    let body = multipart_body("image", "0001.png", &png_bytes(256, 256));

    let response = test_router(OutputFormat::Png)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["report"], serde_json::json!(["Cardiomegaly"]));

    let image_bytes = STANDARD.decode(json["image"].as_str().unwrap()).unwrap();
    let annotated = decode_rgb_image(&image_bytes, usize::MAX).unwrap();
    assert_eq!(annotated.dimensions(), (256, 256));
    assert_eq!(*annotated.get_pixel(10, 100), Rgb([0, 0, 255]));
}

#[tokio::test]
async fn test_annotate_inline_jpeg_default() {
    let body = multipart_body("image", "0002_pneumonia.png", &png_bytes(64, 64));

    let response = test_router(OutputFormat::Jpeg)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["report"], serde_json::json!(["Pneumonia"]));
    let image_bytes = STANDARD.decode(json["image"].as_str().unwrap()).unwrap();
    assert_eq!(&image_bytes[..3], &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_annotate_file_response() {
    let body = multipart_body("image", "0001.png", &png_bytes(128, 256));

    let response = test_router(OutputFormat::Png)
        .oneshot(upload_request("/api/image/annotate/file", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()["x-annotation-report"], r#"["Cardiomegaly"]"#);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"0001_annotated.png\""
    );

    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    let annotated = decode_rgb_image(&bytes, usize::MAX).unwrap();
    assert_eq!(annotated.dimensions(), (128, 256));
}

#[tokio::test]
async fn test_missing_image_field() {
    let body = multipart_body("document", "0001.png", &png_bytes(8, 8));

    let response = test_router(OutputFormat::Jpeg)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image uploaded.");
}

#[tokio::test]
async fn test_empty_image_field() {
    let body = multipart_body("image", "0001.png", &[]);

    let response = test_router(OutputFormat::Jpeg)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image uploaded.");
}

#[tokio::test]
async fn test_blank_file_name_rejected() {
    let table = Arc::new(DetectionTable::from_rows(vec![
        TableRow::new("0001.png", "Cardiomegaly", 10, 20, 110, 220),
        TableRow::new("0002.png", "Pneumonia", 30, 40, 90, 120),
    ]));
    let pipeline = AnnotationPipeline::new(DetectionResolver::new(table), AnnotationRenderer::default());

    for uri in ["/api/image/annotate", "/api/image/annotate/file"] {
        let body = multipart_body("image", "", &png_bytes(8, 8));
        let response = create_router(AppState::new(pipeline.clone()))
            .oneshot(upload_request(uri, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No image uploaded.");
    }
}

#[tokio::test]
async fn test_image_part_without_file_name() {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"image\"\r\n\r\n");
    body.extend_from_slice(&png_bytes(8, 8));
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let response = test_router(OutputFormat::Jpeg)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image uploaded.");
}

#[tokio::test]
async fn test_undecodable_image() {
    let body = multipart_body("image", "0001.png", b"definitely not an image");

    let response = test_router(OutputFormat::Jpeg)
        .oneshot(upload_request("/api/image/annotate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid image"));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/image/annotate")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = test_router(OutputFormat::Jpeg).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

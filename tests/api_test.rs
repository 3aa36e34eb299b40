//! HTTP surface tests, driving the router without binding a socket.

mod common;

use std::io::Cursor;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use zip::ZipArchive;

use common::*;
use encar_pdf::server::build_app;

fn app(source: FakeSource, images: FakeImages) -> Router {
    build_app(Arc::new(service(Arc::new(source), images)), None)
}

fn make_pdfs(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/make-pdfs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(FakeSource::default(), FakeImages::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn make_pdfs_returns_a_zip_attachment() {
    let app = app(FakeSource::default().with(sonata()), images_for_sonata());

    let response = app.oneshot(make_pdfs(r#"{"ids": [123]}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"encar_pdfs.zip\""
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut archive = ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0).unwrap().name(), "Hyundai.pdf");
}

#[tokio::test]
async fn empty_id_list_returns_empty_zip() {
    let app = app(FakeSource::default(), FakeImages::default());

    let response = app.oneshot(make_pdfs(r#"{"ids": []}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let archive = ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn unreachable_listing_is_a_bad_gateway() {
    let app = app(FakeSource::default(), FakeImages::default());

    let response = app.oneshot(make_pdfs(r#"{"ids": ["404"]}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app(FakeSource::default(), FakeImages::default());

    let response = app.oneshot(make_pdfs(r#"{"listings": "123"}"#)).await.unwrap();

    assert!(response.status().is_client_error());
}

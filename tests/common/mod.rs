//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, Request},
    http::{header, response::Parts},
    response::Response,
    Json, Router,
};
use camouflage_rewrite::{CamouflageLayer, RewriteConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Wrap `app` with a camouflage layer built from `config`.
#[allow(dead_code)]
pub fn camouflaged(app: Router, config: RewriteConfig) -> Router {
    app.layer(CamouflageLayer::new(&config).expect("valid test config"))
}

/// Handler reporting the host and original path it was handed.
#[allow(dead_code)]
pub async fn echo_address(request: Request) -> Json<Value> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.to_string())
        .unwrap_or_else(|| request.uri().to_string());

    Json(json!({ "host": host, "path": path }))
}

/// Send `request` through `app` and collect the whole response.
#[allow(dead_code)]
pub async fn send(app: Router, request: axum::http::Request<Body>) -> (Parts, Bytes) {
    let response: Response = app.oneshot(request).await.expect("router is infallible");
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("body collects");
    (parts, bytes)
}

/// GET `path` with the given `host` header.
#[allow(dead_code)]
pub fn get(path: &str, host: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(path)
        .header(header::HOST, host)
        .body(Body::empty())
        .expect("valid request")
}

/// Serve `app` on an ephemeral local port.
#[allow(dead_code)]
pub async fn start_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

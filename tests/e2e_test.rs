//! End-to-end tests over a real socket.

mod common;

use axum::{http::header, routing::get, Router};
use camouflage_rewrite::RewriteConfig;
use common::{camouflaged, echo_address, start_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_public_address_round_trip() {
    let app = Router::new()
        .route("/{*path}", get(echo_address))
        .route(
            "/",
            get(|| async {
                (
                    [(header::LOCATION, "http://backend.internal:8080/app/login")],
                    "<a href=\"http://backend.internal:8080/app/docs\">docs</a>",
                )
            }),
        );
    let addr = start_app(camouflaged(app, RewriteConfig::for_url("http://backend.internal:8080/app/"))).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}/", addr))
        .header("host", "www.example.org")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["location"], "http://www.example.org/login");
    assert_eq!(
        res.text().await.unwrap(),
        "<a href=\"http://www.example.org/docs\">docs</a>"
    );

    let res = client
        .get(format!("http://{}/items/7?full=1", addr))
        .header("host", "www.example.org")
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "host": "backend.internal:8080", "path": "/app/items/7?full=1" })
    );
}

#[tokio::test]
async fn test_disabled_layer_is_transparent() {
    let app = Router::new().route("/{*path}", get(echo_address));
    let addr = start_app(camouflaged(app, RewriteConfig::default())).await;

    let body: Value = reqwest::Client::new()
        .get(format!("http://{}/items/7", addr))
        .header("host", "www.example.org")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({ "host": "www.example.org", "path": "/items/7" }));
}

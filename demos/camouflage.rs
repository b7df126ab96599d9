//! Serve a small app behind the camouflage middleware.
//!
//! ```text
//! cargo run --example camouflage -- [config.toml]
//! curl -i http://127.0.0.1:3000/some/path
//! ```
//!
//! The handler answers with URLs built from the internal address it sees;
//! the client gets them back pointing at 127.0.0.1:3000.

use std::path::Path;

use axum::{
    extract::{OriginalUri, Request},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use camouflage_rewrite::{
    load_config, observability::logging::init_logging, CamouflageLayer, Error, OriginalUrl, RewriteConfig,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("camouflage_rewrite=debug,tower_http=debug")?;

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => RewriteConfig::for_url("http://backend.internal:8080/app/"),
    };
    tracing::info!(url = ?config.url, rewrite_headers = config.rewrite_headers, rewrite_content = config.rewrite_content, "Configuration loaded");

    let app = app(&config)?;

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn app(config: &RewriteConfig) -> Result<Router, Error> {
    Ok(Router::new()
        .route("/", get(echo))
        .route("/{*path}", get(echo))
        .layer(CamouflageLayer::new(config)?)
        .layer(TraceLayer::new_for_http()))
}

/// Reports the address the handler believes it serves, plus the public one.
async fn echo(request: Request) -> impl IntoResponse {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.to_string())
        .unwrap_or_else(|| request.uri().to_string());
    let public = request
        .extensions()
        .get::<OriginalUrl>()
        .map(|url| url.as_str().to_string())
        .unwrap_or_default();

    let internal = format!("http://{}{}", host, path);
    (
        [(header::LINK, format!("<{}>; rel=\"self\"", internal))],
        format!("internal: {}\npublic: {}\n", internal, public),
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

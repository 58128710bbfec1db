//! Serve command: binds content into templates per request.

use super::{load_config, site_renderer};
use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Router,
};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use trailpost_core::page::PageOutcome;
use trailpost_core::{Route, Secrets, SiteRenderer};

#[derive(Clone)]
struct AppState {
    site_dir: PathBuf,
    renderer: Arc<SiteRenderer>,
}

/// Start the site server
pub async fn serve_site(config_path: &Path, port: u16) -> Result<()> {
    let config = load_config(config_path)?;
    let state = AppState {
        site_dir: config.site_dir(),
        renderer: Arc::new(site_renderer(&config, &Secrets::from_env())?),
    };

    tracing::info!("Serving {:?} on http://localhost:{}", state.site_dir, port);
    println!("\nServing at http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let app = Router::new()
        .fallback(serve_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Template file behind a request path, if the path names one
fn template_path(request_path: &str) -> Option<PathBuf> {
    let rel = if request_path.ends_with('/') {
        format!("{}index.html", request_path)
    } else {
        request_path.to_string()
    };
    let rel = Path::new(rel.trim_start_matches('/'));

    let is_html = rel.extension().and_then(|e| e.to_str()) == Some("html");
    let is_safe = rel.components().all(|c| matches!(c, Component::Normal(_)));
    (is_html && is_safe).then(|| rel.to_path_buf())
}

async fn serve_request(State(state): State<AppState>, request: Request) -> Response {
    let uri = request.uri().clone();

    let Some(rel) = template_path(uri.path()) else {
        return match ServeDir::new(&state.site_dir).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    };

    let template = match fs::read_to_string(state.site_dir.join(&rel)).await {
        Ok(template) => template,
        Err(_) => return (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    };

    let route = Route::from_request(uri.path(), uri.query());
    let (html, outcome) = state.renderer.render(&route, &template).await;
    let status = match outcome {
        PageOutcome::Rendered => StatusCode::OK,
        PageOutcome::NotFound => StatusCode::NOT_FOUND,
    };

    (status, Html(html)).into_response()
}

//! HTTP surface: the object detail page, its PDF export and metrics.

use crate::api::ObjectId;
use crate::config::Config;
use crate::export::{export_page, ExportError, ExportOptions};
use crate::i18n::{Language, MetricsReport, TranslationMetrics};
use crate::loader::DetailLoader;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    loader: DetailLoader,
    export_options: Arc<ExportOptions>,
}

impl AppState {
    pub fn new(loader: DetailLoader) -> Self {
        Self {
            loader,
            export_options: Arc::new(ExportOptions::default()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    lang: Option<String>,
    selector: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/objects/:id", get(object_page))
        .route("/objects/:id/export.pdf", get(object_pdf))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:{PORT}` and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let client = config.http_client()?;
    let state = AppState::new(DetailLoader::new(client, Arc::new(config)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving object pages on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")
}

/// The requested language, or `default` when absent or unsupported.
fn resolve_language(requested: Option<&str>, default: Language) -> Language {
    match requested {
        None => default,
        Some(code) => Language::from_code(code).unwrap_or_else(|e| {
            warn!("{}; using {}", e, default.code());
            default
        }),
    }
}

async fn object_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let config = state.loader.config();
    let language = resolve_language(query.lang.as_deref(), config.default_language);

    let mut page = state
        .loader
        .load_page(ObjectId::from(id.as_str()), language)
        .await;
    if query.selector.as_deref() == Some("open") {
        page.open_language_selector();
    }

    Html(page.render_html(&config.api_base_url))
}

async fn object_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let config = state.loader.config();
    let language = resolve_language(query.lang.as_deref(), config.default_language);

    let page = state
        .loader
        .load_page(ObjectId::from(id.as_str()), language)
        .await;

    match export_page(
        &page,
        state.loader.client(),
        &config.api_base_url,
        &state.export_options,
    )
    .await
    {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", state.export_options.filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(ExportError::NothingToExport) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Object {} is not available for export", id),
        )
            .into_response(),
        Err(e) => {
            error!("PDF export for object {} failed: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "PDF export failed").into_response()
        }
    }
}

async fn metrics() -> Json<MetricsReport> {
    Json(TranslationMetrics::global().report())
}

async fn health() -> &'static str {
    "ok"
}

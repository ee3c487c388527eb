//! Reader endpoint: serves the published report to browsers.

use crate::services::{read_report, BlobStore};
use crate::types::BlobKey;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
}

pub fn router(store: Arc<dyn BlobStore>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(data))
        .with_state(AppState { store })
}

pub async fn serve(addr: SocketAddr, store: Arc<dyn BlobStore>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, store = store.name(), "reader endpoint listening");
    axum::serve(listener, router(store)).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn data(State(state): State<AppState>) -> Response {
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || read_report(store.as_ref())).await;

    match result {
        Ok(Ok(Some(value))) => (StatusCode::OK, Json(value)).into_response(),
        Ok(Ok(None)) => error_response(
            StatusCode::NOT_FOUND,
            format!("{} has not been published yet", BlobKey::report()),
        ),
        Ok(Err(e)) => {
            tracing::error!("failed to read report: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            tracing::error!("report reader task failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}

/// Body of every non-200 reply from the reader.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

fn error_response(status: StatusCode, msg: String) -> Response {
    (status, Json(ErrorBody::new(msg))).into_response()
}

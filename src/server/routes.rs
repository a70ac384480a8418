//! Route handlers. They stay thin: the library and stream modules do the work.

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use super::state::AppState;
use crate::error::{Result, StreamError};
use crate::library::{STREAM_ENDPOINT, TrackDescriptor, build_catalog};
use crate::stream::{MediaSlice, open_slice};

pub const CATALOG_ENDPOINT: &str = "/api/music";

#[derive(Debug, Deserialize)]
struct StreamParams {
    file: Option<String>,
}

#[derive(Debug, Serialize)]
struct Catalog {
    success: bool,
    files: Vec<TrackDescriptor>,
    count: usize,
}

/// Creates the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(CATALOG_ENDPOINT, get(list_music))
        .route(STREAM_ENDPOINT, get(stream_music))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/music: walk the library and describe every track.
async fn list_music(State(state): State<AppState>) -> Response {
    let settings = state.settings.clone();

    // The walk and tag parsing block; run them on the blocking pool.
    match tokio::task::spawn_blocking(move || build_catalog(&settings.library)).await {
        Ok(files) => {
            info!(count = files.len(), "library catalog served");
            Json(Catalog {
                success: true,
                count: files.len(),
                files,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "library scan aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Failed to scan music directory" })),
            )
                .into_response()
        }
    }
}

/// GET /api/music/stream?file=<relative path>: full file or a single byte range.
async fn stream_music(
    State(state): State<AppState>,
    params: std::result::Result<Query<StreamParams>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response> {
    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "rejecting stream query");
        StreamError::InvalidQuery
    })?;

    let requested = params
        .file
        .filter(|f| !f.is_empty())
        .ok_or(StreamError::MissingFile)?;

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let slice = open_slice(&state.settings.library.root, &requested, range).await?;

    media_response(slice, &state.settings.stream.cache_control)
}

fn media_response(slice: MediaSlice, cache_control: &str) -> Result<Response> {
    let len = slice.len();

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, slice.content_type)
        .header(header::CONTENT_LENGTH, len)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, cache_control);

    let builder = match slice.range {
        Some(r) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, r.content_range(slice.total_len)),
        None => builder.status(StatusCode::OK),
    };

    let body = Body::from_stream(ReaderStream::new(slice.file.take(len)));
    Ok(builder.body(body)?)
}

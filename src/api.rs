use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Json, Response},
    routing::post,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use url::Url;

use crate::error::AppError;
use crate::models::UploadReceipt;
use crate::parser;
use crate::storage::UploadStore;

/// Multipart field the upload form sends the log in
const UPLOAD_FIELD: &str = "combatlog";

struct AppState {
    store: UploadStore,
}

pub fn create_router(store: UploadStore, public_dir: PathBuf, max_upload_bytes: usize) -> Router {
    let logs = ServeDir::new(store.dir());
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/upload", post(upload_log))
        .nest_service("/logs", logs)
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Store an uploaded combat log under a name derived from its second line
async fn upload_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // Browsers send an empty part when no file was picked
        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let data = field.bytes().await?;
        upload = Some((original_name, data));
        break;
    }
    let (original_name, data) = upload.ok_or(AppError::NoFile)?;

    let store = &state.store;
    let temp_path = store
        .save_temp(&original_name, &data)
        .await
        .map_err(AppError::Store)?;

    let content = match store.read_lossy(&temp_path).await {
        Ok(content) => content,
        Err(e) => {
            store.discard(&temp_path).await;
            return Err(AppError::Read(e));
        }
    };

    let extension = parser::upload_extension(&original_name);
    let filename = match parser::derive_filename(&content, extension.as_deref()) {
        Ok(name) => name,
        Err(e) => {
            tracing::info!(original = %original_name, error = %e, "rejected upload");
            store.discard(&temp_path).await;
            return Err(e.into());
        }
    };

    if let Err(e) = store.rename(&temp_path, &filename).await {
        store.discard(&temp_path).await;
        return Err(AppError::Rename(e));
    }

    tracing::info!(original = %original_name, filename = %filename, size = data.len(), "log renamed");

    let download_url = download_url(&filename);
    if wants_json(&headers) {
        return Ok(Json(UploadReceipt {
            filename,
            download_url,
        })
        .into_response());
    }

    Ok(Html(format!(
        "<p>Log stored as <strong>{name}</strong></p>\n<p><a href=\"{href}\" download>Download {name}</a></p>\n",
        name = escape_html(&filename),
        href = escape_html(&download_url),
    ))
    .into_response())
}

/// Path under `/logs` with the filename percent-encoded as one segment
fn download_url(filename: &str) -> String {
    let mut url = match Url::parse("http://localhost/logs/") {
        Ok(url) => url,
        Err(_) => return format!("/logs/{}", filename),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(filename);
    }
    url.path().to_string()
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

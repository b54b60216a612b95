//! Embedded widget assets
//!
//! In development, falls back to serving from filesystem.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "assets"]
struct Assets;

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    if let Some(content) = Assets::get(path) {
        return asset_response(path, content.data.into_owned());
    }

    // Never let the fallback escape the assets directory
    if !path.split('/').any(|segment| segment == "..") {
        let fs_path = PathBuf::from("assets").join(path);
        if let Ok(content) = tokio::fs::read(&fs_path).await {
            return asset_response(path, content);
        }
    }

    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn asset_response(path: &str, body: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.as_ref().to_string())], body).into_response()
}

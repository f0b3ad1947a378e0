// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Chat UI entry points.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::body::Body;
use std::path::Path;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /` — the chat page. Protected by the access guard.
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_file(
        &state.config.static_dir.join("index.html"),
        "text/html; charset=utf-8",
    )
    .await
}

pub async fn favicon(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_file(
        &state.config.static_dir.join("image/favicon.ico"),
        "image/x-icon",
    )
    .await
}

async fn serve_file(path: &Path, content_type: &str) -> Result<Response, ApiError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|_| ApiError::not_found(format!("{} not found", path.display())))?;

    Response::builder()
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(contents))
        .map_err(|e| ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;

    fn temp_static_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("vc-static-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("image")).unwrap();
        fs::write(dir.join("index.html"), "<html>chat</html>").unwrap();
        dir
    }

    #[tokio::test]
    async fn serves_existing_file_with_content_type() {
        let dir = temp_static_dir();
        let response = serve_file(&dir.join("index.html"), "text/html; charset=utf-8")
            .await
            .unwrap();
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"<html>chat</html>");
        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let err = serve_file(Path::new("/nonexistent/index.html"), "text/html")
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}

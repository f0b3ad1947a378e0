// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Streaming relay: one question in, a live text event stream out.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::providers::orchestrator::{line_events, OrchestratorRequest};
use crate::state::AppState;

const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// One relay call. Identity context is optional pass-through; the browser
/// client fills it in when the user is signed in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SpeakRequest {
    #[serde(rename = "spokenText", default)]
    pub spoken_text: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub client_principal_id: String,
    #[serde(default)]
    pub client_principal_name: String,
    #[serde(default)]
    pub access_token: String,
}

/// Validation failure body, matching the browser client's contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailBody {
    pub detail: String,
}

/// `POST /speak` — forward the question upstream and stream the answer
/// back line by line.
///
/// A non-200 upstream status becomes a single in-band `Error: <status>`
/// line, since the client reads the body as an event stream either way.
/// Client disconnects drop the response body, which cancels the upstream
/// read and releases the connection.
#[utoipa::path(
    post,
    path = "/speak",
    request_body = SpeakRequest,
    tag = "Relay",
    responses(
        (status = 200, description = "Newline-delimited text event stream"),
        (status = 400, description = "Missing question", body = DetailBody),
        (status = 502, description = "Orchestrator unreachable")
    )
)]
pub async fn speak(State(state): State<AppState>, Json(request): Json<SpeakRequest>) -> Response {
    if request.spoken_text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(DetailBody {
                detail: "spokenText is required".to_string(),
            }),
        )
            .into_response();
    }

    let upstream_request = OrchestratorRequest {
        conversation_id: request.conversation_id,
        question: request.spoken_text,
        text_only: true,
        client_principal_id: request.client_principal_id,
        client_principal_name: request.client_principal_name,
        access_token: request.access_token,
    };

    let upstream = match state.orchestrator.ask(&upstream_request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "orchestrator unreachable");
            return crate::error::ApiError::bad_gateway(e.to_string()).into_response();
        }
    };

    let status = upstream.status();
    if status != reqwest::StatusCode::OK {
        tracing::warn!(status = status.as_u16(), "orchestrator returned an error");
        return stream_response(Body::from(format!("Error: {}\n", status.as_u16())));
    }

    stream_response(Body::from_stream(line_events(
        upstream.bytes_stream().boxed(),
    )))
}

fn stream_response(body: Body) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, STREAM_CONTENT_TYPE)
        .body(body)
        // Infallible: status and header are statically valid.
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

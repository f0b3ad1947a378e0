// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Speech provider pass-through endpoints.
//!
//! These hold no state of their own: they fetch tokens with the
//! server-side subscription key and mirror upstream failures verbatim.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::providers::speech::{SpeechClient, SpeechError};
use crate::state::AppState;

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Upstream { status, body } => ApiError::mirrored(status, body),
            SpeechError::Request(msg) => ApiError::bad_gateway(msg),
        }
    }
}

fn speech_client(state: &AppState) -> Result<&SpeechClient, ApiError> {
    state
        .speech
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("speech provider is not configured"))
}

#[utoipa::path(
    get,
    path = "/get-ice-server-token",
    tag = "Speech",
    responses(
        (status = 200, description = "ICE relay credentials"),
        (status = 503, description = "Speech provider not configured")
    )
)]
pub async fn ice_server_token(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = speech_client(&state)?.ice_server_token().await?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/get-speech-token",
    tag = "Speech",
    responses(
        (status = 200, description = "Short-lived speech token"),
        (status = 503, description = "Speech provider not configured")
    )
)]
pub async fn speech_token(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let speech = speech_client(&state)?;
    let token = speech.issue_token().await?;
    Ok(Json(json!({ "token": token })))
}

#[utoipa::path(
    get,
    path = "/get-speech-region",
    tag = "Speech",
    responses(
        (status = 200, description = "Configured speech region"),
        (status = 503, description = "Speech provider not configured")
    )
)]
pub async fn speech_region(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let speech = speech_client(&state)?;
    Ok(Json(json!({ "speech_region": speech.region() })))
}

#[utoipa::path(
    get,
    path = "/get-supported-languages",
    tag = "Speech",
    responses(
        (status = 200, description = "Configured language tags"),
        (status = 503, description = "Speech provider not configured")
    )
)]
pub async fn supported_languages(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let speech = speech_client(&state)?;
    Ok(Json(json!({ "supported_languages": speech.languages() })))
}

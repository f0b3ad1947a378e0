// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Chat UI asset directory availability.
    pub static_dir: String,
    /// "enabled" or "disabled" depending on identity provider config.
    pub auth: String,
    /// "configured" or "unconfigured" speech provider.
    pub speech: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness probe. 503 when the chat UI assets are missing.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is degraded", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let static_ok = state.config.static_dir.join("index.html").exists();

    let response = ReadyResponse {
        status: if static_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            static_dir: if static_ok { "ok" } else { "missing" }.to_string(),
            auth: if state.oidc.is_some() {
                "enabled"
            } else {
                "disabled"
            }
            .to_string(),
            speech: if state.speech.is_some() {
                "configured"
            } else {
                "unconfigured"
            }
            .to_string(),
        },
    };

    let status = if static_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe. Always 200 while the process runs; no dependency checks.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn live() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{guard, routes as auth_routes};
use crate::state::AppState;

pub mod chat;
pub mod health;
pub mod relay;
pub mod speech;

pub fn router(state: AppState) -> Router {
    // The callback path is configurable; resolve it before the state moves.
    let callback_path = state.config.redirect_path().to_string();

    let guarded = Router::new()
        .route("/", get(chat::index))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_auth,
        ));

    Router::new()
        .merge(guarded)
        .route("/favicon.ico", get(chat::favicon))
        .route("/login", get(auth_routes::login))
        .route(&callback_path, get(auth_routes::callback))
        .route("/logout", get(auth_routes::logout))
        .route("/speak", post(relay::speak))
        .route("/get-ice-server-token", get(speech::ice_server_token))
        .route("/get-speech-token", get(speech::speech_token))
        .route("/get-speech-region", get(speech::speech_region))
        .route("/get-supported-languages", get(speech::supported_languages))
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        relay::speak,
        speech::ice_server_token,
        speech::speech_token,
        speech::speech_region,
        speech::supported_languages,
        health::health,
        health::live
    ),
    components(schemas(
        relay::SpeakRequest,
        relay::DetailBody,
        health::ReadyResponse,
        health::HealthChecks,
        health::HealthResponse
    )),
    tags(
        (name = "Relay", description = "Streaming relay to the conversational orchestrator"),
        (name = "Speech", description = "Speech provider token pass-throughs"),
        (name = "Health", description = "Probes")
    )
)]
struct ApiDoc;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Access guard for protected routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::session::Session;
use crate::state::AppState;

/// Admit authenticated sessions, redirect everyone else to `/login`.
///
/// With authentication disabled every request passes through. The guard
/// itself never mutates the session.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.oidc.is_none() {
        return next.run(request).await;
    }

    let jar = PrivateCookieJar::from_headers(request.headers(), state.cookie_key.clone());
    if Session::load(&jar).is_authenticated() {
        next.run(request).await
    } else {
        Redirect::temporary("/login").into_response()
    }
}

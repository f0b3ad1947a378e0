// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Login, callback, and logout handlers.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::oidc::id_token_claims;
use crate::auth::AuthError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /login` — start the authorization-code flow.
///
/// Overwrites any pending login with a fresh nonce, so only the most recent
/// initiation can complete.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let Some(oidc) = &state.oidc else {
        return (jar, Redirect::temporary("/"));
    };

    let nonce = Uuid::new_v4().to_string();
    let authorize_url = oidc.authorization_url(&nonce);
    let jar = Session::PendingAuth { nonce }.store(jar, state.config.secure_cookies());

    tracing::debug!("redirecting to identity provider");
    (jar, Redirect::temporary(&authorize_url))
}

/// OAuth callback — validate the echoed state, then exchange the code.
///
/// The checks run in a fixed order and the first failure wins; no partial
/// session state is committed on any failure path, and the pending nonce is
/// left in place so the provider's redirect can be retried.
pub async fn callback(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(PrivateCookieJar, Redirect), AuthError> {
    let Some(oidc) = &state.oidc else {
        return Ok((jar, Redirect::temporary("/")));
    };

    let session = Session::load(&jar);
    let matches_nonce = match (session.nonce(), params.state.as_deref()) {
        (Some(stored), Some(echoed)) => stored == echoed,
        _ => false,
    };
    if !matches_nonce {
        tracing::warn!("login state mismatch on callback");
        return Err(AuthError::StateMismatch);
    }

    if let Some(error) = &params.error {
        let description = params
            .error_description
            .clone()
            .unwrap_or_else(|| error.clone());
        tracing::warn!(error = %error, "identity provider returned an error");
        return Err(AuthError::ProviderError(description));
    }

    let code = params.code.as_deref().ok_or(AuthError::CodeMissing)?;

    let tokens = oidc.exchange_code(code).await.map_err(|e| {
        tracing::warn!(error = %e, "token exchange failed");
        AuthError::TokenExchangeFailed(e.to_string())
    })?;

    let claims = tokens
        .id_token
        .as_deref()
        .map(id_token_claims)
        .unwrap_or_default();

    tracing::info!("login completed");
    let jar = Session::Authenticated {
        claims,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.unwrap_or_default(),
    }
    .store(jar, state.config.secure_cookies());

    Ok((jar, Redirect::temporary("/")))
}

/// `GET /logout` — drop the session and send the browser to the provider's
/// end-session endpoint. Clearing an already-empty session is a no-op.
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let jar = Session::Anonymous.store(jar, state.config.secure_cookies());
    let target = state
        .oidc
        .as_ref()
        .map(|oidc| oidc.end_session_url())
        .unwrap_or_else(|| "/".to_string());

    tracing::info!("session cleared");
    (jar, Redirect::temporary(&target))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Authorization-code flow errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of one ordered callback check. Every variant maps to HTTP 400;
/// none of them commits any session state.
#[derive(Debug)]
pub enum AuthError {
    /// The `state` echoed by the provider does not match the stored nonce.
    StateMismatch,
    /// The provider returned an `error` parameter on the callback.
    ProviderError(String),
    /// The callback carried no authorization code.
    CodeMissing,
    /// The provider rejected the code-for-token exchange.
    TokenExchangeFailed(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::StateMismatch => "auth_state_mismatch",
            AuthError::ProviderError(_) => "auth_provider_error",
            AuthError::CodeMissing => "auth_code_missing",
            AuthError::TokenExchangeFailed(_) => "auth_token_exchange_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::StateMismatch => {
                write!(f, "Login state does not match the pending login attempt")
            }
            AuthError::ProviderError(desc) => write!(f, "Identity provider error: {desc}"),
            AuthError::CodeMissing => write!(f, "Callback is missing the authorization code"),
            AuthError::TokenExchangeFailed(desc) => write!(f, "Token exchange failed: {desc}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

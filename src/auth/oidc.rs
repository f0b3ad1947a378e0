// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Confidential OIDC client for the authorization-code exchange.
//!
//! Builds the authorize and end-session URLs and performs the server-side
//! code-for-token exchange against the identity provider. Provider calls
//! use the bounded HTTP client so a dead provider cannot hang a request
//! task.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::config::OidcConfig;

#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    #[error("token request failed: {0}")]
    Request(String),

    #[error("{description}")]
    Exchange { status: u16, description: String },
}

/// Tokens returned by the provider on a successful exchange.
#[derive(Debug, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Immutable provider configuration plus the shared bounded HTTP client.
#[derive(Clone)]
pub struct OidcClient {
    authority: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    post_logout_redirect_uri: String,
    scopes: String,
    http: Client,
}

impl OidcClient {
    pub fn new(config: &OidcConfig, public_base_url: &str, http: Client) -> Self {
        Self {
            authority: config.authority.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: format!("{public_base_url}{}", config.redirect_path),
            post_logout_redirect_uri: format!("{public_base_url}/"),
            scopes: config.scopes.clone(),
            http,
        }
    }

    /// Authorize URL carrying the login nonce as the `state` parameter.
    pub fn authorization_url(&self, state: &str) -> String {
        let mut url = Url::parse(&format!("{}/oauth2/v2.0/authorize", self.authority))
            .expect("authority URL validated at startup");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_mode", "query")
            .append_pair("scope", &self.scopes)
            .append_pair("state", state);
        url.into()
    }

    /// Provider end-session URL used after the local session is cleared.
    pub fn end_session_url(&self) -> String {
        let mut url = Url::parse(&format!("{}/oauth2/v2.0/logout", self.authority))
            .expect("authority URL validated at startup");
        url.query_pairs_mut()
            .append_pair("post_logout_redirect_uri", &self.post_logout_redirect_uri);
        url.into()
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, OidcError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", self.scopes.as_str()),
        ];

        let response = self
            .http
            .post(format!("{}/oauth2/v2.0/token", self.authority))
            .form(&params)
            .send()
            .await
            .map_err(|e| OidcError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<ExchangeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .unwrap_or_else(|| format!("provider returned status {}", status.as_u16()));
            return Err(OidcError::Exchange {
                status: status.as_u16(),
                description,
            });
        }

        response
            .json::<TokenSet>()
            .await
            .map_err(|e| OidcError::Request(format!("invalid token response: {e}")))
    }
}

/// Decode the claims segment of an ID token.
///
/// The token was just received over the direct TLS channel to the provider,
/// so the signature is not re-verified here; an undecodable token yields an
/// empty claims map rather than a failed login.
pub fn id_token_claims(id_token: &str) -> Map<String, Value> {
    id_token
        .split('.')
        .nth(1)
        .and_then(|segment| URL_SAFE_NO_PAD.decode(segment).ok())
        .and_then(|payload| serde_json::from_slice::<Map<String, Value>>(&payload).ok())
        .unwrap_or_default()
}

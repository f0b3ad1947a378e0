// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use reqwest::Client;
use url::Url;

use crate::auth::OidcClient;
use crate::config::{AppConfig, ConfigError};
use crate::providers::{OrchestratorClient, SpeechClient};

/// Timeout for identity-provider and speech-provider calls. The relay's
/// orchestrator client deliberately has none.
const DEPENDENCY_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state: immutable configuration plus the HTTP clients
/// built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
    pub orchestrator: OrchestratorClient,
    pub oidc: Option<OidcClient>,
    pub speech: Option<SpeechClient>,
}

// PrivateCookieJar extracts its key from the application state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        if config.session_secret.len() < 32 {
            return Err(ConfigError::InvalidSetting(
                "SESSION_SECRET must be at least 32 bytes".to_string(),
            ));
        }
        let cookie_key = Key::derive_from(config.session_secret.as_bytes());

        if let Some(oidc) = &config.oidc {
            Url::parse(&oidc.authority).map_err(|_| {
                ConfigError::InvalidSetting("AAD_AUTHORITY is not a valid URL".to_string())
            })?;
        }

        let bounded = Client::builder()
            .timeout(DEPENDENCY_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        // No timeout: relay streams are expected to stay open for minutes.
        let streaming = Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let orchestrator = OrchestratorClient::new(&config.orchestrator, streaming);
        let oidc = config
            .oidc
            .as_ref()
            .map(|c| OidcClient::new(c, &config.public_base_url, bounded.clone()));
        let speech = config
            .speech
            .as_ref()
            .map(|c| SpeechClient::new(c, bounded.clone()));

        Ok(Self {
            config: Arc::new(config),
            cookie_key,
            orchestrator,
            oidc,
            speech,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrchestratorConfig;
    use std::path::PathBuf;

    fn minimal_config() -> AppConfig {
        AppConfig {
            public_base_url: "http://localhost:8000".to_string(),
            static_dir: PathBuf::from("static"),
            session_secret: "0123456789abcdef0123456789abcdef".to_string(),
            orchestrator: OrchestratorConfig {
                stream_url: "http://localhost:7071/api/orcstream".to_string(),
                function_key: "fk".to_string(),
            },
            oidc: None,
            speech: None,
        }
    }

    #[test]
    fn builds_without_optional_providers() {
        let state = AppState::new(minimal_config()).unwrap();
        assert!(state.oidc.is_none());
        assert!(state.speech.is_none());
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut config = minimal_config();
        config.session_secret = "too-short".to_string();
        assert!(matches!(
            AppState::new(config),
            Err(ConfigError::InvalidSetting(_))
        ));
    }

    #[test]
    fn invalid_authority_is_rejected() {
        let mut config = minimal_config();
        config.oidc = Some(crate::config::OidcConfig {
            authority: "not a url".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_path: "/auth".to_string(),
            scopes: "openid".to_string(),
        });
        assert!(matches!(
            AppState::new(config),
            Err(ConfigError::InvalidSetting(_))
        ));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! # Runtime Configuration
//!
//! Configuration is read once at startup from the environment and the
//! [`SecretProvider`](crate::secrets::SecretProvider), validated, and then
//! shared immutably across request tasks. The process refuses to start when
//! a required secret is missing.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `PUBLIC_BASE_URL` | External base URL used in redirect URIs | `http://localhost:8000` |
//! | `STATIC_DIR` | Directory holding the chat UI assets | `static` |
//! | `STREAMING_ENDPOINT` | Orchestrator streaming endpoint | `http://localhost:7071/api/orcstream` |
//! | `FUNCTION_KEY` | Orchestrator service credential | Required (secret) |
//! | `SESSION_SECRET` | Session cookie key material (>= 32 bytes) | Required (secret) |
//! | `AAD_AUTHORITY` | Identity provider authority URL | Unset disables auth |
//! | `AAD_CLIENT_ID` | OIDC client id | Required when auth enabled |
//! | `AAD_CLIENT_SECRET` | OIDC client secret | Required when auth enabled (secret) |
//! | `AAD_REDIRECT_PATH` | OAuth callback path | `/auth` |
//! | `AAD_SCOPES` | Requested scopes, space separated | `openid profile offline_access` |
//! | `SPEECH_KEY` | Speech provider subscription key | Unset disables speech routes (secret) |
//! | `SPEECH_REGION` | Speech provider region | Unset disables speech routes |
//! | `SPEECH_ENDPOINT_BASE` | Override the regional speech endpoint base | Derived from region |
//! | `SUPPORTED_LANGUAGES` | Comma-separated language tags | `en-US` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use crate::secrets::{SecretError, SecretProvider};

const DEFAULT_STREAMING_ENDPOINT: &str = "http://localhost:7071/api/orcstream";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_REDIRECT_PATH: &str = "/auth";
const DEFAULT_SCOPES: &str = "openid profile offline_access";
const DEFAULT_LANGUAGES: &str = "en-US";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required secret: {0}")]
    MissingSecret(String),

    #[error("missing required setting: {0}")]
    MissingSetting(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl From<SecretError> for ConfigError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::NotFound(name) => ConfigError::MissingSecret(name),
        }
    }
}

/// Identity provider settings for the authorization-code flow.
/// Absent when authentication is disabled.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub authority: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_path: String,
    pub scopes: String,
}

/// Upstream conversational orchestrator settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub stream_url: String,
    pub function_key: String,
}

/// Speech provider settings. Absent when the speech routes are disabled.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub key: String,
    pub region: String,
    /// Overrides the regional endpoint base, e.g. for tests.
    pub endpoint_base: Option<String>,
    pub languages: Vec<String>,
}

/// Process-wide immutable configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub public_base_url: String,
    pub static_dir: PathBuf,
    pub session_secret: String,
    pub orchestrator: OrchestratorConfig,
    pub oidc: Option<OidcConfig>,
    pub speech: Option<SpeechConfig>,
}

impl AppConfig {
    pub fn load(secrets: &dyn SecretProvider) -> Result<Self, ConfigError> {
        let orchestrator = OrchestratorConfig {
            stream_url: env_or_default("STREAMING_ENDPOINT", DEFAULT_STREAMING_ENDPOINT),
            function_key: secrets.get("FUNCTION_KEY")?,
        };

        let oidc = match env_optional("AAD_AUTHORITY") {
            Some(authority) => Some(OidcConfig {
                authority: authority.trim_end_matches('/').to_string(),
                client_id: env_required("AAD_CLIENT_ID")?,
                client_secret: secrets.get("AAD_CLIENT_SECRET")?,
                redirect_path: env_or_default("AAD_REDIRECT_PATH", DEFAULT_REDIRECT_PATH),
                scopes: env_or_default("AAD_SCOPES", DEFAULT_SCOPES),
            }),
            None => None,
        };

        let speech = match (secrets.try_get("SPEECH_KEY"), env_optional("SPEECH_REGION")) {
            (Some(key), Some(region)) => Some(SpeechConfig {
                key,
                region,
                endpoint_base: env_optional("SPEECH_ENDPOINT_BASE"),
                languages: parse_languages(&env_or_default(
                    "SUPPORTED_LANGUAGES",
                    DEFAULT_LANGUAGES,
                )),
            }),
            _ => None,
        };

        Ok(Self {
            public_base_url: env_or_default("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            static_dir: PathBuf::from(env_or_default("STATIC_DIR", DEFAULT_STATIC_DIR)),
            session_secret: secrets.get("SESSION_SECRET")?,
            orchestrator,
            oidc,
            speech,
        })
    }

    /// The OAuth callback path, whether or not authentication is enabled.
    pub fn redirect_path(&self) -> &str {
        self.oidc
            .as_ref()
            .map(|c| c.redirect_path.as_str())
            .unwrap_or(DEFAULT_REDIRECT_PATH)
    }

    /// Session cookies are marked `Secure` when the public URL is HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_required(name: &str) -> Result<String, ConfigError> {
    env_optional(name).ok_or_else(|| ConfigError::MissingSetting(name.to_string()))
}

fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::testing::MapSecretProvider;
    use std::collections::HashMap;

    fn base_secrets() -> MapSecretProvider {
        MapSecretProvider(HashMap::from([
            ("FUNCTION_KEY".to_string(), "fk".to_string()),
            (
                "SESSION_SECRET".to_string(),
                "0123456789abcdef0123456789abcdef".to_string(),
            ),
        ]))
    }

    #[test]
    fn load_fails_without_function_key() {
        let secrets = MapSecretProvider(HashMap::from([(
            "SESSION_SECRET".to_string(),
            "0123456789abcdef0123456789abcdef".to_string(),
        )]));
        let err = AppConfig::load(&secrets).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(name) if name == "FUNCTION_KEY"));
    }

    #[test]
    fn load_without_authority_disables_auth() {
        let config = AppConfig::load(&base_secrets()).unwrap();
        assert!(config.oidc.is_none());
        assert_eq!(config.redirect_path(), "/auth");
    }

    #[test]
    fn speech_requires_key_and_region() {
        let mut secrets = base_secrets();
        secrets.0.insert("SPEECH_KEY".to_string(), "sk".to_string());
        // Region not set, so the speech provider stays unconfigured.
        let config = AppConfig::load(&secrets).unwrap();
        assert!(config.speech.is_none());
    }

    #[test]
    fn parse_languages_trims_and_drops_empties() {
        assert_eq!(
            parse_languages("en-US, de-DE,,fr-FR "),
            vec!["en-US", "de-DE", "fr-FR"]
        );
        assert!(parse_languages("").is_empty());
    }

    #[test]
    fn secure_cookies_follow_public_url_scheme() {
        let mut config = AppConfig::load(&base_secrets()).unwrap();
        assert!(!config.secure_cookies());
        config.public_base_url = "https://chat.example.com".to_string();
        assert!(config.secure_cookies());
    }
}

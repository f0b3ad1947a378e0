// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Speech provider client: avatar relay (ICE) tokens and short-lived
//! speech tokens, issued with the subscription key. The key stays
//! server-side; the browser only ever sees the issued tokens.

use reqwest::Client;
use serde_json::Value;

use crate::config::SpeechConfig;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech provider request failed: {0}")]
    Request(String),

    #[error("speech provider returned status {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[derive(Clone)]
pub struct SpeechClient {
    key: String,
    region: String,
    languages: Vec<String>,
    relay_token_url: String,
    issue_token_url: String,
    http: Client,
}

impl SpeechClient {
    pub fn new(config: &SpeechConfig, http: Client) -> Self {
        let (relay_token_url, issue_token_url) = match &config.endpoint_base {
            Some(base) => {
                let base = base.trim_end_matches('/');
                (
                    format!("{base}/cognitiveservices/avatar/relay/token/v1"),
                    format!("{base}/sts/v1.0/issueToken"),
                )
            }
            None => (
                format!(
                    "https://{}.tts.speech.microsoft.com/cognitiveservices/avatar/relay/token/v1",
                    config.region
                ),
                format!(
                    "https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken",
                    config.region
                ),
            ),
        };

        Self {
            key: config.key.clone(),
            region: config.region.clone(),
            languages: config.languages.clone(),
            relay_token_url,
            issue_token_url,
            http,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Fetch ICE relay server credentials for the avatar connection.
    /// The provider's JSON body is relayed to the caller untouched.
    pub async fn ice_server_token(&self) -> Result<Value, SpeechError> {
        let response = self
            .http
            .get(&self.relay_token_url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SpeechError::Request(format!("invalid relay token response: {e}")))
    }

    /// Issue a short-lived speech token (opaque text body).
    pub async fn issue_token(&self) -> Result<String, SpeechError> {
        let response = self
            .http
            .post(&self.issue_token_url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> SpeechClient {
        SpeechClient::new(
            &SpeechConfig {
                key: "subkey".to_string(),
                region: "westeurope".to_string(),
                endpoint_base: Some(base.to_string()),
                languages: vec!["en-US".to_string()],
            },
            Client::new(),
        )
    }

    #[test]
    fn regional_urls_derive_from_region() {
        let speech = SpeechClient::new(
            &SpeechConfig {
                key: "k".to_string(),
                region: "westus2".to_string(),
                endpoint_base: None,
                languages: vec![],
            },
            Client::new(),
        );
        assert_eq!(
            speech.relay_token_url,
            "https://westus2.tts.speech.microsoft.com/cognitiveservices/avatar/relay/token/v1"
        );
        assert_eq!(
            speech.issue_token_url,
            "https://westus2.api.cognitive.microsoft.com/sts/v1.0/issueToken"
        );
    }

    #[tokio::test]
    async fn ice_server_token_relays_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cognitiveservices/avatar/relay/token/v1"))
            .and(header(SUBSCRIPTION_KEY_HEADER, "subkey"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Urls": ["turn:relay.example.com"]})),
            )
            .mount(&server)
            .await;

        let body = client(&server.uri()).ice_server_token().await.unwrap();
        assert_eq!(body["Urls"][0], "turn:relay.example.com");
    }

    #[tokio::test]
    async fn issue_token_returns_opaque_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sts/v1.0/issueToken"))
            .and(header(SUBSCRIPTION_KEY_HEADER, "subkey"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tok.en"))
            .mount(&server)
            .await;

        assert_eq!(client(&server.uri()).issue_token().await.unwrap(), "tok.en");
    }

    #[tokio::test]
    async fn upstream_failure_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sts/v1.0/issueToken"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).issue_token().await.unwrap_err();
        match err {
            SpeechError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

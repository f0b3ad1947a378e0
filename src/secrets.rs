// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Secret retrieval.
//!
//! All credentials (orchestrator key, session key material, client secret,
//! speech subscription key) are resolved by logical name through the
//! [`SecretProvider`] trait at startup. The default provider reads the
//! process environment; a vault-backed provider can replace it without
//! touching the rest of the configuration code.

use std::env;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),
}

/// Narrow interface over the process's secret source.
pub trait SecretProvider: Send + Sync {
    /// Fetch a required secret. Missing secrets are startup-fatal.
    fn get(&self, name: &str) -> Result<String, SecretError>;

    /// Fetch an optional secret.
    fn try_get(&self, name: &str) -> Option<String>;
}

/// Environment-backed secret provider. A secret's logical name is the
/// environment variable name; empty values count as absent.
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn get(&self, name: &str) -> Result<String, SecretError> {
        self.try_get(name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }

    fn try_get(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    /// In-memory provider for tests.
    pub struct MapSecretProvider(pub HashMap<String, String>);

    impl SecretProvider for MapSecretProvider {
        fn get(&self, name: &str) -> Result<String, SecretError> {
            self.try_get(name)
                .ok_or_else(|| SecretError::NotFound(name.to_string()))
        }

        fn try_get(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MapSecretProvider;
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_provider_reads_present_variable() {
        env::set_var("VC_TEST_SECRET_PRESENT", "s3cret");
        let provider = EnvSecretProvider;
        assert_eq!(provider.get("VC_TEST_SECRET_PRESENT").unwrap(), "s3cret");
        env::remove_var("VC_TEST_SECRET_PRESENT");
    }

    #[test]
    fn env_provider_treats_empty_as_missing() {
        env::set_var("VC_TEST_SECRET_EMPTY", "");
        let provider = EnvSecretProvider;
        assert!(provider.try_get("VC_TEST_SECRET_EMPTY").is_none());
        assert!(matches!(
            provider.get("VC_TEST_SECRET_EMPTY"),
            Err(SecretError::NotFound(name)) if name == "VC_TEST_SECRET_EMPTY"
        ));
        env::remove_var("VC_TEST_SECRET_EMPTY");
    }

    #[test]
    fn map_provider_round_trip() {
        let provider = MapSecretProvider(HashMap::from([(
            "FUNCTION_KEY".to_string(),
            "fk".to_string(),
        )]));
        assert_eq!(provider.get("FUNCTION_KEY").unwrap(), "fk");
        assert!(provider.get("OTHER").is_err());
    }
}

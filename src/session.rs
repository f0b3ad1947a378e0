// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Encrypted-cookie browser session.
//!
//! The session is a per-browser state machine serialized as JSON inside a
//! single `PrivateCookieJar` cookie (AES-GCM encrypted and authenticated by
//! the key derived from `SESSION_SECRET`). The enum shape enforces the
//! presence invariants directly: identity claims exist only once
//! authenticated, and the login nonce exists only while a login is in
//! flight.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::Duration;

pub const SESSION_COOKIE: &str = "vc_session";

/// Session lifetime. Expiry falls back to `Anonymous` on the next request.
const SESSION_MAX_AGE: Duration = Duration::days(1);

/// Per-browser session state.
///
/// `Anonymous -> PendingAuth` on login initiation, `PendingAuth ->
/// Authenticated` on a successful callback, anything `-> Anonymous` on
/// logout. A failed callback leaves `PendingAuth` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    PendingAuth {
        nonce: String,
    },
    Authenticated {
        claims: Map<String, Value>,
        access_token: String,
        refresh_token: String,
    },
}

impl Session {
    /// Decode the session from the cookie jar. A missing or unreadable
    /// cookie (tampered, expired key) yields `Anonymous`.
    pub fn load(jar: &PrivateCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    /// Encode the session into the jar, replacing any previous cookie.
    /// `Anonymous` is represented by removing the cookie entirely.
    pub fn store(&self, jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
        match self {
            Session::Anonymous => jar.remove(removal_cookie()),
            _ => {
                // Serialization of this enum cannot fail; the claims map is
                // already JSON.
                let value = serde_json::to_string(self).unwrap_or_default();
                jar.add(
                    Cookie::build((SESSION_COOKIE, value))
                        .http_only(true)
                        .secure(secure)
                        .same_site(SameSite::Lax)
                        .path("/")
                        .max_age(SESSION_MAX_AGE)
                        .build(),
                )
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The nonce of an in-flight login, if any.
    pub fn nonce(&self) -> Option<&str> {
        match self {
            Session::PendingAuth { nonce } => Some(nonce),
            _ => None,
        }
    }

    /// Identity claims of an authenticated session, if any.
    pub fn claims(&self) -> Option<&Map<String, Value>> {
        match self {
            Session::Authenticated { claims, .. } => Some(claims),
            _ => None,
        }
    }
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

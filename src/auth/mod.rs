// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! # Authentication Module
//!
//! OpenID-Connect authorization-code login for the chat UI.
//!
//! ## Auth Flow
//!
//! 1. `GET /login` writes a fresh nonce into the encrypted session cookie
//!    and redirects to the identity provider's authorize endpoint with the
//!    nonce as the `state` parameter.
//! 2. The provider redirects back to the callback path with `code` and
//!    `state`; the gateway checks the echoed state against the stored
//!    nonce, then exchanges the code for tokens server-side using the
//!    confidential client credentials.
//! 3. Identity claims and the delegated tokens are stored in the session;
//!    `GET /logout` clears it and redirects to the provider's end-session
//!    endpoint.
//!
//! When no identity provider is configured the whole flow degrades to
//! redirects back home and the access guard admits everyone.

pub mod error;
pub mod guard;
pub mod oidc;
pub mod routes;

pub use error::AuthError;
pub use oidc::OidcClient;

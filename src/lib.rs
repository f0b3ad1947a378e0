// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Voicechat Gateway - Conversational Orchestrator Gateway
//!
//! Backend for a browser chat client: serves the static UI, gates it
//! behind an OIDC authorization-code login carried in an encrypted
//! session cookie, and relays questions to the upstream conversational
//! orchestrator as a live newline-delimited event stream.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Authorization-code flow, session guard
//! - `providers` - Upstream clients (orchestrator stream, speech tokens)
//! - `session` - Encrypted-cookie session state machine
//! - `secrets` - Secret retrieval at startup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod providers;
pub mod secrets;
pub mod session;
pub mod state;

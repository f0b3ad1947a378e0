// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Upstream service clients.

pub mod orchestrator;
pub mod speech;

pub use orchestrator::OrchestratorClient;
pub use speech::SpeechClient;

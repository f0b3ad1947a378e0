// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Voicechat Gateway

//! Conversational orchestrator streaming client.
//!
//! One upstream connection per relay call, authenticated with the service
//! credential header. The connection uses the unbounded HTTP client:
//! conversational responses can legitimately take minutes, so no read
//! timeout applies. The [`line_events`] adapter turns the upstream byte
//! stream into newline-terminated text events in arrival order.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;

use crate::config::OrchestratorConfig;

/// Header carrying the orchestrator service credential. Never forwarded to
/// the browser.
const FUNCTION_KEY_HEADER: &str = "x-functions-key";

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("orchestrator request failed: {0}")]
    Request(String),
}

/// Request body sent upstream. Identity fields are always present, empty
/// when the caller supplied none, so the upstream contract stays stable.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorRequest {
    pub conversation_id: String,
    pub question: String,
    pub text_only: bool,
    pub client_principal_id: String,
    pub client_principal_name: String,
    pub access_token: String,
}

#[derive(Clone)]
pub struct OrchestratorClient {
    stream_url: String,
    function_key: String,
    http: Client,
}

impl OrchestratorClient {
    pub fn new(config: &OrchestratorConfig, http: Client) -> Self {
        Self {
            stream_url: config.stream_url.clone(),
            function_key: config.function_key.clone(),
            http,
        }
    }

    /// Open the streaming connection for one question. The caller owns the
    /// response; dropping it releases the upstream connection.
    pub async fn ask(
        &self,
        request: &OrchestratorRequest,
    ) -> Result<reqwest::Response, OrchestratorError> {
        self.http
            .post(&self.stream_url)
            .header(FUNCTION_KEY_HEADER, &self.function_key)
            .json(request)
            .send()
            .await
            .map_err(|e| OrchestratorError::Request(e.to_string()))
    }
}

/// Split an upstream byte stream into newline-terminated line events.
///
/// Lines are emitted in arrival order; blank lines are dropped; a trailing
/// fragment without a final newline is flushed when the upstream closes.
/// An upstream read error yields one `Err` item and then the stream ends,
/// so the relay terminates exactly once.
pub fn line_events<S, E>(upstream: S) -> impl Stream<Item = Result<Bytes, std::io::Error>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    struct LineState<S> {
        upstream: S,
        buf: Vec<u8>,
        done: bool,
    }

    futures_util::stream::unfold(
        LineState {
            upstream,
            buf: Vec::new(),
            done: false,
        },
        |mut st| async move {
            loop {
                if let Some(pos) = st.buf.iter().position(|&b| b == b'\n') {
                    let mut line: Vec<u8> = st.buf.drain(..=pos).collect();
                    line.pop();
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    if line.is_empty() {
                        continue;
                    }
                    line.push(b'\n');
                    return Some((Ok(Bytes::from(line)), st));
                }

                if st.done {
                    if st.buf.is_empty() {
                        return None;
                    }
                    let mut line = std::mem::take(&mut st.buf);
                    line.push(b'\n');
                    return Some((Ok(Bytes::from(line)), st));
                }

                match st.upstream.next().await {
                    Some(Ok(chunk)) => st.buf.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        st.done = true;
                        st.buf.clear();
                        return Some((Err(std::io::Error::other(e)), st));
                    }
                    None => st.done = true,
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect(parts: &[&str]) -> Vec<String> {
        line_events(chunks(parts))
            .map(|item| String::from_utf8(item.unwrap().to_vec()).unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn blank_lines_are_dropped_and_order_preserved() {
        assert_eq!(collect(&["a\n", "\n", "b\n"]).await, vec!["a\n", "b\n"]);
    }

    #[tokio::test]
    async fn lines_split_across_chunk_boundaries() {
        assert_eq!(
            collect(&["he", "llo\nwor", "ld\n"]).await,
            vec!["hello\n", "world\n"]
        );
    }

    #[tokio::test]
    async fn trailing_fragment_is_flushed_on_close() {
        assert_eq!(collect(&["a\nfinal"]).await, vec!["a\n", "final\n"]);
    }

    #[tokio::test]
    async fn carriage_returns_are_stripped() {
        assert_eq!(collect(&["a\r\n\r\nb\r\n"]).await, vec!["a\n", "b\n"]);
    }

    #[tokio::test]
    async fn upstream_error_ends_the_stream_after_one_err() {
        let upstream = stream::iter(vec![
            Ok(Bytes::from_static(b"a\npartial")),
            Err(std::io::Error::other("connection reset")),
        ]);

        let items: Vec<_> = line_events(upstream).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from_static(b"a\n"));
        assert!(items[1].is_err());
    }
}

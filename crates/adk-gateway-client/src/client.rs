//! ADK server client.

use std::{collections::VecDeque, time::Duration};

use adk_gateway_core::{
    AgentServer, AgentTarget, GatewayConfig, GatewayError, NO_FINAL_TEXT, USER_ID,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use serde_json::Value;

use crate::{
    request::RunSseRequest,
    sse::{Delivery, SseDecoder},
};

/// Stream of event texts from a streaming `run_sse` call.
pub type TextStream = BoxStream<'static, Result<String, GatewayError>>;

/// Client for the ADK server HTTP API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct AdkClient {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl AdkClient {
    /// Create a client without a request deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with an optional per-request deadline.
    #[must_use]
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::with_timeout(config.request_timeout())
    }

    fn deadline(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let resp = self.deadline(req).send().await.map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::RemoteError {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    /// List the agents (apps) served by an ADK server.
    ///
    /// # Errors
    /// Returns `RemoteError` on a non-success status, `ProtocolError` if the
    /// body is not JSON.
    pub async fn list_apps(&self, server_url: &str) -> Result<Value, GatewayError> {
        let url = format!("{}/list-apps", server_url.trim_end_matches('/'));
        tracing::debug!(%url, "Listing apps");
        let resp = self.send(self.http.get(&url)).await?;
        json_body(resp).await
    }

    /// Create a remote session and return the server's session document.
    ///
    /// # Errors
    /// Returns `RemoteError` on a non-success status, `ProtocolError` if the
    /// body is not JSON.
    pub async fn create_session(&self, target: &AgentTarget) -> Result<Value, GatewayError> {
        let url = target.sessions_endpoint(USER_ID);
        tracing::debug!(%url, "Creating session");
        let resp = self
            .send(self.http.post(&url).json(&serde_json::json!({})))
            .await?;
        json_body(resp).await
    }

    async fn run_sse(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
        streaming: bool,
    ) -> Result<reqwest::Response, GatewayError> {
        let body =
            RunSseRequest::user_text(&target.agent_name, USER_ID, session_id, message, streaming);
        let url = target.endpoint("/run_sse");
        tracing::debug!(%url, agent = %target.agent_name, streaming, "Sending message");
        self.send(self.http.post(&url).json(&body)).await
    }

    /// Send a message in buffered mode.
    ///
    /// Waits for the whole body; the last event carrying text wins. Returns
    /// [`NO_FINAL_TEXT`] when no event matched.
    ///
    /// # Errors
    /// Returns `RemoteError` on a non-success status, `Transport`/`Timeout`
    /// if the body cannot be read.
    pub async fn send_message(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<String, GatewayError> {
        let resp = self.run_sse(target, session_id, message, false).await?;
        let body = resp.bytes().await.map_err(transport_error)?;

        let mut decoder = SseDecoder::new(Delivery::Overwrite);
        decoder.feed(&body);
        decoder.finish();
        Ok(decoder
            .into_text()
            .unwrap_or_else(|| NO_FINAL_TEXT.to_string()))
    }

    /// Send a message in streaming mode, yielding each event's text as it
    /// arrives.
    ///
    /// # Errors
    /// Returns `RemoteError` if the initial response is not a success. Body
    /// read failures are yielded as stream items.
    pub async fn stream_events(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<TextStream, GatewayError> {
        let resp = self.run_sse(target, session_id, message, true).await?;
        Ok(decode_stream(resp.bytes_stream().boxed()))
    }

    /// Send a message in streaming mode and return every event's text
    /// appended in order.
    ///
    /// If the request deadline elapses mid-body, the text received so far is
    /// returned.
    ///
    /// # Errors
    /// Returns `RemoteError` on a non-success status, `ProtocolError` if the
    /// body fails mid-stream.
    pub async fn stream_message(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<String, GatewayError> {
        let resp = self.run_sse(target, session_id, message, true).await?;
        let mut bytes = resp.bytes_stream().boxed();
        let mut decoder = SseDecoder::new(Delivery::Append);

        while let Some(chunk) = bytes.next().await {
            match chunk.map_err(|e| StreamFailure::from(e).into_error()) {
                Ok(chunk) => {
                    decoder.feed(&chunk);
                }
                Err(GatewayError::Timeout(reason)) => {
                    tracing::warn!(
                        "Stream deadline elapsed after {} bytes of text: {reason}",
                        decoder.text().map_or(0, str::len)
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        decoder.finish();
        Ok(decoder.into_text().unwrap_or_default())
    }
}

/// Remote session id from a session-creation response.
#[must_use]
pub fn session_id_of(session: &Value) -> Option<String> {
    session
        .get("sessionId")
        .or_else(|| session.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl AgentServer for AdkClient {
    async fn open_session(&self, target: &AgentTarget) -> Result<String, GatewayError> {
        let session = self.create_session(target).await?;
        session_id_of(&session).ok_or_else(|| {
            GatewayError::ProtocolError("session response carries no session id".to_string())
        })
    }

    async fn deliver(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<String, GatewayError> {
        self.send_message(target, session_id, message).await
    }
}

struct DecodeState<S> {
    bytes: S,
    decoder: SseDecoder,
    ready: VecDeque<String>,
    done: bool,
}

/// Turn a body byte stream into a stream of event texts.
fn decode_stream<S, E>(bytes: S) -> TextStream
where
    S: futures::Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: Into<StreamFailure> + Send + 'static,
{
    let state = DecodeState {
        bytes,
        // Texts are yielded as they complete, so the decoder keeps only the last.
        decoder: SseDecoder::new(Delivery::Overwrite),
        ready: VecDeque::new(),
        done: false,
    };

    futures::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(text) = st.ready.pop_front() {
                return Some((Ok(text), st));
            }
            if st.done {
                return None;
            }
            match st.bytes.next().await {
                Some(Ok(chunk)) => st.ready.extend(st.decoder.feed(&chunk)),
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(e.into().into_error()), st));
                }
                None => {
                    st.done = true;
                    st.ready.extend(st.decoder.finish());
                }
            }
        }
    })
    .boxed()
}

/// A body read failure, classified for the streaming loop.
#[derive(Debug)]
struct StreamFailure {
    timed_out: bool,
    message: String,
}

impl StreamFailure {
    fn into_error(self) -> GatewayError {
        if self.timed_out {
            GatewayError::Timeout(self.message)
        } else {
            GatewayError::ProtocolError(format!("stream read error: {}", self.message))
        }
    }
}

impl From<reqwest::Error> for StreamFailure {
    fn from(e: reqwest::Error) -> Self {
        Self {
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for StreamFailure {
    fn from(e: std::io::Error) -> Self {
        Self {
            timed_out: e.kind() == std::io::ErrorKind::TimedOut,
            message: e.to_string(),
        }
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout(e.to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}

async fn json_body(resp: reqwest::Response) -> Result<Value, GatewayError> {
    let text = resp.text().await.map_err(transport_error)?;
    serde_json::from_str(&text)
        .map_err(|e| GatewayError::ProtocolError(format!("invalid JSON response: {e}")))
}

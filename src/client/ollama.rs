use crate::types::{Message, ToolDescriptor};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("chat request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("chat endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed chat response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}

/// The inference server, seen as a single non-streaming request/reply call.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDescriptor]>,
    ) -> Result<Message, EndpointError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: Options,
    // omitted entirely when no tools are advertised, never an empty list
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDescriptor]>,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// The default client waits on the server indefinitely; build one with a
    /// `reqwest` timeout and use [`OllamaClient::with_client`] to bound each
    /// request instead.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatEndpoint for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDescriptor]>,
    ) -> Result<Message, EndpointError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            options: Options { temperature: 0.0 },
            tools,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| EndpointError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Status { status, body });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(EndpointError::MalformedResponse)?;
        Ok(body.message)
    }
}

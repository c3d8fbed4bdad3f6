//! HTTP implementation of the chat answering service

use super::{AnswerError, AnswerService, ClientBuildError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_PATH: &str = "/api/chat";

/// Talks to `POST {base_url}/api/chat`
pub struct HttpAnswerService {
    client: Client,
    endpoint: String,
}

impl HttpAnswerService {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientBuildError> {
        let endpoint = chat_endpoint(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Join the base URL and the chat path without doubling the slash
fn chat_endpoint(base_url: &str) -> Result<String, ClientBuildError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
        });
    }
    Ok(format!("{trimmed}{CHAT_PATH}"))
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&ChatRequest { question })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnswerError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    AnswerError::network(format!("Connection failed: {e}"))
                } else {
                    AnswerError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnswerError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(AnswerError::status(
                status.as_u16(),
                format!("HTTP {status}: {body}"),
            ));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AnswerError::decode(format!("Failed to parse response: {e} - body: {body}")))?;

        Ok(parsed.answer)
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    answer: String,
}

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{BackendError, CompletionBackend};
use crate::api::{CompletionRequest, CompletionResponse};
use crate::core::startup::StartupError;

/// Talks to the deployed completion endpoint with one JSON POST per exchange.
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self, StartupError> {
        let client = Client::builder()
            .user_agent(concat!("yccoach/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StartupError::http_client)?;
        Self::with_client(client, endpoint, api_key)
    }

    pub fn with_client(
        client: Client,
        endpoint: &str,
        api_key: Option<String>,
    ) -> Result<Self, StartupError> {
        let endpoint =
            Url::parse(endpoint).map_err(|err| StartupError::invalid_endpoint(endpoint, err))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(StartupError::invalid_endpoint(
                endpoint.as_str(),
                "only http and https endpoints are supported",
            ));
        }
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let mut http_request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache");
        if let Some(key) = &self.api_key {
            http_request = http_request.header("x-api-key", key);
        }

        let response = http_request
            .json(request)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(BackendError::Transport)?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail: extract_error_summary(&body),
            });
        }

        parse_completion_body(&body)
    }

    fn describe(&self) -> String {
        self.endpoint
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| self.endpoint.to_string())
    }
}

/// A 2xx body still counts as failure unless `response` is a string.
pub(crate) fn parse_completion_body(body: &str) -> Result<CompletionResponse, BackendError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| BackendError::Malformed(format!("invalid JSON: {err}")))?;

    let response = value
        .get("response")
        .and_then(Value::as_str)
        .ok_or_else(|| BackendError::Malformed("missing string field `response`".to_string()))?;

    Ok(CompletionResponse {
        response: response.to_string(),
        tokens_used: value.get("tokens_used").and_then(Value::as_u64),
        model_used: value
            .get("model_used")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn extract_error_summary(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(collapse_whitespace(trimmed));
    };

    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .map(collapse_whitespace)
        .or_else(|| Some(collapse_whitespace(trimmed)))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// One prior turn as the completion endpoint expects it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub message: String,
    pub history: Vec<HistoryTurn>,
    /// Epoch milliseconds. Only used by the endpoint for cache-busting.
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl HistoryTurn {
    /// Converts a committed transcript message. App-authored messages have no
    /// API role and are skipped.
    pub fn from_message(message: &Message) -> Option<Self> {
        message.role.to_api_role().map(|role| Self {
            role: role.to_string(),
            content: message.content.clone(),
        })
    }
}

impl CompletionRequest {
    pub fn new(message: impl Into<String>, history: &[Message]) -> Self {
        Self {
            message: message.into(),
            history: history.iter().filter_map(HistoryTurn::from_message).collect(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl CompletionResponse {
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            tokens_used: None,
            model_used: None,
        }
    }
}

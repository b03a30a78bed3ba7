use std::time::Duration;

use async_trait::async_trait;

use super::{BackendError, CompletionBackend};
use crate::api::{CompletionRequest, CompletionResponse};

const MOCK_MODEL: &str = "mock-coach";

/// Coaching focus areas, checked in order against the lowercased message.
const FOCUS_AREAS: &[(&[&str], &str)] = &[
    (
        &["problem", "pain", "struggle", "frustrat"],
        "Good, you're leading with the problem. Make it concrete: who exactly has this problem, \
how often do they hit it, and what do they do about it today?",
    ),
    (
        &["traction", "revenue", "pilot", "waitlist", "users signed"],
        "Traction is your strongest evidence. Lead with a number: how many users, how fast \
it's growing, or what someone has paid you so far.",
    ),
    (
        &["customer", "user", "market", "audience"],
        "Let's sharpen the target market. \"Everyone\" is not a customer. Name the first group \
you'll sell to and why they'll care before anyone else does.",
    ),
    (
        &["competitor", "alternative", "unlike", "instead of"],
        "You're touching on differentiation. In one sentence, what do you do that existing \
alternatives can't or won't?",
    ),
];

const DEFAULT_REPLY: &str = "Let's start with clarity. In two to four plain sentences: what \
problem are you solving, for whom, and what does your product actually do? Avoid jargon and \
tell me what a user does on day one.";

/// Offline stand-in for the coaching endpoint.
pub struct MockBackend {
    latency: Duration,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn reply_for(message: &str, prior_turns: usize) -> String {
        let lowered = message.to_lowercase();
        let focus = FOCUS_AREAS
            .iter()
            .find(|(cues, _)| cues.iter().any(|cue| lowered.contains(cue)))
            .map(|(_, reply)| *reply)
            .unwrap_or(DEFAULT_REPLY);

        if prior_turns == 0 {
            format!("Thanks for sharing. {focus}")
        } else {
            focus.to_string()
        }
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let response = Self::reply_for(&request.message, request.history.len());
        // Rough estimate, four characters per token.
        let tokens_used = (response.len() as u64).div_ceil(4);
        Ok(CompletionResponse {
            response,
            tokens_used: Some(tokens_used),
            model_used: Some(MOCK_MODEL.to_string()),
        })
    }

    fn describe(&self) -> String {
        "mock coach (offline)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    #[tokio::test]
    async fn replies_follow_the_message_focus() {
        let backend = MockBackend::new(Duration::ZERO);

        let reply = backend
            .complete(&CompletionRequest::new(
                "Our customers are dentists",
                &[Message::user("a"), Message::assistant("b")],
            ))
            .await
            .expect("mock never fails");
        assert!(reply.response.starts_with("Let's sharpen the target market"));
        assert_eq!(reply.model_used.as_deref(), Some(MOCK_MODEL));
        assert!(reply.tokens_used.is_some_and(|tokens| tokens > 0));
    }

    #[tokio::test]
    async fn first_reply_is_welcoming_and_has_a_default() {
        let backend = MockBackend::new(Duration::ZERO);
        let reply = backend
            .complete(&CompletionRequest::new("We make software", &[]))
            .await
            .expect("mock never fails");
        assert!(reply.response.starts_with("Thanks for sharing. Let's start with clarity."));
    }
}

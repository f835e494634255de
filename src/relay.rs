use std::sync::Arc;

use crate::models::{ChatMessage, MessagesRequest};
use crate::prompt::PromptBuilder;
use crate::transport::Transport;

/// What came back from one relay call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The first content block carried text
    Reply(String),
    /// The call completed but there was no text to show
    Empty,
    /// Network error or a body that could not be read as JSON
    Failed,
}

impl RelayOutcome {
    /// Collapse to display text using the caller's fixed fallbacks
    pub fn into_text(self, when_empty: &str, when_failed: &str) -> String {
        match self {
            RelayOutcome::Reply(text) => text,
            RelayOutcome::Empty => when_empty.to_string(),
            RelayOutcome::Failed => when_failed.to_string(),
        }
    }
}

/// Forwards transcripts to the model endpoint. Exactly one transport call per
/// `relay`; no retries, no timeout beyond the transport's own.
#[derive(Clone)]
pub struct Relay {
    tx: Arc<dyn Transport>,
    prompts: PromptBuilder,
}

impl Relay {
    pub fn new(tx: Arc<dyn Transport>, prompts: PromptBuilder) -> Self {
        Self { tx, prompts }
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Send a whole transcript
    pub async fn relay(&self, transcript: Vec<ChatMessage>) -> RelayOutcome {
        let request = self.prompts.request(transcript);
        tracing::info!(messages = request.messages.len(), "Relaying transcript");
        self.dispatch(&request).await
    }

    /// Send one question with no history
    pub async fn ask_once(&self, question: &str) -> RelayOutcome {
        let request = self.prompts.single_question(question);
        tracing::info!("Relaying single question");
        self.dispatch(&request).await
    }

    async fn dispatch(&self, request: &MessagesRequest) -> RelayOutcome {
        match self.tx.send(request).await {
            Ok(response) => match response.first_text() {
                Some(text) => {
                    tracing::debug!(reply_len = text.len(), "Relay returned text");
                    RelayOutcome::Reply(text.to_string())
                }
                None => {
                    tracing::warn!(
                        stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
                        "Relay response carried no text"
                    );
                    RelayOutcome::Empty
                }
            },
            Err(e) => {
                tracing::warn!("Relay call failed: {}", e);
                RelayOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;
    use crate::models::{ContentBlock, MessagesResponse};
    use crate::transport::MockTransport;

    fn text_response(text: &str) -> MessagesResponse {
        MessagesResponse {
            content: vec![ContentBlock {
                block_type: Some("text".to_string()),
                text: Some(text.to_string()),
            }],
            ..Default::default()
        }
    }

    fn relay_with(mock: MockTransport) -> Relay {
        Relay::new(Arc::new(mock), PromptBuilder::new("test-model", 100))
    }

    #[tokio::test]
    async fn test_relay_returns_first_block_text() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req| req.messages.len() == 2 && req.model == "test-model")
            .returning(|_| Ok(text_response("hello there")));

        let outcome = relay_with(mock)
            .relay(vec![ChatMessage::user("a"), ChatMessage::assistant("b")])
            .await;
        assert_eq!(outcome, RelayOutcome::Reply("hello there".to_string()));
    }

    #[tokio::test]
    async fn test_relay_without_text_is_empty() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Ok(MessagesResponse::default()));

        let outcome = relay_with(mock).ask_once("anything").await;
        assert_eq!(outcome, RelayOutcome::Empty);
        assert_eq!(outcome.into_text("No response.", "Error"), "No response.");
    }

    #[tokio::test]
    async fn test_relay_failure_is_not_retried() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(FeedbackError::Transport("connection reset".to_string())));

        let outcome = relay_with(mock).ask_once("anything").await;
        assert_eq!(outcome, RelayOutcome::Failed);
    }

    #[tokio::test]
    async fn test_ask_once_sends_single_message() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req| {
                req.messages == vec![ChatMessage::user("Who teaches Genetics?")]
                    && req.system == crate::prompt::SYSTEM_PROMPT
                    && req.max_tokens == 100
            })
            .returning(|_| Ok(text_response("Dr. Amina Hassan")));

        let outcome = relay_with(mock).ask_once("Who teaches Genetics?").await;
        assert_eq!(outcome.into_text("x", "y"), "Dr. Amina Hassan");
    }
}

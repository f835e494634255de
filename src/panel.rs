use std::sync::{Mutex, MutexGuard};

use crate::error::{FeedbackError, Result};
use crate::relay::Relay;

pub const NO_RESPONSE: &str = "No response.";
pub const CONNECTION_FAILED: &str = "Error connecting to AI.";

#[derive(Default)]
struct PanelInner {
    query: String,
    response: Option<String>,
    loading: bool,
}

/// Single-shot questions about the directory as a whole. Keeps only the
/// current query and the last answer; nothing is carried between asks.
pub struct QueryPanel {
    relay: Relay,
    inner: Mutex<PanelInner>,
}

impl QueryPanel {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            inner: Mutex::new(PanelInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn set_query(&self, query: &str) {
        self.lock().query = query.to_string();
    }

    pub fn response(&self) -> Option<String> {
        self.lock().response.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Ask the question currently typed into the panel
    pub async fn submit(&self) -> Result<String> {
        let query = self.query();
        self.ask(&query).await
    }

    /// Send one question with no history and store the answer, replacing the
    /// previous one. The query is cleared once the answer arrives.
    pub async fn ask(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(FeedbackError::InvalidInput(
                "question cannot be empty".to_string(),
            ));
        }

        {
            let mut inner = self.lock();
            if inner.loading {
                return Err(FeedbackError::Busy);
            }
            inner.loading = true;
            inner.query = text.to_string();
            inner.response = None;
        }

        tracing::info!(query_len = text.len(), "Asking general question");
        let answer = self
            .relay
            .ask_once(text)
            .await
            .into_text(NO_RESPONSE, CONNECTION_FAILED);

        let mut inner = self.lock();
        inner.response = Some(answer.clone());
        inner.loading = false;
        inner.query.clear();
        Ok(answer)
    }
}

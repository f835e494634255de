use std::sync::Arc;

use crate::config::Config;
use crate::directory::{Directory, DirectoryStats, ProfessorRecord};
use crate::error::{FeedbackError, Result};
use crate::models::ChatMessage;
use crate::panel::QueryPanel;
use crate::prompt::PromptBuilder;
use crate::relay::Relay;
use crate::session::FeedbackSession;
use crate::transport::{MessagesTransport, Transport};

/// Root application state: the directory, the current search, the one open
/// feedback session (if any) and the general query panel.
pub struct App {
    directory: Directory,
    relay: Relay,
    search: String,
    session: Option<Arc<FeedbackSession>>,
    panel: QueryPanel,
}

impl App {
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(MessagesTransport::new(&cfg.relay)?);
        Ok(Self::with_transport(
            Directory::builtin(),
            transport as Arc<dyn Transport>,
            PromptBuilder::from_config(&cfg.relay),
        ))
    }

    pub fn with_transport(
        directory: Directory,
        transport: Arc<dyn Transport>,
        prompts: PromptBuilder,
    ) -> Self {
        let relay = Relay::new(transport, prompts);
        Self {
            directory,
            panel: QueryPanel::new(relay.clone()),
            relay,
            search: String::new(),
            session: None,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn stats(&self) -> DirectoryStats {
        self.directory.stats()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Professors matching the current search
    pub fn visible(&self) -> Vec<&ProfessorRecord> {
        self.directory.filter(&self.search)
    }

    pub fn panel(&self) -> &QueryPanel {
        &self.panel
    }

    pub fn active_session(&self) -> Option<Arc<FeedbackSession>> {
        self.session.clone()
    }

    /// Open a session for a professor, closing any session already open, and
    /// wait for the priming reply.
    pub async fn open_session(&mut self, professor_id: u32) -> Result<Arc<FeedbackSession>> {
        let professor = self
            .directory
            .get(professor_id)
            .cloned()
            .ok_or(FeedbackError::ProfessorNotFound(professor_id))?;

        self.close_session();

        let session = Arc::new(FeedbackSession::new(professor, self.relay.clone()));
        self.session = Some(Arc::clone(&session));
        session.start().await?;
        Ok(session)
    }

    /// Drop the open session and its transcript. Returns whether one was open.
    pub fn close_session(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::info!(
                    session = %session.id(),
                    messages = session.transcript().len(),
                    "Closing feedback session"
                );
                true
            }
            None => false,
        }
    }

    fn require_session(&self) -> Result<Arc<FeedbackSession>> {
        self.session.clone().ok_or(FeedbackError::NoActiveSession)
    }

    pub async fn ask_session(&self, text: &str) -> Result<ChatMessage> {
        self.require_session()?.ask(text).await
    }

    pub async fn submit_feedback(&self, rating: u8, comment: &str) -> Result<ChatMessage> {
        self.require_session()?.submit_feedback(rating, comment).await
    }

    pub async fn ask_general(&self, text: &str) -> Result<String> {
        self.panel.ask(text).await
    }
}

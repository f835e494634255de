//! Feedback session for one selected professor.
//!
//! A session owns its transcript and relays it, in full, on every action.
//! State lives behind a mutex that is never held across the relay await, so a
//! second caller arriving while a reply is outstanding sees `AwaitingReply`
//! and is turned away instead of queued.

use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::conclusion::Conclusion;
use crate::directory::ProfessorRecord;
use crate::error::{FeedbackError, Result};
use crate::models::{ChatMessage, Role};
use crate::rating::{Rating, StarRating};
use crate::relay::Relay;

/// Shown when the reply carried no text
pub const FEEDBACK_UNAVAILABLE: &str = "Sorry, I couldn't fetch feedback right now.";
/// Shown when the relay call itself failed
pub const CONNECTION_ERROR: &str = "Connection error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Idle,
    AwaitingReply,
}

/// The feedback form while it is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFeedback {
    pub stars: StarRating,
    pub comment: String,
}

impl DraftFeedback {
    fn new() -> Self {
        Self {
            stars: StarRating::interactive(),
            comment: String::new(),
        }
    }

    pub fn rating(&self) -> Option<Rating> {
        self.stars.selected()
    }

    /// Both a rating and a non-blank comment are present
    pub fn is_ready(&self) -> bool {
        self.rating().is_some() && !self.comment.trim().is_empty()
    }
}

struct SessionInner {
    state: SessionState,
    transcript: Vec<ChatMessage>,
    draft: Option<DraftFeedback>,
    submitted: bool,
}

pub struct FeedbackSession {
    id: Uuid,
    professor: ProfessorRecord,
    relay: Relay,
    inner: Mutex<SessionInner>,
}

impl FeedbackSession {
    pub fn new(professor: ProfessorRecord, relay: Relay) -> Self {
        Self {
            id: Uuid::new_v4(),
            professor,
            relay,
            inner: Mutex::new(SessionInner {
                state: SessionState::Initializing,
                transcript: Vec::new(),
                draft: None,
                submitted: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // No invariant spans a panic point, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn professor(&self) -> &ProfessorRecord {
        &self.professor
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().transcript.clone()
    }

    pub fn draft(&self) -> Option<DraftFeedback> {
        self.lock().draft.clone()
    }

    pub fn is_composing(&self) -> bool {
        self.lock().draft.is_some()
    }

    /// Whether feedback has been submitted during this session
    pub fn has_submitted(&self) -> bool {
        self.lock().submitted
    }

    /// Conclusion from the most recent assistant reply that carries one
    pub fn latest_conclusion(&self) -> Option<Conclusion> {
        self.lock()
            .transcript
            .iter()
            .rev()
            .filter(|m| m.role == Role::Assistant)
            .find_map(|m| Conclusion::parse(&m.content))
    }

    /// Seed the transcript with the priming message and wait for the first reply
    pub async fn start(&self) -> Result<ChatMessage> {
        let priming = self.relay.prompts().priming_message(&self.professor);
        let snapshot = {
            let mut inner = self.lock();
            if inner.state != SessionState::Initializing {
                return Err(FeedbackError::Internal(format!(
                    "session {} already started",
                    self.id
                )));
            }
            inner.transcript.push(priming);
            inner.state = SessionState::AwaitingReply;
            inner.transcript.clone()
        };

        tracing::info!(session = %self.id, professor = self.professor.id, "Opening feedback session");
        Ok(self.complete(snapshot).await)
    }

    /// Ask a free-form question about the professor
    pub async fn ask(&self, text: &str) -> Result<ChatMessage> {
        if text.trim().is_empty() {
            return Err(FeedbackError::InvalidInput(
                "question cannot be empty".to_string(),
            ));
        }

        let snapshot = self.begin(ChatMessage::user(text))?;
        tracing::debug!(session = %self.id, "Relaying question");
        Ok(self.complete(snapshot).await)
    }

    /// Submit a rating and comment. Out-of-range ratings or a blank comment are
    /// rejected without touching the transcript or sending anything.
    pub async fn submit_feedback(&self, rating: u8, comment: &str) -> Result<ChatMessage> {
        let rating = Rating::new(rating)?;
        if comment.trim().is_empty() {
            return Err(FeedbackError::InvalidInput(
                "feedback comment cannot be empty".to_string(),
            ));
        }

        let message = self
            .relay
            .prompts()
            .submission_message(&self.professor, rating, comment);

        let snapshot = {
            let mut inner = self.lock();
            let snapshot = Self::append_when_idle(&mut inner, message)?;
            inner.draft = None;
            inner.submitted = true;
            snapshot
        };

        tracing::info!(session = %self.id, rating = rating.value(), "Relaying submitted feedback");
        Ok(self.complete(snapshot).await)
    }

    /// Open the feedback form. Only allowed while idle.
    pub fn open_draft(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Idle => {
                if inner.draft.is_none() {
                    inner.draft = Some(DraftFeedback::new());
                }
                Ok(())
            }
            SessionState::Initializing => Err(FeedbackError::SessionNotStarted),
            SessionState::AwaitingReply => Err(FeedbackError::Busy),
        }
    }

    pub fn set_draft_rating(&self, stars: u8) -> Result<Rating> {
        let mut inner = self.lock();
        let draft = inner.draft.as_mut().ok_or(FeedbackError::NoDraft)?;
        draft
            .stars
            .select(stars)?
            .ok_or_else(|| FeedbackError::Internal("draft star widget is read-only".to_string()))
    }

    pub fn set_draft_comment(&self, comment: &str) -> Result<()> {
        let mut inner = self.lock();
        let draft = inner.draft.as_mut().ok_or(FeedbackError::NoDraft)?;
        draft.comment = comment.to_string();
        Ok(())
    }

    /// Close the form and discard whatever was entered
    pub fn cancel_draft(&self) -> Result<()> {
        self.lock().draft.take().map(|_| ()).ok_or(FeedbackError::NoDraft)
    }

    /// Submit what the open form holds
    pub async fn submit_draft(&self) -> Result<ChatMessage> {
        let draft = self.draft().ok_or(FeedbackError::NoDraft)?;
        let rating = draft.rating().map(Rating::value).unwrap_or(0);
        self.submit_feedback(rating, &draft.comment).await
    }

    fn begin(&self, message: ChatMessage) -> Result<Vec<ChatMessage>> {
        let mut inner = self.lock();
        Self::append_when_idle(&mut inner, message)
    }

    fn append_when_idle(inner: &mut SessionInner, message: ChatMessage) -> Result<Vec<ChatMessage>> {
        match inner.state {
            SessionState::Idle => {
                inner.transcript.push(message);
                inner.state = SessionState::AwaitingReply;
                Ok(inner.transcript.clone())
            }
            SessionState::Initializing => Err(FeedbackError::SessionNotStarted),
            SessionState::AwaitingReply => Err(FeedbackError::Busy),
        }
    }

    /// Relay the snapshot, append exactly one assistant message, return to idle
    async fn complete(&self, snapshot: Vec<ChatMessage>) -> ChatMessage {
        let reply = ChatMessage::assistant(
            self.relay
                .relay(snapshot)
                .await
                .into_text(FEEDBACK_UNAVAILABLE, CONNECTION_ERROR),
        );

        let mut inner = self.lock();
        inner.transcript.push(reply.clone());
        inner.state = SessionState::Idle;
        reply
    }
}

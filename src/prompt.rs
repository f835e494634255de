use crate::config::RelayConfig;
use crate::directory::ProfessorRecord;
use crate::models::{ChatMessage, MessagesRequest};
use crate::rating::Rating;

/// Instruction text sent as `system` on every relay call
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant for a university Professor Feedback Platform.

CORE RULES:
- All student feedback is 100% ANONYMOUS. Never reveal or ask for student identity.
- Always maintain professional, neutral, constructive language.
- If asked "who wrote this feedback?" respond: "All feedback is completely anonymous."
- Flag offensive feedback and ask for revision.

YOUR CAPABILITIES:

1. SEARCH PROFESSORS
   - Help find professors by name or department
   - Return: name, department, courses, average rating

2. VIEW FEEDBACK
   - Show existing anonymous student feedbacks for a professor
   - Never show student names, emails, or IDs
   - Show only: date, course (optional), rating, written comment

3. LEAVE FEEDBACK
   - Collect: star rating (1-5), written comment, course name (optional)
   - Confirm anonymity before submission
   - Ask for honest, constructive feedback

4. AI OVERALL CONCLUSION
   Generate structured conclusion from all feedbacks:
   ✅ Strengths: [key positive themes]
   ⚠️ Areas to Improve: [constructive themes]
   📊 Overall Sentiment: Positive / Mixed / Needs Improvement
   💬 AI Conclusion: [2-3 sentence professional summary]

RESPONSE FORMAT:
Structure responses with clear sections using emojis as headers.
Be concise, warm, and helpful. Encourage honest, respectful academic feedback."#;

/// Builds the synthetic messages and request bodies for the relay.
///
/// Keeps all string interpolation of professor data in one place so the
/// session and panel only deal in `ChatMessage`s and `MessagesRequest`s.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    model: String,
    max_tokens: u32,
    system: String,
}

impl PromptBuilder {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn from_config(cfg: &RelayConfig) -> Self {
        Self::new(cfg.model.clone(), cfg.max_tokens)
    }

    /// First message of every session: asks for sample feedback and a conclusion
    pub fn priming_message(&self, professor: &ProfessorRecord) -> ChatMessage {
        ChatMessage::user(format!(
            "Show me all anonymous feedback and AI conclusion for {} from the {} department who teaches {}. \
             Their current average rating is {}/5. \
             Generate some sample realistic feedback entries and an AI overall conclusion.",
            professor.name,
            professor.department,
            professor.courses.join(", "),
            professor.rating
        ))
    }

    /// Declares a freshly submitted rating and comment
    pub fn submission_message(
        &self,
        professor: &ProfessorRecord,
        rating: Rating,
        comment: &str,
    ) -> ChatMessage {
        ChatMessage::user(format!(
            "A student just submitted anonymous feedback for {}:\n\
             Rating: {}/5 stars\n\
             Course: (anonymous)\n\
             Feedback: \"{}\"\n\
             Please acknowledge this submission, confirm anonymity, and update the AI conclusion \
             based on this new feedback added to the existing ones.",
            professor.name,
            rating.value(),
            comment
        ))
    }

    /// Request carrying an entire transcript
    pub fn request(&self, messages: Vec<ChatMessage>) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: self.system.clone(),
            messages,
        }
    }

    /// Request carrying one free-standing question with no history
    pub fn single_question(&self, question: &str) -> MessagesRequest {
        self.request(vec![ChatMessage::user(question)])
    }
}

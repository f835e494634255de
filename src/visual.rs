use colored::*;

use crate::conclusion::{Conclusion, is_section_header};
use crate::directory::{DirectoryStats, ProfessorRecord};
use crate::models::{ChatMessage, Role};
use crate::rating::StarRating;
use crate::session::{DraftFeedback, FeedbackSession};

/// Terminal rendering for the hub. Everything returns a `String` so the
/// caller decides where it goes.
pub struct VisualOutput;

impl VisualOutput {
    pub fn banner(name: &str, version: &str) -> String {
        format!(
            "{} {} {}\n{}",
            "🎓".bright_yellow(),
            "Professor Feedback Hub".bold(),
            format!("({name} v{version})").dimmed(),
            "Share anonymous feedback, read student experiences, and get AI-powered insights. Type 'help'."
                .dimmed()
        )
    }

    pub fn stats(stats: &DirectoryStats) -> String {
        format!(
            "👨‍🏫 {} Total Professors   ⭐ {} Avg Rating   🔒 {} Anonymous Reviews   🏛️ {} Departments",
            stats.total_professors.to_string().bright_yellow(),
            format!("{:.1}", stats.average_rating).bright_yellow(),
            stats.anonymous_reviews.to_string().bright_yellow(),
            stats.departments.to_string().bright_yellow(),
        )
    }

    /// Heading above the professor list
    pub fn results_heading(query: &str, count: usize) -> String {
        if query.is_empty() {
            "All Professors".bold().to_string()
        } else {
            format!("Results for \"{query}\" ({count})").bold().to_string()
        }
    }

    pub fn no_results(query: &str) -> String {
        format!("🔍 No professors found for \"{query}\"")
            .dimmed()
            .to_string()
    }

    pub fn card(prof: &ProfessorRecord) -> String {
        format!(
            "[{}] {} {}  {} {}\n     {}\n     {}",
            prof.id.to_string().cyan(),
            format!("({})", prof.initials()).bright_black(),
            prof.name.bold(),
            prof.rating.to_string().bright_yellow(),
            StarRating::display(prof.rating).render().yellow(),
            prof.department.to_uppercase().dimmed(),
            prof.courses.join(" · ").yellow(),
        )
    }

    pub fn professor_list(query: &str, records: &[&ProfessorRecord]) -> String {
        let mut lines = vec![Self::results_heading(query, records.len())];
        if records.is_empty() {
            lines.push(Self::no_results(query));
        }
        lines.extend(records.iter().map(|prof| Self::card(prof)));
        lines.join("\n")
    }

    pub fn session_header(session: &FeedbackSession) -> String {
        let prof = session.professor();
        format!(
            "{}  {} {}\n{} · {}",
            prof.name.bold(),
            prof.rating.to_string().bright_yellow(),
            StarRating::display(prof.rating).render().yellow(),
            prof.department.dimmed(),
            prof.courses.join(", ").dimmed(),
        )
    }

    /// One transcript entry. Assistant replies get their section headers
    /// highlighted.
    pub fn message(msg: &ChatMessage) -> String {
        match msg.role {
            Role::User => format!("{} {}", "you ›".bright_yellow(), msg.content.bold()),
            Role::Assistant => {
                let mut out = "ai ›".cyan().to_string();
                for line in msg.content.lines() {
                    let styled = if is_section_header(line) {
                        line.bright_white().bold()
                    } else {
                        line.normal()
                    };
                    out.push_str(&format!("\n  {styled}"));
                }
                out
            }
        }
    }

    pub fn transcript(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .map(Self::message)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn draft(draft: &DraftFeedback) -> String {
        let comment = if draft.comment.is_empty() {
            "(no comment yet)".dimmed().to_string()
        } else {
            draft.comment.normal().to_string()
        };
        format!(
            "{}\n  Your Rating: {}\n  Comment: {}\n  {}",
            "🔒 Your feedback is completely anonymous".dimmed(),
            draft.stars.render().yellow(),
            comment,
            "rate <1-5> · comment <text> · submit · cancel".dimmed()
        )
    }

    pub fn conclusion(conclusion: &Conclusion) -> String {
        let mut parts = Vec::new();
        if let Some(sentiment) = conclusion.sentiment {
            let label = sentiment.label();
            let styled = match sentiment {
                crate::conclusion::Sentiment::Positive => label.green(),
                crate::conclusion::Sentiment::Mixed => label.yellow(),
                crate::conclusion::Sentiment::NeedsImprovement => label.red(),
            };
            parts.push(format!("📊 Sentiment: {styled}"));
        }
        if let Some(summary) = &conclusion.summary {
            parts.push(format!("💬 {}", summary.italic()));
        }
        parts.join("\n")
    }

    pub fn panel_answer(answer: &str) -> String {
        format!("{} {}", "🤖".cyan(), answer)
    }

    pub fn notice(text: &str) -> String {
        format!("{} {}", "›".bright_black(), text.bright_black())
    }

    pub fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }
}

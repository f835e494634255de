use serde::Serialize;

pub const STRENGTHS_MARKER: &str = "✅";
// Matched without the emoji variation selector so bare "⚠" lines count too
pub const IMPROVE_MARKER: &str = "\u{26A0}";
pub const SENTIMENT_MARKER: &str = "📊";
pub const SUMMARY_MARKER: &str = "💬";

const MARKERS: [&str; 4] = [
    STRENGTHS_MARKER,
    IMPROVE_MARKER,
    SENTIMENT_MARKER,
    SUMMARY_MARKER,
];

/// Whether a reply line opens one of the fixed conclusion sections
pub fn is_section_header(line: &str) -> bool {
    let line = line.trim_start();
    MARKERS.iter().any(|marker| line.starts_with(marker))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Mixed,
    NeedsImprovement,
}

impl Sentiment {
    fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        // "needs improvement" is checked first so "positive / needs improvement"
        // style hedges resolve to the weaker label
        if lower.contains("needs improvement") {
            Some(Sentiment::NeedsImprovement)
        } else if lower.contains("mixed") {
            Some(Sentiment::Mixed)
        } else if lower.contains("positive") {
            Some(Sentiment::Positive)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Mixed => "Mixed",
            Sentiment::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Structured view of a reply's conclusion sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conclusion {
    pub strengths: Option<String>,
    pub areas_to_improve: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub summary: Option<String>,
}

#[derive(Clone, Copy)]
enum Section {
    Strengths,
    Improve,
    Sentiment,
    Summary,
}

impl Conclusion {
    /// Extract the marked sections from a reply. Returns `None` when the reply
    /// has no section markers at all. Continuation lines are folded into the
    /// section above them until a blank line or the next marker.
    pub fn parse(text: &str) -> Option<Self> {
        let mut sections: Vec<(Section, String)> = Vec::new();
        let mut open = false;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                open = false;
                continue;
            }

            let section = if line.starts_with(STRENGTHS_MARKER) {
                Some(Section::Strengths)
            } else if line.starts_with(IMPROVE_MARKER) {
                Some(Section::Improve)
            } else if line.starts_with(SENTIMENT_MARKER) {
                Some(Section::Sentiment)
            } else if line.starts_with(SUMMARY_MARKER) {
                Some(Section::Summary)
            } else {
                None
            };

            match section {
                Some(section) => {
                    sections.push((section, header_body(line)));
                    open = true;
                }
                None if open => {
                    if let Some((_, body)) = sections.last_mut() {
                        if !body.is_empty() {
                            body.push(' ');
                        }
                        body.push_str(line);
                    }
                }
                None => {}
            }
        }

        if sections.is_empty() {
            return None;
        }

        let mut conclusion = Conclusion::default();
        for (section, body) in sections {
            let body = (!body.is_empty()).then_some(body);
            match section {
                Section::Strengths => conclusion.strengths = body,
                Section::Improve => conclusion.areas_to_improve = body,
                Section::Sentiment => {
                    conclusion.sentiment = body.as_deref().and_then(Sentiment::parse)
                }
                Section::Summary => conclusion.summary = body,
            }
        }
        Some(conclusion)
    }
}

/// Text after the "Label:" part of a header line, stripped of markdown emphasis
fn header_body(line: &str) -> String {
    let after_label = match line.split_once(':') {
        Some((_, rest)) => rest,
        None => "",
    };
    after_label.trim().trim_matches('*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "Here is a summary of recent feedback.\n\
\n\
✅ Strengths: Clear explanations, well-organised lectures\n\
⚠️ Areas to Improve: Pace in the second half\n\
of the term\n\
📊 Overall Sentiment: Positive\n\
💬 AI Conclusion: Students value the clarity. A slower pace would help.\n";

    #[test]
    fn test_parses_all_sections() {
        let c = Conclusion::parse(REPLY).expect("reply has markers");
        assert_eq!(
            c.strengths.as_deref(),
            Some("Clear explanations, well-organised lectures")
        );
        assert_eq!(
            c.areas_to_improve.as_deref(),
            Some("Pace in the second half of the term")
        );
        assert_eq!(c.sentiment, Some(Sentiment::Positive));
        assert_eq!(
            c.summary.as_deref(),
            Some("Students value the clarity. A slower pace would help.")
        );
    }

    #[test]
    fn test_plain_reply_has_no_conclusion() {
        assert!(Conclusion::parse("All feedback is completely anonymous.").is_none());
    }

    #[test]
    fn test_bold_markdown_sentiment() {
        let c = Conclusion::parse("📊 **Overall Sentiment:** **Needs Improvement**")
            .expect("reply has markers");
        assert_eq!(c.sentiment, Some(Sentiment::NeedsImprovement));
        assert!(c.strengths.is_none());
    }

    #[test]
    fn test_mixed_sentiment() {
        let c = Conclusion::parse("📊 Overall Sentiment: Mixed leaning positive")
            .expect("reply has markers");
        assert_eq!(c.sentiment, Some(Sentiment::Mixed));
    }

    #[test]
    fn test_section_header_detection() {
        assert!(is_section_header("✅ Strengths: x"));
        assert!(is_section_header("  💬 AI Conclusion: y"));
        assert!(!is_section_header("Rating: 4/5"));
    }
}

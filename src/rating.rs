use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FeedbackError, Result};

pub const MAX_STARS: u8 = 5;

/// A star rating a student can submit: always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FeedbackError::InvalidInput(format!(
                "rating must be between 1 and {MAX_STARS}, got {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = FeedbackError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_STARS)
    }
}

/// The 1-5 star widget. Read-only widgets only display; interactive ones
/// accept a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    filled: u8,
    readonly: bool,
}

impl StarRating {
    /// Display-only widget for an average rating, rounded to whole stars
    pub fn display(average: f32) -> Self {
        let filled = average.round().clamp(0.0, MAX_STARS as f32) as u8;
        Self {
            filled,
            readonly: true,
        }
    }

    /// Interactive widget with nothing selected yet
    pub fn interactive() -> Self {
        Self {
            filled: 0,
            readonly: false,
        }
    }

    pub fn filled(&self) -> u8 {
        self.filled
    }

    /// Select a star. Read-only widgets ignore the click and report `None`.
    pub fn select(&mut self, star: u8) -> Result<Option<Rating>> {
        if self.readonly {
            return Ok(None);
        }
        let rating = Rating::new(star)?;
        self.filled = rating.value();
        Ok(Some(rating))
    }

    pub fn selected(&self) -> Option<Rating> {
        if self.readonly {
            None
        } else {
            Rating::new(self.filled).ok()
        }
    }

    /// Filled stars followed by empty ones, always five glyphs wide
    pub fn render(&self) -> String {
        let filled = self.filled.min(MAX_STARS) as usize;
        let mut out = "★".repeat(filled);
        out.push_str(&"☆".repeat(MAX_STARS as usize - filled));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        for v in 1..=5 {
            assert_eq!(Rating::new(v).map(Rating::value).ok(), Some(v));
        }
    }

    #[test]
    fn test_rating_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_display_rounds_average() {
        assert_eq!(StarRating::display(4.3).filled(), 4);
        assert_eq!(StarRating::display(4.7).filled(), 5);
        assert_eq!(StarRating::display(3.5).filled(), 4);
        assert_eq!(StarRating::display(4.3).render(), "★★★★☆");
    }

    #[test]
    fn test_readonly_ignores_selection() {
        let mut widget = StarRating::display(2.0);
        assert_eq!(widget.select(5).ok().flatten(), None);
        assert_eq!(widget.filled(), 2);
        assert!(widget.selected().is_none());
    }

    #[test]
    fn test_interactive_selection() {
        let mut widget = StarRating::interactive();
        assert!(widget.selected().is_none());
        assert!(widget.select(0).is_err());
        let picked = widget.select(3).expect("3 is a valid star");
        assert_eq!(picked.map(Rating::value), Some(3));
        assert_eq!(widget.render(), "★★★☆☆");
        assert_eq!(widget.selected().map(Rating::value), Some(3));
    }
}

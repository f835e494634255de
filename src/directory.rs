use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Headline figure shown next to the directory stats. Reviews are never
/// stored, so this is a fixed label rather than a count.
pub const ANONYMOUS_REVIEW_COUNT: u32 = 247;

/// A professor listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessorRecord {
    pub id: u32,
    pub name: String,
    pub department: String,
    pub courses: Vec<String>,
    /// Average rating on a 0-5 scale
    pub rating: f32,
}

impl ProfessorRecord {
    fn new(id: u32, name: &str, department: &str, courses: &[&str], rating: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            department: department.to_string(),
            courses: courses.iter().map(|c| c.to_string()).collect(),
            rating,
        }
    }

    /// Case-insensitive substring match against name, department or any course.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.department.to_lowercase().contains(needle)
            || self
                .courses
                .iter()
                .any(|course| course.to_lowercase().contains(needle))
    }

    /// Up to two initials taken from the words of the name
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect()
    }
}

/// Aggregate figures for the stats bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryStats {
    pub total_professors: usize,
    pub average_rating: f32,
    pub anonymous_reviews: u32,
    pub departments: usize,
}

/// Immutable list of professors, fixed at startup
#[derive(Debug, Clone)]
pub struct Directory {
    records: Vec<ProfessorRecord>,
}

impl Directory {
    pub fn new(records: Vec<ProfessorRecord>) -> Self {
        Self { records }
    }

    /// The six professors the hub ships with
    pub fn builtin() -> Self {
        Self::new(vec![
            ProfessorRecord::new(
                1,
                "Dr. Sarah Mitchell",
                "Computer Science",
                &["Algorithms", "Data Structures"],
                4.3,
            ),
            ProfessorRecord::new(
                2,
                "Prof. James Okafor",
                "Mathematics",
                &["Calculus II", "Linear Algebra"],
                3.8,
            ),
            ProfessorRecord::new(
                3,
                "Dr. Elena Vasquez",
                "Physics",
                &["Quantum Mechanics", "Thermodynamics"],
                4.7,
            ),
            ProfessorRecord::new(
                4,
                "Prof. David Chen",
                "Literature",
                &["Modern Fiction", "Creative Writing"],
                4.1,
            ),
            ProfessorRecord::new(
                5,
                "Dr. Amina Hassan",
                "Biology",
                &["Cell Biology", "Genetics"],
                3.5,
            ),
            ProfessorRecord::new(
                6,
                "Prof. Marco Rossi",
                "Economics",
                &["Microeconomics", "Game Theory"],
                4.6,
            ),
        ])
    }

    pub fn records(&self) -> &[ProfessorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&ProfessorRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Records whose name, department or courses contain `query`, ignoring case.
    /// An empty query returns everything, in directory order.
    pub fn filter(&self, query: &str) -> Vec<&ProfessorRecord> {
        let needle = query.to_lowercase();
        let matches: Vec<&ProfessorRecord> = self
            .records
            .iter()
            .filter(|record| needle.is_empty() || record.matches(&needle))
            .collect();
        debug!(query_len = query.len(), matches = matches.len(), "Filtered directory");
        matches
    }

    pub fn stats(&self) -> DirectoryStats {
        let total = self.records.len();
        let average_rating = if total == 0 {
            0.0
        } else {
            self.records.iter().map(|r| r.rating).sum::<f32>() / total as f32
        };
        let departments: HashSet<&str> = self
            .records
            .iter()
            .map(|r| r.department.as_str())
            .collect();

        DirectoryStats {
            total_professors: total,
            average_rating,
            anonymous_reviews: ANONYMOUS_REVIEW_COUNT,
            departments: departments.len(),
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_everything() {
        let dir = Directory::builtin();
        assert_eq!(dir.filter("").len(), 6);
    }

    #[test]
    fn test_physics_matches_single_department() {
        let dir = Directory::builtin();
        let hits = dir.filter("Physics");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Dr. Elena Vasquez");
    }

    #[test]
    fn test_filter_is_case_insensitive_across_fields() {
        let dir = Directory::builtin();

        let by_course = dir.filter("GAME theory");
        assert_eq!(by_course.len(), 1);
        assert_eq!(by_course[0].id, 6);

        let by_name = dir.filter("okafor");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, 2);

        // "bio" hits the Biology department and the Cell Biology course of the same record
        let by_dept = dir.filter("bio");
        assert_eq!(by_dept.len(), 1);
        assert_eq!(by_dept[0].id, 5);
    }

    #[test]
    fn test_filter_only_returns_matching_records() {
        let dir = Directory::builtin();
        for query in ["dr.", "prof", "ing", "e", "zzz", "Linear"] {
            let needle = query.to_lowercase();
            let hits = dir.filter(query);
            for hit in &hits {
                assert!(hit.matches(&needle), "{} should match {}", hit.name, query);
            }
            let expected = dir.records().iter().filter(|r| r.matches(&needle)).count();
            assert_eq!(hits.len(), expected);
        }
    }

    #[test]
    fn test_no_matches() {
        let dir = Directory::builtin();
        assert!(dir.filter("astrology").is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let dir = Directory::builtin();
        assert_eq!(dir.get(4).map(|p| p.name.as_str()), Some("Prof. David Chen"));
        assert!(dir.get(42).is_none());
    }

    #[test]
    fn test_initials() {
        let dir = Directory::builtin();
        let sarah = dir.get(1).expect("record 1 exists");
        assert_eq!(sarah.initials(), "DS");
        let marco = dir.get(6).expect("record 6 exists");
        assert_eq!(marco.initials(), "PM");
    }

    #[test]
    fn test_stats() {
        let stats = Directory::builtin().stats();
        assert_eq!(stats.total_professors, 6);
        assert_eq!(stats.departments, 6);
        assert_eq!(stats.anonymous_reviews, ANONYMOUS_REVIEW_COUNT);
        assert_eq!(format!("{:.1}", stats.average_rating), "4.2");
    }

    #[test]
    fn test_stats_on_empty_directory() {
        let stats = Directory::new(Vec::new()).stats();
        assert_eq!(stats.total_professors, 0);
        assert_eq!(stats.average_rating, 0.0);
    }
}

//! Grade ordering table.
//!
//! Climbing grades are labels, not numbers, and the deployment folds three
//! unrelated vocabularies into one column (French sport grades, the V-scale,
//! and gym colour/number circuits). [`GradeTable`] maps each known label to a
//! rank, hardest first (rank 0), so "hardest climb" queries are well defined.
//!
//! Labels missing from the table are unorderable: [`GradeTable::rank`]
//! returns `None` for them and every hardest-grade computation skips them.
//! Ranks are only meaningful between labels of the same vocabulary, so
//! callers restrict comparisons to one discipline where that matters.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Built-in ordering, hardest to easiest.
pub const DEFAULT_GRADE_ORDER: &[&str] = &[
    // French sport grades
    "8a", "7c+", "7c", "7b+", "7b", "7a+", "7a", "6c+", "6c", "6b+", "6b", "6a+", "6a", "5c",
    "5b", "5a",
    // V-scale bouldering
    "V10", "V9", "V8", "V7", "V6", "V5", "V4", "V3", "V2", "V1", "V0",
    // Gym colour circuit
    "Blue", "Green/Blue", "Green", "Yellow/Green", "Yellow", "Orange/Yellow", "Orange",
    "Red/Orange", "Red",
    // Gym numeric circuit
    "8", "7", "6", "5", "4", "3", "2", "1",
];

/// Errors raised while building a grade table.
#[derive(Debug, thiserror::Error)]
pub enum GradeTableError {
    #[error("grade table is empty")]
    Empty,

    #[error("blank grade label at position {0}")]
    BlankLabel(usize),

    #[error("duplicate grade label '{label}' at positions {first} and {second}")]
    DuplicateLabel {
        label: String,
        first: usize,
        second: usize,
    },

    #[error("failed to read grade table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse grade table: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct GradeTableFile {
    grades: GradeTableSection,
}

#[derive(Debug, Deserialize)]
struct GradeTableSection {
    order: Vec<String>,
}

/// Total order over grade labels, hardest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeTable {
    labels: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl GradeTable {
    /// Build a table from labels listed hardest to easiest.
    ///
    /// Labels are trimmed; blank or repeated labels are rejected.
    pub fn new<I, S>(labels: I) -> Result<Self, GradeTableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut ranks = HashMap::new();

        for (position, label) in labels.into_iter().enumerate() {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(GradeTableError::BlankLabel(position));
            }
            if let Some(&first) = ranks.get(label) {
                return Err(GradeTableError::DuplicateLabel {
                    label: label.to_string(),
                    first,
                    second: position,
                });
            }
            ranks.insert(label.to_string(), position);
            ordered.push(label.to_string());
        }

        if ordered.is_empty() {
            return Err(GradeTableError::Empty);
        }

        Ok(Self {
            labels: ordered,
            ranks,
        })
    }

    /// Parse a TOML document with a `[grades] order = [...]` section.
    pub fn from_toml_str(content: &str) -> Result<Self, GradeTableError> {
        let file: GradeTableFile = toml::from_str(content)?;
        Self::new(file.grades.order)
    }

    /// Load a table from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GradeTableError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Rank of a label (0 = hardest), `None` if the label is unknown.
    pub fn rank(&self, label: &str) -> Option<usize> {
        self.ranks.get(label.trim()).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rank(label).is_some()
    }

    /// Label at a rank.
    pub fn label(&self, rank: usize) -> Option<&str> {
        self.labels.get(rank).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Hardest known label among `labels`, spelled as in the table.
    /// Unknown labels are skipped.
    pub fn hardest<'a, I>(&self, labels: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .filter_map(|label| self.rank(label))
            .min()
            .and_then(|rank| self.label(rank))
    }

    /// Item whose label has the lowest rank.
    ///
    /// Items without a label, or with an unknown one, never win. Among items
    /// sharing the best rank the first one is returned.
    pub fn min_by_rank<T, I, F>(&self, items: I, label_of: F) -> Option<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<&str>,
    {
        items
            .into_iter()
            .filter_map(|item| {
                let rank = label_of(&item).and_then(|label| self.rank(label))?;
                Some((rank, item))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, item)| item)
    }
}

impl Default for GradeTable {
    fn default() -> Self {
        let mut ranks = HashMap::with_capacity(DEFAULT_GRADE_ORDER.len());
        for (position, label) in DEFAULT_GRADE_ORDER.iter().enumerate() {
            ranks.entry(label.to_string()).or_insert(position);
        }
        Self {
            labels: DEFAULT_GRADE_ORDER.iter().map(|l| l.to_string()).collect(),
            ranks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_ranks() {
        let table = GradeTable::default();
        assert_eq!(table.len(), DEFAULT_GRADE_ORDER.len());
        assert_eq!(table.rank("8a"), Some(0));
        assert!(table.rank("V10").unwrap() < table.rank("V0").unwrap());
        assert!(table.rank("Blue").unwrap() < table.rank("Red").unwrap());
        assert_eq!(table.rank("1"), Some(table.len() - 1));
        assert_eq!(table.label(0), Some("8a"));
    }

    #[test]
    fn test_default_table_matches_validated_build() {
        assert_eq!(GradeTable::new(DEFAULT_GRADE_ORDER).unwrap(), GradeTable::default());
    }

    #[test]
    fn test_unknown_label_has_no_rank() {
        let table = GradeTable::default();
        assert_eq!(table.rank("V17"), None);
        assert!(!table.contains("Purple"));
        assert!(table.contains(" V5 "));
    }

    #[test]
    fn test_hardest_skips_unknown_labels() {
        let table = GradeTable::default();
        assert_eq!(table.hardest(["V3", "V17", "V5", "V1"]), Some("V5"));
        assert_eq!(table.hardest(["V17", "Purple"]), None);
        assert_eq!(table.hardest(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_hardest_returns_table_spelling() {
        let table = GradeTable::default();
        assert_eq!(table.hardest([" V5 ", "V3"]), Some("V5"));
        assert_eq!(table.hardest(["6a\t", " 6b+"]), Some("6b+"));
    }

    #[test]
    fn test_hardest_with_duplicates() {
        let table = GradeTable::default();
        assert_eq!(table.hardest(["6a", "6b", "6b", "6a"]), Some("6b"));
    }

    #[test]
    fn test_min_by_rank_returns_first_of_ties() {
        let table = GradeTable::default();
        let items = vec![("a", Some("V4")), ("b", None), ("c", Some("V4")), ("d", Some("V2"))];
        let best = table.min_by_rank(items, |(_, grade)| *grade);
        assert_eq!(best.map(|(name, _)| name), Some("a"));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = GradeTable::new(["V2", "V1", "V2"]).unwrap_err();
        match err {
            GradeTableError::DuplicateLabel {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "V2");
                assert_eq!(first, 0);
                assert_eq!(second, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_rejects_blank_and_empty() {
        assert!(matches!(
            GradeTable::new(["V2", "  "]),
            Err(GradeTableError::BlankLabel(1))
        ));
        assert!(matches!(
            GradeTable::new(Vec::<String>::new()),
            Err(GradeTableError::Empty)
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let table = GradeTable::from_toml_str(
            r#"
[grades]
order = ["5.13a", "5.12d", "5.12c"]
"#,
        )
        .unwrap();
        assert_eq!(table.rank("5.12d"), Some(1));
        assert_eq!(table.hardest(["5.12c", "5.12d"]), Some("5.12d"));
    }

    #[test]
    fn test_from_toml_str_missing_section() {
        let err = GradeTable::from_toml_str("[other]\nvalue = 1\n").unwrap_err();
        assert!(matches!(err, GradeTableError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grades]\norder = [\"Black\", \"Blue\", \"Green\"]").unwrap();
        let table = GradeTable::from_file(file.path()).unwrap();
        assert_eq!(table.labels(), &["Black", "Blue", "Green"]);
    }

    #[test]
    fn test_from_missing_file() {
        let err = GradeTable::from_file("/nonexistent/grades.toml").unwrap_err();
        assert!(matches!(err, GradeTableError::Io(_)));
    }
}

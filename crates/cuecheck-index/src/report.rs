//! Build statistics for the reference index

use crate::IndexError;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// An entry refused at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedEntry {
    /// Position of the entry in the snapshot
    pub position: usize,
    /// Why it was refused
    pub error: IndexError,
}

// Serialized flat: position, entry id and the error message.
impl Serialize for ExcludedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExcludedEntry", 3)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("id", &self.error.id())?;
        state.serialize_field("reason", &self.error.to_string())?;
        state.end()
    }
}

/// What happened while building the index
///
/// Exclusions never abort the build; they are collected here so the caller
/// can decide whether the catalog is fit for a billing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IndexReport {
    /// Entries read from the snapshot
    pub entries_in: usize,

    /// Entries admitted to the index
    pub admitted: usize,

    /// Entries refused
    pub excluded: Vec<ExcludedEntry>,

    /// Implausible ISRC/ISWC values stripped from admitted entries
    pub identifiers_dropped: usize,

    /// Identifiers already owned by a lower entry id (not indexed for the later entry)
    pub identifier_collisions: usize,

    /// Distinct normalized titles
    pub distinct_titles: usize,

    /// Normalized titles shared by more than one entry
    pub shared_titles: usize,
}

impl IndexReport {
    /// Record a refused entry
    pub fn record_exclusion(&mut self, position: usize, error: IndexError) {
        self.excluded.push(ExcludedEntry { position, error });
    }

    /// True when every entry was admitted untouched
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty() && self.identifiers_dropped == 0 && self.identifier_collisions == 0
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Reference Index Summary".to_string(),
            "=======================".to_string(),
            format!("Entries read: {}", self.entries_in),
            format!("Admitted: {}", self.admitted),
            format!("Excluded: {}", self.excluded.len()),
            format!("Identifiers dropped: {}", self.identifiers_dropped),
            format!("Identifier collisions: {}", self.identifier_collisions),
            format!("Distinct titles: {}", self.distinct_titles),
            format!("Shared titles: {}", self.shared_titles),
        ];

        if !self.excluded.is_empty() {
            lines.push(String::new());
            lines.push("Exclusions:".to_string());
            for excluded in &self.excluded {
                lines.push(format!("  #{}: {}", excluded.position, excluded.error));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuecheck_domain::EntryId;

    #[test]
    fn test_clean_report() {
        let report = IndexReport::default();
        assert!(report.is_clean());
    }

    #[test]
    fn test_summary_lists_exclusions() {
        let mut report = IndexReport {
            entries_in: 3,
            admitted: 2,
            ..IndexReport::default()
        };
        report.record_exclusion(
            1,
            IndexError::MissingTitle {
                id: EntryId::from_value(42),
            },
        );

        let summary = report.summary();
        assert!(!report.is_clean());
        assert!(summary.contains("Entries read: 3"));
        assert!(summary.contains("Excluded: 1"));
        assert!(summary.contains("#1: Invalid reference entry 42: title is missing"));
    }

    #[test]
    fn test_report_serializes_exclusions() {
        let mut report = IndexReport {
            entries_in: 2,
            admitted: 1,
            ..IndexReport::default()
        };
        report.record_exclusion(
            1,
            IndexError::DuplicateId {
                id: EntryId::from_value(7),
            },
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["admitted"], 1);
        assert_eq!(value["excluded"][0]["position"], 1);
        assert_eq!(value["excluded"][0]["id"], 7);
        assert_eq!(
            value["excluded"][0]["reason"],
            "Invalid reference entry 7: duplicate entry id"
        );
    }
}
